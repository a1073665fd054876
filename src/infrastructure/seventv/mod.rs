//! 7TV API client.

mod client;
mod dto;

pub use client::{
    DEFAULT_TIMEOUT, SEVEN_TV_API_URL, SEVEN_TV_API_VERSION, SevenTvClient, parse_manifest,
};
