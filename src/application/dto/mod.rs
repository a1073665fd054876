//! Data transfer objects.

mod import_dto;

pub use import_dto::{ImportEmoteRequest, ImportEmoteResponse};
