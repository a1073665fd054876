//! Emote Porter - import 7TV emotes into Discord guild emoji sets.
//!
//! This crate fetches emote manifests, picks the largest variant that fits the
//! emoji upload limit, re-encodes it with frame skipping when needed, and keeps
//! per-guild command permission overrides and an emote registry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the command line interface.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "emote-porter";
