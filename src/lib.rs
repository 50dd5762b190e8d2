//! Marquee - movie browsing and HLS streaming front-end
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod listing;
pub mod playback;
pub mod probe;
pub mod search;
pub mod server;
