//! Marquee-Common: Shared catalog types and utilities.
//!
//! This crate provides the pieces used by both the HTTP front-end and the
//! playback engine:
//!
//! - **Catalog Model**: Movies, movie details, episode servers and pagination,
//!   deserialized leniently from the remote catalog's JSON
//! - **Images**: Normalisation of catalog image paths into absolute URLs
//! - **Text**: HTML stripping for synopsis text and slug prettifying
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use marquee_common::images::image_url;
//! use marquee_common::text::title_from_slug;
//!
//! assert_eq!(
//!     image_url("https://img.example", "/upload/poster.jpg"),
//!     "https://img.example/upload/poster.jpg"
//! );
//! assert_eq!(title_from_slug("hanh-dong"), "Hanh Dong");
//! ```

pub mod error;
pub mod images;
pub mod model;
pub mod text;

pub use error::{Error, Result};
pub use model::*;
