//! # gridtone-core
//!
//! Core types for the gridtone color-grading engine.
//!
//! This crate holds the pieces every other gridtone crate agrees on:
//!
//! - [`Image`] - RGBA `f32` image buffer with copy-on-write storage
//! - [`pixel`] - RGB helpers and BT.601 luma
//! - [`ImageProperties`] - the 27-field grading parameter set, its defaults,
//!   slider domains and the flat wire format used for persistence
//!
//! ## Crate Structure
//!
//! ```text
//! gridtone-core (this crate)
//!    ^
//!    |
//!    +-- gridtone-lut (3D LUT parsing and sampling)
//!    +-- gridtone-ops (grading kernel, detail, vignette)
//!    +-- gridtone-render (surface, backends, capture)
//!    +-- gridtone-session (edit session, persistence contracts)
//! ```
//!
//! ## Value Space
//!
//! Pixels are display-encoded (sRGB) values in `[0, 1]`. The grading math
//! operates directly on those values; no linearization happens anywhere in
//! the pipeline.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod properties;

pub use error::{Error, Result};
pub use image::Image;
pub use pixel::{Rgb, luma};
pub use properties::{Band, BandAdjust, BandChannel, Field, ImageProperties};
