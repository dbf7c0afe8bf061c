//! # gridtone-lut
//!
//! 3D color lookup tables for the gridtone grading pipeline.
//!
//! - [`Lut3D`] - N×N×N RGB cube sampled with trilinear interpolation
//! - [`cube`] - `.cube` (Adobe/Resolve) reader and writer
//! - [`LutCatalog`] - the enumerated set of named LUTs in a directory
//!
//! # Usage
//!
//! ```rust
//! use gridtone_lut::Lut3D;
//!
//! let lut = Lut3D::identity(17);
//! let rgb = lut.apply([0.5, 0.3, 0.2]);
//! assert!((rgb[0] - 0.5).abs() < 1e-5);
//! ```
//!
//! # Dependencies
//!
//! - [`gridtone-core`] - pixel types
//! - [`thiserror`] - error handling
//!
//! # Used By
//!
//! - `gridtone-render` - LUT stage and background loader

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod lut3d;
pub mod catalog;
pub mod cube;

pub use catalog::{LutCatalog, LutEntry};
pub use error::{LutError, LutResult};
pub use lut3d::Lut3D;
pub use cube::{parse_3d as parse_cube, read_3d as read_cube, write_3d as write_cube};
