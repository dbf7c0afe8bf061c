//! # gridtone-ops
//!
//! The gridtone grading kernel and its post-processing stages.
//!
//! # Modules
//!
//! - [`adjust`] - exposure, contrast, saturation, hue rotation
//! - [`hsl`] - RGB/HSL conversion (hue in radians)
//! - [`bands`] - six-band HSL targeting
//! - [`detail`] - edge-aware (bilateral) detail estimation
//! - [`grade`] - the kernel combining the stages above
//! - [`vignette`] - radial darkening after the LUT
//! - [`pipeline`] - grade, LUT, vignette for one output pixel
//! - [`parallel`] - row-parallel frame evaluation
//!
//! # Example
//!
//! ```rust
//! use gridtone_core::{Image, ImageProperties};
//! use gridtone_ops::{DetailSettings, Pipeline, parallel};
//!
//! let mut props = ImageProperties::default();
//! props.brightness = 120.0;
//! props.structure = 40.0;
//!
//! let src = Image::filled(8, 8, [0.4, 0.3, 0.2, 1.0]);
//! let pipe = Pipeline::new(&props, &DetailSettings::default(), None);
//! let graded = parallel::grade_image(&src, &pipe).unwrap();
//! assert!(graded.pixel(0, 0)[0] > 0.4);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod adjust;
pub mod bands;
pub mod detail;
pub mod grade;
pub mod hsl;
pub mod parallel;
pub mod pipeline;
pub mod vignette;

pub use error::{OpsError, OpsResult};
pub use bands::BandSet;
pub use detail::{DetailLayers, DetailSettings};
pub use grade::{GradeParams, grade};
pub use pipeline::Pipeline;
