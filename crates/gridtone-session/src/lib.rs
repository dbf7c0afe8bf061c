//! # gridtone-session
//!
//! Editing sessions for gridtone posts.
//!
//! A post is a source image plus the [`ImageProperties`] it is graded with
//! and, once saved, a rendered PNG. An [`EditSession`] opens a post, lets
//! the caller change properties field by field with a live preview, and
//! then either resets the post or saves a fresh render.
//!
//! Storage and identity stay behind two traits:
//!
//! - [`PersistenceService`] - post records and image blobs
//! - [`AuthService`] - the signed-in user; saving requires one
//!
//! Bundled implementations: [`InMemoryPersistence`], [`FsPersistence`]
//! (`posts/<id>.json` + `blobs/<sha256>.png`) and [`StaticAuth`].
//!
//! # Example
//!
//! ```no_run
//! use gridtone_core::Field;
//! use gridtone_render::RenderConfig;
//! use gridtone_session::{EditSession, FsPersistence, StaticAuth};
//!
//! # fn main() -> gridtone_session::SessionResult<()> {
//! let store = FsPersistence::open("store")?;
//! let mut session = EditSession::open(store, "post-1", RenderConfig::default())?;
//! session.set_field(Field::Brightness, 120.0);
//! session.assign("lut", "kodak")?;
//! let url = session.save(&StaticAuth::signed_in("me"))?;
//! println!("saved {url}");
//! # Ok(())
//! # }
//! ```
//!
//! [`ImageProperties`]: gridtone_core::ImageProperties

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod fs;
pub mod memory;
pub mod record;
pub mod service;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use fs::FsPersistence;
pub use memory::InMemoryPersistence;
pub use record::PostRecord;
pub use service::{AuthService, PersistenceService, StaticAuth, User};
pub use session::EditSession;
