//! Contracts between an editing session and the outside world.
//!
//! The session never talks to storage or identity providers directly. It
//! goes through these two traits so hosts can plug in their own backends;
//! [`InMemoryPersistence`](crate::InMemoryPersistence),
//! [`FsPersistence`](crate::FsPersistence) and [`StaticAuth`] ship with the
//! crate.

use gridtone_core::ImageProperties;

use crate::SessionResult;
use crate::record::PostRecord;

/// Post records and image blobs.
pub trait PersistenceService {
    /// Stores an uploaded source image as a new post with default
    /// properties.
    fn create_post(&mut self, id: &str, image: &[u8]) -> SessionResult<PostRecord>;

    /// Loads a post.
    fn get_post(&self, id: &str) -> SessionResult<PostRecord>;

    /// Downloads a blob by URL.
    fn fetch_image(&self, url: &str) -> SessionResult<Vec<u8>>;

    /// Replaces the post's edited render with `png` and writes every
    /// property. The previous edited blob is deleted. Returns the new URL.
    fn save_post(&mut self, id: &str, png: &[u8], properties: &ImageProperties) -> SessionResult<String>;

    /// Deletes the edited render and restores default properties.
    fn reset_post(&mut self, id: &str) -> SessionResult<PostRecord>;
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account id
    pub id: String,
}

/// Identity lookup.
pub trait AuthService {
    /// The signed-in user, `None` when signed out.
    fn current_user(&self) -> Option<User>;
}

/// Fixed identity, for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    /// Always signed in as `id`.
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self {
            user: Some(User { id: id.into() }),
        }
    }

    /// Always signed out.
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthService for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
