//! In-memory persistence.

use std::collections::HashMap;

use gridtone_core::ImageProperties;
use tracing::debug;

use crate::record::{PostRecord, blob_name, blob_url, parse_blob_url};
use crate::service::PersistenceService;
use crate::{SessionError, SessionResult};

/// Posts and blobs held in hash maps.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    posts: HashMap<String, PostRecord>,
    blobs: HashMap<String, Vec<u8>>,
}

impl InMemoryPersistence {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    /// Returns `true` if `url` points at a stored blob.
    pub fn has_blob(&self, url: &str) -> bool {
        parse_blob_url(url).is_some_and(|name| self.blobs.contains_key(name))
    }

    fn put_blob(&mut self, bytes: &[u8]) -> String {
        let name = blob_name(bytes);
        self.blobs.insert(name.clone(), bytes.to_vec());
        blob_url(&name)
    }

    /// Removes a blob unless some post still references it.
    fn delete_blob(&mut self, url: &str) {
        if self.posts.values().any(|p| p.references(url)) {
            debug!(url, "blob still referenced");
            return;
        }
        if let Some(name) = parse_blob_url(url) {
            if self.blobs.remove(name).is_some() {
                debug!(url, "deleted blob");
            }
        }
    }

    fn post_mut(&mut self, id: &str) -> SessionResult<&mut PostRecord> {
        self.posts
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(format!("post {id}")))
    }
}

impl PersistenceService for InMemoryPersistence {
    fn create_post(&mut self, id: &str, image: &[u8]) -> SessionResult<PostRecord> {
        if self.posts.contains_key(id) {
            return Err(SessionError::Storage(format!("post {id} already exists")));
        }
        let url = self.put_blob(image);
        let record = PostRecord::new(id, url);
        self.posts.insert(id.to_string(), record.clone());
        Ok(record)
    }

    fn get_post(&self, id: &str) -> SessionResult<PostRecord> {
        self.posts
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(format!("post {id}")))
    }

    fn fetch_image(&self, url: &str) -> SessionResult<Vec<u8>> {
        parse_blob_url(url)
            .and_then(|name| self.blobs.get(name))
            .cloned()
            .ok_or_else(|| SessionError::NotFound(url.to_string()))
    }

    fn save_post(&mut self, id: &str, png: &[u8], properties: &ImageProperties) -> SessionResult<String> {
        self.post_mut(id)?;
        let url = self.put_blob(png);
        let post = self.post_mut(id)?;
        let previous = post.edited_url.replace(url.clone());
        post.properties = properties.clone();
        if let Some(old) = previous.filter(|old| *old != url) {
            self.delete_blob(&old);
        }
        Ok(url)
    }

    fn reset_post(&mut self, id: &str) -> SessionResult<PostRecord> {
        let post = self.post_mut(id)?;
        let previous = post.edited_url.take();
        post.properties = ImageProperties::default();
        let record = post.clone();
        if let Some(old) = previous {
            self.delete_blob(&old);
        }
        Ok(record)
    }
}
