//! Directory-backed persistence.
//!
//! ```text
//! <root>/posts/<id>.json     flat post record
//! <root>/blobs/<sha256>.png  content-addressed images
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use gridtone_core::ImageProperties;
use tracing::{debug, trace, warn};

use crate::record::{PostRecord, blob_name, blob_url, parse_blob_url};
use crate::service::PersistenceService;
use crate::{SessionError, SessionResult};

/// Posts as JSON files and blobs as files under one root directory.
#[derive(Debug, Clone)]
pub struct FsPersistence {
    root: PathBuf,
}

impl FsPersistence {
    /// Opens (and creates if needed) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> SessionResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("posts"))?;
        fs::create_dir_all(root.join("blobs"))?;
        debug!(root = %root.display(), "opened post store");
        Ok(Self { root })
    }

    /// Store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids of every stored post, sorted.
    pub fn post_ids(&self) -> SessionResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.root.join("posts"))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Returns `true` if `url` points at a stored blob.
    pub fn has_blob(&self, url: &str) -> bool {
        self.blob_path(url).is_ok_and(|p| p.is_file())
    }

    fn post_path(&self, id: &str) -> SessionResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SessionError::Storage(format!("invalid post id '{id}'")));
        }
        Ok(self.root.join("posts").join(format!("{id}.json")))
    }

    fn blob_path(&self, url: &str) -> SessionResult<PathBuf> {
        match parse_blob_url(url) {
            Some(name) if !name.contains(['/', '\\']) && !name.starts_with('.') => {
                Ok(self.root.join("blobs").join(name))
            }
            _ => Err(SessionError::NotFound(url.to_string())),
        }
    }

    fn write_post(&self, record: &PostRecord) -> SessionResult<()> {
        let path = self.post_path(&record.id)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &path)?;
        trace!(id = %record.id, "wrote post record");
        Ok(())
    }

    fn put_blob(&self, bytes: &[u8]) -> SessionResult<String> {
        let name = blob_name(bytes);
        fs::write(self.root.join("blobs").join(&name), bytes)?;
        Ok(blob_url(&name))
    }

    // The record is already written, so a failed delete only leaves an orphan.
    fn discard_blob(&self, url: &str) {
        if let Err(e) = self.delete_blob(url) {
            warn!(url, error = %e, "failed to delete old blob");
        }
    }

    /// Removes a blob unless some post still references it.
    ///
    /// A record that cannot be read might reference the blob, so it is kept.
    fn delete_blob(&self, url: &str) -> SessionResult<()> {
        for id in self.post_ids()? {
            match self.get_post(&id) {
                Ok(record) if record.references(url) => {
                    debug!(url, post = %id, "blob still referenced");
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(post = %id, error = %e, "unreadable post record, keeping blob {}", url);
                    return Ok(());
                }
            }
        }
        let path = self.blob_path(url)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(url, "deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PersistenceService for FsPersistence {
    fn create_post(&mut self, id: &str, image: &[u8]) -> SessionResult<PostRecord> {
        if self.post_path(id)?.exists() {
            return Err(SessionError::Storage(format!("post {id} already exists")));
        }
        let record = PostRecord::new(id, self.put_blob(image)?);
        self.write_post(&record)?;
        Ok(record)
    }

    fn get_post(&self, id: &str) -> SessionResult<PostRecord> {
        let path = self.post_path(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound(format!("post {id}")));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn fetch_image(&self, url: &str) -> SessionResult<Vec<u8>> {
        let path = self.blob_path(url)?;
        fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SessionError::NotFound(url.to_string()),
            _ => e.into(),
        })
    }

    fn save_post(&mut self, id: &str, png: &[u8], properties: &ImageProperties) -> SessionResult<String> {
        let mut record = self.get_post(id)?;
        let url = self.put_blob(png)?;
        let previous = record.edited_url.replace(url.clone());
        record.properties = properties.clone();
        self.write_post(&record)?;
        if let Some(old) = previous.filter(|old| *old != url) {
            self.discard_blob(&old);
        }
        Ok(url)
    }

    fn reset_post(&mut self, id: &str) -> SessionResult<PostRecord> {
        let mut record = self.get_post(id)?;
        let previous = record.edited_url.take();
        record.properties = ImageProperties::default();
        self.write_post(&record)?;
        if let Some(old) = previous {
            self.discard_blob(&old);
        }
        Ok(record)
    }
}
