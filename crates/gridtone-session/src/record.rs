//! Persisted post records.

use gridtone_core::ImageProperties;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// URL scheme for blobs held by the bundled stores.
pub const BLOB_SCHEME: &str = "blob:";

/// One post as stored: source image, optional edited render, and the flat
/// property record the render was made with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post id
    pub id: String,
    /// Source image
    pub image_url: String,
    /// Last saved render, if any
    #[serde(default)]
    pub edited_url: Option<String>,
    /// Grading parameters, stored as top-level fields
    #[serde(flatten)]
    pub properties: ImageProperties,
}

impl PostRecord {
    /// A freshly uploaded post with default properties.
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_url: image_url.into(),
            edited_url: None,
            properties: ImageProperties::default(),
        }
    }

    /// Returns `true` if a render has been saved for this post.
    pub fn has_edit(&self) -> bool {
        self.edited_url.is_some()
    }

    /// Returns `true` if `url` is this post's source image or saved render.
    pub fn references(&self, url: &str) -> bool {
        self.image_url == url || self.edited_url.as_deref() == Some(url)
    }
}

/// Content address for `bytes`: hex SHA-256 plus an extension sniffed from
/// the magic bytes.
pub fn blob_name(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let ext = if bytes.starts_with(&[0xFF, 0xD8]) { "jpg" } else { "png" };
    format!("{}.{}", hex::encode(digest), ext)
}

/// `blob:<name>` for a stored blob.
pub fn blob_url(name: &str) -> String {
    format!("{BLOB_SCHEME}{name}")
}

/// Blob name from a `blob:` URL.
pub fn parse_blob_url(url: &str) -> Option<&str> {
    url.strip_prefix(BLOB_SCHEME).filter(|n| !n.is_empty())
}

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut s = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0xf) as usize] as char);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_json_layout() {
        let mut record = PostRecord::new("p1", "blob:abc.png");
        record.properties.brightness = 0.0;
        record.properties.lut = Some("kodak".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["brightness"], 0.0);
        assert_eq!(json["lut"], "kodak");
        assert_eq!(json["red_hue"], 0.0);
        assert!(json.get("properties").is_none());

        let back: PostRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let record: PostRecord =
            serde_json::from_str(r#"{"id":"p","image_url":"blob:x.png","contrast":0}"#).unwrap();
        assert_eq!(record.properties.contrast, 0.0);
        assert_eq!(record.properties.brightness, 100.0);
        assert!(record.edited_url.is_none());
    }

    #[test]
    fn blob_names_are_content_addressed() {
        let a = blob_name(b"\x89PNG one");
        assert_eq!(a, blob_name(b"\x89PNG one"));
        assert_ne!(a, blob_name(b"\x89PNG two"));
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 64 + 4);
        assert!(blob_name(&[0xFF, 0xD8, 0xFF]).ends_with(".jpg"));
    }

    #[test]
    fn blob_urls() {
        assert_eq!(parse_blob_url(&blob_url("x.png")), Some("x.png"));
        assert_eq!(parse_blob_url("https://example.com/x.png"), None);
        assert_eq!(parse_blob_url("blob:"), None);
    }
}
