//! Transient in-memory storage for uploaded class videos.
//!
//! Files live only as long as the process; there is no transcoding and no
//! disk persistence.

use axum::body::Bytes;
use std::collections::HashMap;

use crate::catalog::new_id;
use crate::domain::VideoFile;
use crate::error::MediaError;

/// The only accepted upload type
pub const VIDEO_MP4: &str = "video/mp4";

#[derive(Debug, Clone)]
pub struct StoredVideo {
    pub meta: VideoFile,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct MediaStore {
    files: HashMap<String, StoredVideo>,
    max_bytes: usize,
}

impl MediaStore {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            files: HashMap::new(),
            max_bytes,
        }
    }

    pub fn store(
        &mut self,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<VideoFile, MediaError> {
        if !content_type.eq_ignore_ascii_case(VIDEO_MP4) {
            return Err(MediaError::UnsupportedType(content_type.to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                limit: self.max_bytes,
            });
        }
        let meta = VideoFile {
            id: new_id(),
            file_name: file_name.to_string(),
            content_type: VIDEO_MP4.to_string(),
            size: bytes.len(),
        };
        tracing::info!("Stored upload {} ({} bytes)", meta.id, meta.size);
        self.files.insert(
            meta.id.clone(),
            StoredVideo {
                meta: meta.clone(),
                bytes,
            },
        );
        Ok(meta)
    }

    pub fn get(&self, id: &str) -> Option<&StoredVideo> {
        self.files.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<StoredVideo> {
        self.files.remove(id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_fetch_mp4() {
        let mut store = MediaStore::new(16);
        let meta = store
            .store("intro.mp4", "video/mp4", Bytes::from_static(b"0123"))
            .unwrap();
        assert_eq!(meta.size, 4);
        assert_eq!(store.get(&meta.id).unwrap().bytes.as_ref(), b"0123");
        assert!(store.remove(&meta.id).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_other_types() {
        let mut store = MediaStore::new(16);
        let err = store
            .store("clip.webm", "video/webm", Bytes::from_static(b"x"))
            .unwrap_err();
        assert_eq!(err, MediaError::UnsupportedType("video/webm".into()));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_rejects_oversized() {
        let mut store = MediaStore::new(2);
        let err = store
            .store("big.mp4", "video/mp4", Bytes::from_static(b"abc"))
            .unwrap_err();
        assert_eq!(err, MediaError::TooLarge { limit: 2 });
    }
}
