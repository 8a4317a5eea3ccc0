//! A user-supplied image upload.

use bytes::Bytes;

/// Raw image bytes plus whatever metadata the caller knows about them.
///
/// The declared MIME type wins over the file name, which wins over content
/// sniffing; see [`crate::utils::mime::resolve_mime`].
#[derive(Debug, Clone)]
pub struct ImageInput {
    bytes: Bytes,
    mime: Option<String>,
    name: Option<String>,
}

impl ImageInput {
    /// Creates an upload from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: None,
            name: None,
        }
    }

    /// Sets the declared MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Sets the original file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The declared MIME type, if any.
    pub fn declared_mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// The original file name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for log lines.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<upload>")
    }
}
