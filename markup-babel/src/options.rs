//! Conversion options shared by the Markdown parser and serializer

use crate::extensions::Extensions;

pub const DEFAULT_REF_URL: &str = "ref://";
pub const DEFAULT_IMAGE_URL: &str = "http://localhost/files?file=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Links whose href starts with this prefix are references to host objects
    pub ref_url: String,
    /// Images whose src starts with this prefix are stored blobs (`file-id`)
    pub image_url: String,
    pub extensions: Extensions,
    /// List items are separated by single newlines unless a list says otherwise
    pub tight_lists: bool,
    /// Bullet for bullet lists that did not record one
    pub bullet: String,
}

impl ConvertOptions {
    pub fn new(ref_url: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            ref_url: ref_url.into(),
            image_url: image_url.into(),
            ..Self::default()
        }
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_tight_lists(mut self, tight: bool) -> Self {
        self.tight_lists = tight;
        self
    }

    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ref_url: DEFAULT_REF_URL.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            extensions: Extensions::default(),
            tight_lists: true,
            bullet: "*".to_string(),
        }
    }
}
