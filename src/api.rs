//! Wire types served by the content service.
//!
//! Every struct decodes with `#[serde(default)]` so that partially populated
//! records still load; missing text fields come through as empty strings.

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    pub total: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct BlogImage {
    pub id: String,
    pub filename: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct BlogEntry {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub views: u64,
    pub images: Vec<BlogImage>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct BlogList {
    pub entries: Vec<BlogEntry>,
    pub total: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct LibraryFolder {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct LibraryEntry {
    pub id: String,
    pub project_id: String,
    pub folder_id: Option<String>,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub views: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct LibraryList {
    pub folders: Vec<LibraryFolder>,
    pub entries: Vec<LibraryEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct GalleryFolder {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct GalleryImage {
    pub id: String,
    pub project_id: String,
    pub folder_id: Option<String>,
    pub filename: String,
    pub url: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct PublicGallery {
    pub folders: Vec<GalleryFolder>,
    pub images: Vec<GalleryImage>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct PublicUserProfile {
    pub id: String,
    pub name: String,
    pub projects: Vec<Project>,
}

/// Upload limits published by the service at `/api/config`.
///
/// Fetched once at startup and handed to whoever validates uploads; never
/// mutated afterwards.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_upload_size_mb: u64,
    pub max_upload_size_bytes: u64,
    pub allowed_image_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            max_upload_size_mb: 5,
            max_upload_size_bytes: 5 * 1024 * 1024,
            allowed_image_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Validate a prospective upload before sending it.
    pub fn check(&self, size: u64, mime: &str) -> Result<()> {
        if size > self.max_upload_size_bytes {
            return Err(ContentError::UploadTooLarge {
                size,
                limit: self.max_upload_size_bytes,
            });
        }
        let allowed = self
            .allowed_image_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime));
        if !allowed {
            return Err(ContentError::UnsupportedType(mime.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_entry_tolerates_missing_fields() {
        let entry: BlogEntry = serde_json::from_str(r#"{"id":"b1","title":"Seed swap"}"#).unwrap();
        assert_eq!(entry.id, "b1");
        assert_eq!(entry.title, "Seed swap");
        assert_eq!(entry.description, "");
        assert_eq!(entry.created_at, "");
        assert_eq!(entry.views, 0);
        assert!(entry.images.is_empty());
    }

    #[test]
    fn test_gallery_response_deserialization() {
        let json = r#"{
            "folders": [{"id": "f1", "project_id": "p1", "name": "Coop", "parent_id": null, "is_public": true,
                         "created_at": "2024-02-01T00:00:00+00:00", "updated_at": "2024-02-01T00:00:00+00:00"}],
            "images": [{"id": "i1", "project_id": "p1", "folder_id": "f1", "filename": "hens.jpg",
                        "url": "/uploads/gallery/p1/hens.jpg", "created_at": "2024-02-02T00:00:00+00:00"}]
        }"#;
        let gallery: PublicGallery = serde_json::from_str(json).unwrap();
        assert_eq!(gallery.folders.len(), 1);
        assert!(gallery.folders[0].is_public);
        assert_eq!(gallery.images[0].folder_id.as_deref(), Some("f1"));
    }

    #[test]
    fn test_upload_config_defaults_match_service() {
        let config = UploadConfig::default();
        assert_eq!(config.max_upload_size_mb, 5);
        assert_eq!(config.max_upload_size_bytes, 5 * 1024 * 1024);
        assert!(config.allowed_image_types.iter().any(|t| t == "image/jpeg"));
    }

    #[test]
    fn test_upload_config_check() {
        let config = UploadConfig::default();
        assert!(config.check(1024, "image/png").is_ok());
        assert!(config.check(1024, "IMAGE/JPEG").is_ok());
        assert_eq!(
            config.check(6 * 1024 * 1024, "image/png"),
            Err(ContentError::UploadTooLarge {
                size: 6 * 1024 * 1024,
                limit: 5 * 1024 * 1024
            })
        );
        assert!(matches!(
            config.check(10, "application/pdf"),
            Err(ContentError::UnsupportedType(_))
        ));
    }
}
