//! Maps stored upload paths to URLs a browser can fetch cross-origin.
//!
//! The service stores uploads as `/uploads/<path>` but serves them with CORS
//! headers only through `/api/files/<path>`.

use reqwest::Url;

use crate::aggregator::PublicProjectContent;
use crate::error::{ContentError, Result};

const UPLOADS_PREFIX: &str = "/uploads/";
const FILES_PREFIX: &str = "api/files/";

/// `..`, including the percent-encoded spellings URL parsers also treat as
/// a parent directory (`%2e%2e`, `.%2E`, ...).
fn is_parent_segment(segment: &str) -> bool {
    segment.to_ascii_lowercase().replace("%2e", ".") == ".."
}

#[derive(Clone, Debug)]
pub struct AssetResolver {
    base: Url,
}

impl AssetResolver {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ContentError::Config(format!("Invalid base URL {:?}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ContentError::Config(format!("{} cannot be a base URL", base_url)));
        }
        // Url::join treats a base without trailing slash as a file
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(AssetResolver { base })
    }

    /// Resolve a stored asset reference. `None` for empty or unsafe paths.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
            return Some(path.to_string());
        }
        if path.split(['/', '\\']).any(is_parent_segment) {
            return None;
        }

        let upload = path
            .strip_prefix(UPLOADS_PREFIX)
            .or_else(|| path.strip_prefix(&UPLOADS_PREFIX[1..]));
        let (relative, scope) = match upload {
            Some(rest) => (
                format!("{}{}", FILES_PREFIX, rest),
                format!("{}{}", self.base.path(), FILES_PREFIX),
            ),
            None => (path.trim_start_matches('/').to_string(), self.base.path().to_string()),
        };
        let url = self.base.join(&relative).ok()?;
        // whatever the url crate normalised, the result must stay under the base
        if url.origin() != self.base.origin() || !url.path().starts_with(&scope) {
            return None;
        }
        Some(url.to_string())
    }

    /// Rewrite every image reference in a loaded project in place. References
    /// that cannot be resolved are left as they were.
    pub fn rewrite(&self, content: &mut PublicProjectContent) {
        if let Some(image) = content.project.image.as_mut() {
            if let Some(url) = self.resolve(image) {
                *image = url;
            }
        }
        let urls = content
            .blog_entries
            .iter_mut()
            .flat_map(|entry| entry.images.iter_mut().map(|image| &mut image.url))
            .chain(content.gallery_images.iter_mut().map(|image| &mut image.url));
        for url in urls {
            if let Some(resolved) = self.resolve(url) {
                *url = resolved;
            }
        }
    }
}
