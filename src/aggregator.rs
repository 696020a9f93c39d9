//! Loads everything a public project page shows, in one go.

use std::sync::Arc;

use tracing::{Level, event, instrument};

use crate::ContentSource;
use crate::api::{BlogEntry, GalleryFolder, GalleryImage, LibraryEntry, LibraryFolder, Project};
use crate::assets::AssetResolver;
use crate::error::{ContentError, Result};

/// The public content of one project, as fetched by [`ContentAggregator::load`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicProjectContent {
    pub project: Project,
    pub blog_entries: Vec<BlogEntry>,
    pub library_folders: Vec<LibraryFolder>,
    pub library_entries: Vec<LibraryEntry>,
    pub gallery_folders: Vec<GalleryFolder>,
    pub gallery_images: Vec<GalleryImage>,
}

#[derive(Clone)]
pub struct ContentAggregator {
    source: Arc<dyn ContentSource>,
    assets: Option<AssetResolver>,
}

impl ContentAggregator {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        ContentAggregator {
            source,
            assets: None,
        }
    }

    /// Rewrite image references in every loaded result through `assets`.
    pub fn with_assets(mut self, assets: AssetResolver) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Fetch project metadata, blog, library and gallery concurrently.
    ///
    /// Fails as a whole if any of the four requests fails; no partial result
    /// is ever returned.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&self, project_id: &str) -> Result<PublicProjectContent> {
        if project_id.trim().is_empty() {
            return Err(ContentError::InvalidProjectId(project_id.to_string()));
        }

        let (project, blog, library, gallery) = futures::try_join!(
            self.source.project(project_id),
            self.source.blog_entries(project_id),
            self.source.library(project_id, None),
            self.source.gallery(project_id, None),
        )
        .inspect_err(|e| event!(Level::DEBUG, error = %e, "aggregate load failed"))?;

        let mut content = PublicProjectContent {
            project,
            blog_entries: blog.entries,
            library_folders: library.folders,
            library_entries: library.entries,
            gallery_folders: gallery.folders,
            gallery_images: gallery.images,
        };
        if let Some(assets) = &self.assets {
            assets.rewrite(&mut content);
        }

        event!(
            Level::DEBUG,
            blog = content.blog_entries.len(),
            library = content.library_entries.len(),
            folders = content.gallery_folders.len(),
            images = content.gallery_images.len(),
            "loaded public project"
        );
        Ok(content)
    }
}
