use async_trait::async_trait;

pub mod aggregator;
pub mod api;
pub mod assets;
mod client;
pub mod content;
pub mod error;
pub mod page;
pub mod providers;
pub mod view;

pub use aggregator::{ContentAggregator, PublicProjectContent};
pub use api::*;
pub use assets::AssetResolver;
pub use content::{ContentItem, ContentKind, excerpt, strip_html};
pub use error::{ContentError, Result};
pub use page::{LoadOutcome, PageState, ProjectPage, ProjectView};
pub use providers::{HttpContentSource, MemoryContentSource};
pub use view::{SearchSortView, SortField, SortOrder, SortSpec, search_sort};

/// Read-only access to the public side of the content service.
///
/// Visibility filtering is the service's job; implementations return only
/// what an anonymous visitor may see.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_projects(&self) -> Result<ProjectList>;

    async fn project(&self, project_id: &str) -> Result<Project>;

    async fn blog_entries(&self, project_id: &str) -> Result<BlogList>;

    /// Full entry. The service counts a view for every call.
    async fn blog_entry(&self, project_id: &str, entry_id: &str) -> Result<BlogEntry>;

    /// Folders and entries directly inside `folder_id`, or at the library
    /// root when `None`.
    async fn library(&self, project_id: &str, folder_id: Option<&str>) -> Result<LibraryList>;

    /// Full entry. The service counts a view for every call.
    async fn library_entry(&self, project_id: &str, entry_id: &str) -> Result<LibraryEntry>;

    /// Public subfolders of `folder_id` (root folders when `None`) and its
    /// images. At the root, images of every public folder are included.
    async fn gallery(&self, project_id: &str, folder_id: Option<&str>) -> Result<PublicGallery>;

    async fn user_profile(&self, user_id: &str) -> Result<PublicUserProfile>;

    async fn upload_config(&self) -> Result<UploadConfig>;
}
