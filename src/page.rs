//! State behind the public project page.
//!
//! Navigating between projects can leave several loads in flight. Each
//! `open` takes a generation ticket and only the holder of the latest ticket
//! may write the visible state, so a slow response for a project the visitor
//! already left never replaces the current one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{Level, event, instrument};

use crate::aggregator::{ContentAggregator, PublicProjectContent};
use crate::api::{BlogEntry, GalleryFolder, GalleryImage, LibraryEntry, LibraryFolder};
use crate::error::ContentError;
use crate::view::{SearchSortView, SortSpec};

#[derive(Clone, Debug, Default)]
pub enum PageState {
    #[default]
    Idle,
    Loading {
        project_id: String,
    },
    Ready(Arc<PublicProjectContent>),
    Failed {
        project_id: String,
        error: ContentError,
    },
}

impl PageState {
    pub fn content(&self) -> Option<&Arc<PublicProjectContent>> {
        match self {
            PageState::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading { .. })
    }
}

/// What happened to the result of an [`ProjectPage::open`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result (content or error) is now the visible state
    Applied,
    /// A newer navigation superseded this one; the result was dropped
    Stale,
}

pub struct ProjectPage {
    aggregator: ContentAggregator,
    generation: AtomicU64,
    state: RwLock<PageState>,
}

impl ProjectPage {
    pub fn new(aggregator: ContentAggregator) -> Self {
        ProjectPage {
            aggregator,
            generation: AtomicU64::new(0),
            state: RwLock::new(PageState::Idle),
        }
    }

    /// Navigate to `project_id` and load its content.
    #[instrument(level = "debug", skip(self))]
    pub async fn open(&self, project_id: &str) -> LoadOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            if !self.is_current(ticket) {
                return LoadOutcome::Stale;
            }
            *state = PageState::Loading {
                project_id: project_id.to_string(),
            };
        }

        let result = self.aggregator.load(project_id).await;

        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            event!(Level::DEBUG, project_id, ticket, "discarding stale project load");
            return LoadOutcome::Stale;
        }
        *state = match result {
            Ok(content) => PageState::Ready(Arc::new(content)),
            Err(error) => {
                event!(Level::WARN, project_id, error = %error, "project page failed to load");
                PageState::Failed {
                    project_id: project_id.to_string(),
                    error,
                }
            }
        };
        LoadOutcome::Applied
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    pub async fn state(&self) -> PageState {
        self.state.read().await.clone()
    }
}

/// Search/sort views over every collection of a loaded project, driven by one
/// shared query and sort.
#[derive(Clone, Debug)]
pub struct ProjectView {
    pub blog: SearchSortView<BlogEntry>,
    pub library_folders: SearchSortView<LibraryFolder>,
    pub library: SearchSortView<LibraryEntry>,
    pub gallery_folders: SearchSortView<GalleryFolder>,
    pub gallery_images: SearchSortView<GalleryImage>,
}

impl ProjectView {
    pub fn new(content: &PublicProjectContent, query: &str, sort: SortSpec) -> Self {
        ProjectView {
            blog: SearchSortView::with_state(content.blog_entries.clone(), query, sort),
            library_folders: SearchSortView::with_state(content.library_folders.clone(), query, sort),
            library: SearchSortView::with_state(content.library_entries.clone(), query, sort),
            gallery_folders: SearchSortView::with_state(content.gallery_folders.clone(), query, sort),
            gallery_images: SearchSortView::with_state(content.gallery_images.clone(), query, sort),
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.blog.set_query(query);
        self.library_folders.set_query(query);
        self.library.set_query(query);
        self.gallery_folders.set_query(query);
        self.gallery_images.set_query(query);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.blog.set_sort(sort);
        self.library_folders.set_sort(sort);
        self.library.set_sort(sort);
        self.gallery_folders.set_sort(sort);
        self.gallery_images.set_sort(sort);
    }

    /// Nothing in any collection matches the current query.
    pub fn is_empty(&self) -> bool {
        self.blog.is_empty()
            && self.library_folders.is_empty()
            && self.library.is_empty()
            && self.gallery_folders.is_empty()
            && self.gallery_images.is_empty()
    }
}
