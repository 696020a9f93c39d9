//! In-process content source for tests and offline demos.
//!
//! Mirrors the service's visibility rules (private projects, entries and
//! gallery folders are invisible), its folder scoping and newest-first
//! listing order, and counts views on detail reads. Latency and failures can
//! be injected per project.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::aggregator::PublicProjectContent;
use crate::api::{
    BlogEntry, BlogList, LibraryEntry, LibraryList, Project, ProjectList, PublicGallery,
    PublicUserProfile, UploadConfig,
};
use crate::content::ContentItem;
use crate::error::{ContentError, Result};
use crate::ContentSource;

/// Which call to fail when injecting errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Project,
    Blog,
    BlogEntry,
    Library,
    LibraryEntry,
    Gallery,
}

#[derive(Default)]
pub struct MemoryContentSource {
    projects: Vec<Project>,
    content: HashMap<String, PublicProjectContent>,
    users: HashMap<String, String>,
    upload_config: UploadConfig,
    delays: HashMap<String, Duration>,
    failures: HashSet<(String, Endpoint)>,
    views: Mutex<HashMap<String, u64>>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project together with all of its content, public or not.
    pub fn with_project(mut self, content: PublicProjectContent) -> Self {
        self.projects.push(content.project.clone());
        self.content.insert(content.project.id.clone(), content);
        self
    }

    pub fn with_user(mut self, user_id: &str, name: &str) -> Self {
        self.users.insert(user_id.to_string(), name.to_string());
        self
    }

    pub fn with_upload_config(mut self, config: UploadConfig) -> Self {
        self.upload_config = config;
        self
    }

    /// Every call scoped to `project_id` sleeps for `delay` before answering.
    pub fn with_delay(mut self, project_id: &str, delay: Duration) -> Self {
        self.delays.insert(project_id.to_string(), delay);
        self
    }

    /// Make `endpoint` fail with a network error for `project_id`.
    pub fn failing(mut self, project_id: &str, endpoint: Endpoint) -> Self {
        self.failures.insert((project_id.to_string(), endpoint));
        self
    }

    async fn visible(&self, project_id: &str, endpoint: Endpoint) -> Result<&PublicProjectContent> {
        if let Some(delay) = self.delays.get(project_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&(project_id.to_string(), endpoint)) {
            return Err(ContentError::Network(format!(
                "injected failure for {:?} on {}",
                endpoint, project_id
            )));
        }
        self.content
            .get(project_id)
            .filter(|c| c.project.is_public)
            .ok_or_else(|| ContentError::NotFound(format!("project {}", project_id)))
    }

    fn count_view(&self, entry_id: &str, stored: u64) -> u64 {
        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        let extra = views.entry(entry_id.to_string()).or_insert(0);
        *extra += 1;
        stored + *extra
    }

    fn public_projects_newest_first(&self, user_id: Option<&str>) -> Vec<Project> {
        newest_first(
            self.projects
                .iter()
                .filter(|p| p.is_public)
                .filter(|p| user_id.is_none_or(|id| p.user_id == id)),
        )
    }
}

/// The service lists everything by `created_at` descending.
fn newest_first<'a, T: ContentItem + Clone + 'a>(items: impl Iterator<Item = &'a T>) -> Vec<T> {
    let mut items: Vec<T> = items.cloned().collect();
    items.sort_by(|a, b| b.created_at().cmp(a.created_at()));
    items
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    async fn list_projects(&self) -> Result<ProjectList> {
        let projects = self.public_projects_newest_first(None);
        Ok(ProjectList {
            total: projects.len() as u64,
            projects,
        })
    }

    async fn project(&self, project_id: &str) -> Result<Project> {
        let content = self.visible(project_id, Endpoint::Project).await?;
        Ok(content.project.clone())
    }

    async fn blog_entries(&self, project_id: &str) -> Result<BlogList> {
        let content = self.visible(project_id, Endpoint::Blog).await?;
        let entries = newest_first(content.blog_entries.iter().filter(|e| e.is_public));
        Ok(BlogList {
            total: entries.len() as u64,
            entries,
        })
    }

    async fn blog_entry(&self, project_id: &str, entry_id: &str) -> Result<BlogEntry> {
        let content = self.visible(project_id, Endpoint::BlogEntry).await?;
        let mut entry = content
            .blog_entries
            .iter()
            .find(|e| e.id == entry_id && e.is_public)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("blog entry {}", entry_id)))?;
        entry.views = self.count_view(&entry.id, entry.views);
        Ok(entry)
    }

    async fn library(&self, project_id: &str, folder_id: Option<&str>) -> Result<LibraryList> {
        let content = self.visible(project_id, Endpoint::Library).await?;
        Ok(LibraryList {
            folders: newest_first(
                content
                    .library_folders
                    .iter()
                    .filter(|f| f.parent_id.as_deref() == folder_id),
            ),
            entries: newest_first(
                content
                    .library_entries
                    .iter()
                    .filter(|e| e.is_public && e.folder_id.as_deref() == folder_id),
            ),
        })
    }

    async fn library_entry(&self, project_id: &str, entry_id: &str) -> Result<LibraryEntry> {
        let content = self.visible(project_id, Endpoint::LibraryEntry).await?;
        let mut entry = content
            .library_entries
            .iter()
            .find(|e| e.id == entry_id && e.is_public)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("library entry {}", entry_id)))?;
        entry.views = self.count_view(&entry.id, entry.views);
        Ok(entry)
    }

    async fn gallery(&self, project_id: &str, folder_id: Option<&str>) -> Result<PublicGallery> {
        let content = self.visible(project_id, Endpoint::Gallery).await?;
        let public_folders: HashSet<&str> = content
            .gallery_folders
            .iter()
            .filter(|f| f.is_public)
            .map(|f| f.id.as_str())
            .collect();
        if folder_id.is_some_and(|id| !public_folders.contains(id)) {
            return Ok(PublicGallery::default());
        }

        let folders = newest_first(
            content
                .gallery_folders
                .iter()
                .filter(|f| f.is_public && f.parent_id.as_deref() == folder_id),
        );
        let images = newest_first(content.gallery_images.iter().filter(|i| {
            match (folder_id, i.folder_id.as_deref()) {
                (Some(wanted), image_folder) => image_folder == Some(wanted),
                // the root view also shows images filed in any public folder
                (None, image_folder) => image_folder.is_none_or(|f| public_folders.contains(f)),
            }
        }));
        Ok(PublicGallery { folders, images })
    }

    async fn user_profile(&self, user_id: &str) -> Result<PublicUserProfile> {
        let name = self
            .users
            .get(user_id)
            .ok_or_else(|| ContentError::NotFound(format!("user {}", user_id)))?;
        Ok(PublicUserProfile {
            id: user_id.to_string(),
            name: name.clone(),
            projects: self.public_projects_newest_first(Some(user_id)),
        })
    }

    async fn upload_config(&self) -> Result<UploadConfig> {
        Ok(self.upload_config.clone())
    }
}
