use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::api::{
    BlogEntry, BlogList, LibraryEntry, LibraryList, Project, ProjectList, PublicGallery,
    PublicUserProfile, UploadConfig,
};
use crate::client::Client;
use crate::error::{ContentError, Result};
use crate::ContentSource;

/// Content source backed by the content service's REST API.
pub struct HttpContentSource {
    client: Client,
    base_url: Url,
}

impl HttpContentSource {
    pub fn default() -> Result<Self> {
        Self::new("http://localhost:8001")
    }

    pub fn new(base_url: &str) -> Result<Self> {
        Ok(HttpContentSource {
            client: Client::default(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Like [`HttpContentSource::new`], but every request gives up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(HttpContentSource {
            client: Client::with_timeout(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ContentError::Config(format!("{} cannot be a base URL", self.base_url)))?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| ContentError::Config(format!("Invalid base URL {:?}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(ContentError::Config(format!(
            "{} cannot be a base URL",
            base_url
        )));
    }
    Ok(url)
}

/// Scope a folder listing; without `folder_id` the service lists the root.
fn in_folder(mut url: Url, folder_id: Option<&str>) -> Url {
    if let Some(folder_id) = folder_id {
        url.query_pairs_mut().append_pair("folder_id", folder_id);
    }
    url
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn list_projects(&self) -> Result<ProjectList> {
        let url = self.endpoint(&["public", "projects"])?;
        self.client.get(url).await
    }

    async fn project(&self, project_id: &str) -> Result<Project> {
        let url = self.endpoint(&["public", "projects", project_id])?;
        self.client.get(url).await
    }

    async fn blog_entries(&self, project_id: &str) -> Result<BlogList> {
        let url = self.endpoint(&["public", "projects", project_id, "blog"])?;
        self.client.get(url).await
    }

    async fn blog_entry(&self, project_id: &str, entry_id: &str) -> Result<BlogEntry> {
        let url = self.endpoint(&["public", "projects", project_id, "blog", entry_id])?;
        self.client.get(url).await
    }

    async fn library(&self, project_id: &str, folder_id: Option<&str>) -> Result<LibraryList> {
        let url = self.endpoint(&["public", "projects", project_id, "library"])?;
        self.client.get(in_folder(url, folder_id)).await
    }

    async fn library_entry(&self, project_id: &str, entry_id: &str) -> Result<LibraryEntry> {
        let url = self.endpoint(&[
            "public",
            "projects",
            project_id,
            "library",
            "entries",
            entry_id,
        ])?;
        self.client.get(url).await
    }

    async fn gallery(&self, project_id: &str, folder_id: Option<&str>) -> Result<PublicGallery> {
        let url = self.endpoint(&["public", "projects", project_id, "gallery"])?;
        self.client.get(in_folder(url, folder_id)).await
    }

    async fn user_profile(&self, user_id: &str) -> Result<PublicUserProfile> {
        let url = self.endpoint(&["public", "users", user_id, "profile"])?;
        self.client.get(url).await
    }

    async fn upload_config(&self) -> Result<UploadConfig> {
        let url = self.endpoint(&["config"])?;
        self.client.get(url).await
    }
}
