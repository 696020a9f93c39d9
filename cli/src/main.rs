use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use clap_derive::{Args, Parser, Subcommand};
use config::{PathManager, Settings, load_env_file};
use homestead::{
    AssetResolver, ContentAggregator, ContentItem, ContentSource, HttpContentSource, PageState,
    ProjectPage, ProjectView, SearchSortView, SortField, SortOrder, SortSpec, excerpt,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const EXCERPT_CHARS: usize = 72;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root URL of the content service
    #[arg(long, env = "HOMESTEAD_BASE_URL")]
    base_url: Option<String>,

    /// Directory holding settings.toml
    #[arg(long, env = "HOMESTEAD_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[arg(long, short)]
    tracing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// Case-insensitive text to look for in titles and descriptions
    #[arg(long, short, default_value = "")]
    query: String,

    /// createdAt, title or views
    #[arg(long)]
    sort: Option<SortField>,

    /// asc or desc
    #[arg(long)]
    order: Option<SortOrder>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List public projects
    Projects(ListArgs),
    /// Show everything public in a project
    Project {
        project_id: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Read one blog entry
    Blog { project_id: String, entry_id: String },
    /// Read one library entry
    Library { project_id: String, entry_id: String },
    /// List a library folder (the library root without a folder)
    LibraryFolder {
        project_id: String,
        folder_id: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// List a gallery folder (the gallery root without a folder)
    GalleryFolder {
        project_id: String,
        folder_id: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show a user's public profile
    Profile { user_id: String },
    /// Check a local file against the service's upload limits
    CheckUpload { file: PathBuf },
    /// Update settings.toml and print the result
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Content service URL to store
    #[arg(long = "set-base-url")]
    base_url: Option<String>,

    /// Request timeout in seconds, 0 to disable
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    sort: Option<SortField>,

    #[arg(long)]
    order: Option<SortOrder>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.timeout.is_none()
            && self.sort.is_none()
            && self.order.is_none()
    }

    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.base_url {
            let url = url.trim_end_matches('/');
            settings.base_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(secs) = self.timeout {
            settings.request_timeout_secs = Some(secs);
        }
        if let Some(sort) = self.sort {
            settings.default_sort = Some(sort.to_string());
        }
        if let Some(order) = self.order {
            settings.default_order = Some(order.to_string());
        }
    }
}

fn setup_tracing(enable: bool) {
    if enable {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .with_writer(|| std::io::sink())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    }
}

/// Command-line flags win over settings.toml defaults.
fn sort_spec(list: &ListArgs, settings: &Settings) -> SortSpec {
    let field = list
        .sort
        .or_else(|| settings.default_sort.as_deref().and_then(|s| s.parse().ok()))
        .unwrap_or_default();
    let order = list
        .order
        .or_else(|| settings.default_order.as_deref().and_then(|s| s.parse().ok()))
        .unwrap_or_default();
    SortSpec::new(field, order)
}

fn print_items<'a, T: ContentItem + 'a>(heading: &str, items: impl Iterator<Item = &'a T>) {
    let items: Vec<&T> = items.collect();
    println!("{} ({})", heading, items.len());
    for item in items {
        let summary = item.description().map(|d| excerpt(d, EXCERPT_CHARS)).unwrap_or_default();
        let views = match item.view_count() {
            0 => String::new(),
            n => format!("  [{} views]", n),
        };
        println!("  {}  {}{}", item.created_at(), item.display_field(), views);
        if !summary.is_empty() {
            println!("      {}", summary);
        }
    }
    println!();
}

fn report_empty<T: ContentItem>(view: &SearchSortView<T>, what: &str) {
    if view.has_no_matches() {
        println!("No {} match {:?}.", what, view.query());
    } else if view.is_empty() {
        println!("No {} yet.", what);
    }
}

async fn list_projects(source: &dyn ContentSource, list: &ListArgs, settings: &Settings) -> anyhow::Result<()> {
    let projects = source.list_projects().await?;
    let view = SearchSortView::with_state(projects.projects, &list.query, sort_spec(list, settings));
    report_empty(&view, "projects");
    if !view.is_empty() {
        print_items("Projects", view.iter());
    }
    Ok(())
}

async fn show_project(
    source: Arc<dyn ContentSource>,
    assets: AssetResolver,
    project_id: &str,
    list: &ListArgs,
    settings: &Settings,
) -> anyhow::Result<()> {
    let page = ProjectPage::new(ContentAggregator::new(source).with_assets(assets));
    page.open(project_id).await;

    let content = match page.state().await {
        PageState::Ready(content) => content,
        PageState::Failed { error, .. } => {
            tracing::debug!(error = %error, "project load failed");
            anyhow::bail!("{}", error.summary());
        }
        PageState::Idle | PageState::Loading { .. } => anyhow::bail!("Project did not load"),
    };

    let project = &content.project;
    println!("{}", project.name);
    if let Some(image) = &project.image {
        println!("Cover: {}", image);
    }
    let description = excerpt(&project.description, 400);
    if !description.is_empty() {
        println!("{}", description);
    }
    println!();

    let view = ProjectView::new(&content, &list.query, sort_spec(list, settings));
    if view.is_empty() && !list.query.is_empty() {
        println!("Nothing in this project matches {:?}.", list.query);
        return Ok(());
    }
    print_items("Blog", view.blog.iter());
    print_items("Library folders", view.library_folders.iter());
    print_items("Library", view.library.iter());
    print_items("Gallery folders", view.gallery_folders.iter());
    println!("Gallery images ({})", view.gallery_images.len());
    for image in view.gallery_images.iter() {
        println!("  {}  {}  {}", image.created_at, image.filename, image.url);
    }
    Ok(())
}

async fn list_library_folder(
    source: &dyn ContentSource,
    project_id: &str,
    folder_id: Option<&str>,
    list: &ListArgs,
    settings: &Settings,
) -> anyhow::Result<()> {
    let listing = source.library(project_id, folder_id).await?;
    let sort = sort_spec(list, settings);
    let folders = SearchSortView::with_state(listing.folders, &list.query, sort);
    let entries = SearchSortView::with_state(listing.entries, &list.query, sort);
    report_empty(&entries, "library entries");
    print_items("Folders", folders.iter());
    print_items("Entries", entries.iter());
    Ok(())
}

async fn list_gallery_folder(
    source: &dyn ContentSource,
    assets: &AssetResolver,
    project_id: &str,
    folder_id: Option<&str>,
    list: &ListArgs,
    settings: &Settings,
) -> anyhow::Result<()> {
    let listing = source.gallery(project_id, folder_id).await?;
    let sort = sort_spec(list, settings);
    let folders = SearchSortView::with_state(listing.folders, &list.query, sort);
    let images = SearchSortView::with_state(listing.images, &list.query, sort);
    report_empty(&images, "images");
    print_items("Folders", folders.iter());
    println!("Images ({})", images.len());
    for image in images.iter() {
        let url = assets.resolve(&image.url).unwrap_or_else(|| image.url.clone());
        println!("  {}  {}  {}", image.created_at, image.filename, url);
    }
    Ok(())
}

fn print_entry(title: &str, created_at: &str, views: u64, description: &str) {
    println!("{}", title);
    println!("{} • {} views", created_at, views);
    println!();
    println!("{}", homestead::strip_html(description).trim());
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_file();
    let args = Cli::parse();

    setup_tracing(args.tracing);

    if let Some(dir) = args.config_dir.clone() {
        PathManager::set_config_dir(dir);
    }
    let settings = Settings::load();
    let base_url = settings.resolve_base_url(args.base_url.as_deref());
    tracing::info!(base_url = %base_url, "using content service");

    let source = match settings.request_timeout() {
        Some(timeout) => HttpContentSource::with_timeout(&base_url, timeout)?,
        None => HttpContentSource::new(&base_url)?,
    };
    let source: Arc<dyn ContentSource> = Arc::new(source);

    match args.command {
        Command::Projects(list) => list_projects(source.as_ref(), &list, &settings).await?,
        Command::Project { project_id, list } => {
            let assets = AssetResolver::new(&base_url)?;
            show_project(source, assets, &project_id, &list, &settings).await?
        }
        Command::Blog { project_id, entry_id } => {
            let entry = source.blog_entry(&project_id, &entry_id).await?;
            print_entry(&entry.title, &entry.created_at, entry.views, &entry.description);
            if !entry.images.is_empty() {
                let assets = AssetResolver::new(&base_url)?;
                println!();
                for image in &entry.images {
                    let url = assets.resolve(&image.url).unwrap_or_else(|| image.url.clone());
                    println!("  {}  {}", image.filename, url);
                }
            }
        }
        Command::Library { project_id, entry_id } => {
            let entry = source.library_entry(&project_id, &entry_id).await?;
            print_entry(&entry.title, &entry.created_at, entry.views, &entry.description);
        }
        Command::LibraryFolder { project_id, folder_id, list } => {
            list_library_folder(
                source.as_ref(),
                &project_id,
                folder_id.as_deref(),
                &list,
                &settings,
            )
            .await?
        }
        Command::GalleryFolder { project_id, folder_id, list } => {
            let assets = AssetResolver::new(&base_url)?;
            list_gallery_folder(
                source.as_ref(),
                &assets,
                &project_id,
                folder_id.as_deref(),
                &list,
                &settings,
            )
            .await?
        }
        Command::Profile { user_id } => {
            let profile = source.user_profile(&user_id).await?;
            println!("{}", profile.name);
            println!();
            print_items("Public projects", profile.projects.iter());
        }
        Command::Config(config) => {
            let mut settings = settings;
            if !config.is_empty() {
                config.apply(&mut settings);
                settings.save().map_err(anyhow::Error::msg)?;
            }
            println!("base_url = {}", settings.resolve_base_url(None));
            println!("request_timeout_secs = {}", settings.request_timeout_secs.unwrap_or(0));
            println!("default_sort = {}", settings.default_sort.as_deref().unwrap_or("createdAt"));
            println!("default_order = {}", settings.default_order.as_deref().unwrap_or("desc"));
        }
        Command::CheckUpload { file } => {
            // limits come from the service once and are only read afterwards
            let limits = source.upload_config().await?;
            let size = std::fs::metadata(&file)?.len();
            let mime = guess_mime(&file);
            match limits.check(size, mime) {
                Ok(()) => println!("{} ({} bytes, {}) can be uploaded", file.display(), size, mime),
                Err(e) => anyhow::bail!("{}: {} ({})", file.display(), e.summary(), e),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings_sort() {
        let settings = Settings {
            default_sort: Some("title".to_string()),
            default_order: Some("asc".to_string()),
            ..Default::default()
        };
        let list = ListArgs {
            query: String::new(),
            sort: None,
            order: Some(SortOrder::Desc),
        };
        assert_eq!(
            sort_spec(&list, &settings),
            SortSpec::new(SortField::Title, SortOrder::Desc)
        );
        assert_eq!(sort_spec(&list, &Settings::default()), SortSpec::default());
    }

    #[test]
    fn test_config_args_update_settings() {
        let cli = Cli::try_parse_from([
            "homestead", "config", "--set-base-url", "https://farm.example/", "--sort", "views",
        ])
        .unwrap();
        let Command::Config(config) = cli.command else {
            panic!("expected config command");
        };
        let mut settings = Settings {
            default_order: Some("asc".to_string()),
            ..Default::default()
        };
        config.apply(&mut settings);
        assert_eq!(settings.base_url.as_deref(), Some("https://farm.example"));
        assert_eq!(settings.default_sort.as_deref(), Some("views"));
        assert_eq!(settings.default_order.as_deref(), Some("asc"));
        // what config writes must read back as the same sort
        let list = ListArgs {
            query: String::new(),
            sort: None,
            order: None,
        };
        assert_eq!(
            sort_spec(&list, &settings),
            SortSpec::new(SortField::Views, SortOrder::Asc)
        );
    }

    #[test]
    fn test_folder_argument_is_optional() {
        let cli = Cli::try_parse_from(["homestead", "library-folder", "p1"]).unwrap();
        assert!(matches!(cli.command, Command::LibraryFolder { folder_id: None, .. }));
        let cli =
            Cli::try_parse_from(["homestead", "gallery-folder", "p1", "goats", "-q", "kid"]).unwrap();
        match cli.command {
            Command::GalleryFolder { folder_id, list, .. } => {
                assert_eq!(folder_id.as_deref(), Some("goats"));
                assert_eq!(list.query, "kid");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("hens.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("plan.webp")), "image/webp");
        assert_eq!(guess_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_parse_project_command() {
        let cli = Cli::try_parse_from([
            "homestead", "project", "p1", "--query", "tomato", "--sort", "title", "--order", "asc",
        ])
        .unwrap();
        match cli.command {
            Command::Project { project_id, list } => {
                assert_eq!(project_id, "p1");
                assert_eq!(list.query, "tomato");
                assert_eq!(list.sort, Some(SortField::Title));
                assert_eq!(list.order, Some(SortOrder::Asc));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
