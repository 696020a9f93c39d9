//! Common view over the different kinds of public content.

use scraper::Html;

use crate::api::{BlogEntry, GalleryFolder, GalleryImage, LibraryEntry, LibraryFolder, Project};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Project,
    BlogEntry,
    LibraryFolder,
    LibraryEntry,
    GalleryFolder,
    GalleryImage,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentKind::Project => "project",
            ContentKind::BlogEntry => "blog entry",
            ContentKind::LibraryFolder => "library folder",
            ContentKind::LibraryEntry => "library entry",
            ContentKind::GalleryFolder => "gallery folder",
            ContentKind::GalleryImage => "gallery image",
        };
        f.write_str(name)
    }
}

/// Anything that can be listed, searched and sorted on a public page.
pub trait ContentItem {
    fn id(&self) -> &str;

    fn kind(&self) -> ContentKind;

    /// Title, name or filename, depending on the kind.
    fn display_field(&self) -> &str;

    /// Raw (possibly HTML) description, if the kind has one.
    fn description(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> &str;

    fn view_count(&self) -> u64 {
        0
    }

    /// Description with markup removed.
    fn searchable_text(&self) -> String {
        self.description().map(strip_html).unwrap_or_default()
    }
}

impl ContentItem for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Project
    }

    fn display_field(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl ContentItem for BlogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::BlogEntry
    }

    fn display_field(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn view_count(&self) -> u64 {
        self.views
    }
}

impl ContentItem for LibraryEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::LibraryEntry
    }

    fn display_field(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn view_count(&self) -> u64 {
        self.views
    }
}

impl ContentItem for LibraryFolder {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::LibraryFolder
    }

    fn display_field(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl ContentItem for GalleryFolder {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::GalleryFolder
    }

    fn display_field(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl ContentItem for GalleryImage {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ContentKind {
        ContentKind::GalleryImage
    }

    fn display_field(&self) -> &str {
        &self.filename
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// Remove markup from a rich-text fragment, keeping its text content.
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.to_string();
    }
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}

/// Plain-text preview of a rich-text description, at most `max_chars`
/// characters long (ellipsis included).
pub fn excerpt(html: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let text = strip_html(html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("plain text"), "plain text");
        assert_eq!(strip_html("<p>Raised <b>beds</b></p>"), "Raised beds");
        assert_eq!(strip_html("Salt &amp; pepper"), "Salt & pepper");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let html = "<p>Rhabarber   wächst</p>\n<p>überall im Garten</p>";
        assert_eq!(excerpt(html, 100), "Rhabarber wächst überall im Garten");
        assert_eq!(excerpt(html, 17), "Rhabarber wächst…");
        assert_eq!(excerpt(html, 0), "");
    }

    #[test]
    fn test_display_field_per_kind() {
        let folder = GalleryFolder {
            name: "Orchard".to_string(),
            ..Default::default()
        };
        let image = GalleryImage {
            filename: "apple.jpg".to_string(),
            ..Default::default()
        };
        let entry = BlogEntry {
            title: "First frost".to_string(),
            description: "<em>Brr</em>".to_string(),
            ..Default::default()
        };

        assert_eq!(folder.display_field(), "Orchard");
        assert_eq!(folder.searchable_text(), "");
        assert_eq!(image.display_field(), "apple.jpg");
        assert_eq!(entry.display_field(), "First frost");
        assert_eq!(entry.searchable_text(), "Brr");
        assert_eq!(entry.kind().to_string(), "blog entry");
    }
}
