//! Search and sort projection over a content collection.
//!
//! [`search_sort`] is the pure operation; [`SearchSortView`] keeps the derived
//! ordering for a live (query, sort) state and recomputes it only when one of
//! its inputs changes. The source collection is never reordered or mutated.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;

#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    /// Title, name or filename depending on the content kind
    Title,
    Views,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "createdat" | "created_at" | "created" | "date" => Ok(SortField::CreatedAt),
            "title" | "name" | "filename" => Ok(SortField::Title),
            "views" | "viewcount" | "view_count" => Ok(SortField::Views),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::CreatedAt => write!(f, "createdAt"),
            SortField::Title => write!(f, "title"),
            SortField::Views => write!(f, "views"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Field and direction to order a collection by. Defaults to newest first.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        SortSpec { field, order }
    }

    /// Compare two items under this ordering. Strings compare byte-wise on the
    /// raw value, no locale collation.
    pub fn compare<T: ContentItem + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        let ascending = match self.field {
            SortField::CreatedAt => a.created_at().cmp(b.created_at()),
            SortField::Title => a.display_field().cmp(b.display_field()),
            SortField::Views => a.view_count().cmp(&b.view_count()),
        };
        match self.order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    }
}

/// Lowercased search needle. Empty means "match everything".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Needle(String);

impl Needle {
    fn new(query: &str) -> Self {
        Needle(query.to_lowercase())
    }

    fn matches<T: ContentItem + ?Sized>(&self, item: &T) -> bool {
        if self.0.is_empty() {
            return true;
        }
        item.display_field().to_lowercase().contains(&self.0)
            || item.searchable_text().to_lowercase().contains(&self.0)
    }
}

fn derive_order<T: ContentItem>(items: &[T], needle: &Needle, sort: SortSpec) -> Vec<usize> {
    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.matches(*item))
        .map(|(i, _)| i)
        .collect();
    // sort_by is stable, ties keep source order
    indices.sort_by(|&a, &b| sort.compare(&items[a], &items[b]));
    indices
}

/// Filter `items` by `query` and order them by `sort`.
pub fn search_sort<'a, T: ContentItem>(items: &'a [T], query: &str, sort: SortSpec) -> Vec<&'a T> {
    derive_order(items, &Needle::new(query), sort)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Memoized search/sort projection of a shared collection.
#[derive(Clone, Debug)]
pub struct SearchSortView<T> {
    items: Arc<[T]>,
    query: String,
    needle: Needle,
    sort: SortSpec,
    visible: Vec<usize>,
}

impl<T: ContentItem> SearchSortView<T> {
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self::with_state(items, "", SortSpec::default())
    }

    pub fn with_state(items: impl Into<Arc<[T]>>, query: &str, sort: SortSpec) -> Self {
        let mut view = SearchSortView {
            items: items.into(),
            query: query.to_string(),
            needle: Needle::new(query),
            sort,
            visible: Vec::new(),
        };
        view.recompute();
        view
    }

    /// Replace the source collection (e.g. after a refetch).
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        self.recompute();
    }

    /// Returns true if the query changed and the projection was recomputed.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.needle = Needle::new(query);
        self.recompute();
        true
    }

    /// Returns true if the sort changed and the projection was recomputed.
    pub fn set_sort(&mut self, sort: SortSpec) -> bool {
        if self.sort == sort {
            return false;
        }
        self.sort = sort;
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.visible = derive_order(&self.items, &self.needle, self.sort);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// The untouched source collection.
    pub fn source(&self) -> &[T] {
        &self.items
    }

    /// Items to display, in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(|&i| &self.items[i])
    }

    pub fn to_vec(&self) -> Vec<&T> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Source has items but none survive the query.
    pub fn has_no_matches(&self) -> bool {
        self.visible.is_empty() && !self.items.is_empty()
    }
}
