use ezybookmark_catalog::types::Tool;
use indexmap::IndexSet;

use super::catalog_state::CatalogState;

/// Keep tools where `query` is a case-insensitive substring of the name,
/// description, category or one of the tags.
///
/// A blank query keeps everything.
pub fn filter_by_search<'a>(
    query: &str,
    tools: impl IntoIterator<Item = &'a Tool>,
) -> Vec<&'a Tool> {
    if query.trim().is_empty() {
        return tools.into_iter().collect();
    }

    let needle = query.to_lowercase();
    tools
        .into_iter()
        .filter(|tool| matches_search(tool, &needle))
        .collect()
}

fn matches_search(tool: &Tool, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(&tool.name)
        || contains(&tool.description)
        || contains(&tool.category)
        || tool.tags.iter().any(|tag| contains(tag))
}

/// Keep tools in one of the `selected` categories.
///
/// An empty selection keeps everything.
pub fn filter_by_categories<'a>(
    selected: &IndexSet<String>,
    tools: impl IntoIterator<Item = &'a Tool>,
) -> Vec<&'a Tool> {
    if selected.is_empty() {
        return tools.into_iter().collect();
    }
    tools
        .into_iter()
        .filter(|tool| selected.contains(&tool.category))
        .collect()
}

/// Search text and category selection of the catalog view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: String,
    /// Selected categories in the order they were picked
    pub categories: IndexSet<String>,
}

impl CatalogFilter {
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Add or remove a category, returns whether it is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.shift_remove(category) {
            false
        } else {
            self.categories.insert(category.to_string());
            true
        }
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    /// Reset both the search text and the category selection.
    pub fn clear(&mut self) {
        self.search.clear();
        self.categories.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.categories.is_empty()
    }

    pub fn apply<'a>(&self, tools: impl IntoIterator<Item = &'a Tool>) -> Vec<&'a Tool> {
        filter_by_search(&self.search, filter_by_categories(&self.categories, tools))
    }
}

/// What the catalog shows: pinned tools in their own section,
/// the remaining tools narrowed down by the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView<'a> {
    pub pinned: Vec<&'a Tool>,
    pub unpinned: Vec<&'a Tool>,
}

impl<'a> CatalogView<'a> {
    pub fn new(state: &'a CatalogState, filter: &CatalogFilter) -> Self {
        Self {
            pinned: state.pinned().iter().collect(),
            unpinned: filter.apply(state.unpinned()),
        }
    }
}
