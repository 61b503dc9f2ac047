//! The local snapshot of the catalog and the views derived from it.
//!
//! Derived views are recomputed from the stored lists on every call.

use std::collections::HashSet;

use ezybookmark_catalog::types::{CategorizedTools, Tool, ToolId};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

const TOP_TOOLS: usize = 5;
const TOP_CATEGORIES: usize = 3;

/// Tools, their category grouping and the signed-in user's pinned tools.
///
/// Only [crate::models::store::CatalogStore] mutates a state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub(crate) tools: Vec<Tool>,
    pub(crate) categorized: CategorizedTools,
    pub(crate) pinned: Vec<Tool>,
}

impl CatalogState {
    /// Build a state from a categorized listing, flattening it in category order.
    pub fn from_categorized(categorized: CategorizedTools) -> Self {
        let tools = categorized.values().flatten().cloned().collect();
        Self {
            tools,
            categorized,
            pinned: Vec::new(),
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn categorized(&self) -> &CategorizedTools {
        &self.categorized
    }

    pub fn pinned(&self) -> &[Tool] {
        &self.pinned
    }

    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.tools.iter().find(|tool| &tool.id == id)
    }

    pub fn pinned_ids(&self) -> HashSet<&ToolId> {
        self.pinned.iter().map(|tool| &tool.id).collect()
    }

    pub fn is_pinned(&self, id: &ToolId) -> bool {
        self.pinned.iter().any(|tool| &tool.id == id)
    }

    /// All tools that are not pinned, in load order.
    pub fn unpinned(&self) -> Vec<&Tool> {
        let pinned = self.pinned_ids();
        self.tools
            .iter()
            .filter(|tool| !pinned.contains(&tool.id))
            .collect()
    }

    /// Category labels in server order.
    pub fn categories(&self) -> Vec<&str> {
        self.categorized.keys().map(String::as_str).collect()
    }

    pub fn category_counts(&self) -> IndexMap<&str, usize> {
        self.categorized
            .iter()
            .map(|(category, tools)| (category.as_str(), tools.len()))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let total_tools = self.tools.len();
        let total_visits: u64 = self.tools.iter().map(|tool| tool.usage_count).sum();
        let average_usage = if total_tools == 0 {
            0
        } else {
            (total_visits as f64 / total_tools as f64).round() as u64
        };

        // stable sorts, ties keep load order
        let top_tools = self
            .tools
            .iter()
            .sorted_by(|a, b| b.usage_count.cmp(&a.usage_count))
            .take(TOP_TOOLS)
            .cloned()
            .collect();
        let top_categories = self
            .categorized
            .iter()
            .map(|(category, tools)| (category.clone(), tools.len()))
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .take(TOP_CATEGORIES)
            .collect();

        CatalogStats {
            total_tools,
            total_visits,
            n_categories: self.categorized.len(),
            average_usage,
            top_tools,
            top_categories,
        }
    }

    /// Append a newly created tool, creating its category bucket if needed.
    pub(crate) fn insert_tool(&mut self, tool: Tool) {
        self.categorized
            .entry(tool.category.clone())
            .or_default()
            .push(tool.clone());
        self.tools.push(tool);
    }

    /// Increment the usage count of every local copy of a tool.
    ///
    /// Returns `false` if the tool is not loaded.
    pub(crate) fn increment_usage(&mut self, id: &ToolId) -> bool {
        let copies = self
            .tools
            .iter_mut()
            .chain(self.categorized.values_mut().flatten())
            .chain(self.pinned.iter_mut())
            .filter(|tool| &tool.id == id);

        let mut found = false;
        for tool in copies {
            tool.usage_count += 1;
            found = true;
        }
        found
    }

    pub(crate) fn pin(&mut self, tool: Tool) {
        if !self.is_pinned(&tool.id) {
            self.pinned.push(tool);
        }
    }

    pub(crate) fn unpin(&mut self, id: &ToolId) {
        self.pinned.retain(|tool| &tool.id != id);
    }

    pub(crate) fn clear_pinned(&mut self) {
        self.pinned.clear();
    }
}

/// Summary numbers shown above the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_tools: usize,
    pub total_visits: u64,
    pub n_categories: usize,
    /// Visits per tool, rounded
    pub average_usage: u64,
    /// Most used tools first
    pub top_tools: Vec<Tool>,
    /// Largest categories first, with their tool count
    pub top_categories: Vec<(String, usize)>,
}
