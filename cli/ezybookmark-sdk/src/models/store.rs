//! The catalog state store.
//!
//! [CatalogStore] is the only writer of [CatalogState].
//! Local state changes only after the server confirmed them.

use std::num::NonZeroU32;

use ezybookmark_catalog::types::{Bookmark, BulkPinOutcome, CreateToolRequest, Tool, ToolId};
use ezybookmark_catalog::{CatalogClientError, Client, ClientTrait};
use tracing::{debug, instrument, warn};

use super::catalog_state::CatalogState;
use super::notice::Notice;

/// Page size of the categorized listing, large enough to mean "all tools".
pub const DEFAULT_TOOL_LIMIT: NonZeroU32 = NonZeroU32::new(100).unwrap();

#[derive(Debug)]
pub struct CatalogStore {
    client: Client,
    state: CatalogState,
    signed_in: bool,
    tool_limit: NonZeroU32,
}

impl CatalogStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: CatalogState::default(),
            signed_in: false,
            tool_limit: DEFAULT_TOOL_LIMIT,
        }
    }

    pub fn with_tool_limit(mut self, tool_limit: NonZeroU32) -> Self {
        self.tool_limit = tool_limit;
        self
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Signing out forgets the pinned tools.
    pub fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = signed_in;
        if !signed_in {
            self.state.clear_pinned();
        }
    }

    /// Replace the local catalog with the server's.
    ///
    /// Failing to fetch the pinned tools is not fatal,
    /// the catalog is loaded without them.
    #[instrument(skip(self), fields(tool_limit = self.tool_limit.get()))]
    pub async fn load(&mut self, signed_in: bool) -> Result<(), CatalogClientError> {
        // pins of a signed out session are dropped even if the fetch fails
        self.set_signed_in(signed_in);

        let categorized = self.client.tools_by_category(self.tool_limit).await?;
        let mut state = CatalogState::from_categorized(categorized);

        if signed_in {
            match self.client.pinned_bookmarks().await {
                Ok(bookmarks) => state.pinned = resolve_pinned(bookmarks, &state),
                Err(err) => warn!(%err, "failed to load pinned tools, continuing without them"),
            }
        }

        debug!(
            n_tools = state.tools.len(),
            n_categories = state.categorized.len(),
            n_pinned = state.pinned.len(),
            "loaded catalog"
        );
        self.state = state;
        Ok(())
    }

    /// Record a visit and count it locally once the server confirmed it.
    ///
    /// Failures are logged and otherwise ignored.
    #[instrument(skip(self))]
    pub async fn record_visit(&mut self, id: &ToolId) {
        match self.client.record_visit(id).await {
            Ok(()) => {
                if !self.state.increment_usage(id) {
                    debug!("visited tool is not loaded");
                }
            },
            Err(err) => warn!(%err, "failed to record visit"),
        }
    }

    /// Add a tool by URL.
    ///
    /// The URL is checked before anything is sent,
    /// on any failure the catalog is left unchanged.
    #[instrument(skip_all, fields(url = %request.url))]
    pub async fn add_tool(&mut self, request: CreateToolRequest) -> Result<Tool, CatalogClientError> {
        request.validate()?;
        let tool = self.client.create_tool(&request).await?;
        debug!(tool_id = %tool.id, category = tool.category, "added tool");
        self.state.insert_tool(tool.clone());
        Ok(tool)
    }

    /// Flip the pin state of a single tool.
    ///
    /// Never fails, the outcome is reported as a notice.
    #[instrument(skip(self))]
    pub async fn toggle_pin(&mut self, id: &ToolId) -> Notice {
        if !self.signed_in {
            return Notice::sign_in_required("Please sign in to pin tools to your collection");
        }

        if self.state.is_pinned(id) {
            return match self.client.set_pin(id, false).await {
                Ok(_) => {
                    self.state.unpin(id);
                    Notice::success("Tool unpinned", "Tool removed from your pinned collection")
                },
                Err(err) => {
                    warn!(%err, "failed to unpin tool");
                    Notice::pin_failed()
                },
            };
        }

        let Some(tool) = self.state.tool(id).cloned() else {
            warn!("cannot pin a tool that is not loaded");
            return Notice::warning("Tool not found", format!("No tool with id '{id}' is loaded"));
        };
        match self.client.set_pin(id, true).await {
            Ok(_) => {
                let message = format!("{} added to your pinned tools", tool.name);
                self.state.pin(tool);
                Notice::success("Tool pinned!", message)
            },
            Err(err) => {
                warn!(%err, "failed to pin tool");
                Notice::pin_failed()
            },
        }
    }

    /// Pin or unpin many tools, applying exactly the confirmed changes.
    #[instrument(skip(self, ids), fields(n_tools = ids.len()))]
    pub async fn set_pinned_many(&mut self, ids: &[ToolId], is_pinned: bool) -> BulkPinOutcome {
        let outcome = self.client.set_pin_many(ids, is_pinned).await;

        for id in outcome.succeeded() {
            if !is_pinned {
                self.state.unpin(id);
                continue;
            }
            match self.state.tool(id).cloned() {
                Some(tool) => self.state.pin(tool),
                None => warn!(tool_id = %id, "pinned tool is not loaded"),
            }
        }
        for (id, err) in outcome.failed() {
            warn!(tool_id = %id, %err, "failed to update pin status");
        }

        outcome
    }
}

/// Project pinned bookmarks onto tools.
///
/// Bookmarks without an embedded tool fall back to the loaded tool.
fn resolve_pinned(bookmarks: Vec<Bookmark>, state: &CatalogState) -> Vec<Tool> {
    let mut pinned: Vec<Tool> = Vec::with_capacity(bookmarks.len());
    for bookmark in bookmarks {
        let tool = match bookmark.tool {
            Some(tool) => tool,
            None => match state.tool(&bookmark.tool_id) {
                Some(tool) => tool.clone(),
                None => {
                    warn!(tool_id = %bookmark.tool_id, "skipping pinned bookmark of unknown tool");
                    continue;
                },
            },
        };
        if !pinned.iter().any(|known| known.id == tool.id) {
            pinned.push(tool);
        }
    }
    pinned
}
