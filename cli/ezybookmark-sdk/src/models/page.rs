//! Routes user intents to the store and the selection.
//!
//! While a selection is active, clicks on the tools it governs change the
//! selection instead of opening or pinning the tool.

use ezybookmark_catalog::CatalogClientError;
use ezybookmark_catalog::types::{CreateToolRequest, Tool, ToolId};
use tracing::debug;
use url::Url;

use super::notice::Notice;
use super::search::{CatalogFilter, CatalogView};
use super::selection::{SelectionKind, SelectionMode};
use super::store::CatalogStore;

/// Result of clicking a tool card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolActivation {
    /// The visit was recorded, open the tool
    Open(Url),
    /// The click toggled the tool in the active selection
    SelectionToggled { selected: bool },
    /// No such tool is loaded
    Unknown,
}

/// Result of clicking the pin button of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinClick {
    /// The tool was pinned or unpinned, or that failed
    Toggled(Notice),
    /// The click toggled the tool in the active selection
    SelectionToggled { selected: bool },
}

#[derive(Debug)]
pub struct CatalogPage {
    pub store: CatalogStore,
    pub selection: SelectionMode,
    pub filter: CatalogFilter,
}

impl CatalogPage {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            selection: SelectionMode::default(),
            filter: CatalogFilter::default(),
        }
    }

    /// Load the catalog, a signed out session cannot keep a selection.
    pub async fn load(&mut self, signed_in: bool) -> Result<(), CatalogClientError> {
        if !signed_in {
            self.selection.cancel();
        }
        self.store.load(signed_in).await
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::new(self.store.state(), &self.filter)
    }

    /// Returns a selection toggle result if the active mode governs `id`.
    ///
    /// Tools that are not loaded are never governed.
    fn route_to_selection(&mut self, id: &ToolId) -> Option<bool> {
        let state = self.store.state();
        let is_pinned = state.is_pinned(id);
        if !is_pinned && state.tool(id).is_none() {
            return None;
        }
        if !self.selection.governs(is_pinned) {
            return None;
        }
        let selected = self.selection.toggle(id);
        debug!(tool_id = %id, selected, "toggled selection");
        Some(selected)
    }

    pub async fn activate_tool(&mut self, id: &ToolId) -> ToolActivation {
        if let Some(selected) = self.route_to_selection(id) {
            return ToolActivation::SelectionToggled { selected };
        }

        let Some(url) = self.store.state().tool(id).map(|tool| tool.url.clone()) else {
            return ToolActivation::Unknown;
        };
        self.store.record_visit(id).await;
        ToolActivation::Open(url)
    }

    pub async fn click_pin(&mut self, id: &ToolId) -> PinClick {
        if let Some(selected) = self.route_to_selection(id) {
            return PinClick::SelectionToggled { selected };
        }
        PinClick::Toggled(self.store.toggle_pin(id).await)
    }

    /// Start selecting tools, refused while signed out.
    pub fn enter_selection(&mut self, kind: SelectionKind) -> Option<Notice> {
        if !self.store.is_signed_in() {
            return Some(Notice::sign_in_required(format!(
                "Please sign in to {kind} tools"
            )));
        }
        self.selection.enter(kind, self.store.state());
        None
    }

    /// Flip `id` in the active selection, returns whether it is selected afterwards.
    ///
    /// Tools outside the active mode are left alone: pinning works on
    /// unpinned tools, unpinning on pinned ones.
    pub fn toggle_selection(&mut self, id: &ToolId) -> bool {
        self.route_to_selection(id).unwrap_or(false)
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    pub async fn commit_selection(&mut self) -> Option<Notice> {
        self.selection.commit(&mut self.store).await
    }

    pub async fn add_tool(
        &mut self,
        url: &str,
        category: Option<String>,
    ) -> Result<Tool, CatalogClientError> {
        self.store
            .add_tool(CreateToolRequest::new(url, category))
            .await
    }
}

#[cfg(test)]
mod tests {
    use ezybookmark_catalog::{Client, MockClient, Operation, Response};
    use ezybookmark_test_utils::fixtures;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::notice::NoticeLevel;

    fn id(id: &str) -> ToolId {
        ToolId::from(id)
    }

    /// `{"Writing": [x], "Code": [y, z]}` with y pinned
    async fn page(signed_in: bool) -> (CatalogPage, MockClient) {
        let mock = MockClient::default();
        let catalog = fixtures::writing_and_code();
        let y = catalog["Code"][0].clone();
        mock.push_response(Response::Categorized(catalog));
        if signed_in {
            mock.push_response(Response::Bookmarks(vec![fixtures::bookmark(&y, true)]));
        }

        let mut page = CatalogPage::new(CatalogStore::new(Client::Mock(mock.clone())));
        page.load(signed_in).await.unwrap();
        (page, mock)
    }

    #[tokio::test]
    async fn activation_opens_and_records_visit() {
        let (mut page, mock) = page(true).await;
        mock.push_response(Response::Empty);

        let activation = page.activate_tool(&id("x")).await;

        assert_eq!(
            activation,
            ToolActivation::Open("https://x.example.com/".parse().unwrap())
        );
        assert_eq!(page.store.state().tool(&id("x")).unwrap().usage_count, 1);
        assert_eq!(mock.calls().last(), Some(&Operation::RecordVisit));
    }

    #[tokio::test]
    async fn activation_of_unknown_tool() {
        let (mut page, mock) = page(false).await;
        assert_eq!(page.activate_tool(&id("nope")).await, ToolActivation::Unknown);
        assert_eq!(mock.calls(), vec![Operation::ToolsByCategory]);
    }

    #[tokio::test]
    async fn pin_selection_governs_unpinned_tools() {
        let (mut page, mock) = page(true).await;
        assert_eq!(page.enter_selection(SelectionKind::Pin), None);

        assert_eq!(
            page.activate_tool(&id("x")).await,
            ToolActivation::SelectionToggled { selected: true }
        );
        assert_eq!(
            page.click_pin(&id("z")).await,
            PinClick::SelectionToggled { selected: true }
        );
        assert_eq!(
            page.click_pin(&id("x")).await,
            PinClick::SelectionToggled { selected: false }
        );
        assert_eq!(mock.calls().len(), 2);

        // pinned tools are still opened normally
        mock.push_response(Response::Empty);
        assert!(matches!(
            page.activate_tool(&id("y")).await,
            ToolActivation::Open(_)
        ));
        assert!(page.selection.is_selected(&id("z")));
        assert!(page.selection.has_changes());
    }

    #[tokio::test]
    async fn selection_refuses_tools_outside_its_mode() {
        let (mut page, mock) = page(true).await;

        page.enter_selection(SelectionKind::Unpin);
        assert!(!page.toggle_selection(&id("x")));
        assert!(!page.toggle_selection(&id("nope")));
        assert!(!page.selection.has_changes());
        assert_eq!(page.commit_selection().await, None);

        page.enter_selection(SelectionKind::Pin);
        assert!(!page.toggle_selection(&id("y")));
        assert!(!page.toggle_selection(&id("nope")));
        assert!(page.toggle_selection(&id("x")));
        assert_eq!(page.selection.selected().unwrap().len(), 1);

        assert_eq!(mock.calls(), vec![
            Operation::ToolsByCategory,
            Operation::PinnedBookmarks
        ]);
    }

    #[tokio::test]
    async fn unpin_selection_commit() {
        let (mut page, mock) = page(true).await;
        page.enter_selection(SelectionKind::Unpin);

        assert_eq!(
            page.click_pin(&id("y")).await,
            PinClick::SelectionToggled { selected: true }
        );
        let y = page.store.state().tool(&id("y")).unwrap().clone();
        mock.push_response(Response::Bookmark(fixtures::bookmark(&y, false)));

        let notice = page.commit_selection().await.unwrap();
        assert_eq!(notice, Notice::success("Tools unpinned", "1 tool unpinned"));
        assert!(page.view().pinned.is_empty());
        assert_eq!(page.view().unpinned.len(), 3);
        assert!(!page.selection.is_active());
    }

    #[tokio::test]
    async fn selection_requires_sign_in() {
        let (mut page, mock) = page(false).await;

        let notice = page.enter_selection(SelectionKind::Unpin).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Please sign in to unpin tools");
        assert!(!page.selection.is_active());

        let PinClick::Toggled(notice) = page.click_pin(&id("x")).await else {
            panic!("expected a pin toggle");
        };
        assert_eq!(notice.title, "Sign in required");
        assert_eq!(mock.calls(), vec![Operation::ToolsByCategory]);
    }

    #[tokio::test]
    async fn signing_out_ends_selection() {
        let (mut page, mock) = page(true).await;
        page.enter_selection(SelectionKind::Pin);
        page.toggle_selection(&id("x"));

        mock.push_response(Response::Categorized(fixtures::writing_and_code()));
        page.load(false).await.unwrap();
        assert_eq!(page.selection, SelectionMode::Browsing);
    }

    #[tokio::test]
    async fn view_applies_filter_to_unpinned() {
        let (mut page, _mock) = page(true).await;
        page.filter.toggle_category("Writing");

        let view = page.view();
        let pinned = view.pinned.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        let unpinned = view.unpinned.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(pinned, vec!["y"]);
        assert_eq!(unpinned, vec!["x"]);
    }

    #[tokio::test]
    async fn add_tool_with_invalid_url() {
        let (mut page, mock) = page(true).await;
        let before = page.store.state().clone();

        let err = page.add_tool("not-a-url", None).await.unwrap_err();

        assert!(matches!(err, CatalogClientError::InvalidUrl(_)));
        assert_eq!(page.store.state(), &before);
        assert_eq!(mock.calls().len(), 2);
    }
}
