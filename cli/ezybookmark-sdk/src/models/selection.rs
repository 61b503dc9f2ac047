//! Bulk pin and unpin selection.
//!
//! At most one selection is active at a time, [SelectionMode] is either
//! browsing or exactly one of the two selecting modes.

use std::collections::BTreeSet;

use derive_more::Display;
use ezybookmark_catalog::types::ToolId;
use indexmap::IndexSet;
use tracing::debug;

use super::catalog_state::CatalogState;
use super::notice::Notice;
use super::store::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SelectionKind {
    /// Select unpinned tools to pin
    #[display("pin")]
    Pin,
    /// Select pinned tools to unpin
    #[display("unpin")]
    Unpin,
}

impl SelectionKind {
    pub fn past_tense(&self) -> &'static str {
        match self {
            SelectionKind::Pin => "pinned",
            SelectionKind::Unpin => "unpinned",
        }
    }

    /// Whether a tool with the given pin state can be selected in this mode.
    pub fn governs(&self, is_pinned: bool) -> bool {
        match self {
            SelectionKind::Pin => !is_pinned,
            SelectionKind::Unpin => is_pinned,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Browsing,
    PinSelecting {
        selected: IndexSet<ToolId>,
        /// Pinned tools when the selection started
        pinned_at_entry: BTreeSet<ToolId>,
    },
    UnpinSelecting {
        selected: IndexSet<ToolId>,
    },
}

impl SelectionMode {
    /// Start a new, empty selection.
    ///
    /// Any selection in progress is discarded.
    pub fn enter(&mut self, kind: SelectionKind, state: &CatalogState) {
        debug!(%kind, "entering selection mode");
        *self = match kind {
            SelectionKind::Pin => SelectionMode::PinSelecting {
                selected: IndexSet::new(),
                pinned_at_entry: state.pinned().iter().map(|tool| tool.id.clone()).collect(),
            },
            SelectionKind::Unpin => SelectionMode::UnpinSelecting {
                selected: IndexSet::new(),
            },
        };
    }

    pub fn kind(&self) -> Option<SelectionKind> {
        match self {
            SelectionMode::Browsing => None,
            SelectionMode::PinSelecting { .. } => Some(SelectionKind::Pin),
            SelectionMode::UnpinSelecting { .. } => Some(SelectionKind::Unpin),
        }
    }

    pub fn is_active(&self) -> bool {
        self.kind().is_some()
    }

    /// Whether clicks on a tool with the given pin state go to the selection.
    pub fn governs(&self, is_pinned: bool) -> bool {
        self.kind().is_some_and(|kind| kind.governs(is_pinned))
    }

    pub fn selected(&self) -> Option<&IndexSet<ToolId>> {
        match self {
            SelectionMode::Browsing => None,
            SelectionMode::PinSelecting { selected, .. }
            | SelectionMode::UnpinSelecting { selected } => Some(selected),
        }
    }

    pub fn is_selected(&self, id: &ToolId) -> bool {
        self.selected().is_some_and(|selected| selected.contains(id))
    }

    pub fn pinned_at_entry(&self) -> Option<&BTreeSet<ToolId>> {
        match self {
            SelectionMode::PinSelecting {
                pinned_at_entry, ..
            } => Some(pinned_at_entry),
            _ => None,
        }
    }

    /// Flip the membership of `id`, returns whether it is selected afterwards.
    ///
    /// Does nothing while browsing.
    pub fn toggle(&mut self, id: &ToolId) -> bool {
        let selected = match self {
            SelectionMode::Browsing => return false,
            SelectionMode::PinSelecting { selected, .. }
            | SelectionMode::UnpinSelecting { selected } => selected,
        };

        if selected.shift_remove(id) {
            false
        } else {
            selected.insert(id.clone());
            true
        }
    }

    pub fn has_changes(&self) -> bool {
        self.selected().is_some_and(|selected| !selected.is_empty())
    }

    /// Abandon the selection without touching the catalog.
    pub fn cancel(&mut self) {
        if let Some(kind) = self.kind() {
            debug!(%kind, "cancelled selection");
        }
        *self = SelectionMode::Browsing;
    }

    /// Apply the selection and return to browsing.
    ///
    /// An empty selection is the same as [SelectionMode::cancel] and yields
    /// no notice. Otherwise the selected tools are pinned or unpinned in bulk
    /// and only the confirmed changes are applied to the store.
    pub async fn commit(&mut self, store: &mut CatalogStore) -> Option<Notice> {
        let (kind, selected) = match std::mem::take(self) {
            SelectionMode::Browsing => return None,
            SelectionMode::PinSelecting { selected, .. } => (SelectionKind::Pin, selected),
            SelectionMode::UnpinSelecting { selected } => (SelectionKind::Unpin, selected),
        };
        if selected.is_empty() {
            debug!(%kind, "committed empty selection");
            return None;
        }

        let ids = selected.into_iter().collect::<Vec<_>>();
        let outcome = store
            .set_pinned_many(&ids, kind == SelectionKind::Pin)
            .await;
        Some(Notice::bulk(kind, &outcome))
    }
}
