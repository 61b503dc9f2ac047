use anyhow::{Result, anyhow};
use bpaf::Bpaf;
use ezybookmark_catalog::types::ToolId;
use ezybookmark_sdk::models::notice::{Notice, NoticeLevel};
use ezybookmark_sdk::models::page::{CatalogPage, PinClick};
use ezybookmark_sdk::models::selection::SelectionKind;
use itertools::Itertools;
use tracing::instrument;

use super::load_page;
use crate::utils::message;

/// Pin a tool, or unpin it if it is pinned already
#[derive(Debug, Bpaf, Clone)]
pub struct Pin {
    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl Pin {
    #[instrument(name = "pin", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, mut page: CatalogPage, signed_in: bool) -> Result<()> {
        load_page(&mut page, signed_in).await?;

        match page.click_pin(&ToolId::from(self.id.as_str())).await {
            PinClick::Toggled(notice) => report(notice),
            PinClick::SelectionToggled { .. } => Ok(()),
        }
    }
}

/// Select tools and pin or unpin them in one go
#[derive(Debug, Bpaf, Clone)]
pub struct PinMany {
    /// Ids of the tools
    #[bpaf(positional("TOOL"), some("at least one tool id is required"))]
    ids: Vec<String>,
}

impl PinMany {
    #[instrument(name = "pin-many", skip_all, fields(kind = %kind, n_ids = self.ids.len()))]
    pub async fn handle(
        self,
        kind: SelectionKind,
        mut page: CatalogPage,
        signed_in: bool,
    ) -> Result<()> {
        load_page(&mut page, signed_in).await?;

        if let Some(notice) = page.enter_selection(kind) {
            return report(notice);
        }

        for id in self.ids.iter().unique().map(|id| ToolId::from(id.as_str())) {
            let state = page.store.state();
            if state.tool(&id).is_none() && !state.is_pinned(&id) {
                message::warning(format!("No tool with id '{id}' in the catalog, skipping"));
                continue;
            }
            if !page.selection.governs(state.is_pinned(&id)) {
                let reason = match kind {
                    SelectionKind::Pin => "already pinned",
                    SelectionKind::Unpin => "not pinned",
                };
                message::warning(format!("'{id}' is {reason}, skipping"));
                continue;
            }
            page.toggle_selection(&id);
        }

        match page.commit_selection().await {
            Some(notice) => report(notice),
            None => {
                message::info(format!("Nothing to {kind}"));
                Ok(())
            },
        }
    }
}

/// Print a notice, errors fail the command.
fn report(notice: Notice) -> Result<()> {
    if notice.level == NoticeLevel::Error {
        return Err(anyhow!("{}: {}", notice.title, notice.message));
    }
    message::notice(&notice);
    Ok(())
}
