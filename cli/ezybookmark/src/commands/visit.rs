use anyhow::{Result, bail};
use bpaf::Bpaf;
use ezybookmark_catalog::types::ToolId;
use ezybookmark_sdk::models::page::{CatalogPage, ToolActivation};
use tracing::instrument;

use super::load_page;

/// Record a visit and print the URL of a tool
#[derive(Debug, Bpaf, Clone)]
pub struct Visit {
    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl Visit {
    #[instrument(name = "visit", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, mut page: CatalogPage, signed_in: bool) -> Result<()> {
        load_page(&mut page, signed_in).await?;

        match page.activate_tool(&ToolId::from(self.id.as_str())).await {
            ToolActivation::Open(url) => {
                println!("{url}");
                Ok(())
            },
            ToolActivation::Unknown => bail!("No tool with id '{}' in the catalog", self.id),
            // no selection is active outside of the bulk commands
            ToolActivation::SelectionToggled { .. } => Ok(()),
        }
    }
}
