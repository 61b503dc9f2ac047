use anyhow::{Result, anyhow};
use bpaf::Bpaf;
use ezybookmark_sdk::models::page::CatalogPage;
use log::debug;
use tracing::instrument;

use crate::utils::message;

/// Add a tool to the catalog
#[derive(Debug, Bpaf, Clone)]
pub struct Add {
    /// Category of the tool, derived from the website if omitted
    #[bpaf(long, short, argument("CATEGORY"))]
    category: Option<String>,

    /// URL of the website to add
    #[bpaf(positional("URL"))]
    url: String,
}

impl Add {
    #[instrument(name = "add", skip_all)]
    pub async fn handle(self, mut page: CatalogPage) -> Result<()> {
        let tool = match page.add_tool(&self.url, self.category).await {
            Ok(tool) => tool,
            Err(err) => {
                debug!("adding {} failed: {err}", self.url);
                return Err(anyhow!(err.add_tool_hint()).context("Failed to add tool"));
            },
        };

        message::created(format!(
            "Added '{}' to {} as '{}'",
            tool.name, tool.category, tool.id
        ));
        Ok(())
    }
}
