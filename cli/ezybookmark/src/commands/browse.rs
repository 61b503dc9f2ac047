//! Commands answered by the server directly, without loading the catalog.

use std::io::{Write, stdout};
use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use ezybookmark_catalog::ClientTrait;
use ezybookmark_catalog::types::{Tool, ToolId, ToolQuery, ToolsPage};
use ezybookmark_sdk::models::page::CatalogPage;
use indoc::formatdoc;
use tracing::instrument;

use super::list::tool_line;
use crate::utils::message;

/// Search the catalog on the server, one page at a time
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    /// Only search this category
    #[bpaf(long, short, argument("CATEGORY"))]
    category: Option<String>,

    /// Page to show, starting at 1
    #[bpaf(long, argument("N"))]
    page: Option<NonZeroU32>,

    /// Tools per page
    #[bpaf(long, argument("N"))]
    limit: Option<NonZeroU32>,

    /// Print the page as JSON
    #[bpaf(long)]
    json: bool,

    /// Text to search for
    #[bpaf(positional("QUERY"))]
    query: Option<String>,
}

impl Search {
    #[instrument(name = "search", skip_all, fields(json = self.json))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let query = ToolQuery {
            search: self.query,
            category: self.category,
            page: self.page,
            limit: self.limit,
        };
        let results = page
            .store
            .client()
            .list_tools(&query)
            .await
            .context("Failed to search tools")?;

        if self.json {
            println!("{}", serde_json::to_string(&results)?);
            return Ok(());
        }
        if results.data.is_empty() {
            message::warning("No tools match your search.");
            return Ok(());
        }
        render_page(stdout().lock(), &results)
    }
}

fn render_page(mut out: impl Write, results: &ToolsPage) -> Result<()> {
    for tool in &results.data {
        writeln!(&mut out, "{}", tool_line(tool))?;
    }
    writeln!(
        &mut out,
        "\nPage {} of {}, {} tools in total",
        results.page, results.total_pages, results.total
    )?;
    Ok(())
}

/// Show the most visited tools
#[derive(Debug, Bpaf, Clone)]
pub struct Popular {
    /// Print the tools as JSON
    #[bpaf(long)]
    json: bool,
}

impl Popular {
    #[instrument(name = "popular", skip_all, fields(json = self.json))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let tools = page
            .store
            .client()
            .popular_tools()
            .await
            .context("Failed to get popular tools")?;

        if self.json {
            println!("{}", serde_json::to_string(&tools)?);
            return Ok(());
        }
        let mut out = stdout().lock();
        for tool in &tools {
            writeln!(&mut out, "{}", tool_line(tool))?;
        }
        Ok(())
    }
}

/// Show the details of a tool
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Print the tool as JSON
    #[bpaf(long)]
    json: bool,

    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl Show {
    #[instrument(name = "show", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let id = ToolId::from(self.id.as_str());
        let tool = page
            .store
            .client()
            .get_tool(&id)
            .await
            .with_context(|| format!("Failed to get tool '{id}'"))?;

        if self.json {
            println!("{}", serde_json::to_string(&tool)?);
        } else {
            print!("{}", render_tool(&tool));
        }
        Ok(())
    }
}

fn render_tool(tool: &Tool) -> String {
    let tags = if tool.tags.is_empty() {
        "N/A".to_string()
    } else {
        tool.tags.join(", ")
    };
    formatdoc! {"
        {name} ({id})
          Description: {description}
          URL:         {url}
          Category:    {category}
          Tags:        {tags}
          Visits:      {visits}
    ",
        name = tool.name,
        id = tool.id,
        description = tool.description,
        url = tool.url,
        category = tool.category,
        visits = tool.usage_count,
    }
}

#[cfg(test)]
mod tests {
    use ezybookmark_test_utils::fixtures;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_page_with_footer() {
        let results = ToolsPage {
            data: vec![fixtures::tool_with_usage("a", "Code", 2)],
            total: 21,
            page: 2,
            limit: 20,
            total_pages: 2,
        };

        let mut out = Vec::new();
        render_page(&mut out, &results).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), indoc! {"
            a  Tool a  https://a.example.com/  (2 visits)

            Page 2 of 2, 21 tools in total
        "});
    }

    #[test]
    fn renders_tool_details() {
        let mut tool = fixtures::tool("x", "Scribe", "Writing");
        tool.tags = vec!["notes".to_string(), "markdown".to_string()];

        assert_eq!(render_tool(&tool), indoc! {"
            Scribe (x)
              Description: Scribe does things
              URL:         https://x.example.com/
              Category:    Writing
              Tags:        notes, markdown
              Visits:      0
        "});
    }
}
