use std::io::{Write, stdout};

use anyhow::{Context, Result};
use bpaf::Bpaf;
use ezybookmark_catalog::ClientTrait;
use ezybookmark_catalog::types::Tool;
use ezybookmark_sdk::models::catalog_state::CatalogStats;
use ezybookmark_sdk::models::page::CatalogPage;
use ezybookmark_sdk::models::search::CatalogView;
use indoc::formatdoc;
use itertools::Itertools;
use serde::Serialize;
use tracing::instrument;

use super::load_page;
use crate::utils::message;

/// List the tools of the catalog
#[derive(Debug, Bpaf, Clone)]
pub struct List {
    /// Only show tools matching this text
    #[bpaf(long, short, argument("TEXT"))]
    search: Option<String>,

    /// Only show tools of this category, may be repeated
    #[bpaf(long("category"), short('c'), argument("CATEGORY"), many)]
    categories: Vec<String>,

    /// Print the tools as JSON
    #[bpaf(long)]
    json: bool,
}

#[derive(Serialize)]
struct ViewJson<'a> {
    pinned: &'a [&'a Tool],
    tools: &'a [&'a Tool],
}

impl List {
    #[instrument(name = "list", fields(json = self.json), skip_all)]
    pub async fn handle(self, mut page: CatalogPage, signed_in: bool) -> Result<()> {
        load_page(&mut page, signed_in).await?;

        if let Some(search) = self.search {
            page.filter.set_search(search);
        }
        page.filter.categories.extend(self.categories);

        let view = page.view();
        if self.json {
            let json = serde_json::to_string(&ViewJson {
                pinned: &view.pinned,
                tools: &view.unpinned,
            })?;
            println!("{json}");
            return Ok(());
        }

        if view.pinned.is_empty() && view.unpinned.is_empty() {
            if page.filter.is_active() {
                message::warning("No tools match your search.");
            } else {
                message::plain("The catalog is empty. Add a tool with 'ezybookmark add <url>'.");
            }
            return Ok(());
        }

        render_view(stdout().lock(), &view)?;
        Ok(())
    }
}

/// Print pinned tools first, then the rest grouped by category.
///
/// ```text
/// Pinned
///   y  Compiler Explorer  https://y.example.com/
///
/// Code
///   z  Regex Tester  https://z.example.com/  (3 visits)
/// ```
fn render_view(mut out: impl Write, view: &CatalogView<'_>) -> Result<()> {
    let mut sections = Vec::new();
    if !view.pinned.is_empty() {
        sections.push(("Pinned".to_string(), view.pinned.clone()));
    }
    for (category, tools) in &view
        .unpinned
        .iter()
        .copied()
        .chunk_by(|tool| tool.category.clone())
    {
        sections.push((category, tools.collect()));
    }

    for (idx, (heading, tools)) in sections.iter().enumerate() {
        if idx > 0 {
            writeln!(&mut out)?;
        }
        writeln!(&mut out, "{heading}")?;
        for tool in tools {
            writeln!(&mut out, "  {}", tool_line(tool))?;
        }
    }
    Ok(())
}

pub(super) fn tool_line(tool: &Tool) -> String {
    let visits = match tool.usage_count {
        0 => String::new(),
        1 => "  (1 visit)".to_string(),
        n => format!("  ({n} visits)"),
    };
    format!("{}  {}  {}{visits}", tool.id, tool.name, tool.url)
}

/// List the categories of the catalog
#[derive(Debug, Bpaf, Clone)]
pub struct Categories {
    /// List every category the server knows, without counts
    #[bpaf(long)]
    all: bool,

    /// Print the categories as JSON
    #[bpaf(long)]
    json: bool,
}

impl Categories {
    #[instrument(name = "categories", fields(all = self.all, json = self.json), skip_all)]
    pub async fn handle(self, mut page: CatalogPage, signed_in: bool) -> Result<()> {
        if self.all {
            let categories = page
                .store
                .client()
                .categories()
                .await
                .context("Failed to list categories")?;
            if self.json {
                println!("{}", serde_json::to_string(&categories)?);
            } else {
                println!("{}", categories.join("\n"));
            }
            return Ok(());
        }

        load_page(&mut page, signed_in).await?;

        let counts = page.store.state().category_counts();
        if self.json {
            println!("{}", serde_json::to_string(&counts)?);
            return Ok(());
        }

        let mut out = stdout().lock();
        for (category, count) in counts {
            writeln!(&mut out, "{category} ({count})")?;
        }
        Ok(())
    }
}

/// Show catalog statistics
#[derive(Debug, Bpaf, Clone)]
pub struct Stats {
    /// Print the statistics as JSON
    #[bpaf(long)]
    json: bool,
}

impl Stats {
    #[instrument(name = "stats", fields(json = self.json), skip_all)]
    pub async fn handle(self, mut page: CatalogPage, signed_in: bool) -> Result<()> {
        load_page(&mut page, signed_in).await?;

        let stats = page.store.state().stats();
        if self.json {
            println!("{}", serde_json::to_string(&stats)?);
        } else {
            print!("{}", render_stats(&stats));
        }
        Ok(())
    }
}

fn render_stats(stats: &CatalogStats) -> String {
    let top_tools = stats
        .top_tools
        .iter()
        .map(|tool| format!("{} ({})", tool.name, tool.usage_count))
        .join(", ");
    let top_categories = stats
        .top_categories
        .iter()
        .map(|(category, count)| format!("{category} ({count})"))
        .join(", ");

    formatdoc! {"
        Tools:          {total_tools}
        Categories:     {n_categories}
        Visits:         {total_visits}
        Average visits: {average_usage}
        Most used:      {top_tools}
        Top categories: {top_categories}
    ",
        total_tools = stats.total_tools,
        n_categories = stats.n_categories,
        total_visits = stats.total_visits,
        average_usage = stats.average_usage,
        top_tools = if top_tools.is_empty() { "N/A" } else { top_tools.as_str() },
        top_categories = if top_categories.is_empty() { "N/A" } else { top_categories.as_str() },
    }
}
