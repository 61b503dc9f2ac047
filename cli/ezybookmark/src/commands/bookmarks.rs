use std::io::{Write, stdout};

use anyhow::{Context, Result};
use bpaf::Bpaf;
use ezybookmark_catalog::ClientTrait;
use ezybookmark_catalog::types::{Bookmark, ToolId};
use ezybookmark_sdk::models::page::CatalogPage;
use tracing::instrument;

use crate::utils::message;

/// List bookmarks of the signed in user
#[derive(Debug, Bpaf, Clone)]
pub struct Bookmarks {
    /// Only list pinned bookmarks
    #[bpaf(long)]
    pinned: bool,

    /// Print the bookmarks as JSON
    #[bpaf(long)]
    json: bool,
}

impl Bookmarks {
    #[instrument(name = "bookmarks", skip_all, fields(pinned = self.pinned, json = self.json))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let client = page.store.client();
        let bookmarks = if self.pinned {
            client.pinned_bookmarks().await
        } else {
            client.bookmarks().await
        }
        .context("Failed to list bookmarks")?;

        if self.json {
            println!("{}", serde_json::to_string(&bookmarks)?);
            return Ok(());
        }

        if bookmarks.is_empty() {
            message::plain("No bookmarks yet. Pin a tool with 'ezybookmark pin <tool>'.");
            return Ok(());
        }
        render_bookmarks(stdout().lock(), &bookmarks)
    }
}

fn render_bookmarks(mut out: impl Write, bookmarks: &[Bookmark]) -> Result<()> {
    for bookmark in bookmarks {
        let name = bookmark
            .tool
            .as_ref()
            .map(|tool| tool.name.as_str())
            .unwrap_or("N/A");
        let pin = if bookmark.is_pinned { " (pinned)" } else { "" };
        writeln!(&mut out, "{}  {name}{pin}", bookmark.tool_id)?;
    }
    Ok(())
}

/// Bookmark a tool without pinning it
#[derive(Debug, Bpaf, Clone)]
pub struct AddBookmark {
    /// Pin the tool as well
    #[bpaf(long)]
    pin: bool,

    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl AddBookmark {
    #[instrument(name = "bookmark", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let id = ToolId::from(self.id.as_str());
        page.store
            .client()
            .create_bookmark(&id, self.pin)
            .await
            .with_context(|| format!("Failed to bookmark '{id}'"))?;

        message::created(format!("Bookmarked '{id}'"));
        Ok(())
    }
}

/// Show the bookmark status of a tool
#[derive(Debug, Bpaf, Clone)]
pub struct Status {
    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl Status {
    #[instrument(name = "status", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let id = ToolId::from(self.id.as_str());
        let status = page
            .store
            .client()
            .bookmark_status(&id)
            .await
            .with_context(|| format!("Failed to get the bookmark status of '{id}'"))?;

        let yes_no = |value: bool| if value { "yes" } else { "no" };
        println!(
            "bookmarked: {}, pinned: {}",
            yes_no(status.is_bookmarked),
            yes_no(status.is_pinned)
        );
        Ok(())
    }
}

/// Remove the bookmark of a tool
#[derive(Debug, Bpaf, Clone)]
pub struct Unbookmark {
    /// Id of the tool
    #[bpaf(positional("TOOL"))]
    id: String,
}

impl Unbookmark {
    #[instrument(name = "unbookmark", skip_all, fields(tool_id = self.id))]
    pub async fn handle(self, page: CatalogPage) -> Result<()> {
        let id = ToolId::from(self.id.as_str());
        page.store
            .client()
            .remove_bookmark(&id)
            .await
            .with_context(|| format!("Failed to remove the bookmark of '{id}'"))?;

        message::deleted(format!("Removed the bookmark of '{id}'"));
        Ok(())
    }
}
