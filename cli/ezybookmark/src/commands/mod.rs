mod add;
mod bookmarks;
mod browse;
mod list;
mod pin;
mod visit;

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use ezybookmark_catalog::{
    CATALOG_MOCK_VAR,
    CatalogClient,
    CatalogClientConfig,
    Client,
    MockClient,
};
use ezybookmark_sdk::models::page::CatalogPage;
use ezybookmark_sdk::models::selection::SelectionKind;
use ezybookmark_sdk::models::store::CatalogStore;
use log::debug;

use crate::config::Config;
use crate::utils::session::ConfiguredSession;

static EZYBOOKMARK_DESCRIPTION: &str = "Browse, search and pin the tools of an EzyBookmark catalog.";

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(EZYBOOKMARK_DESCRIPTION), version)]
pub struct EzybookmarkCli(#[bpaf(external(ezybookmark_args))] pub EzybookmarkArgs);

/// Main args parser
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)]
pub struct EzybookmarkArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

#[derive(Debug, Bpaf, Clone)]
enum Commands {
    /// List tools, pinned tools first
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),

    /// Show categories and their number of tools
    #[bpaf(command)]
    Categories(#[bpaf(external(list::categories))] list::Categories),

    /// Show catalog statistics
    #[bpaf(command)]
    Stats(#[bpaf(external(list::stats))] list::Stats),

    /// Search the catalog on the server
    #[bpaf(command)]
    Search(#[bpaf(external(browse::search))] browse::Search),

    /// Show the most visited tools
    #[bpaf(command)]
    Popular(#[bpaf(external(browse::popular))] browse::Popular),

    /// Show the details of a tool
    #[bpaf(command)]
    Show(#[bpaf(external(browse::show))] browse::Show),

    /// Add a tool to the catalog by URL
    #[bpaf(command)]
    Add(#[bpaf(external(add::add))] add::Add),

    /// Record a visit of a tool and print its URL
    #[bpaf(command)]
    Visit(#[bpaf(external(visit::visit))] visit::Visit),

    /// Pin or unpin a single tool
    #[bpaf(command)]
    Pin(#[bpaf(external(pin::pin))] pin::Pin),

    /// Pin several tools at once
    #[bpaf(command("pin-many"))]
    PinMany(#[bpaf(external(pin::pin_many))] pin::PinMany),

    /// Unpin several tools at once
    #[bpaf(command("unpin-many"))]
    UnpinMany(#[bpaf(external(pin::pin_many))] pin::PinMany),

    /// List your bookmarks
    #[bpaf(command)]
    Bookmarks(#[bpaf(external(bookmarks::bookmarks))] bookmarks::Bookmarks),

    /// Bookmark a tool, optionally pinning it
    #[bpaf(command)]
    Bookmark(#[bpaf(external(bookmarks::add_bookmark))] bookmarks::AddBookmark),

    /// Show whether a tool is bookmarked and pinned
    #[bpaf(command)]
    Status(#[bpaf(external(bookmarks::status))] bookmarks::Status),

    /// Remove the bookmark of a tool
    #[bpaf(command)]
    Unbookmark(#[bpaf(external(bookmarks::unbookmark))] bookmarks::Unbookmark),
}

impl EzybookmarkArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        let signed_in = config.token.is_some();
        let client = catalog_client(&config)?;
        let store = CatalogStore::new(client).with_tool_limit(config.tool_limit);
        let page = CatalogPage::new(store);

        match self.command {
            Commands::List(args) => args.handle(page, signed_in).await,
            Commands::Categories(args) => args.handle(page, signed_in).await,
            Commands::Stats(args) => args.handle(page, signed_in).await,
            Commands::Search(args) => args.handle(page).await,
            Commands::Popular(args) => args.handle(page).await,
            Commands::Show(args) => args.handle(page).await,
            Commands::Add(args) => args.handle(page).await,
            Commands::Visit(args) => args.handle(page, signed_in).await,
            Commands::Pin(args) => args.handle(page, signed_in).await,
            Commands::PinMany(args) => args.handle(SelectionKind::Pin, page, signed_in).await,
            Commands::UnpinMany(args) => args.handle(SelectionKind::Unpin, page, signed_in).await,
            Commands::Bookmarks(args) => args.handle(page).await,
            Commands::Bookmark(args) => args.handle(page).await,
            Commands::Status(args) => args.handle(page).await,
            Commands::Unbookmark(args) => args.handle(page).await,
        }
    }
}

/// Create the catalog client, a mock if `$EZYBOOKMARK_CATALOG_MOCK` is set.
fn catalog_client(config: &Config) -> Result<Client> {
    if let Ok(path) = env::var(CATALOG_MOCK_VAR) {
        debug!("using mock catalog client with responses from {path}");
        let client = MockClient::new(Some(&path))
            .with_context(|| format!("Could not load mock responses from '{path}'"))?;
        return Ok(Client::Mock(client));
    }

    let mut client_config = CatalogClientConfig::new(config.api_url.clone());
    client_config.user_agent = config.user_agent.clone();
    client_config.extra_headers = config.extra_headers.clone();

    let session = ConfiguredSession::new(config.token.clone(), config.config_file());
    let client = CatalogClient::new(client_config, Arc::new(session))
        .context("Could not create the catalog client")?;
    debug!("using catalog at {}", client.api_url());
    Ok(Client::Catalog(client))
}

/// Load the catalog, failing the command if the tools can't be fetched.
async fn load_page(page: &mut CatalogPage, signed_in: bool) -> Result<()> {
    page.load(signed_in)
        .await
        .context("Failed to load the catalog")
}
