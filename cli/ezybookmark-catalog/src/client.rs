//! Catalog client talking JSON over HTTP to the EzyBookmark API.

use std::fmt::Debug;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use futures::future::join_all;
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{auth_headers, TokenProvider};
use crate::config::CatalogClientConfig;
use crate::error::{error_from_response, CatalogClientError, Operation};
use crate::mock::MockClient;
use crate::types::*;

const USER_AGENT: &str = concat!("ezybookmark/", env!("CARGO_PKG_VERSION"));

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

/// The complete catalog API interface.
///
/// Every operation is a single request, except [ClientTrait::set_pin_many]
/// which fans out into one request per tool.
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Tools grouped by category, at most `limit` per category.
    async fn tools_by_category(
        &self,
        limit: NonZeroU32,
    ) -> Result<CategorizedTools, CatalogClientError>;

    /// A page of tools matching `query`.
    async fn list_tools(&self, query: &ToolQuery) -> Result<ToolsPage, CatalogClientError>;

    async fn get_tool(&self, id: &ToolId) -> Result<Tool, CatalogClientError>;

    /// All category labels known to the server.
    async fn categories(&self) -> Result<Vec<String>, CatalogClientError>;

    /// Most visited tools.
    async fn popular_tools(&self) -> Result<Vec<Tool>, CatalogClientError>;

    /// Add a tool by URL.
    ///
    /// The server fetches the site to fill in name, description and icon.
    async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, CatalogClientError>;

    /// Increment the usage count of a tool.
    async fn record_visit(&self, id: &ToolId) -> Result<(), CatalogClientError>;

    /// Bookmarks of the signed-in user.
    async fn bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError>;

    /// Pinned bookmarks of the signed-in user, each embedding its tool.
    async fn pinned_bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError>;

    async fn create_bookmark(
        &self,
        id: &ToolId,
        is_pinned: bool,
    ) -> Result<Bookmark, CatalogClientError>;

    /// Set the pin state of a tool, creating the bookmark if needed.
    async fn set_pin(&self, id: &ToolId, is_pinned: bool) -> Result<Bookmark, CatalogClientError>;

    /// Set the pin state of many tools.
    ///
    /// The requests are independent and awaited concurrently.
    /// The change is not atomic, the outcome lists every tool separately.
    async fn set_pin_many(&self, ids: &[ToolId], is_pinned: bool) -> BulkPinOutcome {
        debug!(n_tools = ids.len(), is_pinned, "setting pin state of many tools");
        let requests = ids
            .iter()
            .map(|id| async move { (id.clone(), self.set_pin(id, is_pinned).await) });
        BulkPinOutcome {
            outcomes: join_all(requests).await,
        }
    }

    async fn remove_bookmark(&self, id: &ToolId) -> Result<(), CatalogClientError>;

    async fn bookmark_status(&self, id: &ToolId) -> Result<BookmarkStatus, CatalogClientError>;
}

/// A client for the catalog service.
///
/// The token provider is consulted before every request,
/// so a token refreshed by the session layer is picked up immediately.
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogClientConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("api_url", &self.config.api_url.as_str())
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(
        config: CatalogClientConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, CatalogClientError> {
        if config.api_url.cannot_be_a_base() {
            return Err(CatalogClientError::Other(format!(
                "'{}' cannot be used as an API base URL",
                config.api_url
            )));
        }
        let http = build_http_client(&config)?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Get the configured API URL.
    pub fn api_url(&self) -> &Url {
        &self.config.api_url
    }

    /// Join percent-encoded path segments onto the API URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.api_url.clone();
        // `new` rejects URLs that cannot be a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request with the current session token attached.
    async fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let token = match self.tokens.token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(%err, "sending request without authentication");
                None
            },
        };
        self.http
            .request(method, self.endpoint(segments))
            .headers(auth_headers(token.as_deref()))
    }

    /// Send a request and turn error statuses into [CatalogClientError]s.
    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, CatalogClientError> {
        debug!(%operation, "sending catalog request");
        let response = request
            .send()
            .await
            .map_err(|err| CatalogClientError::transport(operation, err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err = error_from_response(operation, response).await;
        debug!(%operation, %status, %err, "catalog request failed");
        if let CatalogClientError::AuthenticationRequired = err {
            self.tokens.sign_in_required();
        }
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T, CatalogClientError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| CatalogClientError::transport(operation, err))
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip_all, fields(operation = %Operation::ToolsByCategory))]
    async fn tools_by_category(
        &self,
        limit: NonZeroU32,
    ) -> Result<CategorizedTools, CatalogClientError> {
        let request = self
            .request(Method::GET, &["tools", "by-category"])
            .await
            .query(&[("limit", limit.get())]);
        let tools: CategorizedTools = self.send_json(Operation::ToolsByCategory, request).await?;
        debug!(n_categories = tools.len(), "received categorized tools");
        Ok(tools)
    }

    #[instrument(skip_all, fields(operation = %Operation::ListTools))]
    async fn list_tools(&self, query: &ToolQuery) -> Result<ToolsPage, CatalogClientError> {
        let request = self
            .request(Method::GET, &["tools"])
            .await
            .query(&query.pairs());
        self.send_json(Operation::ListTools, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::GetTool, tool_id = %id))]
    async fn get_tool(&self, id: &ToolId) -> Result<Tool, CatalogClientError> {
        let request = self.request(Method::GET, &["tools", id.as_str()]).await;
        self.send_json(Operation::GetTool, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::Categories))]
    async fn categories(&self) -> Result<Vec<String>, CatalogClientError> {
        let request = self.request(Method::GET, &["tools", "categories"]).await;
        self.send_json(Operation::Categories, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::PopularTools))]
    async fn popular_tools(&self) -> Result<Vec<Tool>, CatalogClientError> {
        let request = self.request(Method::GET, &["tools", "popular"]).await;
        self.send_json(Operation::PopularTools, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::CreateTool, url = %request.url))]
    async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, CatalogClientError> {
        let http_request = self.request(Method::POST, &["tools"]).await.json(request);
        let tool: Tool = self.send_json(Operation::CreateTool, http_request).await?;
        debug!(tool_id = %tool.id, category = tool.category, "created tool");
        Ok(tool)
    }

    #[instrument(skip_all, fields(operation = %Operation::RecordVisit, tool_id = %id))]
    async fn record_visit(&self, id: &ToolId) -> Result<(), CatalogClientError> {
        let request = self.request(Method::POST, &["tools", id.as_str(), "visit"]).await;
        self.send(Operation::RecordVisit, request).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(operation = %Operation::Bookmarks))]
    async fn bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError> {
        let request = self.request(Method::GET, &["bookmarks"]).await;
        self.send_json(Operation::Bookmarks, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::PinnedBookmarks))]
    async fn pinned_bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError> {
        let request = self.request(Method::GET, &["bookmarks", "pinned"]).await;
        self.send_json(Operation::PinnedBookmarks, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::CreateBookmark, tool_id = %id))]
    async fn create_bookmark(
        &self,
        id: &ToolId,
        is_pinned: bool,
    ) -> Result<Bookmark, CatalogClientError> {
        let body = CreateBookmarkRequest {
            tool_id: id,
            is_pinned,
        };
        let request = self.request(Method::POST, &["bookmarks"]).await.json(&body);
        self.send_json(Operation::CreateBookmark, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::SetPin, tool_id = %id, is_pinned = is_pinned))]
    async fn set_pin(&self, id: &ToolId, is_pinned: bool) -> Result<Bookmark, CatalogClientError> {
        let request = self
            .request(Method::PATCH, &["bookmarks", id.as_str(), "pin"])
            .await
            .json(&PinRequest { is_pinned });
        self.send_json(Operation::SetPin, request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::RemoveBookmark, tool_id = %id))]
    async fn remove_bookmark(&self, id: &ToolId) -> Result<(), CatalogClientError> {
        let request = self.request(Method::DELETE, &["bookmarks", id.as_str()]).await;
        self.send(Operation::RemoveBookmark, request).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(operation = %Operation::BookmarkStatus, tool_id = %id))]
    async fn bookmark_status(&self, id: &ToolId) -> Result<BookmarkStatus, CatalogClientError> {
        let request = self
            .request(Method::GET, &["bookmarks", "status"])
            .await
            .query(&[("toolId", id.as_str())]);
        self.send_json(Operation::BookmarkStatus, request).await
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client shared by all requests.
///
/// Authorization is not a default header, it is attached per request.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        api_url = %config.api_url,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT))
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::{self, BoxFuture};
    use httpmock::Method::{DELETE, GET, PATCH, POST};
    use httpmock::MockServer;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::auth::{Anonymous, StaticToken, TokenError};

    /// Records how often the client asked for a new sign in
    #[derive(Debug, Default)]
    struct RecordingProvider {
        token: Option<String>,
        fail: bool,
        sign_ins: AtomicUsize,
    }

    impl TokenProvider for RecordingProvider {
        fn token(&self) -> BoxFuture<'_, Result<Option<String>, TokenError>> {
            let result = if self.fail {
                Err(TokenError("session expired".to_string()))
            } else {
                Ok(self.token.clone())
            };
            Box::pin(future::ready(result))
        }

        fn sign_in_required(&self) {
            self.sign_ins.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn client_config(server: &MockServer) -> CatalogClientConfig {
        CatalogClientConfig::new(format!("{}/api", server.base_url()).parse().unwrap())
    }

    fn anonymous_client(server: &MockServer) -> CatalogClient {
        CatalogClient::new(client_config(server), Arc::new(Anonymous)).unwrap()
    }

    fn tool_json(id: &str, category: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Tool {id}"),
            "description": "does things",
            "url": format!("https://{id}.example.com/"),
            "category": category,
            "tags": [],
            "usageCount": 0,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })
    }

    fn bookmark_json(tool_id: &str, is_pinned: bool) -> serde_json::Value {
        json!({
            "id": format!("b-{tool_id}"),
            "userId": "u1",
            "toolId": tool_id,
            "isPinned": is_pinned,
            "createdAt": "2024-01-01T00:00:00Z",
        })
    }

    #[tokio::test]
    async fn bearer_token_attached_when_available() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/tools/categories")
                .header("authorization", "Bearer secret");
            then.status(200).json_body(json!(["Code"]));
        });

        let client =
            CatalogClient::new(client_config(&server), Arc::new(StaticToken::new("secret")))
                .unwrap();
        let categories = client.categories().await.unwrap();

        assert_eq!(categories, vec!["Code".to_string()]);
        mock.assert();
    }

    #[tokio::test]
    async fn requests_proceed_without_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/tools/categories")
                .header_missing("authorization");
            then.status(200).json_body(json!([]));
        });

        let client = anonymous_client(&server);
        assert!(client.categories().await.unwrap().is_empty());
        mock.assert();
    }

    /// A failing token provider downgrades to an unauthenticated request
    #[tokio::test]
    async fn token_failure_is_not_fatal() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/api/tools/popular").header_missing("authorization");
            then.status(200).json_body(json!([]));
        });

        let provider = RecordingProvider {
            fail: true,
            ..Default::default()
        };
        let client = CatalogClient::new(client_config(&server), Arc::new(provider)).unwrap();
        assert!(client.popular_tools().await.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn unauthorized_requests_sign_in() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/api/bookmarks/pinned");
            then.status(401)
                .json_body(json!({"message": "Unauthorized", "statusCode": 401}));
        });

        let provider = Arc::new(RecordingProvider {
            token: Some("expired".to_string()),
            ..Default::default()
        });
        let client = CatalogClient::new(client_config(&server), provider.clone()).unwrap();
        let result = client.pinned_bookmarks().await;

        assert!(
            matches!(result, Err(CatalogClientError::AuthenticationRequired)),
            "expected AuthenticationRequired, found: {result:?}"
        );
        assert_eq!(provider.sign_ins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn other_errors_do_not_sign_in() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/api/bookmarks/pinned");
            then.status(403).json_body(json!({"message": "Forbidden resource"}));
        });

        let provider = Arc::new(RecordingProvider::default());
        let client = CatalogClient::new(client_config(&server), provider.clone()).unwrap();
        let err = client.pinned_bookmarks().await.unwrap_err();

        assert_eq!(err.to_string(), "Forbidden resource");
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(provider.sign_ins.load(Ordering::SeqCst), 0);
    }

    /// Responses without a JSON body fall back to the status text
    #[tokio::test]
    async fn error_without_json_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/api/tools/categories");
            then.status(502).body("<html>bad gateway</html>");
        });

        let err = anonymous_client(&server).categories().await.unwrap_err();
        assert_eq!(err.to_string(), "list categories failed: Bad Gateway");
    }

    /// Categories keep the order of the response body
    #[tokio::test]
    async fn tools_by_category_keeps_server_order() {
        let body = format!(
            r#"{{"Writing":[{}],"Code":[{},{}],"Design":[]}}"#,
            tool_json("x", "Writing"),
            tool_json("y", "Code"),
            tool_json("z", "Code")
        );
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/tools/by-category")
                .query_param("limit", "100");
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        });

        let tools = anonymous_client(&server)
            .tools_by_category(NonZeroU32::new(100).unwrap())
            .await
            .unwrap();

        assert_eq!(tools.keys().collect::<Vec<_>>(), vec![
            "Writing", "Code", "Design"
        ]);
        assert_eq!(tools["Code"].len(), 2);
        mock.assert();
    }

    #[tokio::test]
    async fn list_tools_sends_query() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/tools")
                .query_param("search", "chat")
                .query_param("limit", "5")
                .query_param_missing("category")
                .query_param_missing("page");
            then.status(200).json_body(json!({
                "data": [tool_json("a", "Code")],
                "total": 1,
                "page": 1,
                "limit": 5,
                "totalPages": 1,
            }));
        });

        let query = ToolQuery {
            search: Some("chat".to_string()),
            limit: NonZeroU32::new(5),
            ..Default::default()
        };
        let page = anonymous_client(&server).list_tools(&query).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_pages, 1);
        mock.assert();
    }

    #[tokio::test]
    async fn create_tool_posts_request_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/tools")
                .json_body(json!({"url": "https://a.example.com", "category": "Code"}));
            then.status(201).json_body(tool_json("a", "Code"));
        });

        let request = CreateToolRequest::new("https://a.example.com", Some("Code".to_string()));
        let tool = anonymous_client(&server)
            .create_tool(&request)
            .await
            .unwrap();
        assert_eq!(tool.id, ToolId::from("a"));
        mock.assert();
    }

    #[tokio::test]
    async fn create_tool_duplicate() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/tools");
            then.status(409)
                .json_body(json!({"message": "Tool with URL https://a.example.com already exists"}));
        });

        let request = CreateToolRequest::new("https://a.example.com", None);
        let result = anonymous_client(&server).create_tool(&request).await;
        assert!(
            matches!(result, Err(CatalogClientError::DuplicateResource(_))),
            "expected DuplicateResource, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn create_tool_unreachable() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/tools");
            then.status(400)
                .json_body(json!({"message": "Website https://nope.invalid is not accessible"}));
        });

        let request = CreateToolRequest::new("https://nope.invalid", None);
        let result = anonymous_client(&server).create_tool(&request).await;
        assert!(
            matches!(result, Err(CatalogClientError::UnreachableResource(_))),
            "expected UnreachableResource, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn record_visit_ignores_empty_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/tools/a/visit");
            then.status(201);
        });

        anonymous_client(&server)
            .record_visit(&ToolId::from("a"))
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn get_tool_by_id() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tools/a");
            then.status(200).json_body(tool_json("a", "Code"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/tools/missing");
            then.status(404).json_body(json!({"message": "Tool not found"}));
        });

        let client = anonymous_client(&server);
        let tool = client.get_tool(&ToolId::from("a")).await.unwrap();
        assert_eq!(tool.name, "Tool a");
        assert_eq!(tool.url.as_str(), "https://a.example.com/");

        let err = client.get_tool(&ToolId::from("missing")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Tool not found");
    }

    #[tokio::test]
    async fn remove_bookmark() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/bookmarks/a");
            then.status(200);
        });

        anonymous_client(&server)
            .remove_bookmark(&ToolId::from("a"))
            .await
            .unwrap();
        mock.assert();
    }

    /// Tool ids are opaque and must not break out of their path segment
    #[test]
    fn tool_ids_are_percent_encoded() {
        let config = CatalogClientConfig::new("http://localhost:3001/api".parse().unwrap());
        let client = CatalogClient::new(config, Arc::new(Anonymous)).unwrap();
        assert_eq!(
            client.endpoint(&["bookmarks", "a/b?c"]).as_str(),
            "http://localhost:3001/api/bookmarks/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn set_pin_sends_pin_state() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/bookmarks/a/pin")
                .json_body(json!({"isPinned": true}));
            then.status(200).json_body(bookmark_json("a", true));
        });

        let bookmark = anonymous_client(&server)
            .set_pin(&ToolId::from("a"), true)
            .await
            .unwrap();
        assert!(bookmark.is_pinned);
        mock.assert();
    }

    #[tokio::test]
    async fn create_bookmark_sends_tool_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/bookmarks")
                .json_body(json!({"toolId": "a", "isPinned": false}));
            then.status(201).json_body(bookmark_json("a", false));
        });

        anonymous_client(&server)
            .create_bookmark(&ToolId::from("a"), false)
            .await
            .unwrap();
        mock.assert();
    }

    /// A failing request in a bulk change does not affect the others
    #[tokio::test]
    async fn set_pin_many_reports_each_tool() {
        let server = MockServer::start_async().await;
        let ok_a = server.mock(|when, then| {
            when.method(PATCH).path("/api/bookmarks/a/pin");
            then.status(200).json_body(bookmark_json("a", true));
        });
        let fail_b = server.mock(|when, then| {
            when.method(PATCH).path("/api/bookmarks/b/pin");
            then.status(500).json_body(json!({"message": "database unavailable"}));
        });
        let ok_c = server.mock(|when, then| {
            when.method(PATCH).path("/api/bookmarks/c/pin");
            then.status(200).json_body(bookmark_json("c", true));
        });

        let ids = ["a", "b", "c"].map(ToolId::from);
        let outcome = anonymous_client(&server).set_pin_many(&ids, true).await;

        assert_eq!(
            outcome.succeeded().cloned().collect::<Vec<_>>(),
            vec![ToolId::from("a"), ToolId::from("c")]
        );
        let failed = outcome.failed().collect::<Vec<_>>();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, &ToolId::from("b"));
        assert_eq!(failed[0].1.to_string(), "database unavailable");
        ok_a.assert();
        fail_b.assert();
        ok_c.assert();
    }

    #[tokio::test]
    async fn bookmark_status_uses_query() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/bookmarks/status")
                .query_param("toolId", "a");
            then.status(200)
                .json_body(json!({"isBookmarked": true, "isPinned": false}));
        });

        let status = anonymous_client(&server)
            .bookmark_status(&ToolId::from("a"))
            .await
            .unwrap();
        assert_eq!(status, BookmarkStatus {
            is_bookmarked: true,
            is_pinned: false
        });
        mock.assert();
    }

    #[tokio::test]
    async fn extra_headers_and_user_agent_set_on_all_requests() {
        let mut extra_headers: BTreeMap<String, String> = BTreeMap::new();
        extra_headers.insert("ezy-test".to_string(), "test-value".to_string());

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("ezy-test", "test-value")
                .header("user-agent", "my-custom-user-agent");
            then.status(200).json_body(json!([]));
        });

        let config = CatalogClientConfig {
            extra_headers,
            user_agent: Some("my-custom-user-agent".to_string()),
            ..client_config(&server)
        };
        let client = CatalogClient::new(config, Arc::new(Anonymous)).unwrap();
        let _ = client.categories().await;
        mock.assert();
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = CatalogClientConfig::new("mailto:someone@example.com".parse().unwrap());
        let result = CatalogClient::new(config, Arc::new(Anonymous));
        assert!(matches!(result, Err(CatalogClientError::Other(_))));
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let config = CatalogClientConfig::new("http://localhost:3001/api/".parse().unwrap());
        let client = CatalogClient::new(config, Arc::new(Anonymous)).unwrap();
        assert_eq!(
            client.endpoint(&["tools", "by-category"]).as_str(),
            "http://localhost:3001/api/tools/by-category"
        );
    }

    #[tokio::test]
    async fn connection_failure_is_request_failed() {
        // nothing listens on the discard port
        let config = CatalogClientConfig::new("http://127.0.0.1:9/api".parse().unwrap());
        let client = CatalogClient::new(config, Arc::new(Anonymous)).unwrap();
        let result = client.categories().await;
        assert!(
            matches!(result, Err(CatalogClientError::RequestFailed { status: None, .. })),
            "expected RequestFailed, found: {result:?}"
        );
    }
}
