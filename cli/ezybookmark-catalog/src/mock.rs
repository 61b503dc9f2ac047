use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ClientTrait;
use crate::error::{classify, CatalogClientError, Operation};
use crate::types::*;

/// Points at a JSON file of canned responses, selects the [MockClient].
pub const CATALOG_MOCK_VAR: &str = "EZYBOOKMARK_CATALOG_MOCK";

// Arc allows you to push things into the client from outside the client if necessary
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// A canned response, tagged with the kind of payload it carries.
///
/// ```json
/// [{ "categories": ["Code"] }, { "error": { "status": 401 } }, "empty"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Categorized(CategorizedTools),
    Tools(Vec<Tool>),
    Tool(Tool),
    Page(ToolsPage),
    Categories(Vec<String>),
    Bookmarks(Vec<Bookmark>),
    Bookmark(Bookmark),
    Status(BookmarkStatus),
    /// Success without a body
    Empty,
    Error(MockError),
}

/// A failed response, classified the same way as a real one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockError {
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl MockError {
    fn into_error(self, operation: Operation) -> CatalogClientError {
        // status codes are checked when the responses are loaded
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        classify(operation, status, self.message)
    }
}

#[derive(Debug, Error)]
pub enum MockDataError {
    /// Failed to read the JSON file pointed at by [CATALOG_MOCK_VAR]
    #[error("failed to read mock response file")]
    ReadMockFile(#[source] std::io::Error),
    /// Failed to parse the contents of the mock data file as JSON
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
    /// The data was parsed as JSON but it wasn't semantically valid
    #[error("invalid mocked data: {0}")]
    InvalidData(String),
}

/// Reads a list of mock responses from disk.
fn read_mock_responses(path: impl AsRef<Path>) -> Result<VecDeque<Response>, MockDataError> {
    let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
    let responses: VecDeque<Response> =
        serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;

    for response in &responses {
        if let Response::Error(MockError { status, .. }) = response {
            let valid = StatusCode::from_u16(*status).is_ok_and(|status| !status.is_success());
            if !valid {
                return Err(MockDataError::InvalidData(format!(
                    "'{status}' is not an error status code"
                )));
            }
        }
    }
    Ok(responses)
}

/// A catalog client that replays canned responses in order.
///
/// Every request takes the next response off the queue,
/// a response of the wrong kind is a bug in the test and panics.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    pub mock_responses: MockField<VecDeque<Response>>,
    calls: MockField<Vec<Operation>>,
}

impl MockClient {
    /// Create a new mock client, potentially reading mock responses from disk
    pub fn new(mock_data_path: Option<impl AsRef<Path>>) -> Result<Self, MockDataError> {
        let mock_responses = match mock_data_path {
            Some(path) => read_mock_responses(path)?,
            None => VecDeque::new(),
        };
        Ok(Self {
            mock_responses: Arc::new(Mutex::new(mock_responses)),
            calls: Default::default(),
        })
    }

    /// Push a new response into the list of mock responses
    pub fn push_response(&self, response: Response) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    /// Push an API error into the list of mock responses
    pub fn push_error_response(&self, status: StatusCode, message: Option<&str>) {
        self.push_response(Response::Error(MockError {
            status: status.as_u16(),
            message: message.map(ToString::to_string),
        }));
    }

    /// Operations requested so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().expect("couldn't acquire mock lock").clone()
    }

    /// Number of responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .len()
    }

    fn respond<T>(
        &self,
        operation: Operation,
        extract: impl FnOnce(Response) -> Result<T, Response>,
    ) -> Result<T, CatalogClientError> {
        self.calls
            .lock()
            .expect("couldn't acquire mock lock")
            .push(operation);
        let mock_resp = self
            .mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front();

        match mock_resp {
            Some(Response::Error(err)) => Err(err.into_error(operation)),
            Some(resp) => match extract(resp) {
                Ok(value) => Ok(value),
                Err(resp) => panic!("unexpected response for '{operation}', found {resp:?}"),
            },
            None => panic!("no mock response left for '{operation}'"),
        }
    }
}

impl ClientTrait for MockClient {
    async fn tools_by_category(
        &self,
        _limit: NonZeroU32,
    ) -> Result<CategorizedTools, CatalogClientError> {
        self.respond(Operation::ToolsByCategory, |resp| match resp {
            Response::Categorized(tools) => Ok(tools),
            other => Err(other),
        })
    }

    async fn list_tools(&self, _query: &ToolQuery) -> Result<ToolsPage, CatalogClientError> {
        self.respond(Operation::ListTools, |resp| match resp {
            Response::Page(page) => Ok(page),
            other => Err(other),
        })
    }

    async fn get_tool(&self, _id: &ToolId) -> Result<Tool, CatalogClientError> {
        self.respond(Operation::GetTool, |resp| match resp {
            Response::Tool(tool) => Ok(tool),
            other => Err(other),
        })
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogClientError> {
        self.respond(Operation::Categories, |resp| match resp {
            Response::Categories(categories) => Ok(categories),
            other => Err(other),
        })
    }

    async fn popular_tools(&self) -> Result<Vec<Tool>, CatalogClientError> {
        self.respond(Operation::PopularTools, |resp| match resp {
            Response::Tools(tools) => Ok(tools),
            other => Err(other),
        })
    }

    async fn create_tool(&self, _request: &CreateToolRequest) -> Result<Tool, CatalogClientError> {
        self.respond(Operation::CreateTool, |resp| match resp {
            Response::Tool(tool) => Ok(tool),
            other => Err(other),
        })
    }

    async fn record_visit(&self, _id: &ToolId) -> Result<(), CatalogClientError> {
        self.respond(Operation::RecordVisit, |resp| match resp {
            Response::Empty => Ok(()),
            other => Err(other),
        })
    }

    async fn bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError> {
        self.respond(Operation::Bookmarks, |resp| match resp {
            Response::Bookmarks(bookmarks) => Ok(bookmarks),
            other => Err(other),
        })
    }

    async fn pinned_bookmarks(&self) -> Result<Vec<Bookmark>, CatalogClientError> {
        self.respond(Operation::PinnedBookmarks, |resp| match resp {
            Response::Bookmarks(bookmarks) => Ok(bookmarks),
            other => Err(other),
        })
    }

    async fn create_bookmark(
        &self,
        _id: &ToolId,
        _is_pinned: bool,
    ) -> Result<Bookmark, CatalogClientError> {
        self.respond(Operation::CreateBookmark, |resp| match resp {
            Response::Bookmark(bookmark) => Ok(bookmark),
            other => Err(other),
        })
    }

    async fn set_pin(
        &self,
        _id: &ToolId,
        _is_pinned: bool,
    ) -> Result<Bookmark, CatalogClientError> {
        self.respond(Operation::SetPin, |resp| match resp {
            Response::Bookmark(bookmark) => Ok(bookmark),
            other => Err(other),
        })
    }

    async fn remove_bookmark(&self, _id: &ToolId) -> Result<(), CatalogClientError> {
        self.respond(Operation::RemoveBookmark, |resp| match resp {
            Response::Empty => Ok(()),
            other => Err(other),
        })
    }

    async fn bookmark_status(&self, _id: &ToolId) -> Result<BookmarkStatus, CatalogClientError> {
        self.respond(Operation::BookmarkStatus, |resp| match resp {
            Response::Status(status) => Ok(status),
            other => Err(other),
        })
    }
}
