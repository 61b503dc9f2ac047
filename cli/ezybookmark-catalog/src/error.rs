//! Error handling for catalog API operations.

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LOCAL_URL_ERRORS;

/// Common error type for catalog API operations.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The server rejected the request with `401 Unauthorized`.
    #[error("Authentication required. Please sign in again.")]
    AuthenticationRequired,
    /// A tool with the same URL is already in the catalog.
    #[error("{0}")]
    DuplicateResource(String),
    /// The URL was rejected, either locally or by the server.
    #[error("{0}")]
    InvalidUrl(String),
    /// The server could not fetch or validate the target site.
    #[error("{0}")]
    UnreachableResource(String),
    /// Any other failed request.
    ///
    /// `status` is `None` if no response was received at all.
    #[error("{message}")]
    RequestFailed {
        status: Option<StatusCode>,
        message: String,
    },
    /// The client could not be constructed.
    #[error("{0}")]
    Other(String),
}

impl CatalogClientError {
    pub(crate) fn transport(operation: Operation, err: reqwest::Error) -> Self {
        CatalogClientError::RequestFailed {
            status: err.status(),
            message: format!("{operation} failed: {err}"),
        }
    }

    /// The HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CatalogClientError::AuthenticationRequired => Some(StatusCode::UNAUTHORIZED),
            CatalogClientError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Short hint for the URL field of an add-tool form.
    pub fn add_tool_hint(&self) -> String {
        match self {
            CatalogClientError::AuthenticationRequired => self.to_string(),
            CatalogClientError::DuplicateResource(_) => {
                "This tool has already been added to the collection".to_string()
            },
            CatalogClientError::InvalidUrl(message) if LOCAL_URL_ERRORS.contains(&message.as_str()) => {
                message.clone()
            },
            CatalogClientError::InvalidUrl(_) => "Please enter a valid URL format".to_string(),
            CatalogClientError::UnreachableResource(message) if message.contains("returned") => {
                "The website returned an error. It may be temporarily unavailable.".to_string()
            },
            CatalogClientError::UnreachableResource(_) => {
                "The website could not be reached. Please check the URL and try again.".to_string()
            },
            CatalogClientError::RequestFailed { .. } | CatalogClientError::Other(_) => {
                "Failed to add tool. Please try again or check your internet connection."
                    .to_string()
            },
        }
    }
}

/// Remote operations, named the way they appear in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListTools,
    GetTool,
    ToolsByCategory,
    Categories,
    PopularTools,
    CreateTool,
    RecordVisit,
    Bookmarks,
    PinnedBookmarks,
    CreateBookmark,
    SetPin,
    RemoveBookmark,
    BookmarkStatus,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListTools => "list tools",
            Operation::GetTool => "get tool",
            Operation::ToolsByCategory => "list tools by category",
            Operation::Categories => "list categories",
            Operation::PopularTools => "list popular tools",
            Operation::CreateTool => "create tool",
            Operation::RecordVisit => "record visit",
            Operation::Bookmarks => "list bookmarks",
            Operation::PinnedBookmarks => "list pinned bookmarks",
            Operation::CreateBookmark => "create bookmark",
            Operation::SetPin => "set pin",
            Operation::RemoveBookmark => "remove bookmark",
            Operation::BookmarkStatus => "get bookmark status",
        };
        write!(f, "{name}")
    }
}

/// JSON body of an error response, `{ "message": ... }`.
///
/// Validation failures report a list of messages instead of a single one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorBody {
    pub fn message(self) -> Option<String> {
        match self.message? {
            ErrorMessage::One(message) => Some(message),
            ErrorMessage::Many(messages) if messages.is_empty() => None,
            ErrorMessage::Many(messages) => Some(messages.join(", ")),
        }
    }
}

/// Turn a non-success response into a [CatalogClientError].
///
/// The body is consumed to look for a human readable message.
pub(crate) async fn error_from_response(
    operation: Operation,
    resp: reqwest::Response,
) -> CatalogClientError {
    let status = resp.status();
    let message = resp.json::<ErrorBody>().await.ok().and_then(ErrorBody::message);
    classify(operation, status, message)
}

/// Map a failed status and optional server message to an error kind.
pub(crate) fn classify(
    operation: Operation,
    status: StatusCode,
    message: Option<String>,
) -> CatalogClientError {
    if status == StatusCode::UNAUTHORIZED {
        return CatalogClientError::AuthenticationRequired;
    }

    let message = message.unwrap_or_else(|| {
        let reason = status.canonical_reason().unwrap_or(status.as_str());
        format!("{operation} failed: {reason}")
    });

    if operation == Operation::CreateTool {
        let lowercase = message.to_lowercase();
        if status == StatusCode::CONFLICT || lowercase.contains("already exists") {
            return CatalogClientError::DuplicateResource(message);
        }
        if lowercase.contains("invalid url") {
            return CatalogClientError::InvalidUrl(message);
        }
        if ["not accessible", "does not exist", "returned"]
            .iter()
            .any(|needle| lowercase.contains(needle))
        {
            return CatalogClientError::UnreachableResource(message);
        }
    }

    CatalogClientError::RequestFailed {
        status: Some(status),
        message,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn body(json: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(json).unwrap().message()
    }

    #[test]
    fn error_body_single_message() {
        assert_eq!(body(r#"{"message": "nope"}"#), Some("nope".to_string()));
    }

    #[test]
    fn error_body_message_list_is_joined() {
        assert_eq!(
            body(r#"{"message": ["url must be a URL", "category too long"]}"#),
            Some("url must be a URL, category too long".to_string())
        );
        assert_eq!(body(r#"{"message": []}"#), None);
    }

    #[test]
    fn error_body_without_message() {
        assert_eq!(body(r#"{"error": "Bad Request"}"#), None);
    }

    #[test]
    fn unauthorized_is_always_authentication_required() {
        for operation in [Operation::CreateTool, Operation::SetPin] {
            assert!(matches!(
                classify(operation, StatusCode::UNAUTHORIZED, Some("x".into())),
                CatalogClientError::AuthenticationRequired
            ));
        }
    }

    #[test]
    fn generic_message_uses_operation_and_status_text() {
        let err = classify(Operation::SetPin, StatusCode::SERVICE_UNAVAILABLE, None);
        assert_eq!(err.to_string(), "set pin failed: Service Unavailable");
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn create_tool_errors_are_classified() {
        let classify_create =
            |status, message: &str| classify(Operation::CreateTool, status, Some(message.into()));

        assert!(matches!(
            classify_create(StatusCode::CONFLICT, "conflict"),
            CatalogClientError::DuplicateResource(_)
        ));
        assert!(matches!(
            classify_create(StatusCode::BAD_REQUEST, "Tool with this URL already exists"),
            CatalogClientError::DuplicateResource(_)
        ));
        assert!(matches!(
            classify_create(StatusCode::BAD_REQUEST, "Invalid URL format"),
            CatalogClientError::InvalidUrl(_)
        ));
        assert!(matches!(
            classify_create(StatusCode::BAD_REQUEST, "Website is not accessible"),
            CatalogClientError::UnreachableResource(_)
        ));
        assert!(matches!(
            classify_create(StatusCode::BAD_REQUEST, "Website returned 503"),
            CatalogClientError::UnreachableResource(_)
        ));
        assert!(matches!(
            classify_create(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            CatalogClientError::RequestFailed { .. }
        ));
    }

    /// The create-tool wording only applies to create requests
    #[test]
    fn other_operations_are_not_classified() {
        assert!(matches!(
            classify(Operation::SetPin, StatusCode::CONFLICT, Some("already exists".into())),
            CatalogClientError::RequestFailed { .. }
        ));
    }

    #[test]
    fn add_tool_hints() {
        assert_eq!(
            CatalogClientError::DuplicateResource("x".into()).add_tool_hint(),
            "This tool has already been added to the collection"
        );
        assert_eq!(
            CatalogClientError::UnreachableResource("Website returned 500".into()).add_tool_hint(),
            "The website returned an error. It may be temporarily unavailable."
        );
        assert_eq!(
            CatalogClientError::UnreachableResource("does not exist".into()).add_tool_hint(),
            "The website could not be reached. Please check the URL and try again."
        );
        assert_eq!(
            CatalogClientError::InvalidUrl("URL is required".into()).add_tool_hint(),
            "URL is required"
        );
        assert_eq!(
            crate::types::validate_tool_url("ftp://example.com")
                .unwrap_err()
                .add_tool_hint(),
            "URL must use HTTP or HTTPS protocol"
        );
        // server side rejections get the generic hint
        assert_eq!(
            CatalogClientError::InvalidUrl("Invalid URL: host is a private address".into())
                .add_tool_hint(),
            "Please enter a valid URL format"
        );
    }
}
