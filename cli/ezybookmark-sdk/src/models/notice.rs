//! Transient user notices.
//!
//! Background failures (visits, pin changes, bulk actions) are reported
//! through notices only, they never fail the calling operation.

use derive_more::Display;
use ezybookmark_catalog::types::BulkPinOutcome;
use serde::Serialize;

use super::selection::SelectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    #[display("success")]
    Success,
    #[display("info")]
    Info,
    #[display("warning")]
    Warning,
    #[display("error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    pub fn sign_in_required(message: impl Into<String>) -> Self {
        Self::info("Sign in required", message)
    }

    pub(crate) fn pin_failed() -> Self {
        Self::error(
            "Failed to update pin status",
            "Please try again or check your internet connection",
        )
    }

    /// Summarize a bulk pin state change.
    pub fn bulk(kind: SelectionKind, outcome: &BulkPinOutcome) -> Self {
        let verb = kind.past_tense();
        let succeeded = outcome.n_succeeded();
        let failed = outcome.n_failed();

        match (succeeded, failed) {
            (_, 0) => Self::success(
                format!("Tools {verb}"),
                format!("{} {verb}", n_tools(succeeded)),
            ),
            (0, _) => Self::pin_failed(),
            _ => Self::warning(
                format!("Some tools could not be {verb}"),
                format!("{} {verb}, {failed} failed", n_tools(succeeded)),
            ),
        }
    }
}

fn n_tools(n: usize) -> String {
    if n == 1 {
        "1 tool".to_string()
    } else {
        format!("{n} tools")
    }
}
