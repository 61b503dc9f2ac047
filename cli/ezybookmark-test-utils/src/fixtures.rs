//! Hand written catalog data for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use ezybookmark_catalog::types::{Bookmark, CategorizedTools, Tool, ToolId};
use url::Url;

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A tool named `name` in `category`, with an id derived URL.
pub fn tool(id: &str, name: &str, category: &str) -> Tool {
    Tool {
        id: ToolId::from(id),
        name: name.to_string(),
        description: format!("{name} does things"),
        url: Url::parse(&format!("https://{id}.example.com/")).unwrap(),
        category: category.to_string(),
        tags: vec![],
        favicon: None,
        added_by: None,
        usage_count: 0,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn tool_with_usage(id: &str, category: &str, usage_count: u64) -> Tool {
    Tool {
        usage_count,
        ..tool(id, &format!("Tool {id}"), category)
    }
}

/// A bookmark of `tool`, embedding the tool like `GET /bookmarks/pinned` does.
pub fn bookmark(tool: &Tool, is_pinned: bool) -> Bookmark {
    Bookmark {
        id: format!("bookmark-{}", tool.id),
        user_id: "user".to_string(),
        tool_id: tool.id.clone(),
        is_pinned,
        created_at: timestamp(),
        tool: Some(tool.clone()),
    }
}

/// Group tools by category in first-seen order.
pub fn categorized(tools: impl IntoIterator<Item = Tool>) -> CategorizedTools {
    let mut categorized = CategorizedTools::new();
    for tool in tools {
        categorized
            .entry(tool.category.clone())
            .or_default()
            .push(tool);
    }
    categorized
}

/// The catalog used throughout the store tests:
/// `{"Writing": [x], "Code": [y, z]}`
pub fn writing_and_code() -> CategorizedTools {
    categorized([
        tool("x", "Scribe", "Writing"),
        tool("y", "Compiler Explorer", "Code"),
        tool("z", "Regex Tester", "Code"),
    ])
}
