use ezybookmark_catalog::types::{Tool, ToolId};
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;
use url::Url;

pub fn chrono_strat() -> impl Strategy<Value = chrono::DateTime<chrono::Utc>> {
    use chrono::TimeZone;

    let start = chrono::Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    let end = chrono::Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();

    (start.timestamp()..end.timestamp())
        .prop_map(|timestamp| chrono::Utc.timestamp_opt(timestamp, 0).unwrap())
}

/// Produces strings that only contain alphanumeric characters.
pub fn alphanum_string(max_size: usize) -> impl Strategy<Value = String> {
    let ranges = vec!['a'..='z', 'A'..='Z', '0'..='9'];
    prop::collection::vec(
        proptest::char::ranges(std::borrow::Cow::Owned(ranges)),
        1..=max_size,
    )
    .prop_map(|v| v.into_iter().collect())
}

/// Free text as it shows up in names, descriptions and search boxes,
/// including mixed case, spaces and the occasional non-ascii letter.
pub fn text_string(max_size: usize) -> impl Strategy<Value = String> {
    let ranges = vec!['a'..='z', 'A'..='Z', '0'..='9', ' '..=' ', 'Ä'..='Ä', 'é'..='é'];
    prop::collection::vec(
        proptest::char::ranges(std::borrow::Cow::Owned(ranges)),
        0..=max_size,
    )
    .prop_map(|v| v.into_iter().collect())
}

/// A small fixed pool of categories, so generated tools share them.
pub fn category_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Writing", "Code", "Design", "Conversational AI"])
        .prop_map(ToString::to_string)
}

/// A tool with id `id` and arbitrary searchable fields.
pub fn tool_strategy(id: String) -> impl Strategy<Value = Tool> {
    (
        text_string(12),
        text_string(24),
        category_strategy(),
        prop_vec(alphanum_string(6), 0..3),
        0..1000_u64,
        chrono_strat(),
    )
        .prop_map(
            move |(name, description, category, tags, usage_count, created_at)| Tool {
                url: Url::parse(&format!("https://{id}.example.com/")).unwrap(),
                id: ToolId::from(id.as_str()),
                name,
                description,
                category,
                tags,
                favicon: None,
                added_by: None,
                usage_count,
                created_at,
                updated_at: created_at,
            },
        )
}

/// Tools with unique ids `t0`, `t1`, ...
pub fn tools_strategy(max_tools: usize) -> impl Strategy<Value = Vec<Tool>> {
    (0..=max_tools).prop_flat_map(|n| {
        (0..n)
            .map(|i| tool_strategy(format!("t{i}")))
            .collect::<Vec<_>>()
    })
}
