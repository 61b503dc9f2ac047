use std::fmt::Display;

use ezybookmark_sdk::models::notice::{Notice, NoticeLevel};

/// Write a message to stderr.
///
/// This is a wrapper around `eprintln!` that can be further extended
/// to include logging, word wrapping, ANSI filtering etc.
fn print_message(v: impl Display) {
    eprintln!("{v}");
}

/// alias for [print_message]
pub(crate) fn plain(v: impl Display) {
    print_message(v);
}
pub(crate) fn error(v: impl Display) {
    print_message(std::format_args!("❌ ERROR: {v}"));
}
pub(crate) fn created(v: impl Display) {
    print_message(std::format_args!("✨ {v}"));
}
/// double width character, add an additional space for alignment
pub(crate) fn deleted(v: impl Display) {
    print_message(std::format_args!("🗑️  {v}"));
}
pub(crate) fn updated(v: impl Display) {
    print_message(std::format_args!("✅ {v}"));
}
/// double width character, add an additional space for alignment
pub(crate) fn warning(v: impl Display) {
    print_message(std::format_args!("⚠️  {v}"));
}
/// double width character, add an additional space for alignment
pub(crate) fn info(v: impl Display) {
    print_message(std::format_args!("ℹ️  {v}"));
}

pub(crate) fn notice(notice: &Notice) {
    let text = format_notice(notice);
    match notice.level {
        NoticeLevel::Success => updated(text),
        NoticeLevel::Info => info(text),
        NoticeLevel::Warning => warning(text),
        NoticeLevel::Error => error(text),
    }
}

fn format_notice(notice: &Notice) -> String {
    if notice.message.is_empty() {
        notice.title.clone()
    } else {
        format!("{}: {}", notice.title, notice.message)
    }
}
