/// Number of characters of a history result kept in its list preview.
pub const PREVIEW_CHARS: usize = 80;
const PREVIEW_SUFFIX: &str = "...";

/// Builds the display-safe excerpt shown in the history list: the first
/// [`PREVIEW_CHARS`] characters with newlines flattened to spaces, plus a
/// fixed ellipsis suffix.
pub fn short_preview(result: &str) -> String {
    let head: String = result.chars().take(PREVIEW_CHARS).collect();
    let flattened = head.replace('\n', " ");
    format!("{flattened}{PREVIEW_SUFFIX}")
}
