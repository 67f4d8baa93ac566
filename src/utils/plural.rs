//! Count formatting for log lines.

/// Format `count` with `noun`, adding an `s` unless the count is one.
///
/// `plural_count(3, "icon")` gives `"3 icons"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
