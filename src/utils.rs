// src/utils.rs

use crate::constants;
use regex::Regex;
use std::{cmp::Ordering, ffi::OsStr, path::Path, sync::LazyLock};

static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 名称排序规则: 先忽略大小写比较，相同时小写在前 (`z` 排在 `Z` 之前)，保证是全序。
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// 课时文件名 (不含扩展名)，序号补零到两位，例如 `03 Use State`。
pub fn lesson_file_stem(lesson_number: u32, name: &str) -> String {
    format!(
        "{:0width$} {}",
        lesson_number,
        name.trim(),
        width = constants::LESSON_NUMBER_WIDTH
    )
}

pub fn sanitize_filename(name: &str) -> String {
    let original_name = name.trim();
    if original_name.is_empty() { return "unknown".to_string(); }

    let stem = Path::new(original_name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(original_name))
        .to_string_lossy()
        .to_uppercase();
    let windows_reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let mut name = if windows_reserved.contains(&stem.as_ref()) {
        format!("_{}", original_name)
    } else {
        original_name.to_string()
    };

    name = ILLEGAL_CHARS_RE.replace_all(&name, " ").into_owned();
    name = WHITESPACE_RE.replace_all(&name, " ").trim().to_string();
    name = name.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();
    if name.is_empty() { return "unnamed".to_string(); }

    if name.len() > constants::MAX_FILENAME_BYTES {
        name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES)
            .trim_end()
            .to_string();
    }
    name
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

/// 按显示宽度截断文本，全角字符按 2 计宽。
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("angular", "React"), Ordering::Less);
        assert_eq!(compare_names("Vue", "react"), Ordering::Greater);
        // 仅大小写不同时小写在前
        assert_eq!(compare_names("z", "Z"), Ordering::Less);
        assert_eq!(compare_names("Z", "z"), Ordering::Greater);
        assert_eq!(compare_names("react", "React"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_lesson_file_stem() {
        assert_eq!(lesson_file_stem(3, "Use State"), "03 Use State");
        assert_eq!(lesson_file_stem(12, " Effects "), "12 Effects");
        assert_eq!(lesson_file_stem(120, "Long"), "120 Long");
    }

    #[test]
    fn test_sanitize_filename() {
        // 非法字符
        assert_eq!(sanitize_filename("a\\b/c:d*e?f\"g<h>i|j"), "a b c d e f g h i j".to_string());

        // 首尾空格和点
        assert_eq!(sanitize_filename(" . my file. "), "my file".to_string());

        assert_eq!(sanitize_filename("a  b   c"), "a b c".to_string());

        // Windows 保留字 (大小写不敏感)
        assert_eq!(sanitize_filename("CON.txt"), "_CON.txt".to_string());
        assert_eq!(sanitize_filename("aux"), "_aux".to_string());

        assert_eq!(sanitize_filename(""), "unknown".to_string());
        assert_eq!(sanitize_filename("<>|"), "unnamed".to_string());

        assert_eq!(sanitize_filename("React: Hooks / Context"), "React Hooks Context");
    }

    #[test]
    fn test_sanitize_filename_truncates_on_char_boundary() {
        let very_long_name = "课".repeat(100);
        let truncated = sanitize_filename(&very_long_name);
        assert!(truncated.len() <= constants::MAX_FILENAME_BYTES);
        assert!(truncated.chars().all(|c| c == '课'));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghijkl", 8), "abcde...");
    }
}
