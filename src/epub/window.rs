//! 内容分段读取
//!
//! 按字符偏移和长度截取文本片段，并给出继续读取所需的分页信息。

use serde::Serialize;

use crate::epub::error::{EpubError, Result};

/// 未指定长度时返回的字符数
pub const DEFAULT_WINDOW_LENGTH: usize = 30000;

/// 文本的一个片段及其分页信息
///
/// 所有偏移和长度都以字符计。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentWindow {
    /// 片段内容
    pub slice: String,
    /// 片段起始偏移
    pub offset: usize,
    /// 片段长度
    pub length: usize,
    /// 全文长度
    pub total_length: usize,
    /// 片段之后是否还有内容
    pub has_more: bool,
    /// 下一片段的起始偏移，没有更多内容时不存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<usize>,
}

impl ContentWindow {
    /// 片段是否只是全文的一部分
    pub fn is_truncated(&self) -> bool {
        self.length < self.total_length
    }

    /// 附在片段后面的分页说明
    pub fn section_info(&self) -> String {
        let next = match self.next_offset {
            Some(next) => format!("Next Offset: {next}"),
            None => "End of chapter.".to_string(),
        };
        format!(
            "--- Section Info ---\nOffset: {}\nReturned Length: {}\nTotal Chapter Length: {}\n{}",
            self.offset, self.length, self.total_length, next
        )
    }
}

/// 从 `offset` 开始截取最多 `length` 个字符
///
/// `length` 为0时使用 [`DEFAULT_WINDOW_LENGTH`]。
/// 只有文本非空且 `offset` 不小于文本长度时才返回 [`EpubError::OffsetOutOfRange`]。
///
/// ```
/// use bookscope::epub::window::window;
///
/// let first = window("abcdef", 0, 4).unwrap();
/// assert_eq!(first.slice, "abcd");
/// assert_eq!(first.next_offset, Some(4));
/// ```
pub fn window(text: &str, offset: usize, length: usize) -> Result<ContentWindow> {
    let length = if length == 0 { DEFAULT_WINDOW_LENGTH } else { length };
    let total_length = text.chars().count();

    if total_length > 0 && offset >= total_length {
        return Err(EpubError::OffsetOutOfRange {
            offset,
            total: total_length,
        });
    }

    let slice: String = text.chars().skip(offset).take(length).collect();
    let returned = slice.chars().count();
    let end = offset + returned;
    let has_more = end < total_length;

    Ok(ContentWindow {
        slice,
        offset,
        length: returned,
        total_length,
        has_more,
        next_offset: has_more.then_some(end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chaining_windows_reconstructs_text() {
        let text = "第一章 The quick brown fox jumps over the lazy dog.";
        for length in [1, 3, 7, 100] {
            let mut rebuilt = String::new();
            let mut offset = 0;
            loop {
                let part = window(text, offset, length).unwrap();
                rebuilt.push_str(&part.slice);
                match part.next_offset {
                    Some(next) => offset = next,
                    None => {
                        assert!(!part.has_more);
                        break;
                    }
                }
            }
            assert_eq!(rebuilt, text);
        }
    }

    #[test]
    fn test_offset_beyond_end() {
        let error = window("abc", 3, 10).unwrap_err();
        assert!(error.is_range());
        assert!(window("abc", 2, 10).is_ok());
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let empty = window("", 0, 10).unwrap();
        assert_eq!(empty.slice, "");
        assert_eq!(empty.total_length, 0);
        assert!(!empty.has_more);
        assert!(window("", 5, 10).is_ok());
    }

    #[test]
    fn test_zero_length_uses_default() {
        let text = "x".repeat(DEFAULT_WINDOW_LENGTH + 5);
        let part = window(&text, 0, 0).unwrap();
        assert_eq!(part.length, DEFAULT_WINDOW_LENGTH);
        assert!(part.is_truncated());
        assert_eq!(part.next_offset, Some(DEFAULT_WINDOW_LENGTH));
    }

    #[test]
    fn test_section_info() {
        let part = window("abcdef", 2, 2).unwrap();
        assert_eq!(
            part.section_info(),
            "--- Section Info ---\nOffset: 2\nReturned Length: 2\nTotal Chapter Length: 6\nNext Offset: 4"
        );

        let last = window("abcdef", 4, 10).unwrap();
        assert!(last.section_info().ends_with("End of chapter."));
    }
}
