//! 全书搜索
//!
//! 在每章的原始HTML中查找关键词，并按出现序号在转换后的Markdown中定位对应位置。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::epub::archive::EntrySource;
use crate::epub::chapters::{Chapter, build_chapters};
use crate::epub::error::Result;
use crate::epub::markdown::html_to_markdown;

/// 搜索选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// 片段在命中位置两侧各保留的字符数
    pub snippet_window: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { snippet_window: 100 }
    }
}

/// Markdown位置与HTML位置的对应程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correlation {
    /// 找到对应位置，且两种文本中的出现次数一致
    Exact,
    /// 找到对应位置，但出现次数不一致，位置可能有偏差
    Uncertain,
    /// Markdown中没有相同序号的出现
    Missing,
}

/// 一次命中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub chapter_title: String,
    pub chapter_path: String,
    /// 原始HTML中的字符偏移
    pub html_offset: usize,
    /// 原始HTML中的上下文（保留标签）
    pub html_snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_snippet: Option<String>,
    pub correlation: Correlation,
}

/// 逐字符小写后的文本，保持字符数不变
struct FoldedText {
    chars: Vec<char>,
    folded: Vec<char>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let folded = chars.iter().map(|&c| fold_char(c)).collect();
        Self { chars, folded }
    }

    /// 从左到右、互不重叠地查找所有出现位置
    fn occurrences(&self, query: &[char]) -> Vec<usize> {
        let mut found = Vec::new();
        if query.is_empty() || query.len() > self.folded.len() {
            return found;
        }

        let mut position = 0;
        while position + query.len() <= self.folded.len() {
            if self.folded[position..position + query.len()] == *query {
                found.push(position);
                position += query.len();
            } else {
                position += 1;
            }
        }
        found
    }

    /// 命中位置两侧各扩展 `window` 个字符的片段，在文本边界处截断
    fn snippet(&self, position: usize, query_len: usize, window: usize) -> String {
        let start = position.saturating_sub(window);
        let end = position
            .saturating_add(query_len)
            .saturating_add(window)
            .min(self.chars.len());
        self.chars[start..end].iter().collect()
    }
}

fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn fold_query(query: &str) -> Vec<char> {
    query.chars().map(fold_char).collect()
}

/// 查找 `query` 在 `text` 中不区分大小写的出现位置（字符偏移）
///
/// ```
/// use bookscope::epub::search::find_occurrences;
///
/// assert_eq!(find_occurrences("Fox fox FOX", "fox"), vec![0, 4, 8]);
/// assert_eq!(find_occurrences("aaaa", "aa"), vec![0, 2]);
/// ```
pub fn find_occurrences(text: &str, query: &str) -> Vec<usize> {
    FoldedText::new(text).occurrences(&fold_query(query))
}

/// 在一章内搜索
fn search_chapter(chapter: &Chapter, raw: &str, query: &[char], options: &SearchOptions) -> Vec<SearchMatch> {
    let html = FoldedText::new(raw);
    let html_hits = html.occurrences(query);
    if html_hits.is_empty() {
        return Vec::new();
    }

    let markdown = FoldedText::new(&html_to_markdown(raw));
    let markdown_hits = markdown.occurrences(query);
    let counts_agree = html_hits.len() == markdown_hits.len();
    if !counts_agree {
        debug!(
            path = %chapter.path,
            html = html_hits.len(),
            markdown = markdown_hits.len(),
            "HTML与Markdown中的出现次数不一致"
        );
    }

    html_hits
        .iter()
        .enumerate()
        .map(|(ordinal, &html_offset)| {
            let correlated = markdown_hits.get(ordinal).copied();
            let correlation = match correlated {
                Some(_) if counts_agree => Correlation::Exact,
                Some(_) => Correlation::Uncertain,
                None => Correlation::Missing,
            };
            SearchMatch {
                chapter_title: chapter.title.clone(),
                chapter_path: chapter.path.clone(),
                html_offset,
                html_snippet: html.snippet(html_offset, query.len(), options.snippet_window),
                markdown_offset: correlated,
                markdown_snippet: correlated
                    .map(|offset| markdown.snippet(offset, query.len(), options.snippet_window)),
                correlation,
            }
        })
        .collect()
}

/// 按阅读顺序搜索所有章节
///
/// `raw_texts` 以章节路径为键；没有原始文本的章节被跳过。空关键词不产生任何命中。
pub fn search(
    chapters: &[Chapter],
    raw_texts: &HashMap<String, String>,
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchMatch> {
    let query = fold_query(query);
    if query.is_empty() {
        return Vec::new();
    }

    chapters
        .iter()
        .filter_map(|chapter| raw_texts.get(&chapter.path).map(|raw| (chapter, raw)))
        .flat_map(|(chapter, raw)| search_chapter(chapter, raw, &query, options))
        .collect()
}

/// 构建章节列表、读取每章内容并搜索
pub fn search_in_book<S: EntrySource + ?Sized>(
    archive: &mut S,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchMatch>> {
    let chapters = build_chapters(archive)?;

    let mut raw_texts = HashMap::with_capacity(chapters.len());
    for chapter in &chapters {
        if raw_texts.contains_key(&chapter.path) {
            continue;
        }
        match archive.read_entry_text(&chapter.path)? {
            Some(text) => {
                raw_texts.insert(chapter.path.clone(), text);
            }
            None => warn!(path = %chapter.path, "章节文件不在归档中，跳过搜索"),
        }
    }

    let matches = search(&chapters, &raw_texts, query, options);
    debug!(query, matches = matches.len(), "搜索完成");
    Ok(matches)
}
