//! 章节组装
//!
//! 把脊柱、清单、导航标题和归档条目大小合成为按阅读顺序排列的章节列表。

use serde::Serialize;
use tracing::{debug, warn};

use crate::epub::archive::EntrySource;
use crate::epub::error::{EpubError, Result};
use crate::epub::markdown::html_to_markdown;
use crate::epub::nav::resolve_titles_for;
use crate::epub::opf::read_package;

/// 导航中没有标题的章节使用的占位标题
pub const UNTITLED_CHAPTER: &str = "No heading";

/// 章节信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// 章节标题
    pub title: String,
    /// 归档内部的规范化路径
    pub path: String,
    /// 条目解压后的字节数，条目缺失时为0
    pub size: u64,
}

/// 按阅读顺序构建章节列表
///
/// 清单中不存在的脊柱引用被跳过；条目缺失时大小记为0；
/// 导航中没有标题或标题为空的章节使用 [`UNTITLED_CHAPTER`]。
pub fn build_chapters<S: EntrySource + ?Sized>(archive: &mut S) -> Result<Vec<Chapter>> {
    let opf = read_package(archive)?;
    let spine_paths = opf.spine_paths();
    let titles = resolve_titles_for(&opf, archive)?;

    let mut chapters = Vec::with_capacity(spine_paths.len());
    for path in spine_paths {
        let size = match archive.entry_size(&path)? {
            Some(size) => size,
            None => {
                warn!(path = %path, "章节文件不在归档中");
                0
            }
        };
        let title = titles
            .title_of(&path)
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(UNTITLED_CHAPTER)
            .to_string();
        chapters.push(Chapter { title, path, size });
    }

    debug!(chapters = chapters.len(), "章节列表构建完成");
    Ok(chapters)
}

/// 读取章节的原始HTML
pub fn chapter_html<S: EntrySource + ?Sized>(archive: &mut S, path: &str) -> Result<String> {
    archive
        .read_entry_text(path)?
        .ok_or_else(|| EpubError::format(path, "无法读取章节文件"))
}

/// 读取章节并转换为Markdown
pub fn chapter_markdown<S: EntrySource + ?Sized>(archive: &mut S, path: &str) -> Result<String> {
    Ok(html_to_markdown(&chapter_html(archive, path)?))
}
