//! 导航文档解析模块
//!
//! 支持两种导航文档：EPUB2的NCX与EPUB3的XHTML导航文档，
//! 最终都归结为“规范化路径 → 章节标题”的映射。

pub mod ncx;
pub mod resolver;
pub mod xhtml;

/// 导航文档中的一个条目：标签文本与原始目标引用
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavPoint {
    /// 标签文本
    pub label: String,
    /// 目标引用（可能带有 `#` 锚点，相对于导航文档）
    pub src: String,
}

pub use ncx::Ncx;
pub use resolver::{NavigationMap, TocEntry, resolve_titles, resolve_titles_for, table_of_contents};
pub use xhtml::parse_nav_document;
