pub mod epub;

// === 核心API重新导出 ===

/// EPUB归档（主要接口）
pub use epub::{EntrySource, Epub};

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 章节信息与目录条目
pub use epub::{Chapter, TocEntry, UNTITLED_CHAPTER};

/// 分段读取结果
pub use epub::{ContentWindow, DEFAULT_WINDOW_LENGTH};

/// 搜索结果与选项
pub use epub::{Correlation, SearchMatch, SearchOptions};

/// 阅读配置
pub use epub::{OutputFormat, ReaderConfig};

// === 底层组件（高级用法） ===

/// 容器组件
pub use epub::{Container, RootFile};

/// OPF组件
pub use epub::{Manifest, ManifestItem, Opf, SpineItem};

/// 导航组件
pub use epub::{NavPoint, NavigationMap};

// === 库信息 ===

/// BookScope库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BookScope库的描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// === 便捷函数 ===

/// 从归档字节构建按阅读顺序排列的章节列表
///
/// # 示例
///
/// ```rust,no_run
/// let bytes = std::fs::read("book.epub")?;
/// for chapter in bookscope::build_chapters(&bytes)? {
///     println!("{} ({})", chapter.title, chapter.path);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_chapters(archive_bytes: &[u8]) -> Result<Vec<Chapter>> {
    let mut epub = Epub::from_bytes(archive_bytes)?;
    epub::build_chapters(&mut epub)
}

/// 将HTML字节转换为Markdown风格的纯文本
///
/// 非法UTF-8字节被替换，不会失败。
pub fn convert_to_plain_text(markup_bytes: &[u8]) -> String {
    epub::html_to_markdown(&epub::archive::decode_text(markup_bytes.to_vec()))
}

/// 截取文本片段
pub fn window_text(text: &str, offset: usize, length: usize) -> Result<ContentWindow> {
    epub::window(text, offset, length)
}

/// 在整本书中搜索，使用默认的片段宽度
pub fn search_in_book(archive_bytes: &[u8], query: &str) -> Result<Vec<SearchMatch>> {
    let mut epub = Epub::from_bytes(archive_bytes)?;
    epub::search_in_book(&mut epub, query, &SearchOptions::default())
}

/// 快速打开磁盘上的EPUB文件
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Epub<std::fs::File>> {
    Epub::from_path(path)
}
