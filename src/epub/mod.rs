pub mod archive;
pub mod chapters;
pub mod config;
pub mod container;
pub mod error;
pub mod markdown;
pub mod nav;
pub mod opf;
pub mod path;
pub mod search;
pub mod window;
mod xml;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出归档访问
pub use archive::{EntrySource, Epub};

// 重新导出容器相关
pub use container::{Container, RootFile, locate_package_document};

// 重新导出OPF相关
pub use opf::{Manifest, ManifestItem, Opf, SpineItem, parse_manifest_and_spine, read_package};

// 重新导出导航相关
pub use nav::{NavPoint, NavigationMap, TocEntry, resolve_titles, table_of_contents};

// 重新导出章节、转换、分段与搜索
pub use chapters::{Chapter, UNTITLED_CHAPTER, build_chapters, chapter_html, chapter_markdown};
pub use markdown::html_to_markdown;
pub use search::{Correlation, SearchMatch, SearchOptions, search, search_in_book};
pub use window::{ContentWindow, DEFAULT_WINDOW_LENGTH, window};

// 重新导出配置
pub use config::{OutputFormat, ReaderConfig};
