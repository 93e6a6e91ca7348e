//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块提供EPUB文件中包文档的解析功能，包括清单、脊柱等信息的提取。

mod manifest;
mod parser;
mod spine;

pub use manifest::{Manifest, ManifestItem, NCX_MEDIA_TYPE};
pub use parser::{Opf, parse_manifest_and_spine, read_package};
pub use spine::SpineItem;
