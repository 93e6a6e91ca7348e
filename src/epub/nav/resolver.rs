//! 章节标题解析
//!
//! 先尝试NCX，没有得到任何条目时再尝试EPUB3导航文档；两者都为空时返回空映射。

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::epub::archive::EntrySource;
use crate::epub::error::Result;
use crate::epub::nav::NavPoint;
use crate::epub::nav::ncx::Ncx;
use crate::epub::nav::xhtml::parse_nav_document;
use crate::epub::opf::{ManifestItem, Opf, read_package};
use crate::epub::path;

/// 目录条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub title: String,
    pub path: String,
}

/// 规范化路径到标题的映射
///
/// 同一路径只保留第一次出现的标题；迭代顺序即导航文档中的顺序。
#[derive(Debug, Clone, Default)]
pub struct NavigationMap {
    entries: Vec<TocEntry>,
    index: HashMap<String, usize>,
}

impl NavigationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录路径的标题；路径已存在时丢弃新标题并返回 `false`
    pub fn insert(&mut self, path: String, title: String) -> bool {
        if self.index.contains_key(&path) {
            return false;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push(TocEntry { title, path });
        true
    }

    /// 查询路径对应的标题
    pub fn title_of(&self, path: &str) -> Option<&str> {
        self.index.get(path).map(|&position| self.entries[position].title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按导航顺序的目录条目
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TocEntry> {
        self.entries
    }

    /// 将导航文档中的条目解析到归档路径并加入映射
    ///
    /// 目标相对于导航文档自身所在目录解析；去掉锚点后为空的目标被忽略。
    // 基准是导航文档的目录，不是包文档目录
    fn extend_from(&mut self, nav_doc_path: &str, points: Vec<NavPoint>) {
        let base_dir = path::parent_dir(nav_doc_path);
        for point in points {
            let target = path::strip_fragment(&point.src);
            if target.is_empty() {
                continue;
            }
            let resolved = path::resolve(base_dir, &path::percent_decode(target));
            self.insert(resolved, point.label);
        }
    }
}

/// 导航文档的两种形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavKind {
    /// EPUB2 NCX
    Legacy,
    /// EPUB3 XHTML导航文档
    Modern,
}

/// 根据包文档文本解析章节标题
pub fn resolve_titles<S: EntrySource + ?Sized>(
    package_doc_text: &str,
    package_dir: &str,
    archive: &mut S,
) -> Result<NavigationMap> {
    let opf = Opf::parse_xml(package_doc_text, package_dir)?;
    resolve_titles_for(&opf, archive)
}

/// 根据已解析的包文档解析章节标题
pub fn resolve_titles_for<S: EntrySource + ?Sized>(opf: &Opf, archive: &mut S) -> Result<NavigationMap> {
    let mut map = NavigationMap::new();

    if let Some(item) = opf.ncx_item() {
        let points = load_points(archive, item, NavKind::Legacy)?;
        map.extend_from(&item.path, points);
    }

    if map.is_empty() {
        if let Some(item) = opf.nav_item() {
            let points = load_points(archive, item, NavKind::Modern)?;
            map.extend_from(&item.path, points);
        }
    }

    debug!(titles = map.len(), "章节标题解析完成");
    Ok(map)
}

/// 读取并解析导航文档；文档缺失或无法解析时返回空列表
fn load_points<S: EntrySource + ?Sized>(archive: &mut S, item: &ManifestItem, kind: NavKind) -> Result<Vec<NavPoint>> {
    let Some(content) = archive.read_entry_text(&item.path)? else {
        warn!(path = %item.path, ?kind, "导航文档不在归档中");
        return Ok(Vec::new());
    };

    let points = match kind {
        NavKind::Legacy => match Ncx::parse_xml(&content) {
            Ok(ncx) => ncx.nav_points,
            Err(e) => {
                warn!(path = %item.path, error = %e, "无法解析NCX文件");
                Vec::new()
            }
        },
        NavKind::Modern => parse_nav_document(&content),
    };

    debug!(path = %item.path, ?kind, entries = points.len(), "读取导航文档");
    Ok(points)
}

/// 读取整本书的目录（导航顺序）
pub fn table_of_contents<S: EntrySource + ?Sized>(archive: &mut S) -> Result<Vec<TocEntry>> {
    let opf = read_package(archive)?;
    Ok(resolve_titles_for(&opf, archive)?.into_entries())
}
