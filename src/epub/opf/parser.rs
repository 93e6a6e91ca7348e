//! OPF解析器模块
//!
//! 提供包文档（OPF）的XML解析功能：清单与脊柱。

use crate::epub::archive::EntrySource;
use crate::epub::container::read_package_path;
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{
    manifest::{Manifest, ManifestItem},
    spine::SpineItem,
};
use crate::epub::path;
use crate::epub::xml::attribute_value;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

/// 包文档的解析结果
#[derive(Debug, Clone)]
pub struct Opf {
    /// 包文档在归档中的路径
    pub path: String,
    /// 包文档所在目录（含末尾 `/`，根目录为空）
    pub package_dir: String,
    /// EPUB版本
    pub version: String,
    /// 清单项(文件列表)
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用
    pub spine_toc: Option<String>,
}

#[derive(PartialEq)]
enum Section {
    None,
    Manifest,
    Spine,
}

impl Opf {
    /// 解析包文档内容
    ///
    /// # 参数
    /// * `xml_content` - 包文档的XML内容
    /// * `package_dir` - 包文档所在目录，清单中的引用相对于该目录解析
    pub fn parse_xml(xml_content: &str, package_dir: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = false;

        let mut version = String::new();
        let mut manifest = Manifest::new();
        let mut spine = Vec::new();
        let mut spine_toc = None;

        let mut buf = Vec::new();
        let mut section = Section::None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"package" => {
                        version = Self::attribute(e, b"version").unwrap_or_default();
                    }
                    b"manifest" => section = Section::Manifest,
                    b"spine" => {
                        section = Section::Spine;
                        spine_toc = Self::attribute(e, b"toc");
                    }
                    b"item" if section == Section::Manifest => {
                        if let Some(item) = Self::parse_manifest_item(e, package_dir) {
                            manifest.insert(item);
                        }
                    }
                    b"itemref" if section == Section::Spine => {
                        if let Some(item) = Self::parse_spine_item(e) {
                            spine.push(item);
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => {
                    if matches!(e.local_name().as_ref(), b"manifest" | b"spine") {
                        section = Section::None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Opf {
            path: String::new(),
            package_dir: package_dir.to_string(),
            version,
            manifest,
            spine,
            spine_toc,
        })
    }

    /// 读取元素上指定名称的属性
    fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == name)
            .map(|attr| attribute_value(&attr))
    }

    /// 解析清单项
    ///
    /// 属性顺序无关；缺少 `id` 或 `href` 的项目被忽略。
    fn parse_manifest_item(e: &BytesStart, package_dir: &str) -> Option<ManifestItem> {
        let mut id = String::new();
        let mut href = String::new();
        let mut media_type = String::new();
        let mut properties = None;

        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"id" => id = attribute_value(&attr),
                b"href" => href = attribute_value(&attr),
                b"media-type" => media_type = attribute_value(&attr),
                b"properties" => properties = Some(attribute_value(&attr)),
                _ => {}
            }
        }

        if id.is_empty() || href.is_empty() {
            return None;
        }

        let path = path::resolve(package_dir, &path::percent_decode(&href));
        Some(ManifestItem {
            id,
            href,
            path,
            media_type,
            properties,
        })
    }

    /// 解析脊柱项
    fn parse_spine_item(e: &BytesStart) -> Option<SpineItem> {
        let mut spine_item = SpineItem::new(String::new());

        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"idref" => spine_item.idref = attribute_value(&attr),
                b"linear" => spine_item.linear = attribute_value(&attr) != "no",
                _ => {}
            }
        }

        (!spine_item.idref.is_empty()).then_some(spine_item)
    }

    /// 脊柱中引用的ID序列（阅读顺序）
    pub fn spine_ids(&self) -> Vec<String> {
        self.spine.iter().map(|item| item.idref.clone()).collect()
    }

    /// 将脊柱解析为归档路径序列
    ///
    /// 清单中不存在的ID被跳过，不视为错误。
    pub fn spine_paths(&self) -> Vec<String> {
        self.spine
            .iter()
            .filter_map(|spine_item| match self.manifest.path_of(&spine_item.idref) {
                Some(path) => Some(path.to_string()),
                None => {
                    warn!(idref = %spine_item.idref, "脊柱引用的ID不在清单中，已跳过");
                    None
                }
            })
            .collect()
    }

    /// 获取NCX导航文档清单项，优先使用脊柱 `toc` 属性引用的项
    pub fn ncx_item(&self) -> Option<&ManifestItem> {
        self.spine_toc
            .as_deref()
            .and_then(|id| self.manifest.get(id))
            .filter(|item| item.is_ncx())
            .or_else(|| self.manifest.iter().find(|item| item.is_ncx()))
    }

    /// 获取EPUB3导航文档清单项
    pub fn nav_item(&self) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.is_nav())
    }
}

/// 解析包文档，返回清单与脊柱ID序列
pub fn parse_manifest_and_spine(package_doc_text: &str, package_dir: &str) -> Result<(Manifest, Vec<String>)> {
    let opf = Opf::parse_xml(package_doc_text, package_dir)?;
    let spine_ids = opf.spine_ids();
    Ok((opf.manifest, spine_ids))
}

/// 从归档中定位并解析包文档
///
/// 容器描述缺失、包文档缺失或无法解析时返回格式错误。
pub fn read_package<S: EntrySource + ?Sized>(archive: &mut S) -> Result<Opf> {
    let package_path = read_package_path(archive)?;
    let package_dir = path::parent_dir(&package_path).to_string();

    let content = archive
        .read_entry_text(&package_path)?
        .ok_or_else(|| EpubError::format(&package_path, "在归档中找不到包文档"))?;

    let mut opf = Opf::parse_xml(&content, &package_dir).map_err(|e| match e {
        EpubError::XmlError(xml_err) => EpubError::format(&package_path, format!("XML解析错误: {}", xml_err)),
        other => other,
    })?;
    opf.path = package_path;

    if opf.manifest.is_empty() && !opf.spine.is_empty() {
        return Err(EpubError::format(&opf.path, "清单为空，脊柱引用无法解析"));
    }

    debug!(
        package = %opf.path,
        manifest = opf.manifest.len(),
        spine = opf.spine.len(),
        "包文档解析完成"
    );

    Ok(opf)
}
