//! 清单模块
//!
//! 提供包文档中资源清单的结构定义：标识符到规范化归档路径的映射。

use std::collections::HashMap;

/// 旧式导航文档（NCX）的媒体类型
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 包文档中声明的原始引用
    pub href: String,
    /// 解码并规范化后的归档内部路径
    pub path: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|properties| properties.split_whitespace().any(|p| p == property))
    }

    /// 检查是否为EPUB3导航文档
    pub fn is_nav(&self) -> bool {
        self.has_property("nav")
    }

    /// 检查是否为NCX导航文档
    pub fn is_ncx(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(NCX_MEDIA_TYPE)
    }
}

/// 资源清单
///
/// 构建后不再修改；按ID查找，迭代时保持声明顺序。
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<ManifestItem>,
    index: HashMap<String, usize>,
}

impl Manifest {
    /// 创建空清单
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加清单项，重复的ID以后声明者为准
    pub(crate) fn insert(&mut self, item: ManifestItem) {
        match self.index.get(&item.id) {
            Some(&position) => self.items[position] = item,
            None => {
                self.index.insert(item.id.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// 根据ID获取清单项
    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    /// 根据ID获取规范化路径
    pub fn path_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|item| item.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按声明顺序迭代清单项
    pub fn iter(&self) -> impl Iterator<Item = &ManifestItem> {
        self.items.iter()
    }
}
