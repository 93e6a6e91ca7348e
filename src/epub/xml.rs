//! quick-xml 事件处理的小工具

use quick_xml::events::BytesText;
use quick_xml::events::attributes::Attribute;

/// 读取属性值，无法反转义时（如HTML专有实体）退回原始文本
pub(crate) fn attribute_value(attr: &Attribute) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

/// 读取文本节点，无法反转义时退回原始文本
pub(crate) fn text_value(text: &BytesText) -> String {
    match text.unescape() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}
