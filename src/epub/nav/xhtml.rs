//! EPUB3导航文档解析
//!
//! 导航文档是普通的XHTML，使用scraper容错解析，提取所有带 `href` 的超链接。

use crate::epub::nav::NavPoint;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("静态选择器必须合法"));

/// 按文档顺序提取导航文档中的 `(链接文本, href)`
///
/// 链接文本去掉所有嵌套标签，只保留文字并去除首尾空白。
pub fn parse_nav_document(html: &str) -> Vec<NavPoint> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let label: String = anchor.text().collect();
            Some(NavPoint {
                label: label.trim().to_string(),
                src: href.to_string(),
            })
        })
        .collect()
}
