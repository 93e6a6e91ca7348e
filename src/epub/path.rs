//! 归档内部路径处理
//!
//! 归档内的路径一律以 `/` 分隔、区分大小写，且不以 `/` 开头。

use std::borrow::Cow;

/// 规范化归档内部路径
///
/// 按 `/` 切分，丢弃空段和 `.`，遇到 `..` 时弹出上一段（栈为空时忽略）。
/// 结果永远不会越过归档根目录。
///
/// ```rust
/// use bookscope::epub::path::normalize;
///
/// assert_eq!(normalize("a/b/../c"), "a/c");
/// assert_eq!(normalize("./x"), "x");
/// assert_eq!(normalize("a/../../b"), "b");
/// ```
pub fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(segment),
        }
    }
    stack.join("/")
}

/// 将相对引用解析到基准目录下并规范化
///
/// `base_dir` 为空表示归档根目录；是否以 `/` 结尾均可。
pub fn resolve(base_dir: &str, relative: &str) -> String {
    if base_dir.is_empty() {
        normalize(relative)
    } else {
        normalize(&format!("{}/{}", base_dir, relative))
    }
}

/// 获取文件所在目录，包含末尾的 `/`；位于根目录时返回空字符串
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..=pos],
        None => "",
    }
}

/// 去掉文档内锚点（`#...`）
pub fn strip_fragment(href: &str) -> &str {
    match href.find('#') {
        Some(pos) => &href[..pos],
        None => href,
    }
}

/// 解码百分号编码（如 `%20`），解码结果不是合法UTF-8时原样返回
pub fn percent_decode(href: &str) -> Cow<'_, str> {
    match percent_encoding::percent_decode_str(href).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(href),
    }
}
