//! HTML到Markdown的转换
//!
//! 按固定顺序执行一组结构化替换规则，不构建DOM。
//! 未被前面规则处理的标签在最后统一剥离，标签内的文字保留。

use once_cell::sync::Lazy;
use regex::Regex;

/// 一条替换规则：模式与替换模板
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("静态正则表达式必须合法"),
            replacement,
        }
    }

    /// 成对标签 `<tag ...>inner</tag>`，标签名按单词边界匹配
    fn paired(tag: &str, replacement: &'static str) -> Self {
        Self::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}\s*>"), replacement)
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

static BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").expect("静态正则表达式必须合法"));

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // 不可见区域
        Rule::paired("head", ""),
        Rule::paired("script", ""),
        Rule::paired("style", ""),
        // 标题
        Rule::paired("h1", "# ${1}\n\n"),
        Rule::paired("h2", "## ${1}\n\n"),
        Rule::paired("h3", "### ${1}\n\n"),
        Rule::paired("h4", "#### ${1}\n\n"),
        Rule::paired("h5", "##### ${1}\n\n"),
        Rule::paired("h6", "###### ${1}\n\n"),
        // 段落与换行
        Rule::paired("p", "${1}\n\n"),
        Rule::new(r"(?i)<br\b[^>]*>", "\n"),
        // 强调
        Rule::paired("b", "**${1}**"),
        Rule::paired("strong", "**${1}**"),
        Rule::paired("i", "*${1}*"),
        Rule::paired("em", "*${1}*"),
        // 列表
        Rule::paired("li", "* ${1}\n"),
        Rule::paired("ul", "${1}\n"),
        Rule::paired("ol", "${1}\n"),
        // 链接
        Rule::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#, "[${2}](${1})"),
        // 图片：src在前、alt在前、只有src
        Rule::new(
            r#"(?is)<img\b[^>]*?\ssrc\s*=\s*["']([^"']*)["'][^>]*?\salt\s*=\s*["']([^"']*)["'][^>]*>"#,
            "![${2}](${1})",
        ),
        Rule::new(
            r#"(?is)<img\b[^>]*?\salt\s*=\s*["']([^"']*)["'][^>]*?\ssrc\s*=\s*["']([^"']*)["'][^>]*>"#,
            "![${1}](${2})",
        ),
        Rule::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*["']([^"']*)["'][^>]*>"#, "![](${1})"),
        // 剩余标签
        Rule::new(r"<[^>]+>", ""),
    ]
});

/// 依次解码的字符实体；前一步的结果可以被后一步继续解码
const ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
];

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("静态正则表达式必须合法"));

/// 将HTML转换为Markdown风格的纯文本
///
/// 转换是确定性的，不会失败；空输入得到空输出。
///
/// ```
/// use bookscope::epub::markdown::html_to_markdown;
///
/// let text = html_to_markdown("<h1>Hi</h1><p>It&apos;s <b>ok</b>.</p>");
/// assert_eq!(text, "# Hi\n\nIt's **ok**.");
/// ```
pub fn html_to_markdown(html: &str) -> String {
    let mut text = match BODY.captures(html) {
        Some(captures) => captures[1].to_string(),
        None => html.to_string(),
    };

    for rule in RULES.iter() {
        text = rule.apply(&text);
    }

    let text = decode_entities(&text);
    tidy_whitespace(&text)
}

/// 按固定顺序解码几个常见的字符实体
fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |decoded, &(entity, replacement)| decoded.replace(entity, replacement))
}

/// 去掉每行首尾空白，连续三个以上换行压缩为两个，再整体去掉首尾空白
fn tidy_whitespace(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let joined = lines.join("\n");
    BLANK_RUN.replace_all(&joined, "\n\n").trim().to_string()
}
