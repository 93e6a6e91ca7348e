//! NCX解析器模块
//!
//! 提供NCX（Navigation Control file for XML）文件的XML解析功能。
//! 只提取导航地图中的导航点，按文档顺序（嵌套导航点先父后子）展平。

use crate::epub::error::Result;
use crate::epub::nav::NavPoint;
use crate::epub::xml::{attribute_value, text_value};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// NCX文件解析结果
#[derive(Debug, Clone, Default)]
pub struct Ncx {
    /// 导航点列表（文档顺序）
    pub nav_points: Vec<NavPoint>,
}

impl Ncx {
    /// 解析NCX文件内容
    ///
    /// 没有 `content src` 的导航点被忽略。
    pub fn parse_xml(xml_content: &str) -> Result<Ncx> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = false;

        // 每个导航点在开始标签处占位，保证父节点排在子节点之前
        let mut slots: Vec<NavPoint> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        let mut buf = Vec::new();
        let mut in_nav_map = false;
        let mut in_label = false;
        let mut in_text = false;
        let mut text_content = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"navMap" => in_nav_map = true,
                    b"navPoint" if in_nav_map => {
                        open.push(slots.len());
                        slots.push(NavPoint::default());
                    }
                    b"navLabel" if !open.is_empty() => in_label = true,
                    b"text" if in_label => {
                        in_text = true;
                        text_content.clear();
                    }
                    b"content" => Self::set_src(e, &open, &mut slots),
                    _ => {}
                },
                Event::Empty(ref e) => {
                    if e.local_name().as_ref() == b"content" {
                        Self::set_src(e, &open, &mut slots);
                    }
                }
                Event::Text(ref e) if in_text => {
                    text_content.push_str(&text_value(e));
                }
                Event::CData(ref e) if in_text => {
                    text_content.push_str(&String::from_utf8_lossy(e));
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"navMap" => in_nav_map = false,
                    b"navPoint" => {
                        open.pop();
                    }
                    b"navLabel" => in_label = false,
                    b"text" if in_text => {
                        in_text = false;
                        if let Some(&current) = open.last() {
                            let point = &mut slots[current];
                            if point.label.is_empty() {
                                point.label = text_content.trim().to_string();
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let nav_points = slots.into_iter().filter(|point| !point.src.is_empty()).collect();
        Ok(Ncx { nav_points })
    }

    /// 为当前最内层导航点记录content的src属性（只记录第一个）
    fn set_src(e: &quick_xml::events::BytesStart, open: &[usize], slots: &mut [NavPoint]) {
        let Some(&current) = open.last() else {
            return;
        };
        if !slots[current].src.is_empty() {
            return;
        }
        if let Some(attr) = e
            .attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == b"src")
        {
            slots[current].src = attribute_value(&attr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_nav_points() {
        let ncx_xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="id"/></head>
  <docTitle><text>Book Title</text></docTitle>
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>Part One</text></navLabel>
      <content src="part1.xhtml"/>
      <navPoint id="p1-1" playOrder="2">
        <navLabel><text> Chapter &amp; One </text></navLabel>
        <content src="ch1.xhtml#start"/>
      </navPoint>
    </navPoint>
    <navPoint id="p2" playOrder="3">
      <navLabel><text>Chapter Two</text></navLabel>
      <content src="ch2.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

        let ncx = Ncx::parse_xml(ncx_xml).unwrap();
        let pairs: Vec<(&str, &str)> = ncx
            .nav_points
            .iter()
            .map(|point| (point.label.as_str(), point.src.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("Part One", "part1.xhtml"),
                ("Chapter & One", "ch1.xhtml#start"),
                ("Chapter Two", "ch2.xhtml"),
            ]
        );
    }

    #[test]
    fn test_doc_title_is_not_a_nav_point() {
        let ncx_xml = r#"<ncx><docTitle><text>Title</text></docTitle><navMap/></ncx>"#;

        let ncx = Ncx::parse_xml(ncx_xml).unwrap();
        assert!(ncx.nav_points.is_empty());
    }

    #[test]
    fn test_unclosed_comment_is_an_error() {
        let ncx_xml = r#"<ncx><navMap><navPoint><content src="a.xhtml"/></navPoint><!-- never closed"#;
        assert!(Ncx::parse_xml(ncx_xml).is_err());
    }

    #[test]
    fn test_nav_point_without_content_is_dropped() {
        let ncx_xml = r#"<ncx><navMap>
<navPoint><navLabel><text>Orphan</text></navLabel></navPoint>
<navPoint><navLabel><text>Kept</text></navLabel><content src="kept.xhtml"/></navPoint>
</navMap></ncx>"#;

        let ncx = Ncx::parse_xml(ncx_xml).unwrap();
        assert_eq!(ncx.nav_points.len(), 1);
        assert_eq!(ncx.nav_points[0].label, "Kept");
    }
}
