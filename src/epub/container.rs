use crate::epub::archive::EntrySource;
use crate::epub::error::{EpubError, Result};
use quick_xml::events::Event;
use crate::epub::xml::attribute_value;
use quick_xml::reader::Reader;

/// 容器描述文件在归档中的固定位置
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// 包文档的标准媒体类型
const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: Option<String>,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// 没有任何带 `full-path` 的rootfile时返回格式错误。
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            match event.map_err(|e| EpubError::format(CONTAINER_PATH, format!("XML解析错误: {}", e)))? {
                Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"rootfile" => {
                    let mut full_path = String::new();
                    let mut media_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"full-path" => {
                                full_path = attribute_value(&attr);
                            }
                            b"media-type" => {
                                media_type = Some(attribute_value(&attr));
                            }
                            _ => {}
                        }
                    }

                    if !full_path.is_empty() {
                        rootfiles.push(RootFile { full_path, media_type });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::format(CONTAINER_PATH, "没有找到任何声明full-path的rootfile条目"));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的包文档路径
    ///
    /// 优先返回媒体类型为 `application/oebps-package+xml` 的rootfile，否则返回第一个。
    pub fn package_path(&self) -> Option<&str> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type.as_deref() == Some(PACKAGE_MEDIA_TYPE))
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.as_str())
    }
}

/// 从容器描述文本中提取包文档路径
pub fn locate_package_document(container_text: &str) -> Result<String> {
    let container = Container::parse_xml(container_text)?;
    container
        .package_path()
        .map(str::to_string)
        .ok_or_else(|| EpubError::format(CONTAINER_PATH, "container.xml中没有找到有效的rootfile"))
}

/// 读取归档中的容器描述并返回包文档路径
pub fn read_package_path<S: EntrySource + ?Sized>(archive: &mut S) -> Result<String> {
    let container_text = archive
        .read_entry_text(CONTAINER_PATH)?
        .ok_or_else(|| EpubError::format(CONTAINER_PATH, "归档中缺少容器描述文件"))?;
    locate_package_document(&container_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_xml() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/toc.ncx" media-type="application/x-dtbncx+xml"/>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(container.package_path(), Some("OEBPS/content.opf"));
    }

    #[test]
    fn test_rootfile_without_media_type() {
        let container_xml = r#"<container><rootfiles><rootfile full-path="content.opf"/></rootfiles></container>"#;

        assert_eq!(locate_package_document(container_xml).unwrap(), "content.opf");
    }

    #[test]
    fn test_missing_full_path_is_format_error() {
        let container_xml = r#"<container><rootfiles><rootfile media-type="application/oebps-package+xml"/></rootfiles></container>"#;

        let err = locate_package_document(container_xml).unwrap_err();
        assert!(err.is_format());
        match err {
            EpubError::Format { path, .. } => assert_eq!(path, CONTAINER_PATH),
            other => panic!("期望格式错误, 实际: {}", other),
        }
    }

    #[test]
    fn test_missing_container_entry() {
        let bytes = crate::epub::archive::tests::build_archive(&[("mimetype", "application/epub+zip")]);
        let mut epub = crate::epub::archive::Epub::from_bytes(bytes).unwrap();

        let err = read_package_path(&mut epub).unwrap_err();
        assert!(err.is_format());
    }
}
