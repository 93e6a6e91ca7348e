use std::io::{Cursor, Write};

use bookscope::epub::{self, EntrySource};
use bookscope::{Correlation, UNTITLED_CHAPTER};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const PACKAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Night Walk</dc:title></metadata>
  <manifest>
    <item id="nav" href="nav/toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item href="text/chapter%201.xhtml" id="c1" media-type="application/xhtml+xml"/>
    <item id="c2" href="text/c2.xhtml" media-type="application/xhtml+xml"/>
    <item id="c3" href="text/c3.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="style.css" media-type="text/css"/>
  </manifest>
  <spine>
    <itemref idref="c1"/>
    <itemref idref="c2" linear="no"/>
    <itemref idref="c3"/>
  </spine>
</package>"#;

const NAV: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="../text/chapter%201.xhtml#start">Chapter One</a></li>
      <li><a href="../text/chapter%201.xhtml#later">Chapter One Again</a></li>
      <li><a href="../text/c2.xhtml">Interlude</a></li>
    </ol>
  </nav>
</body>
</html>"#;

const CHAPTER_ONE: &str = r#"<html><head><title>Lantern</title></head>
<body><h1>The Lantern</h1><p>A lantern glowed &amp; flickered.</p></body></html>"#;

const CHAPTER_TWO: &str = "<html><body><p>No light here.</p></body></html>";

fn build_book(include_third: bool) -> Vec<u8> {
    let mut entries = vec![
        ("mimetype", "application/epub+zip"),
        ("META-INF/container.xml", CONTAINER),
        ("OEBPS/content.opf", PACKAGE),
        ("OEBPS/nav/toc.xhtml", NAV),
        ("OEBPS/text/chapter 1.xhtml", CHAPTER_ONE),
        ("OEBPS/text/c2.xhtml", CHAPTER_TWO),
    ];
    if include_third {
        entries.push(("OEBPS/text/c3.xhtml", "<p>The end.</p>"));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_chapters_follow_spine_with_navigation_titles() {
    let chapters = bookscope::build_chapters(&build_book(false)).unwrap();

    let summary: Vec<(&str, &str, u64)> = chapters
        .iter()
        .map(|chapter| (chapter.title.as_str(), chapter.path.as_str(), chapter.size))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Chapter One", "OEBPS/text/chapter 1.xhtml", CHAPTER_ONE.len() as u64),
            ("Interlude", "OEBPS/text/c2.xhtml", CHAPTER_TWO.len() as u64),
            (UNTITLED_CHAPTER, "OEBPS/text/c3.xhtml", 0),
        ]
    );
}

#[test]
fn test_table_of_contents_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&build_book(true)).unwrap();
    file.flush().unwrap();

    let mut book = bookscope::open(file.path()).unwrap();
    assert!(book.list_entries().unwrap().contains(&"OEBPS/content.opf".to_string()));

    let toc = epub::table_of_contents(&mut book).unwrap();
    let titles: Vec<&str> = toc.iter().map(|entry| entry.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter One", "Interlude"]);

    let chapters = epub::build_chapters(&mut book).unwrap();
    assert_eq!(chapters[2].size, "<p>The end.</p>".len() as u64);
}

#[test]
fn test_search_correlates_markdown_offsets() {
    let matches = bookscope::search_in_book(&build_book(true), "LANTERN").unwrap();

    // 标题中的一次只出现在HTML中
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|hit| hit.chapter_title == "Chapter One"));
    assert!(matches[0].html_snippet.contains("<title>Lantern</title>"));

    assert_eq!(matches[0].markdown_offset, Some(6));
    assert_eq!(matches[0].correlation, Correlation::Uncertain);
    assert_eq!(matches[1].markdown_offset, Some(17));
    assert_eq!(matches[2].markdown_offset, None);
    assert_eq!(matches[2].correlation, Correlation::Missing);
}

#[test]
fn test_windowed_markdown_reading() {
    let mut book = bookscope::Epub::from_bytes(build_book(true)).unwrap();
    let markdown = epub::chapter_markdown(&mut book, "OEBPS/text/chapter 1.xhtml").unwrap();
    assert_eq!(markdown, "# The Lantern\n\nA lantern glowed & flickered.");

    let mut rebuilt = String::new();
    let mut offset = 0;
    loop {
        let part = bookscope::window_text(&markdown, offset, 8).unwrap();
        rebuilt.push_str(&part.slice);
        match part.next_offset {
            Some(next) => offset = next,
            None => break,
        }
    }
    assert_eq!(rebuilt, markdown);

    let total = markdown.chars().count();
    assert!(bookscope::window_text(&markdown, total, 8).unwrap_err().is_range());
}

#[test]
fn test_missing_container_is_a_format_error() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("mimetype", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let error = bookscope::build_chapters(&bytes).unwrap_err();
    assert!(error.is_format());
    assert!(error.to_string().contains("META-INF/container.xml"));
}

#[test]
fn test_serialized_shapes() {
    let chapters = bookscope::build_chapters(&build_book(true)).unwrap();
    let json = serde_json::to_value(&chapters[0]).unwrap();
    assert_eq!(json["title"], "Chapter One");
    assert_eq!(json["path"], "OEBPS/text/chapter 1.xhtml");

    let matches = bookscope::search_in_book(&build_book(true), "glowed").unwrap();
    let json = serde_json::to_value(&matches[0]).unwrap();
    assert_eq!(json["chapterTitle"], "Chapter One");
    assert_eq!(json["correlation"], "exact");
    assert!(json.get("markdownOffset").is_some());
}
