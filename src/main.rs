use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use bookscope::epub::config::DEFAULT_CONFIG_PATH;
use bookscope::epub::{
    EntrySource, build_chapters, chapter_html, chapter_markdown, search_in_book, table_of_contents, window,
};
use bookscope::{ContentWindow, Epub, EpubError, OutputFormat, ReaderConfig, SearchMatch};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 📚 BookScope - EPUB章节结构与内容检索工具
#[derive(Parser)]
#[command(name = "bookscope")]
#[command(about = "解析EPUB章节结构，分段读取HTML/Markdown内容并跨表示搜索")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认使用当前目录下的 bookscope.yaml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 输出格式，覆盖配置文件中的设置
    #[arg(short, long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出归档中的所有条目
    Entries { epub: PathBuf },

    /// 按阅读顺序列出章节
    Chapters { epub: PathBuf },

    /// 显示导航目录
    Toc { epub: PathBuf },

    /// 分段读取章节内容
    Content {
        epub: PathBuf,
        /// 章节在归档中的路径
        path: String,
        /// 读取转换后的Markdown而不是原始HTML
        #[arg(short, long)]
        markdown: bool,
        /// 起始字符偏移
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// 返回的字符数，默认取配置中的 window_length
        #[arg(long)]
        length: Option<usize>,
    },

    /// 全书搜索
    Search { epub: PathBuf, query: String },

    /// 将归档中的任意条目原样输出
    File { epub: PathBuf, path: String },

    /// 生成默认配置文件
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
}

type CliResult<T = ()> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> CliResult {
    let mut config = ReaderConfig::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.output = output;
    }

    match cli.command {
        Command::Entries { epub } => {
            let entries = Epub::from_path(&epub)?.list_entries()?;
            emit(config.output, &entries, || entries.join("\n"))
        }
        Command::Chapters { epub } => {
            let chapters = build_chapters(&mut Epub::from_path(&epub)?)?;
            emit(config.output, &chapters, || {
                chapters
                    .iter()
                    .enumerate()
                    .map(|(i, chapter)| format!("{}. {} ({}, {} 字节)", i + 1, chapter.title, chapter.path, chapter.size))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Toc { epub } => {
            let toc = table_of_contents(&mut Epub::from_path(&epub)?)?;
            emit(config.output, &toc, || {
                toc.iter()
                    .map(|entry| format!("{} -> {}", entry.title, entry.path))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Content {
            epub,
            path,
            markdown,
            offset,
            length,
        } => {
            let mut archive = Epub::from_path(&epub)?;
            let text = if markdown {
                chapter_markdown(&mut archive, &path)?
            } else {
                chapter_html(&mut archive, &path)?
            };
            let part = read_window(&text, offset, length.unwrap_or(config.window_length), markdown)?;
            emit(config.output, &part, || format!("{}\n\n{}", part.slice, part.section_info()))
        }
        Command::Search { epub, query } => {
            let matches = search_in_book(&mut Epub::from_path(&epub)?, &query, &config.search_options())?;
            emit(config.output, &matches, || format_matches(&query, &matches))
        }
        Command::File { epub, path } => {
            let bytes = Epub::from_path(&epub)?
                .read_entry_bytes(&path)?
                .ok_or_else(|| EpubError::format(&path, "文件不在归档中"))?;
            std::io::stdout().write_all(&bytes)?;
            Ok(())
        }
        Command::InitConfig { path } => {
            ReaderConfig::default().save(&path)?;
            eprintln!("✅ 已生成配置文件: {}", path.display());
            Ok(())
        }
    }
}

/// 分段读取，Markdown偏移越界时提示使用搜索结果中的Markdown偏移
fn read_window(text: &str, offset: usize, length: usize, markdown: bool) -> CliResult<ContentWindow> {
    match window(text, offset, length) {
        Err(e @ EpubError::OffsetOutOfRange { .. }) if markdown => Err(format!(
            "{}。Markdown内容的偏移与HTML不同，请使用搜索结果中的 markdownOffset",
            e
        )
        .into()),
        other => Ok(other?),
    }
}

fn format_matches(query: &str, matches: &[SearchMatch]) -> String {
    if matches.is_empty() {
        return format!("未找到 \"{}\"", query);
    }

    let mut lines = vec![format!("找到 {} 处 \"{}\":", matches.len(), query)];
    for (i, hit) in matches.iter().enumerate() {
        lines.push(format!("\n{}. {} ({})", i + 1, hit.chapter_title, hit.chapter_path));
        lines.push(format!("   HTML偏移: {}", hit.html_offset));
        lines.push(format!("   片段: {}", hit.html_snippet.replace('\n', " ")));
        match (hit.markdown_offset, &hit.markdown_snippet) {
            (Some(offset), Some(snippet)) => {
                lines.push(format!("   Markdown偏移: {} ({:?})", offset, hit.correlation));
                lines.push(format!("   Markdown片段: {}", snippet.replace('\n', " ")));
            }
            _ => lines.push("   Markdown偏移: 无".to_string()),
        }
    }
    lines.join("\n")
}

/// 按输出格式打印结果；文本格式由调用方渲染
fn emit<T: Serialize>(format: OutputFormat, value: &T, render_text: impl FnOnce() -> String) -> CliResult {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yml::to_string(value)?,
        OutputFormat::Text => render_text(),
    };
    println!("{}", rendered);
    Ok(())
}
