//! 阅读配置模块
//!
//! 提供搜索片段宽度、分段长度与输出格式的配置，支持从YAML文件加载和生成。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::epub::error::{EpubError, Result};
use crate::epub::search::SearchOptions;
use crate::epub::window::DEFAULT_WINDOW_LENGTH;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "bookscope.yaml";

/// 命令行输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Text,
}

/// 阅读配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// 搜索结果片段在命中位置两侧保留的字符数
    pub snippet_window: usize,
    /// 分段读取时每段的字符数
    pub window_length: usize,
    /// 输出格式
    pub output: OutputFormat,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            snippet_window: SearchOptions::default().snippet_window,
            window_length: DEFAULT_WINDOW_LENGTH,
            output: OutputFormat::default(),
        }
    }
}

impl ReaderConfig {
    /// 加载配置
    ///
    /// 指定路径时文件必须存在且格式正确；未指定时使用当前目录下的
    /// `bookscope.yaml`，文件不存在则使用默认配置。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// 从指定文件读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件 {}: {}", path.display(), e)))?;

        let config: Self = serde_yml::from_str(&content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))?;
        debug!(path = %path.display(), "已加载配置文件");
        Ok(config)
    }

    /// 将配置写入文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml_content = serde_yml::to_string(self)
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# bookscope 配置文件\n# snippet_window: 搜索片段宽度；window_length: 分段长度；output: json | yaml | text\n\n{}",
            yaml_content
        );

        fs::write(path, content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))
    }

    /// 对应的搜索选项
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            snippet_window: self.snippet_window,
        }
    }
}
