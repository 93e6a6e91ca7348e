use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// 书籍解析与内容访问的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// 容器描述、包文档或其引用的文件缺失或结构无法识别
    #[error("格式错误 ({path}): {reason}")]
    Format { path: String, reason: String },

    /// 请求的偏移量超出了非空文本的末尾
    #[error("偏移量 {offset} 超出内容末尾 (总长度: {total})")]
    OffsetOutOfRange { offset: usize, total: usize },

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 构造带有出错路径的格式错误
    pub fn format(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EpubError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// 是否为格式错误
    pub fn is_format(&self) -> bool {
        matches!(self, EpubError::Format { .. })
    }

    /// 是否为范围错误
    pub fn is_range(&self) -> bool {
        matches!(self, EpubError::OffsetOutOfRange { .. })
    }
}
