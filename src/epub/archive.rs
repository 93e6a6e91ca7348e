use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::epub::error::Result;

/// 归档条目的访问接口
///
/// 条目不存在时返回 `Ok(None)`，只有归档本身损坏或读取失败才返回错误。
pub trait EntrySource {
    /// 列出归档中所有条目的名称
    fn list_entries(&mut self) -> Result<Vec<String>>;

    /// 读取条目的原始字节
    fn read_entry_bytes(&mut self, path: &str) -> Result<Option<Vec<u8>>>;

    /// 获取条目解压后的字节长度
    fn entry_size(&mut self, path: &str) -> Result<Option<u64>>;

    /// 读取条目的文本内容（UTF-8，容忍非法字节）
    fn read_entry_text(&mut self, path: &str) -> Result<Option<String>> {
        Ok(self.read_entry_bytes(path)?.map(decode_text))
    }
}

/// 将条目字节解码为文本，去掉UTF-8 BOM，非法字节替换为U+FFFD
pub fn decode_text(bytes: Vec<u8>) -> String {
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes[..]);
    String::from_utf8_lossy(body).into_owned()
}

/// 基于zip的EPUB归档
///
/// 归档字节由调用方提供，只读借用于整个解析过程。
pub struct Epub<R: Read + Seek = Cursor<Vec<u8>>> {
    archive: ZipArchive<R>,
}

impl Epub<Cursor<Vec<u8>>> {
    /// 从内存中的归档字节创建Epub实例
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(Cursor::new(bytes.into()))
    }
}

impl Epub<File> {
    /// 从文件路径创建Epub实例
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> Epub<R> {
    /// 从任意可定位的读取器创建Epub实例
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Epub { archive })
    }

    /// 归档中的条目数
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// 归档是否为空
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> EntrySource for Epub<R> {
    fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut files = Vec::with_capacity(self.archive.len());

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            files.push(file.name().to_string());
        }

        Ok(files)
    }

    fn read_entry_bytes(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        match self.archive.by_name(path) {
            Ok(mut file) => {
                let mut buffer = Vec::new();
                file.read_to_end(&mut buffer)?;
                Ok(Some(buffer))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn entry_size(&mut self, path: &str) -> Result<Option<u64>> {
        match self.archive.by_name(path) {
            Ok(file) => Ok(Some(file.size())),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
