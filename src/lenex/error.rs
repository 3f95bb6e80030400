// ==========================================
// 游泳赛事报名转换系统 - LENEX 模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LenexError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .lef/.xml/.lxf）")]
    UnsupportedFormat(String),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML 解析失败: {0}")]
    Xml(String),

    #[error("LXF 压缩包错误: {0}")]
    Archive(String),

    #[error("文档结构错误: {0}")]
    Structure(String),

    #[error("缺少属性 <{element} {attribute}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("属性值无效 <{element} {attribute}=\"{value}\">")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
}

impl From<quick_xml::Error> for LenexError {
    fn from(err: quick_xml::Error) -> Self {
        LenexError::Xml(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for LenexError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        LenexError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for LenexError {
    fn from(err: zip::result::ZipError) -> Self {
        LenexError::Archive(err.to_string())
    }
}

pub type LenexResult<T> = Result<T, LenexError>;
