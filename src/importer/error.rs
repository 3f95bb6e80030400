// ==========================================
// 游泳赛事报名转换系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: RowError 仅影响当前行；ImportError 终止整次转换
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::row::RowField;
use crate::domain::types::IssueCategory;
use crate::lenex::error::LenexError;
use thiserror::Error;

// ==========================================
// RowError - 行级错误（跳过当前行，转换继续）
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("There is no gender for the value of {0}")]
    IncorrectGender(String),

    #[error("No distances found by parameters {gender}, {stroke}, {distance}")]
    IncorrectDistance {
        gender: String,
        stroke: String,
        distance: u32,
    },

    #[error("The EXH is disabled and the age is not appropriate (age {age}, allowed {allowed})")]
    IncorrectAge { age: i32, allowed: String },

    #[error("Unknown stroke alias: {0}")]
    UnknownStroke(String),

    #[error("Invalid value for {field}: {value} ({message})")]
    InvalidField {
        field: RowField,
        value: String,
        message: String,
    },

    #[error("Birthday {value} does not match format {format}")]
    InvalidBirthday { value: String, format: String },

    #[error("Required field {0} is missing")]
    MissingField(RowField),
}

impl RowError {
    /// 错误类型名（用于问题报告前缀）
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::IncorrectGender(_) => "IncorrectGender",
            RowError::IncorrectDistance { .. } => "IncorrectDistance",
            RowError::IncorrectAge { .. } => "IncorrectAge",
            RowError::UnknownStroke(_) => "UnknownStroke",
            RowError::InvalidField { .. } => "InvalidField",
            RowError::InvalidBirthday { .. } => "InvalidBirthday",
            RowError::MissingField(_) => "MissingField",
        }
    }

    pub fn category(&self) -> IssueCategory {
        match self {
            RowError::IncorrectDistance { .. } => IssueCategory::IncorrectDistance,
            RowError::IncorrectAge { .. } => IssueCategory::AgeExh,
            _ => IssueCategory::ParseError,
        }
    }

    /// 产生该错误的组件已记录问题，编排器不再重复记录
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            RowError::IncorrectDistance { .. } | RowError::IncorrectAge { .. }
        )
    }
}

pub type RowResult<T> = Result<T, RowError>;

// ==========================================
// ImportError - 转换级错误
// ==========================================
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作表为空: {0}")]
    EmptySheet(String),

    // ===== 赛程文档错误 =====
    #[error("赛程文档错误: {0}")]
    Lenex(#[from] LenexError),

    #[error("赛程文档中没有赛事 (MEET)")]
    NoMeet,

    // ===== 配置错误 =====
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ===== 通用错误 =====
    #[error("后台任务失败: {0}")]
    TaskFailed(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
