// ==========================================
// 游泳赛事报名转换系统 - 领域模型层
// ==========================================
// 职责: 定义报名行、问题报告、基础类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod issue;
pub mod row;
pub mod types;

// 重导出核心类型
pub use issue::{Issue, IssueReport, RunSummary, TranslationRun};
pub use row::{Cell, DecodedRow, FieldValue, FieldWarning, Row, RowField};
pub use types::{EntryStatus, Gender, HeatStatus, IssueCategory, Severity, SwimTime};
