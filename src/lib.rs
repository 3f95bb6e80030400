// ==========================================
// 游泳赛事报名转换系统 - 核心库
// ==========================================
// 输入: LENEX 赛程文档 + 报名表（Excel / CSV）
// 输出: 带俱乐部、运动员、报名与分组的 LENEX 文档 + 问题报告
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 报名行、问题、基础类型
pub mod domain;

// LENEX 文档层 - 读写与强类型模型
pub mod lenex;

// 导入层 - 报名表读取与行解码
pub mod importer;

// 引擎层 - 转换规则与编排
pub mod engine;

// 配置层 - 转换配置与积分基准时间
pub mod config;

// 数据仓储层 - 转换历史
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{BaseTimeTable, ConfigManager, RegistrationConfig};
pub use domain::{Gender, Issue, IssueCategory, IssueReport, Row, RowField, RunSummary, SwimTime};
pub use engine::{Translation, Translator, TranslatorService};
pub use importer::{RegistrationImporter, TranslationRequest};
pub use lenex::{read_lenex, write_lenex, Lenex};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "游泳赛事报名转换系统";
