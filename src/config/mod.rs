// ==========================================
// 游泳赛事报名转换系统 - 配置层
// ==========================================
// 职责: 转换配置的定义、校验、文件存取；积分基准时间数据集
// ==========================================

pub mod base_times;
pub mod config_manager;
pub mod error;
pub mod registration_config;

pub use base_times::BaseTimeTable;
pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use registration_config::{ColumnMapping, PointsPolicy, RegistrationConfig};
