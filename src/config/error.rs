// ==========================================
// 游泳赛事报名转换系统 - 配置层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置格式错误: {0}")]
    Format(#[from] serde_json::Error),

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("无法确定配置目录")]
    NoConfigDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
