// ==========================================
// 游泳赛事报名转换系统 - 配置管理器
// ==========================================
// 职责: 配置文件加载、保存、默认值初始化
// 存储: JSON 文件（默认 <config_dir>/swim-reg/config.json）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::registration_config::RegistrationConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const APP_DIR: &str = "swim-reg";
pub const CONFIG_FILE: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 使用系统配置目录下的默认路径
    pub fn with_default_path() -> ConfigResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载配置
    ///
    /// # 返回
    /// - 文件不存在: 默认配置
    /// - 文件存在: 解析并校验后的配置
    pub fn load(&self) -> ConfigResult<RegistrationConfig> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "配置文件不存在，使用默认配置");
            return Ok(RegistrationConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: RegistrationConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %self.path.display(), "配置已加载");
        Ok(config)
    }

    /// 保存配置（校验通过后写入，自动创建目录）
    pub fn save(&self, config: &RegistrationConfig) -> ConfigResult<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;

        info!(path = %self.path.display(), "配置已保存");
        Ok(())
    }

    /// 写出默认配置
    ///
    /// # 返回
    /// - Ok(true): 已写入
    /// - Ok(false): 文件已存在且未强制覆盖
    pub fn init(&self, force: bool) -> ConfigResult<bool> {
        if self.path.exists() && !force {
            return Ok(false);
        }
        self.save(&RegistrationConfig::default())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::RowField;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("none.json"));
        assert_eq!(manager.load().unwrap(), RegistrationConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("nested").join("config.json"));

        let mut config = RegistrationConfig::default();
        config.exh = false;
        config.location.set(RowField::Heat, 12);
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        assert!(manager.init(false).unwrap());
        assert!(!manager.init(false).unwrap());
        assert!(manager.init(true).unwrap());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"points": {"enabled": true, "min": 900, "max": 100}}"#).unwrap();
        assert!(ConfigManager::new(path).load().is_err());
    }
}
