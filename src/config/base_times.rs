// ==========================================
// 游泳赛事报名转换系统 - 积分基准时间数据集
// ==========================================
// 数据: data/base_times.json（带版本号，可由配置覆盖路径）
// 结构: course → gender → stroke → distance → 基准秒数
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::Gender;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const EMBEDDED: &str = include_str!("../../data/base_times.json");

type StrokeTable = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Deserialize)]
pub struct BaseTimeTable {
    pub version: String,
    #[serde(default)]
    pub source: Option<String>,
    courses: BTreeMap<String, BTreeMap<String, StrokeTable>>,
}

impl BaseTimeTable {
    /// 内置数据集
    pub fn embedded() -> ConfigResult<Self> {
        Self::from_json(EMBEDDED)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let table: BaseTimeTable = serde_json::from_str(json)?;
        table.check()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 优先使用覆盖路径，否则使用内置数据集
    pub fn load(override_path: Option<&Path>) -> ConfigResult<Self> {
        let table = match override_path {
            Some(path) => Self::from_path(path)?,
            None => Self::embedded()?,
        };
        info!(version = %table.version, entries = table.len(), "积分基准时间已加载");
        Ok(table)
    }

    fn check(&self) -> ConfigResult<()> {
        for (course, genders) in &self.courses {
            for (gender, strokes) in genders {
                for (stroke, distances) in strokes {
                    for (distance, seconds) in distances {
                        if distance.parse::<u32>().is_err() || *seconds <= 0.0 {
                            return Err(ConfigError::InvalidValue {
                                key: format!("{}.{}.{}.{}", course, gender, stroke, distance),
                                message: format!("无效的基准时间 {}", seconds),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// 基准时间（秒）
    pub fn get(&self, course: &str, gender: Gender, distance: u32, stroke: &str) -> Option<f64> {
        self.courses
            .get(course)?
            .get(gender.code())?
            .get(stroke)?
            .get(&distance.to_string())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.courses
            .values()
            .flat_map(|g| g.values())
            .flat_map(|s| s.values())
            .map(|d| d.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_dataset() {
        let table = BaseTimeTable::embedded().unwrap();
        assert_eq!(table.get("LCM", Gender::Male, 50, "FREE"), Some(20.91));
        assert_eq!(table.get("SCM", Gender::Female, 100, "MEDLEY"), Some(56.51));
        assert_eq!(table.get("LCM", Gender::Male, 100, "MEDLEY"), None);
        assert_eq!(table.len(), 70);
    }

    #[test]
    fn test_rejects_non_positive_time() {
        let json = r#"{"version": "x", "courses": {"LCM": {"M": {"FREE": {"50": 0}}}}}"#;
        assert!(BaseTimeTable::from_json(json).is_err());
    }
}
