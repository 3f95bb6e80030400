// ==========================================
// 游泳赛事报名转换系统 - 转换配置
// ==========================================
// 职责: 枚举全部可识别选项，提供默认值，加载时一次性校验
// 存储: JSON 文件（见 ConfigManager）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::row::RowField;
use crate::domain::types::Gender;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ==========================================
// ColumnMapping - 字段 → 列号（从 0 开始，-1 表示缺失）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(pub BTreeMap<RowField, i32>);

impl ColumnMapping {
    pub const ABSENT: i32 = -1;

    /// 未配置的字段视为缺失
    pub fn column(&self, field: RowField) -> i32 {
        self.0.get(&field).copied().unwrap_or(Self::ABSENT)
    }

    pub fn set(&mut self, field: RowField, column: i32) {
        self.0.insert(field, column);
    }

    pub fn all_absent() -> Self {
        Self(RowField::ALL.iter().map(|f| (*f, Self::ABSENT)).collect())
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let mut mapping = Self::all_absent();
        for (field, column) in [
            (RowField::Lastname, 0),
            (RowField::Firstname, 1),
            (RowField::Middlename, 2),
            (RowField::Gender, 3),
            (RowField::Birthday, 4),
            (RowField::Club, 5),
            (RowField::License, 6),
            (RowField::Stroke, 7),
            (RowField::Distance, 8),
            (RowField::Entrytime, 9),
        ] {
            mapping.set(field, column);
        }
        mapping
    }
}

// ==========================================
// PointsPolicy - 积分区间（两端均为开区间）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
    /// 基准时间数据集覆盖路径（缺省使用内置版本）
    pub base_times: Option<PathBuf>,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 0.0,
            max: 1000.0,
            base_times: None,
        }
    }
}

// ==========================================
// RegistrationConfig - 转换配置全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub location: ColumnMapping,
    pub auto_location: BTreeMap<String, RowField>,
    /// 运动等级替换表（按文件中的顺序依次执行）
    #[serde(with = "ordered_pairs")]
    pub replacement: Vec<(String, String)>,
    pub licenses: Vec<String>,
    pub reversed_styles: BTreeMap<String, String>,
    pub points: PointsPolicy,
    pub birthday: String, // strftime 格式
    pub exh: bool,
    pub debug: bool,

    // ===== 扩展选项 =====
    pub presence_column: usize, // 为空则跳过该行
    pub genders: BTreeMap<String, Gender>, // 性别词表扩展
    pub locale: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        let owned = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect()
        };

        Self {
            location: ColumnMapping::default(),
            auto_location: [
                ("фамилия", RowField::Lastname),
                ("имя", RowField::Firstname),
                ("отчество", RowField::Middlename),
                ("пол", RowField::Gender),
                ("дата рождения", RowField::Birthday),
                ("команда", RowField::Club),
                ("клуб", RowField::Club),
                ("разряд", RowField::License),
                ("стиль", RowField::Stroke),
                ("дистанция", RowField::Distance),
                ("заявочное время", RowField::Entrytime),
                ("время", RowField::Entrytime),
                ("дорожка", RowField::Lane),
                ("заплыв", RowField::Heat),
                ("класс", RowField::Handicap),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            replacement: owned(&[(" ", ""), ("юн", "ю"), ("3", "III"), ("2", "II"), ("1", "I")]),
            licenses: ["змс", "мсмк", "мс", "кмс", "I", "II", "III", "Iю", "IIю", "IIIю"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            reversed_styles: owned(&[
                ("вольный стиль", "FREE"),
                ("кроль", "FREE"),
                ("в/с", "FREE"),
                ("на спине", "BACK"),
                ("брасс", "BREAST"),
                ("баттерфляй", "FLY"),
                ("дельфин", "FLY"),
                ("комплексное плавание", "MEDLEY"),
                ("к/п", "MEDLEY"),
                ("free", "FREE"),
                ("back", "BACK"),
                ("breast", "BREAST"),
                ("fly", "FLY"),
                ("medley", "MEDLEY"),
            ])
            .into_iter()
            .collect(),
            points: PointsPolicy::default(),
            birthday: "%d.%m.%Y".to_string(),
            exh: true,
            debug: false,
            presence_column: 1,
            genders: BTreeMap::new(),
            locale: "ru".to_string(),
        }
    }
}

impl RegistrationConfig {
    /// 加载后一次性校验
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, column) in &self.location.0 {
            if *column < ColumnMapping::ABSENT {
                return Err(invalid(
                    &format!("location.{}", field),
                    format!("列号必须 >= -1，实际 {}", column),
                ));
            }
        }

        if self.points.min >= self.points.max {
            return Err(invalid(
                "points",
                format!("min ({}) 必须小于 max ({})", self.points.min, self.points.max),
            ));
        }

        if self.birthday.trim().is_empty() {
            return Err(invalid("birthday", "日期格式不能为空".to_string()));
        }

        if let Some((alias, _)) = self
            .reversed_styles
            .iter()
            .find(|(_, canonical)| canonical.trim().is_empty())
        {
            return Err(invalid(
                &format!("reversed_styles.{}", alias),
                "标准泳姿代码不能为空".to_string(),
            ));
        }

        if self.replacement.iter().any(|(from, _)| from.is_empty()) {
            return Err(invalid("replacement", "替换源字符串不能为空".to_string()));
        }

        Ok(())
    }

    /// 泳姿别名 → 标准代码（忽略大小写与首尾空白）
    pub fn canonical_stroke(&self, alias: &str) -> Option<&str> {
        let key = alias.trim().to_lowercase();
        self.reversed_styles
            .iter()
            .find(|(k, _)| k.trim().to_lowercase() == key)
            .map(|(_, v)| v.as_str())
    }

    /// 配置快照（随转换历史保存）
    pub fn snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

// ==========================================
// ordered_pairs - 保序的 JSON 对象 <-> Vec<(K, V)>
// ==========================================
mod ordered_pairs {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (k, v) in pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "字符串到字符串的对象")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    pairs.push((k, v));
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RegistrationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.exh);
        assert_eq!(config.presence_column, 1);
        assert_eq!(config.location.column(RowField::Heat), -1);
    }

    #[test]
    fn test_replacement_order_preserved() {
        let json = r#"{"replacement": {"z": "1", "a": "2", "m": "3"}}"#;
        let config: RegistrationConfig = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = config.replacement.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let back = serde_json::to_string(&config).unwrap();
        assert!(back.find("\"z\"").unwrap() < back.find("\"a\"").unwrap());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"exh": false, "location": {"lastname": 3}}"#;
        let config: RegistrationConfig = serde_json::from_str(json).unwrap();
        assert!(!config.exh);
        assert_eq!(config.location.column(RowField::Lastname), 3);
        assert_eq!(config.location.column(RowField::Firstname), -1);
        assert_eq!(config.birthday, "%d.%m.%Y");
    }

    #[test]
    fn test_invalid_points_band() {
        let mut config = RegistrationConfig::default();
        config.points.min = 500.0;
        config.points.max = 400.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_column() {
        let mut config = RegistrationConfig::default();
        config.location.set(RowField::Club, -5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_canonical_stroke_case_insensitive() {
        let config = RegistrationConfig::default();
        assert_eq!(config.canonical_stroke("  Брасс "), Some("BREAST"));
        assert_eq!(config.canonical_stroke("плыть"), None);
    }
}
