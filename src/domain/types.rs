// ==========================================
// 游泳赛事报名转换系统 - 领域类型定义
// ==========================================
// 依据: LENEX 3.0 数据格式 - 性别/泳姿/状态代码
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 性别 (Gender)
// ==========================================
// LENEX 代码: M / F
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// LENEX 性别代码
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "m" => Ok(Gender::Male),
            "F" | "f" => Ok(Gender::Female),
            other => Err(format!("未知性别代码: {}", other)),
        }
    }
}

// ==========================================
// 报名状态 (Entry Status)
// ==========================================
// Normal 在 LENEX 中不输出 status 属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Normal,
    Exh, // 表演赛（超出年龄组）
}

impl EntryStatus {
    pub fn lenex_code(&self) -> Option<&'static str> {
        match self {
            EntryStatus::Normal => None,
            EntryStatus::Exh => Some("EXH"),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Normal => write!(f, "normal"),
            EntryStatus::Exh => write!(f, "EXH"),
        }
    }
}

// ==========================================
// 分组状态 (Heat Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatStatus {
    Seeded,
}

impl HeatStatus {
    pub fn lenex_code(&self) -> &'static str {
        match self {
            HeatStatus::Seeded => "SEEDED",
        }
    }
}

// ==========================================
// 成绩时间 (Swim Time)
// ==========================================
// 以百分之一秒为单位存储；ZERO 表示"无报名成绩"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SwimTime {
    hundredths: u64,
}

impl SwimTime {
    pub const ZERO: SwimTime = SwimTime { hundredths: 0 };

    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, hundredths: u64) -> Self {
        Self {
            hundredths: ((hours * 60 + minutes) * 60 + seconds) * 100 + hundredths,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hundredths == 0
    }

    /// 总秒数（含小数）
    pub fn as_seconds(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    pub fn hours(&self) -> u64 {
        self.hundredths / 360_000
    }

    pub fn minutes(&self) -> u64 {
        (self.hundredths / 6_000) % 60
    }

    pub fn seconds(&self) -> u64 {
        (self.hundredths / 100) % 60
    }

    pub fn fraction(&self) -> u64 {
        self.hundredths % 100
    }

    /// 解析 LENEX 时间格式 "HH:MM:SS.hh"，"NT" 视为零时间
    pub fn parse_lenex(value: &str) -> Option<SwimTime> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("NT") {
            return Some(SwimTime::ZERO);
        }

        let (clock, fraction) = value.split_once('.')?;
        let mut parts = clock.split(':');
        let hours = parts.next()?.parse::<u64>().ok()?;
        let minutes = parts.next()?.parse::<u64>().ok()?;
        let seconds = parts.next()?.parse::<u64>().ok()?;
        if parts.next().is_some() || minutes > 59 || seconds > 59 || fraction.len() != 2 {
            return None;
        }
        let hundredths = fraction.parse::<u64>().ok()?;

        Some(SwimTime::from_parts(hours, minutes, seconds, hundredths))
    }

    /// LENEX 输出格式；零时间输出 "NT"
    pub fn to_lenex(&self) -> String {
        if self.is_zero() {
            "NT".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for SwimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.fraction()
        )
    }
}

// ==========================================
// 问题分类 (Issue Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    PointsPolicy,      // 积分政策违规
    IncorrectDistance, // 赛程中无对应项目
    AgeExh,            // 年龄不符（EXH）
    DuplicateEntry,    // 重复报名
    ParseError,        // 行解析失败
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::PointsPolicy => "points_policy",
            IssueCategory::IncorrectDistance => "incorrect_distance",
            IssueCategory::AgeExh => "age_exh",
            IssueCategory::DuplicateEntry => "duplicate_entry",
            IssueCategory::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points_policy" => Ok(IssueCategory::PointsPolicy),
            "incorrect_distance" => Ok(IssueCategory::IncorrectDistance),
            "age_exh" => Ok(IssueCategory::AgeExh),
            "duplicate_entry" => Ok(IssueCategory::DuplicateEntry),
            "parse_error" => Ok(IssueCategory::ParseError),
            other => Err(format!("未知问题分类: {}", other)),
        }
    }
}

// ==========================================
// 严重级别 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("未知严重级别: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swim_time_parts() {
        let t = SwimTime::from_parts(1, 2, 3, 45);
        assert_eq!(t.hours(), 1);
        assert_eq!(t.minutes(), 2);
        assert_eq!(t.seconds(), 3);
        assert_eq!(t.fraction(), 45);
        assert_eq!(t.to_string(), "01:02:03.45");
    }

    #[test]
    fn test_swim_time_lenex_format() {
        assert_eq!(SwimTime::parse_lenex("NT"), Some(SwimTime::ZERO));
        assert_eq!(
            SwimTime::parse_lenex("00:01:05.30"),
            Some(SwimTime::from_parts(0, 1, 5, 30))
        );
        assert_eq!(SwimTime::parse_lenex("00:61:05.30"), None);
        assert_eq!(SwimTime::ZERO.to_lenex(), "NT");
    }

    #[test]
    fn test_swim_time_seconds() {
        let t = SwimTime::from_parts(0, 0, 32, 45);
        assert!((t.as_seconds() - 32.45).abs() < 1e-9);
    }

    #[test]
    fn test_issue_category_roundtrip_names() {
        for category in [
            IssueCategory::PointsPolicy,
            IssueCategory::IncorrectDistance,
            IssueCategory::AgeExh,
            IssueCategory::DuplicateEntry,
            IssueCategory::ParseError,
        ] {
            assert_eq!(category.as_str().parse::<IssueCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_gender_code() {
        assert_eq!(Gender::Male.code(), "M");
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert!("X".parse::<Gender>().is_err());
    }
}
