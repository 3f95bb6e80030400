// ==========================================
// 游泳赛事报名转换系统 - 字段清洗与解析
// ==========================================
// 职责: 单字段解析规则（性别词表 / 运动等级规范化 / 报名成绩 /
//       出生日期 / 整数列 / 残疾分级）
// 红线: 纯函数，不访问行上下文与运行状态
// ==========================================

use crate::domain::row::{Cell, RowField};
use crate::domain::types::{Gender, SwimTime};
use crate::importer::error::{RowError, RowResult};
use crate::lenex::model::Handicap;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// 文本
// ==========================================

/// 单元格 → 去首尾空白的文本；空白视为 None
pub fn clean_text(cell: &Cell) -> Option<String> {
    let text = cell.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ==========================================
// 性别
// ==========================================

static GENDER_LEXICON: Lazy<HashMap<&'static str, Gender>> = Lazy::new(|| {
    HashMap::from([
        ("мужской", Gender::Male),
        ("мужчины", Gender::Male),
        ("мальчики", Gender::Male),
        ("юноши", Gender::Male),
        ("женский", Gender::Female),
        ("женщины", Gender::Female),
        ("девочки", Gender::Female),
        ("девушки", Gender::Female),
    ])
});

/// 性别文本 → M/F（忽略大小写；先查固定词表，再查配置扩展）
pub fn resolve_gender(text: &str, extension: &BTreeMap<String, Gender>) -> RowResult<Gender> {
    let key = text.trim().to_lowercase();
    if let Some(gender) = GENDER_LEXICON.get(key.as_str()) {
        return Ok(*gender);
    }
    extension
        .iter()
        .find(|(k, _)| k.trim().to_lowercase() == key)
        .map(|(_, g)| *g)
        .ok_or(RowError::IncorrectGender(key))
}

// ==========================================
// 运动等级 (license)
// ==========================================

// 除标记字符 I 以外的任意字符
static NON_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new("[^I]").expect("静态正则"));

/// 规范化运动等级
///
/// 1. 除 `I` 外全部转小写
/// 2. 按配置顺序执行字面替换
/// 3. 仅白名单内的结果被接受，否则为 None（不视为错误）
pub fn normalize_license(
    raw: &str,
    replacements: &[(String, String)],
    whitelist: &[String],
) -> Option<String> {
    let mut license = NON_MARKER
        .replace_all(raw, |caps: &Captures| caps[0].to_lowercase())
        .into_owned();

    for (from, to) in replacements {
        license = license.replace(from.as_str(), to);
    }

    whitelist.iter().any(|w| *w == license).then_some(license)
}

// ==========================================
// 报名成绩
// ==========================================

static ENTRY_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{1,2}):)?(\d{2}):(\d{2})[.,:](\d{2})$").expect("静态正则")
});

/// 解析报名成绩文本
///
/// # 返回
/// - Ok(ZERO): 空白或 "NT"
/// - Ok(time): `H?H:MM:SS[.,:]HH` 或 `MM:SS[.,:]HH`
/// - Err(原文): 无法识别（调用方降级为零时间并记录警告）
pub fn parse_entry_time(text: &str) -> Result<SwimTime, String> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nt") {
        return Ok(SwimTime::ZERO);
    }

    let caps = ENTRY_TIME.captures(text).ok_or_else(|| text.to_string())?;
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds, hundredths) = (part(1), part(2), part(3), part(4));
    if minutes > 59 || seconds > 59 {
        return Err(text.to_string());
    }

    Ok(SwimTime::from_parts(hours, minutes, seconds, hundredths))
}

/// 单元格版本：Excel 时间单元格取其时刻部分
pub fn parse_entry_time_cell(cell: &Cell) -> Result<SwimTime, String> {
    match cell {
        Cell::Empty => Ok(SwimTime::ZERO),
        Cell::Text(text) => parse_entry_time(text),
        Cell::DateTime(dt) => {
            let time = dt.time();
            Ok(SwimTime::from_parts(
                time.hour() as u64,
                time.minute() as u64,
                time.second() as u64,
                (time.nanosecond() / 10_000_000) as u64,
            ))
        }
        other => Err(other.to_string()),
    }
}

// ==========================================
// 出生日期
// ==========================================

/// 文本按配置格式解析；原生日期单元格直接取日期
pub fn parse_birthday(cell: &Cell, format: &str) -> RowResult<NaiveDate> {
    let invalid = || RowError::InvalidBirthday {
        value: cell.to_string(),
        format: format.to_string(),
    };

    match cell {
        Cell::DateTime(dt) => Ok(dt.date()),
        Cell::Text(text) => {
            let text = text.trim();
            NaiveDate::parse_from_str(text, format)
                .or_else(|_| NaiveDateTime::parse_from_str(text, format).map(|dt| dt.date()))
                .map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

// ==========================================
// 整数列 (distance / lane / heat)
// ==========================================

/// 空单元格 → None；整数或整数文本 → Some；其余为字段错误
pub fn parse_integer(field: RowField, cell: &Cell) -> RowResult<Option<u32>> {
    let invalid = |message: &str| RowError::InvalidField {
        field,
        value: cell.to_string(),
        message: message.to_string(),
    };

    match cell {
        Cell::Empty => Ok(None),
        Cell::Int(i) => u32::try_from(*i).map(Some).map_err(|_| invalid("超出范围")),
        Cell::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
            Ok(Some(*f as u32))
        }
        Cell::Float(_) => Err(invalid("不是整数")),
        Cell::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u32>()
                .ok()
                .or_else(|| {
                    text.replace(',', ".")
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                        .map(|f| f as u32)
                })
                .map(Some)
                .ok_or_else(|| invalid("不是整数"))
        }
        Cell::Bool(_) | Cell::DateTime(_) => Err(invalid("类型不符")),
    }
}

// ==========================================
// 残疾分级 (handicap)
// ==========================================

/// "S9 SB8 SM9" → free=9 breast=8 medley=9；单个数字应用于全部三项
pub fn parse_handicap(text: &str) -> Option<Handicap> {
    let text = text.trim().to_uppercase();
    if text.is_empty() {
        return None;
    }

    let class = |s: &str| s.parse::<u8>().ok().filter(|v| (1..=15).contains(v));

    if let Some(value) = class(&text) {
        return Some(Handicap {
            free: Some(value),
            breast: Some(value),
            medley: Some(value),
            ..Default::default()
        });
    }

    let mut handicap = Handicap::default();
    for token in text.split(|c: char| c.is_whitespace() || c == ',' || c == '/') {
        if token.is_empty() {
            continue;
        }
        if let Some(v) = token.strip_prefix("SB") {
            handicap.breast = Some(class(v)?);
        } else if let Some(v) = token.strip_prefix("SM") {
            handicap.medley = Some(class(v)?);
        } else if let Some(v) = token.strip_prefix('S') {
            handicap.free = Some(class(v)?);
        } else {
            return None;
        }
    }

    if handicap.free.is_none() && handicap.breast.is_none() && handicap.medley.is_none() {
        return None;
    }
    Some(handicap)
}
