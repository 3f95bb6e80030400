// ==========================================
// 游泳赛事报名转换系统 - 报名行模型
// ==========================================
// 用途: 导入管道中间产物（表格单元格 → 字段解码 → 此结构）
// 生命周期: 仅在单次转换内
// ==========================================

use crate::domain::types::SwimTime;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ==========================================
// Cell - 表格单元格原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// 空单元格或仅含空白的文本
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 以公式标记开头的文本单元格
    pub fn formula_reference(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => s.strip_prefix('='),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::Null,
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => Value::from(*f),
            Cell::Bool(b) => Value::Bool(*b),
            Cell::DateTime(dt) => Value::String(dt.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

// ==========================================
// RowField - 可映射的报名字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Lastname,
    Firstname,
    Middlename,
    Gender,
    License,
    Birthday,
    Club,
    Stroke,
    Distance,
    Entrytime,
    Lane,
    Heat,
    Handicap,
}

impl RowField {
    pub const ALL: [RowField; 13] = [
        RowField::Lastname,
        RowField::Firstname,
        RowField::Middlename,
        RowField::Gender,
        RowField::License,
        RowField::Birthday,
        RowField::Club,
        RowField::Stroke,
        RowField::Distance,
        RowField::Entrytime,
        RowField::Lane,
        RowField::Heat,
        RowField::Handicap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RowField::Lastname => "lastname",
            RowField::Firstname => "firstname",
            RowField::Middlename => "middlename",
            RowField::Gender => "gender",
            RowField::License => "license",
            RowField::Birthday => "birthday",
            RowField::Club => "club",
            RowField::Stroke => "stroke",
            RowField::Distance => "distance",
            RowField::Entrytime => "entrytime",
            RowField::Lane => "lane",
            RowField::Heat => "heat",
            RowField::Handicap => "handicap",
        }
    }

    /// 静默字段: 列缺失时使用解析器的默认值而非 Missing
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            RowField::Middlename
                | RowField::License
                | RowField::Entrytime
                | RowField::Lane
                | RowField::Heat
                | RowField::Handicap
        )
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// FieldValue - 必填字段取值（含缺失哨兵）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    Present(T),
    Missing,
}

impl<T> FieldValue<T> {
    /// 缺失哨兵为假值
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FieldValue::Present(v) => Some(v),
            FieldValue::Missing => None,
        }
    }
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Missing
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Present(v) => write!(f, "{}", v),
            FieldValue::Missing => write!(f, "MISSING"),
        }
    }
}

// ==========================================
// Row - 解码后的报名行
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub lastname: FieldValue<String>,
    pub firstname: FieldValue<String>,
    pub middlename: Option<String>,
    pub gender: FieldValue<String>,
    pub license: Option<String>, // 原始文本，由身份解析器规范化
    pub birthday: FieldValue<Cell>, // 文本或原生日期单元格
    pub club: FieldValue<String>,
    pub stroke: FieldValue<String>,
    pub distance: FieldValue<u32>,
    pub entrytime: SwimTime,
    pub lane: Option<u32>,
    pub heat: Option<u32>,
    pub handicap: Option<String>,

    // 元信息
    pub row_index: usize, // 数据行序号（从 1 开始，对应表格第 2 行）
}

impl Row {
    /// 结构化行快照（用于问题报告）
    pub fn snapshot(&self) -> Map<String, Value> {
        fn field<T: fmt::Display>(v: &FieldValue<T>) -> Value {
            match v {
                FieldValue::Present(x) => Value::String(x.to_string()),
                FieldValue::Missing => Value::Null,
            }
        }

        let mut map = Map::new();
        map.insert("lastname".into(), field(&self.lastname));
        map.insert("firstname".into(), field(&self.firstname));
        map.insert("middlename".into(), json_opt(&self.middlename));
        map.insert("gender".into(), field(&self.gender));
        map.insert("license".into(), json_opt(&self.license));
        map.insert(
            "birthday".into(),
            self.birthday.value().map(Cell::to_json).unwrap_or(Value::Null),
        );
        map.insert("club".into(), field(&self.club));
        map.insert("stroke".into(), field(&self.stroke));
        map.insert(
            "distance".into(),
            self.distance.value().map(|d| Value::from(*d)).unwrap_or(Value::Null),
        );
        map.insert("entrytime".into(), Value::String(self.entrytime.to_string()));
        map.insert("lane".into(), self.lane.map(Value::from).unwrap_or(Value::Null));
        map.insert("heat".into(), self.heat.map(Value::from).unwrap_or(Value::Null));
        map.insert("handicap".into(), json_opt(&self.handicap));
        map
    }
}

fn json_opt(v: &Option<String>) -> Value {
    v.as_ref().map(|s| Value::String(s.clone())).unwrap_or(Value::Null)
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "None".to_string());
        let num = |v: &Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "<Row lastname={} firstname={} middlename={} gender={} license={} birthday={} \
             club={} stroke={} distance={} entrytime={} lane={} heat={}>",
            self.lastname,
            self.firstname,
            opt(&self.middlename),
            self.gender,
            opt(&self.license),
            self.birthday,
            self.club,
            self.stroke,
            self.distance,
            self.entrytime,
            num(&self.lane),
            num(&self.heat),
        )
    }
}

// ==========================================
// DecodedRow - 解码结果（行 + 可恢复警告）
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldWarning {
    pub field: RowField,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct DecodedRow {
    pub row: Row,
    pub warnings: Vec<FieldWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_falsy() {
        let v: FieldValue<String> = FieldValue::Missing;
        assert!(!v.is_present());
        assert_eq!(v.value(), None);
    }

    #[test]
    fn test_cell_float_display_integral() {
        assert_eq!(Cell::Float(50.0).to_string(), "50");
        assert_eq!(Cell::Float(32.5).to_string(), "32.5");
    }

    #[test]
    fn test_cell_formula_reference() {
        assert_eq!(Cell::Text("=B5".into()).formula_reference(), Some("B5"));
        assert_eq!(Cell::Int(5).formula_reference(), None);
    }

    #[test]
    fn test_snapshot_contains_all_fields() {
        let row = Row {
            lastname: FieldValue::Present("Иванов".into()),
            distance: FieldValue::Present(50),
            ..Default::default()
        };
        let snap = row.snapshot();
        assert_eq!(snap["lastname"], Value::String("Иванов".into()));
        assert_eq!(snap["distance"], Value::from(50));
        assert_eq!(snap["firstname"], Value::Null);
        assert_eq!(snap.len(), 13);
    }
}
