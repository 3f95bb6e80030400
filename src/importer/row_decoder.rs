// ==========================================
// 游泳赛事报名转换系统 - 报名行解码器
// ==========================================
// 输入: 单行单元格 + 字段描述符列表（由配置一次性构建，不可变）
// 输出: Row + 可恢复警告，或字段级错误
// 规则:
//   - 列号 -1: 静默字段取解析器的"缺失"结果，必填字段为 Missing
//   - "=" 开头的文本单元格按 A1 引用间接取值一次（失败保留原值）
// ==========================================

use crate::config::registration_config::ColumnMapping;
use crate::domain::row::{Cell, DecodedRow, FieldValue, FieldWarning, Row, RowField};
use crate::domain::types::SwimTime;
use crate::importer::data_cleaner::{clean_text, parse_entry_time_cell, parse_integer};
use crate::importer::error::RowResult;
use crate::importer::file_parser::CellLookup;

// ==========================================
// FieldParser - 字段解析器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    Text,      // 去空白文本，空白为缺失
    Raw,       // 原样保留单元格（出生日期：文本或原生日期）
    Integer,   // 整数
    EntryTime, // 报名成绩，无法识别时降级为零时间
}

#[derive(Debug, Clone, PartialEq)]
enum ParsedValue {
    Text(Option<String>),
    Raw(Option<Cell>),
    Integer(Option<u32>),
    Time(SwimTime),
}

impl ParsedValue {
    fn into_text(self) -> Option<String> {
        match self {
            ParsedValue::Text(v) => v,
            ParsedValue::Raw(c) => c.as_ref().and_then(clean_text),
            ParsedValue::Integer(i) => i.map(|v| v.to_string()),
            ParsedValue::Time(t) => (!t.is_zero()).then(|| t.to_string()),
        }
    }

    fn into_cell(self) -> Option<Cell> {
        match self {
            ParsedValue::Raw(c) => c,
            other => other.into_text().map(Cell::Text),
        }
    }

    fn into_integer(self) -> Option<u32> {
        match self {
            ParsedValue::Integer(i) => i,
            other => other.into_text().and_then(|t| t.parse().ok()),
        }
    }

    fn into_time(self) -> SwimTime {
        match self {
            ParsedValue::Time(t) => t,
            _ => SwimTime::ZERO,
        }
    }
}

impl FieldParser {
    pub fn for_field(field: RowField) -> Self {
        match field {
            RowField::Birthday => FieldParser::Raw,
            RowField::Distance | RowField::Lane | RowField::Heat => FieldParser::Integer,
            RowField::Entrytime => FieldParser::EntryTime,
            _ => FieldParser::Text,
        }
    }

    /// 静默字段列缺失时的结果
    fn parse_missing(&self) -> ParsedValue {
        match self {
            FieldParser::Text => ParsedValue::Text(None),
            FieldParser::Raw => ParsedValue::Raw(None),
            FieldParser::Integer => ParsedValue::Integer(None),
            FieldParser::EntryTime => ParsedValue::Time(SwimTime::ZERO),
        }
    }

    fn parse(
        &self,
        field: RowField,
        cell: &Cell,
        warnings: &mut Vec<FieldWarning>,
    ) -> RowResult<ParsedValue> {
        Ok(match self {
            FieldParser::Text => ParsedValue::Text(clean_text(cell)),
            FieldParser::Raw => ParsedValue::Raw((!cell.is_empty()).then(|| cell.clone())),
            FieldParser::Integer => ParsedValue::Integer(parse_integer(field, cell)?),
            FieldParser::EntryTime => match parse_entry_time_cell(cell) {
                Ok(time) => ParsedValue::Time(time),
                Err(value) => {
                    warnings.push(FieldWarning { field, value });
                    ParsedValue::Time(SwimTime::ZERO)
                }
            },
        })
    }
}

// ==========================================
// FieldDescriptor - (字段, 列号, 解析器, 静默)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub field: RowField,
    pub column: i32,
    pub parser: FieldParser,
    pub silent: bool,
}

impl FieldDescriptor {
    pub fn new(field: RowField, column: i32) -> Self {
        Self {
            field,
            column,
            parser: FieldParser::for_field(field),
            silent: field.is_silent(),
        }
    }
}

/// 由列映射构建描述符列表（覆盖全部字段）
pub fn build_descriptors(mapping: &ColumnMapping) -> Vec<FieldDescriptor> {
    RowField::ALL
        .iter()
        .map(|field| FieldDescriptor::new(*field, mapping.column(*field)))
        .collect()
}

// ==========================================
// decode_row - 纯函数解码
// ==========================================
pub fn decode_row(
    cells: &[Cell],
    descriptors: &[FieldDescriptor],
    row_index: usize,
    lookup: &dyn CellLookup,
) -> RowResult<DecodedRow> {
    let mut row = Row {
        row_index,
        ..Default::default()
    };
    let mut warnings = Vec::new();

    for descriptor in descriptors {
        let value = if descriptor.column < 0 {
            if !descriptor.silent {
                // 必填字段保持 Missing
                continue;
            }
            descriptor.parser.parse_missing()
        } else {
            let raw = cells
                .get(descriptor.column as usize)
                .cloned()
                .unwrap_or(Cell::Empty);
            let cell = resolve_formula(raw, lookup);
            descriptor
                .parser
                .parse(descriptor.field, &cell, &mut warnings)?
        };
        assign(&mut row, descriptor.field, value);
    }

    Ok(DecodedRow { row, warnings })
}

fn resolve_formula(cell: Cell, lookup: &dyn CellLookup) -> Cell {
    match cell.formula_reference().and_then(|r| lookup.lookup(r)) {
        Some(resolved) => resolved,
        None => cell,
    }
}

fn present<T>(value: Option<T>) -> FieldValue<T> {
    value.map(FieldValue::Present).unwrap_or(FieldValue::Missing)
}

fn assign(row: &mut Row, field: RowField, value: ParsedValue) {
    match field {
        RowField::Lastname => row.lastname = present(value.into_text()),
        RowField::Firstname => row.firstname = present(value.into_text()),
        RowField::Middlename => row.middlename = value.into_text(),
        RowField::Gender => row.gender = present(value.into_text()),
        RowField::License => row.license = value.into_text(),
        RowField::Birthday => row.birthday = present(value.into_cell()),
        RowField::Club => row.club = present(value.into_text()),
        RowField::Stroke => row.stroke = present(value.into_text()),
        RowField::Distance => row.distance = present(value.into_integer()),
        RowField::Entrytime => row.entrytime = value.into_time(),
        // 0 号分组/泳道视为未指定
        RowField::Lane => row.lane = value.into_integer().filter(|v| *v > 0),
        RowField::Heat => row.heat = value.into_integer().filter(|v| *v > 0),
        RowField::Handicap => row.handicap = value.into_text(),
    }
}

// ==========================================
// RowDecoder - 持有描述符列表的解码器
// ==========================================
#[derive(Debug, Clone)]
pub struct RowDecoder {
    descriptors: Vec<FieldDescriptor>,
}

impl RowDecoder {
    pub fn new(mapping: &ColumnMapping) -> Self {
        Self {
            descriptors: build_descriptors(mapping),
        }
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn decode(
        &self,
        cells: &[Cell],
        row_index: usize,
        lookup: &dyn CellLookup,
    ) -> RowResult<DecodedRow> {
        decode_row(cells, &self.descriptors, row_index, lookup)
    }
}
