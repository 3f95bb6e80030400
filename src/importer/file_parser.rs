// ==========================================
// 游泳赛事报名转换系统 - 报名表解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，读取第一个工作表) / CSV (.csv)
// 输出: 保留原始类型的单元格网格（第 1 行为表头）
// ==========================================

use crate::domain::row::Cell;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// Sheet - 单元格网格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 表头行（第 1 行）
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 数据行，序号从 1 开始（对应表格第 2 行）
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, row)| (i + 1, row.as_slice()))
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// 按 0 基行列取单元格
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }
}

// ==========================================
// CellLookup - A1 引用查找（公式单元格间接取值）
// ==========================================
pub trait CellLookup {
    fn lookup(&self, reference: &str) -> Option<Cell>;
}

impl CellLookup for Sheet {
    fn lookup(&self, reference: &str) -> Option<Cell> {
        let (row, col) = parse_a1(reference)?;
        self.cell(row, col).cloned()
    }
}

/// 解析 A1 引用为 0 基 (行, 列)，支持 `$` 锁定符与 `Sheet!` 前缀
pub fn parse_a1(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.rsplit('!').next()?.trim().replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .to_ascii_uppercase()
        .bytes()
        .try_fold(0usize, |acc, b| {
            acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
        })?;
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

// ==========================================
// SheetParser Trait
// ==========================================
pub trait SheetParser: Send + Sync {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<Sheet>;
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl SheetParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<Sheet> {
        check_exists(file_path)?;
        let ext = extension(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头作为第 1 行保留
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(csv_cell).collect());
        }

        let name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();
        Ok(Sheet::new(name, rows))
    }
}

fn csv_cell(value: &str) -> Cell {
    if value.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(value.to_string())
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl SheetParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<Sheet> {
        check_exists(file_path)?;
        let ext = extension(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet（活动工作表）
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // range 可能不从 A1 开始，补齐左上角偏移
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
        for data_row in range.rows() {
            let mut row = vec![Cell::Empty; start_col];
            row.extend(data_row.iter().map(excel_cell));
            rows.push(row);
        }

        Ok(Sheet::new(sheet_name, rows))
    }
}

fn excel_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

// ==========================================
// 通用解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Sheet> {
        let path = file_path.as_ref();
        match extension(path).as_str() {
            "csv" => CsvParser.parse_sheet(path),
            "xlsx" | "xls" => ExcelParser.parse_sheet(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl SheetParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<Sheet> {
        self.parse(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_parse_a1() {
        assert_eq!(parse_a1("A1"), Some((0, 0)));
        assert_eq!(parse_a1("$C$5"), Some((4, 2)));
        assert_eq!(parse_a1("AA10"), Some((9, 26)));
        assert_eq!(parse_a1("Лист1!B2"), Some((1, 1)));
        assert_eq!(parse_a1("A0"), None);
        assert_eq!(parse_a1("12"), None);
        assert_eq!(parse_a1("SUM(A1)"), None);
    }

    #[test]
    fn test_csv_parser_keeps_header_and_ragged_rows() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Фамилия,Имя,Пол").unwrap();
        writeln!(temp_file, "Иванов,Иван,мужской").unwrap();
        writeln!(temp_file, "Петрова,,").unwrap();
        writeln!(temp_file, "Сидоров").unwrap();
        temp_file.flush().unwrap();

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();
        assert_eq!(sheet.header()[0], Cell::Text("Фамилия".into()));
        assert_eq!(sheet.data_row_count(), 3);

        let rows: Vec<_> = sheet.data_rows().collect();
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[1].1[1], Cell::Empty);
        assert_eq!(rows[2].1.len(), 1);
    }

    #[test]
    fn test_lookup_by_reference() {
        let sheet = Sheet::new(
            "s",
            vec![
                vec![Cell::Text("h".into())],
                vec![Cell::Text("a".into()), Cell::Int(7)],
            ],
        );
        assert_eq!(sheet.lookup("B2"), Some(Cell::Int(7)));
        assert_eq!(sheet.lookup("Z99"), None);
    }

    #[test]
    fn test_unsupported_format() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvParser.parse_sheet(Path::new("/nonexistent/file.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
