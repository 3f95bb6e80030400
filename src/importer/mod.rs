// ==========================================
// 游泳赛事报名转换系统 - 导入层
// ==========================================
// 职责: 报名表读取、单元格清洗、行解码、列定位、问题收集
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

pub mod auto_location;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod issue_collector;
pub mod registration_importer_trait;
pub mod row_decoder;

// 重导出核心类型
pub use auto_location::{detect_columns, ColumnDetection};
pub use conflict_handler::{ConflictHandler, DuplicateEntry};
pub use error::{ImportError, ImportResult, RowError, RowResult};
pub use file_parser::{CellLookup, CsvParser, ExcelParser, Sheet, UniversalFileParser};
pub use issue_collector::IssueCollector;
pub use row_decoder::{FieldDescriptor, FieldParser, RowDecoder};

// 重导出 Trait 接口
pub use registration_importer_trait::{RegistrationImporter, TranslationOutcome, TranslationRequest};
