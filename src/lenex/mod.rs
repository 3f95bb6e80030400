// ==========================================
// 游泳赛事报名转换系统 - LENEX 文档层
// ==========================================
// 职责: 赛程文档的读取、强类型模型、写出与成绩模板转换
// ==========================================

pub mod error;
pub mod file;
pub mod model;
pub mod transform;
pub mod xml;

pub use error::{LenexError, LenexResult};
pub use file::{read_lenex, write_lenex};
pub use model::{AgeGroup, Athlete, Club, Entry, Event, Handicap, Heat, Lenex, Meet, Session, SwimStyle};
pub use transform::{entries_to_results, transform_file, ReplacementCount};
