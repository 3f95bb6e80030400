// ==========================================
// 游泳赛事报名转换系统 - 问题报告领域模型
// ==========================================
// 用途: 转换过程中每个异常的结构化记录
// 输出: 按分类分组的报告（供表格化展示）
// ==========================================

use crate::domain::row::Row;
use crate::domain::types::{IssueCategory, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ==========================================
// Issue - 单条问题记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub message: String,
    pub severity: Severity,

    // ===== 行上下文 =====
    pub row_index: Option<usize>,
    pub row_repr: Option<String>,
    pub row_data: Option<Map<String, Value>>,

    // ===== 附加字段 =====
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Issue {
    pub fn new(category: IssueCategory, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            category,
            message: message.into(),
            severity,
            row_index: None,
            row_repr: None,
            row_data: None,
            extra: Map::new(),
        }
    }

    /// 附加行上下文（序号、文本表示、结构化快照）
    pub fn with_row(mut self, row: &Row) -> Self {
        self.row_index = Some(row.row_index);
        self.row_repr = Some(row.to_string());
        self.row_data = Some(row.snapshot());
        self
    }

    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.row_repr = Some(repr.into());
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

// ==========================================
// IssueReport - 分组报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueReport {
    pub total: usize,
    pub groups: BTreeMap<IssueCategory, Vec<Issue>>,
}

impl IssueReport {
    pub fn count(&self, category: IssueCategory) -> usize {
        self.groups.get(&category).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

// ==========================================
// RunSummary - 单次转换统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows_total: usize,   // 已读取的数据行
    pub rows_skipped: usize, // 存在性列为空而跳过
    pub rows_failed: usize,  // 行级失败
    pub clubs: usize,
    pub athletes: usize,
    pub entries: usize,
    pub heats: usize,
    pub issues: BTreeMap<IssueCategory, usize>,
}

impl RunSummary {
    pub fn issue_total(&self) -> usize {
        self.issues.values().sum()
    }
}

// ==========================================
// TranslationRun - 转换历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRun {
    pub run_id: String, // UUID v4
    pub schedule_file: String,
    pub sheet_file: String,
    pub output_file: Option<String>,
    pub meet_name: String,
    pub summary: RunSummary,
    pub elapsed_ms: i64,
    pub config_snapshot: String, // JSON
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_count_by_category() {
        let mut report = IssueReport::default();
        report.groups.insert(
            IssueCategory::AgeExh,
            vec![Issue::new(IssueCategory::AgeExh, "exh", Severity::Warning)],
        );
        report.total = 1;

        assert_eq!(report.count(IssueCategory::AgeExh), 1);
        assert_eq!(report.count(IssueCategory::ParseError), 0);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_issue_serializes_category_snake_case() {
        let issue = Issue::new(IssueCategory::DuplicateEntry, "dup", Severity::Warning);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["category"], "duplicate_entry");
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn test_with_row_attaches_context() {
        let row = Row {
            row_index: 4,
            ..Default::default()
        };
        let issue = Issue::new(IssueCategory::ParseError, "bad", Severity::Error)
            .with_row(&row)
            .with_extra("age", 9);

        assert_eq!(issue.row_index, Some(4));
        assert!(issue.row_repr.unwrap().starts_with("<Row "));
        assert_eq!(issue.row_data.unwrap().len(), 13);
        assert_eq!(issue.extra["age"], 9);
    }
}
