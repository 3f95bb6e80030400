// ==========================================
// 游泳赛事报名转换系统 - 问题收集器
// ==========================================
// 职责: 单次转换内只追加的问题日志（不去重、不限量）
// 输出: IssueReport（按分类分组，组内保持追加顺序）
// ==========================================

use crate::domain::issue::{Issue, IssueReport};
use crate::domain::types::{IssueCategory, Severity};
use std::collections::BTreeMap;
use tracing::{error, warn};

#[derive(Debug, Default)]
pub struct IssueCollector {
    items: Vec<Issue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Error => error!(
                category = issue.category.as_str(),
                row = ?issue.row_index,
                "{}",
                issue.message
            ),
            Severity::Warning => warn!(
                category = issue.category.as_str(),
                row = ?issue.row_index,
                "{}",
                issue.message
            ),
        }
        self.items.push(issue);
    }

    pub fn by_category(&self) -> BTreeMap<IssueCategory, Vec<&Issue>> {
        let mut groups: BTreeMap<IssueCategory, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.items {
            groups.entry(issue.category).or_default().push(issue);
        }
        groups
    }

    pub fn counts(&self) -> BTreeMap<IssueCategory, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.items {
            *counts.entry(issue.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.items.iter()
    }

    pub fn into_report(self) -> IssueReport {
        let total = self.items.len();
        let mut groups: BTreeMap<IssueCategory, Vec<Issue>> = BTreeMap::new();
        for issue in self.items {
            groups.entry(issue.category).or_default().push(issue);
        }
        IssueReport { total, groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_only_no_dedup() {
        let mut collector = IssueCollector::new();
        assert!(!collector.has_items());

        let issue = Issue::new(IssueCategory::DuplicateEntry, "dup", Severity::Warning);
        collector.add(issue.clone());
        collector.add(issue);
        collector.add(Issue::new(IssueCategory::ParseError, "bad", Severity::Error));

        assert!(collector.has_items());
        assert_eq!(collector.len(), 3);
        assert_eq!(collector.by_category()[&IssueCategory::DuplicateEntry].len(), 2);
        assert_eq!(collector.counts()[&IssueCategory::ParseError], 1);
    }

    #[test]
    fn test_report_preserves_order_within_group() {
        let mut collector = IssueCollector::new();
        collector.add(Issue::new(IssueCategory::AgeExh, "first", Severity::Warning));
        collector.add(Issue::new(IssueCategory::PointsPolicy, "other", Severity::Warning));
        collector.add(Issue::new(IssueCategory::AgeExh, "second", Severity::Error));

        let report = collector.into_report();
        assert_eq!(report.total, 3);
        let messages: Vec<_> = report.groups[&IssueCategory::AgeExh]
            .iter()
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
