// ==========================================
// 游泳赛事报名转换系统 - 项目匹配
// ==========================================
// 输入: 运动员 + 报名行（泳姿别名、距离）
// 输出: 匹配项目（赛程索引）+ 报名状态（正常 / EXH）
// 规则:
//   1. 泳姿别名 → 标准泳姿
//   2. 按 (性别, 泳姿, 距离) 取候选项目（赛程顺序）
//   3. 第一个年龄范围包含运动员年龄的候选 → 正常
//   4. 无包含者: EXH 关闭 → 行错误；EXH 开启 → 第一个候选，状态 EXH
// ==========================================

use crate::config::RegistrationConfig;
use crate::domain::issue::Issue;
use crate::domain::row::{Row, RowField};
use crate::domain::types::{EntryStatus, IssueCategory, Severity};
use crate::i18n::t_in;
use crate::importer::error::{RowError, RowResult};
use crate::importer::issue_collector::IssueCollector;
use crate::lenex::model::{AgeGroup, Athlete, Meet};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

// ==========================================
// AgeSpan - 项目各年龄组合并后的年龄范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeSpan {
    pub min: i32,
    pub max: i32,
}

impl AgeSpan {
    pub const UNBOUNDED: AgeSpan = AgeSpan { min: -1, max: -1 };

    /// 合并年龄组；任一组一侧不设限 (-1) 则合并结果该侧不设限
    pub fn from_groups(groups: &[AgeGroup]) -> Self {
        let mut iter = groups.iter();
        let first = match iter.next() {
            Some(g) => g,
            None => return Self::UNBOUNDED,
        };

        let (mut min, mut max) = (first.agemin, first.agemax);
        for group in iter {
            if max != -1 && (group.agemax > max || group.agemax == -1) {
                max = group.agemax;
            }
            if min != -1 && (group.agemin < min || group.agemin == -1) {
                min = group.agemin;
            }
        }
        Self { min, max }
    }

    pub fn contains(&self, age: i32) -> bool {
        match (self.min, self.max) {
            (-1, -1) => true,
            (-1, max) => age <= max,
            (min, -1) => age >= min,
            (min, max) => min <= age && age <= max,
        }
    }
}

impl fmt::Display for AgeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// 年龄 = 参考年份 - 出生年份
pub fn age_on(birthdate: NaiveDate, reference: NaiveDate) -> i32 {
    reference.year() - birthdate.year()
}

// ==========================================
// EventIndex - 候选项目索引（每次转换构建一次）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub session: usize,
    pub event: usize,
    pub eventid: u32,
    pub span: AgeSpan,
}

type IndexKey = (String, String, u32);

#[derive(Debug, Default)]
pub struct EventIndex {
    candidates: HashMap<IndexKey, Vec<Candidate>>,
}

impl EventIndex {
    pub fn build(meet: &Meet) -> Self {
        let mut candidates: HashMap<IndexKey, Vec<Candidate>> = HashMap::new();
        for (session_idx, session) in meet.sessions.iter().enumerate() {
            for (event_idx, event) in session.events.iter().enumerate() {
                let key = (
                    event.gender.clone().unwrap_or_default(),
                    event.swimstyle.stroke.clone(),
                    event.swimstyle.distance,
                );
                candidates.entry(key).or_default().push(Candidate {
                    session: session_idx,
                    event: event_idx,
                    eventid: event.eventid,
                    span: AgeSpan::from_groups(&event.agegroups),
                });
            }
        }
        Self { candidates }
    }

    pub fn candidates(&self, gender: &str, stroke: &str, distance: u32) -> &[Candidate] {
        self.candidates
            .get(&(gender.to_string(), stroke.to_string(), distance))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ==========================================
// EventMatcher
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct EventMatch {
    pub candidate: Candidate,
    pub status: EntryStatus,
    pub stroke: String, // 标准泳姿
    pub distance: u32,
}

pub struct EventMatcher<'a> {
    index: &'a EventIndex,
    config: &'a RegistrationConfig,
}

impl<'a> EventMatcher<'a> {
    pub fn new(index: &'a EventIndex, config: &'a RegistrationConfig) -> Self {
        Self { index, config }
    }

    pub fn match_event(
        &self,
        athlete: &Athlete,
        row: &Row,
        reference_date: NaiveDate,
        issues: &mut IssueCollector,
    ) -> RowResult<EventMatch> {
        let alias = row
            .stroke
            .value()
            .ok_or(RowError::MissingField(RowField::Stroke))?;
        let stroke = self
            .config
            .canonical_stroke(alias)
            .ok_or_else(|| RowError::UnknownStroke(alias.trim().to_lowercase()))?
            .to_string();
        let distance = *row
            .distance
            .value()
            .ok_or(RowError::MissingField(RowField::Distance))?;

        let gender = athlete.gender.code();
        let candidates = self.index.candidates(gender, &stroke, distance);
        if candidates.is_empty() {
            let distance_text = distance.to_string();
            let message = self.message(
                "issue.incorrect_distance",
                &[("gender", gender), ("stroke", stroke.as_str()), ("distance", distance_text.as_str())],
            );
            issues.add(
                Issue::new(IssueCategory::IncorrectDistance, message, Severity::Error).with_row(row),
            );
            return Err(RowError::IncorrectDistance {
                gender: gender.to_string(),
                stroke,
                distance,
            });
        }

        let age = age_on(athlete.birthdate, reference_date);
        if let Some(candidate) = candidates.iter().find(|c| c.span.contains(age)) {
            return Ok(EventMatch {
                candidate: candidate.clone(),
                status: EntryStatus::Normal,
                stroke,
                distance,
            });
        }

        // 无匹配年龄组，取赛程中的第一个候选
        let first = &candidates[0];
        let allowed = first.span.to_string();
        let age_text = age.to_string();

        if !self.config.exh {
            let message = self.message(
                "issue.age_rejected",
                &[("age", age_text.as_str()), ("allowed", allowed.as_str())],
            );
            issues.add(
                Issue::new(IssueCategory::AgeExh, message, Severity::Error)
                    .with_row(row)
                    .with_extra("age", age)
                    .with_extra("allowed", allowed.clone()),
            );
            return Err(RowError::IncorrectAge { age, allowed });
        }

        if candidates.len() > 1 {
            warn!(row = row.row_index, count = candidates.len(), "EXH 候选项目不唯一");
            let count = candidates.len().to_string();
            let message = self.message("issue.age_exh_ambiguous", &[("count", count.as_str())]);
            let ids: Vec<Value> = candidates.iter().map(|c| Value::from(c.eventid)).collect();
            issues.add(
                Issue::new(IssueCategory::AgeExh, message, Severity::Warning)
                    .with_row(row)
                    .with_extra("candidates", ids),
            );
        }

        let message = self.message(
            "issue.age_exh",
            &[
                ("firstname", athlete.firstname.as_str()),
                ("lastname", athlete.lastname.as_str()),
                ("age", age_text.as_str()),
                ("allowed", allowed.as_str()),
            ],
        );
        issues.add(
            Issue::new(IssueCategory::AgeExh, message, Severity::Warning)
                .with_row(row)
                .with_extra("age", age)
                .with_extra("allowed", allowed),
        );

        Ok(EventMatch {
            candidate: first.clone(),
            status: EntryStatus::Exh,
            stroke,
            distance,
        })
    }

    fn message(&self, key: &str, args: &[(&str, &str)]) -> String {
        t_in(&self.config.locale, key, args)
    }
}
