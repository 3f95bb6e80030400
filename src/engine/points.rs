// ==========================================
// 游泳赛事报名转换系统 - 积分政策校验
// ==========================================
// 公式: points = 1000 × (基准时间 / 报名时间)³
// 规则:
//   - 零时间或政策关闭 → 原样通过
//   - min < points < max（开区间）→ 保留报名时间
//   - 否则报名时间清零并记录 points_policy 警告
//   - 缺少基准时间 → 保留报名时间并记录警告
// ==========================================

use crate::config::{BaseTimeTable, PointsPolicy};
use crate::domain::issue::Issue;
use crate::domain::row::Row;
use crate::domain::types::{Gender, IssueCategory, Severity, SwimTime};
use crate::i18n::t_in;
use crate::importer::issue_collector::IssueCollector;

/// 积分计算
pub fn points(base_seconds: f64, seconds: f64) -> f64 {
    1000.0 * (base_seconds / seconds).powi(3)
}

/// 保留 5 位小数
fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointsOutcome {
    Skipped,           // 零时间或政策关闭
    Kept(f64),         // 区间内
    Rejected(f64),     // 区间外，时间清零
    MissingBaseTime,   // 无基准时间
}

pub struct PointsValidator<'a> {
    policy: &'a PointsPolicy,
    table: &'a BaseTimeTable,
    course: Option<&'a str>,
    locale: &'a str,
}

impl<'a> PointsValidator<'a> {
    pub fn new(
        policy: &'a PointsPolicy,
        table: &'a BaseTimeTable,
        course: Option<&'a str>,
        locale: &'a str,
    ) -> Self {
        Self {
            policy,
            table,
            course,
            locale,
        }
    }

    pub fn evaluate(&self, time: SwimTime, gender: Gender, distance: u32, stroke: &str) -> PointsOutcome {
        if time.is_zero() || !self.policy.enabled {
            return PointsOutcome::Skipped;
        }

        let base = match self
            .course
            .and_then(|course| self.table.get(course, gender, distance, stroke))
        {
            Some(base) => base,
            None => return PointsOutcome::MissingBaseTime,
        };

        let score = points(base, time.as_seconds());
        if self.policy.min < score && score < self.policy.max {
            PointsOutcome::Kept(score)
        } else {
            PointsOutcome::Rejected(score)
        }
    }

    /// 校验报名时间，返回应写入报名的时间
    pub fn validate(
        &self,
        time: SwimTime,
        gender: Gender,
        distance: u32,
        stroke: &str,
        row: &Row,
        issues: &mut IssueCollector,
    ) -> SwimTime {
        match self.evaluate(time, gender, distance, stroke) {
            PointsOutcome::Skipped | PointsOutcome::Kept(_) => time,
            PointsOutcome::Rejected(score) => {
                let points_text = format!("{:.5}", score);
                let time_text = time.to_string();
                let message = t_in(
                    self.locale,
                    "issue.points_policy",
                    &[("points", points_text.as_str()), ("entrytime", time_text.as_str())],
                );
                issues.add(
                    Issue::new(IssueCategory::PointsPolicy, message, Severity::Warning)
                        .with_row(row)
                        .with_extra("points", round5(score))
                        .with_extra("entrytime", time_text),
                );
                SwimTime::ZERO
            }
            PointsOutcome::MissingBaseTime => {
                let course = self.course.unwrap_or("-");
                let distance_text = distance.to_string();
                let message = t_in(
                    self.locale,
                    "issue.base_time_missing",
                    &[
                        ("course", course),
                        ("gender", gender.code()),
                        ("distance", distance_text.as_str()),
                        ("stroke", stroke),
                    ],
                );
                issues.add(
                    Issue::new(IssueCategory::PointsPolicy, message, Severity::Warning)
                        .with_row(row)
                        .with_extra("entrytime", time.to_string()),
                );
                time
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(min: f64, max: f64) -> PointsPolicy {
        PointsPolicy {
            enabled: true,
            min,
            max,
            base_times: None,
        }
    }

    fn table() -> BaseTimeTable {
        BaseTimeTable::embedded().unwrap()
    }

    #[test]
    fn test_points_formula() {
        assert!((points(20.91, 20.91) - 1000.0).abs() < 1e-9);
        assert!((points(20.0, 40.0) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_inside_band_kept() {
        let policy = policy(100.0, 1000.0);
        let table = table();
        let validator = PointsValidator::new(&policy, &table, Some("LCM"), "ru");
        let mut issues = IssueCollector::new();

        let time = SwimTime::from_parts(0, 0, 30, 0);
        let kept = validator.validate(time, Gender::Male, 50, "FREE", &Row::default(), &mut issues);
        assert_eq!(kept, time);
        assert!(!issues.has_items());
    }

    #[test]
    fn test_time_outside_band_zeroed() {
        let policy = policy(500.0, 1000.0);
        let table = table();
        let validator = PointsValidator::new(&policy, &table, Some("LCM"), "ru");
        let mut issues = IssueCollector::new();

        // 20.91 / 60 → 约 42 分
        let time = SwimTime::from_parts(0, 1, 0, 0);
        let result = validator.validate(time, Gender::Male, 50, "FREE", &Row::default(), &mut issues);
        assert_eq!(result, SwimTime::ZERO);

        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.category, IssueCategory::PointsPolicy);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.extra["entrytime"], "00:01:00.00");
        let expected = round5(points(20.91, 60.0));
        assert_eq!(issue.extra["points"], expected);
        assert!(issue.message.starts_with("Нарушение политики очков ("));
    }

    #[test]
    fn test_band_is_exclusive() {
        let policy = policy(0.0, 1000.0);
        let table = table();
        let validator = PointsValidator::new(&policy, &table, Some("LCM"), "ru");

        // 恰好等于基准时间 → 1000 分，不在开区间内
        let time = SwimTime::from_parts(0, 0, 20, 91);
        assert!(matches!(
            validator.evaluate(time, Gender::Male, 50, "FREE"),
            PointsOutcome::Rejected(_)
        ));
    }

    #[test]
    fn test_zero_time_and_disabled_policy_pass() {
        let table = table();
        let enabled = policy(500.0, 1000.0);
        let validator = PointsValidator::new(&enabled, &table, Some("LCM"), "ru");
        assert_eq!(
            validator.evaluate(SwimTime::ZERO, Gender::Male, 50, "FREE"),
            PointsOutcome::Skipped
        );

        let disabled = PointsPolicy::default();
        let validator = PointsValidator::new(&disabled, &table, Some("LCM"), "ru");
        assert_eq!(
            validator.evaluate(SwimTime::from_parts(0, 5, 0, 0), Gender::Male, 50, "FREE"),
            PointsOutcome::Skipped
        );
    }

    #[test]
    fn test_missing_base_time_keeps_time() {
        let policy = policy(0.0, 1000.0);
        let table = table();
        let validator = PointsValidator::new(&policy, &table, None, "en");
        let mut issues = IssueCollector::new();

        let time = SwimTime::from_parts(0, 0, 35, 0);
        let result = validator.validate(time, Gender::Female, 50, "FREE", &Row::default(), &mut issues);
        assert_eq!(result, time);
        assert_eq!(issues.len(), 1);
    }
}
