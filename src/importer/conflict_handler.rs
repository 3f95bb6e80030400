// ==========================================
// 游泳赛事报名转换系统 - 重复报名检测
// ==========================================
// 职责: 检测同一运动员对同一项目的重复报名
// 策略: 仅报告，不删除（第一次出现不计入）
// ==========================================

use crate::lenex::model::Athlete;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    pub athleteid: u32,
    pub firstname: String,
    pub lastname: String,
    pub eventid: u32,
}

pub struct ConflictHandler;

impl ConflictHandler {
    /// 检测重复报名
    ///
    /// # 返回
    /// - 每个重复出现（不包括第一次）对应一条记录，按运动员、报名顺序排列
    pub fn detect_duplicate_entries<'a, I>(&self, athletes: I) -> Vec<DuplicateEntry>
    where
        I: IntoIterator<Item = &'a Athlete>,
    {
        let mut duplicates = Vec::new();

        for athlete in athletes {
            let mut seen: HashSet<u32> = HashSet::new();
            for entry in &athlete.entries {
                if !seen.insert(entry.eventid) {
                    duplicates.push(DuplicateEntry {
                        athleteid: athlete.athleteid,
                        firstname: athlete.firstname.clone(),
                        lastname: athlete.lastname.clone(),
                        eventid: entry.eventid,
                    });
                }
            }
        }

        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EntryStatus, Gender, SwimTime};
    use crate::lenex::model::Entry;
    use chrono::NaiveDate;

    fn athlete(id: u32, events: &[u32]) -> Athlete {
        let mut athlete = Athlete::new(
            id,
            "Иванов",
            "Иван",
            Gender::Male,
            NaiveDate::from_ymd_opt(2012, 5, 1).unwrap(),
        );
        athlete.entries = events
            .iter()
            .map(|e| Entry::new(*e, SwimTime::ZERO, EntryStatus::Normal))
            .collect();
        athlete
    }

    #[test]
    fn test_detect_duplicates_none() {
        let athletes = vec![athlete(1, &[10, 11]), athlete(2, &[10])];
        assert!(ConflictHandler.detect_duplicate_entries(&athletes).is_empty());
    }

    #[test]
    fn test_detect_duplicates_found() {
        let athletes = vec![athlete(1, &[10, 11, 10, 10]), athlete(2, &[12])];
        let duplicates = ConflictHandler.detect_duplicate_entries(&athletes);

        // 第一次出现不计入
        assert_eq!(duplicates.len(), 2);
        assert!(duplicates.iter().all(|d| d.athleteid == 1 && d.eventid == 10));
        assert_eq!(duplicates[0].firstname, "Иван");
    }
}
