// ==========================================
// 转换编排器集成测试
// ==========================================
// 测试目标: 从文件到 LENEX 文档的完整转换行为
// ==========================================

mod test_helpers;

use swim_reg::config::{BaseTimeTable, RegistrationConfig};
use swim_reg::domain::{EntryStatus, IssueCategory, SwimTime};
use swim_reg::engine::{Translation, Translator};
use swim_reg::lenex::{read_lenex, write_lenex, Meet};
use tempfile::TempDir;
use test_helpers::{reference_date, test_config, write_schedule, write_sheet, SheetRow};

fn run(config: &RegistrationConfig, rows: &[SheetRow]) -> Translation {
    let dir = TempDir::new().unwrap();
    let schedule = write_schedule(dir.path()).unwrap();
    let sheet = write_sheet(dir.path(), "entries.csv", rows).unwrap();
    let table = BaseTimeTable::embedded().unwrap();

    Translator::new(config, &table)
        .with_reference_date(reference_date())
        .translate_files(&schedule, &sheet)
        .unwrap()
}

fn meet(translation: &Translation) -> &Meet {
    translation.lenex.meet().unwrap()
}

#[test]
fn test_same_athlete_two_events() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013"),
            SheetRow::new("Иванов", "Иван", "01.03.2013")
                .event("на спине", "100")
                .time("01:20.00"),
        ],
    );

    let meet = meet(&result);
    assert_eq!(meet.clubs.len(), 1);
    assert_eq!(meet.clubs[0].name, "Дельфин");
    assert_eq!(meet.clubs[0].athletes.len(), 1);

    let athlete = &meet.clubs[0].athletes[0];
    assert!(athlete.athleteid >= 100_000);
    let events: Vec<u32> = athlete.entries.iter().map(|e| e.eventid).collect();
    assert_eq!(events, vec![11, 13]);
    assert_eq!(athlete.entries[1].entrytime, SwimTime::from_parts(0, 1, 20, 0));

    assert_eq!(result.summary.athletes, 1);
    assert_eq!(result.summary.entries, 2);
    assert!(result.report.is_empty());
}

#[test]
fn test_clubs_and_genders() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013"),
            SheetRow::new("Смирнова", "Анна", "05.07.2012")
                .gender("женский")
                .club("Волна"),
        ],
    );

    let meet = meet(&result);
    let names: Vec<&str> = meet.clubs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Дельфин", "Волна"]);
    assert_eq!(meet.clubs[1].athletes[0].entries[0].eventid, 12);
}

#[test]
fn test_underage_becomes_exhibition() {
    let config = test_config();
    let result = run(&config, &[SheetRow::new("Петров", "Пётр", "01.03.2015")]);

    let athlete = &meet(&result).clubs[0].athletes[0];
    assert_eq!(athlete.entries[0].status, EntryStatus::Exh);
    assert_eq!(result.report.count(IssueCategory::AgeExh), 1);

    let issue = &result.report.groups[&IssueCategory::AgeExh][0];
    assert_eq!(issue.extra["age"], 9);
    assert_eq!(issue.extra["allowed"], "10-12");
}

#[test]
fn test_underage_rejected_without_exhibition() {
    let mut config = test_config();
    config.exh = false;
    let result = run(&config, &[SheetRow::new("Петров", "Пётр", "01.03.2015")]);

    assert_eq!(result.summary.rows_failed, 1);
    assert_eq!(result.summary.entries, 0);
    assert_eq!(result.report.count(IssueCategory::AgeExh), 1);
    // 运动员已登记，报名被拒
    assert_eq!(meet(&result).clubs[0].athletes[0].entries.len(), 0);
}

#[test]
fn test_unknown_distance_reported() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").event("брасс", "50"),
            SheetRow::new("Сидоров", "Олег", "01.03.2013"),
        ],
    );

    assert_eq!(result.report.count(IssueCategory::IncorrectDistance), 1);
    assert_eq!(result.report.count(IssueCategory::ParseError), 0);
    assert_eq!(result.summary.entries, 1);

    let issue = &result.report.groups[&IssueCategory::IncorrectDistance][0];
    assert_eq!(issue.row_index, Some(1));
}

#[test]
fn test_blank_and_nt_times_are_zero() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").time(""),
            SheetRow::new("Сидоров", "Олег", "01.03.2013").time("NT"),
        ],
    );

    let meet = meet(&result);
    for athlete in &meet.clubs[0].athletes {
        assert!(athlete.entries[0].entrytime.is_zero());
    }
    assert!(result.report.is_empty());
}

#[test]
fn test_malformed_time_keeps_entry() {
    let config = test_config();
    let result = run(&config, &[SheetRow::new("Иванов", "Иван", "01.03.2013").time("полминуты")]);

    assert_eq!(result.summary.entries, 1);
    assert!(meet(&result).clubs[0].athletes[0].entries[0].entrytime.is_zero());
    assert_eq!(result.report.count(IssueCategory::ParseError), 1);
}

#[test]
fn test_heats_shared_within_event() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").seat(1, 3),
            SheetRow::new("Сидоров", "Олег", "01.03.2013").seat(1, 4),
            SheetRow::new("Козлов", "Павел", "01.03.2013").seat(2, 4),
            SheetRow::new("Орлов", "Антон", "01.03.2013"),
        ],
    );

    let meet = meet(&result);
    let event = meet.events().find(|e| e.eventid == 11).unwrap();
    assert_eq!(event.heats.len(), 2);
    assert_eq!(event.heats[0].number, 1);
    assert_eq!(event.heats[1].number, 2);
    assert!(event.heats.iter().all(|h| h.heatid >= 1_000));

    let entries: Vec<_> = meet.clubs[0]
        .athletes
        .iter()
        .map(|a| (a.entries[0].heatid, a.entries[0].lane))
        .collect();
    assert_eq!(entries[0], (Some(event.heats[0].heatid), Some(3)));
    assert_eq!(entries[1], (Some(event.heats[0].heatid), Some(4)));
    assert_eq!(entries[2], (Some(event.heats[1].heatid), Some(4)));
    assert_eq!(entries[3], (None, None));
    assert_eq!(result.summary.heats, 2);
}

#[test]
fn test_duplicate_entries_reported_not_removed() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013"),
            SheetRow::new("Иванов", "Иван", "01.03.2013"),
        ],
    );

    assert_eq!(meet(&result).clubs[0].athletes[0].entries.len(), 2);
    assert_eq!(result.report.count(IssueCategory::DuplicateEntry), 1);
    let issue = &result.report.groups[&IssueCategory::DuplicateEntry][0];
    assert_eq!(issue.row_repr.as_deref(), Some("Иван Иванов"));
}

#[test]
fn test_points_policy_band() {
    let mut config = test_config();
    config.points.enabled = true;
    config.points.min = 300.0;
    config.points.max = 1000.0;

    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").time("00:25.00"),
            SheetRow::new("Сидоров", "Олег", "01.03.2013").time("00:32.45"),
        ],
    );

    let athletes = &meet(&result).clubs[0].athletes;
    assert_eq!(athletes[0].entries[0].entrytime, SwimTime::from_parts(0, 0, 25, 0));
    assert!(athletes[1].entries[0].entrytime.is_zero());
    assert_eq!(result.report.count(IssueCategory::PointsPolicy), 1);
}

#[test]
fn test_blank_presence_column_skips_row() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "", "01.03.2013"),
            SheetRow::new("Сидоров", "Олег", "01.03.2013"),
        ],
    );

    assert_eq!(result.summary.rows_total, 2);
    assert_eq!(result.summary.rows_skipped, 1);
    assert_eq!(result.summary.athletes, 1);
    assert!(result.report.is_empty());
}

#[test]
fn test_license_normalized() {
    let config = test_config();
    let result = run(
        &config,
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").license("2 юн"),
            SheetRow::new("Сидоров", "Олег", "01.03.2013").license("чемпион"),
        ],
    );

    let athletes = &meet(&result).clubs[0].athletes;
    assert_eq!(athletes[0].license.as_deref(), Some("IIю"));
    assert_eq!(athletes[1].license, None);
}

#[test]
fn test_output_roundtrip_keeps_unknown_elements() {
    let config = test_config();
    let result = run(&config, &[SheetRow::new("Иванов", "Иван", "01.03.2013").seat(1, 5)]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("entries.lxf");
    write_lenex(&output, &result.lenex).unwrap();

    let loaded = read_lenex(&output).unwrap();
    assert_eq!(loaded, result.lenex);
    assert!(loaded
        .extra
        .children
        .iter()
        .any(|node| node.name == "CONSTRUCTOR"));
}
