// ==========================================
// LENEX 文档读写集成测试
// ==========================================
// 测试目标: 赛程解析、未知数据保留、成绩模板转换
// ==========================================

mod test_helpers;

use swim_reg::config::BaseTimeTable;
use swim_reg::engine::Translator;
use swim_reg::lenex::{read_lenex, transform_file, write_lenex};
use tempfile::TempDir;
use test_helpers::{reference_date, test_config, write_schedule, write_sheet, SheetRow};

#[test]
fn test_schedule_parsed() {
    let dir = TempDir::new().unwrap();
    let lenex = read_lenex(&write_schedule(dir.path()).unwrap()).unwrap();

    let meet = lenex.meet().unwrap();
    assert_eq!(meet.name, "Кубок города");
    assert_eq!(meet.course.as_deref(), Some("LCM"));
    let ids: Vec<u32> = meet.events().map(|e| e.eventid).collect();
    assert_eq!(ids, vec![11, 12, 13]);
    assert!(meet.clubs.is_empty());
}

#[test]
fn test_plain_to_archive_keeps_document() {
    let dir = TempDir::new().unwrap();
    let lenex = read_lenex(&write_schedule(dir.path()).unwrap()).unwrap();

    let archive = dir.path().join("meet.lxf");
    write_lenex(&archive, &lenex).unwrap();
    assert_eq!(read_lenex(&archive).unwrap(), lenex);
}

#[test]
fn test_entries_document_to_results_template() {
    let dir = TempDir::new().unwrap();
    let schedule = write_schedule(dir.path()).unwrap();
    let sheet = write_sheet(
        dir.path(),
        "entries.csv",
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013"),
            SheetRow::new("Иванов", "Иван", "01.03.2013").event("на спине", "100"),
        ],
    )
    .unwrap();

    let config = test_config();
    let table = BaseTimeTable::embedded().unwrap();
    let translation = Translator::new(&config, &table)
        .with_reference_date(reference_date())
        .translate_files(&schedule, &sheet)
        .unwrap();

    let entries = dir.path().join("entries.lef");
    write_lenex(&entries, &translation.lenex).unwrap();

    let results = dir.path().join("results.lef");
    let stats = transform_file(&entries, &results).unwrap();
    let counts: Vec<(&str, usize)> = stats.iter().map(|s| (s.from, s.count)).collect();
    assert_eq!(counts, vec![("ENTRIES", 2), ("ENTRY", 2), ("entrytime", 2)]);

    let text = std::fs::read_to_string(&results).unwrap();
    assert!(text.contains("<RESULTS>"));
    assert!(text.contains("swimtime="));
    assert!(!text.contains("ENTRY"));
}
