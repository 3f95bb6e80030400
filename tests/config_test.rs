// ==========================================
// 配置集成测试
// ==========================================
// 测试目标: 配置文件驱动转换行为
// ==========================================

mod test_helpers;

use std::fs;
use swim_reg::config::{BaseTimeTable, ConfigManager, RegistrationConfig};
use swim_reg::domain::{Gender, IssueCategory, RowField};
use swim_reg::engine::Translator;
use swim_reg::importer::{detect_columns, UniversalFileParser};
use tempfile::TempDir;
use test_helpers::{reference_date, write_schedule, write_sheet, SheetRow};

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"exh": false, "location": {"lane": 10, "heat": 11}}"#).unwrap();

    let config = ConfigManager::new(&path).load().unwrap();
    assert!(!config.exh);
    assert_eq!(config.location.column(RowField::Lane), 10);
    // 未写出的字段视为缺失
    assert_eq!(config.location.column(RowField::Lastname), -1);
    assert_eq!(config.birthday, RegistrationConfig::default().birthday);
    assert_eq!(config.presence_column, 1);
}

#[test]
fn test_gender_extension_from_file() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let mut config = RegistrationConfig::default();
    config.genders.insert("муж".to_string(), Gender::Male);
    manager.save(&config).unwrap();

    let schedule = write_schedule(dir.path()).unwrap();
    let sheet = write_sheet(
        dir.path(),
        "entries.csv",
        &[
            SheetRow::new("Иванов", "Иван", "01.03.2013").gender("муж"),
            SheetRow::new("Сидоров", "Олег", "01.03.2013").gender("?"),
        ],
    )
    .unwrap();

    let loaded = manager.load().unwrap();
    let table = BaseTimeTable::embedded().unwrap();
    let result = Translator::new(&loaded, &table)
        .with_reference_date(reference_date())
        .translate_files(&schedule, &sheet)
        .unwrap();

    assert_eq!(result.summary.entries, 1);
    assert_eq!(result.report.count(IssueCategory::ParseError), 1);
    let issue = &result.report.groups[&IssueCategory::ParseError][0];
    assert!(issue.message.starts_with("[IncorrectGender]"));
}

#[test]
fn test_detected_columns_drive_translation() {
    let dir = TempDir::new().unwrap();
    let schedule = write_schedule(dir.path()).unwrap();
    let sheet_path = write_sheet(
        dir.path(),
        "entries.csv",
        &[SheetRow::new("Иванов", "Иван", "01.03.2013").seat(1, 2)],
    )
    .unwrap();

    let mut config = RegistrationConfig::default();
    let sheet = UniversalFileParser.parse(&sheet_path).unwrap();
    let detection = detect_columns(sheet.header(), &config.auto_location, &config.location);
    assert_eq!(detection.mapping.column(RowField::Lane), 10);
    assert_eq!(detection.mapping.column(RowField::Heat), 11);
    assert!(detection.not_found.contains(&RowField::Handicap));
    config.location = detection.mapping;

    let table = BaseTimeTable::embedded().unwrap();
    let result = Translator::new(&config, &table)
        .with_reference_date(reference_date())
        .translate_files(&schedule, &sheet_path)
        .unwrap();
    let entry = &result.lenex.meet().unwrap().clubs[0].athletes[0].entries[0];
    assert_eq!(entry.lane, Some(2));
    assert!(entry.heatid.is_some());
}

#[test]
fn test_invalid_column_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"location": {"lastname": -5}}"#).unwrap();
    assert!(ConfigManager::new(&path).load().is_err());
}
