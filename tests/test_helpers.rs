// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成临时赛程文档、报名表与历史库
// ==========================================
#![allow(dead_code)]

use chrono::NaiveDate;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use swim_reg::config::RegistrationConfig;
use swim_reg::domain::RowField;
use tempfile::NamedTempFile;

/// 赛程: 男女 50 自由泳、男子 100 仰泳，年龄组 10-12
pub const SCHEDULE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LENEX version="3.0">
  <CONSTRUCTOR name="meet-manager" version="1.0"/>
  <MEETS>
    <MEET name="Кубок города" course="LCM" city="Казань">
      <SESSIONS>
        <SESSION number="1" date="2024-06-15">
          <EVENTS>
            <EVENT eventid="11" number="1" gender="M">
              <SWIMSTYLE distance="50" stroke="FREE" relaycount="1"/>
              <AGEGROUPS>
                <AGEGROUP agegroupid="1" agemin="10" agemax="12"/>
              </AGEGROUPS>
            </EVENT>
            <EVENT eventid="12" number="2" gender="F">
              <SWIMSTYLE distance="50" stroke="FREE" relaycount="1"/>
              <AGEGROUPS>
                <AGEGROUP agegroupid="2" agemin="10" agemax="12"/>
              </AGEGROUPS>
            </EVENT>
            <EVENT eventid="13" number="3" gender="M">
              <SWIMSTYLE distance="100" stroke="BACK" relaycount="1"/>
              <AGEGROUPS>
                <AGEGROUP agegroupid="3" agemin="10" agemax="12"/>
              </AGEGROUPS>
            </EVENT>
          </EVENTS>
        </SESSION>
      </SESSIONS>
    </MEET>
  </MEETS>
</LENEX>
"#;

/// 报名表表头（与默认列映射一致，另加泳道与分组）
pub const HEADER: [&str; 12] = [
    "Фамилия",
    "Имя",
    "Отчество",
    "Пол",
    "Дата рождения",
    "Команда",
    "Разряд",
    "Стиль",
    "Дистанция",
    "Заявочное время",
    "Дорожка",
    "Заплыв",
];

/// 报名行构造器
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub lastname: String,
    pub firstname: String,
    pub gender: String,
    pub birthday: String,
    pub club: String,
    pub license: String,
    pub stroke: String,
    pub distance: String,
    pub entrytime: String,
    pub lane: String,
    pub heat: String,
}

impl SheetRow {
    pub fn new(lastname: &str, firstname: &str, birthday: &str) -> Self {
        Self {
            lastname: lastname.to_string(),
            firstname: firstname.to_string(),
            gender: "мужской".to_string(),
            birthday: birthday.to_string(),
            club: "Дельфин".to_string(),
            license: String::new(),
            stroke: "вольный стиль".to_string(),
            distance: "50".to_string(),
            entrytime: "00:32.45".to_string(),
            lane: String::new(),
            heat: String::new(),
        }
    }

    pub fn gender(mut self, gender: &str) -> Self {
        self.gender = gender.to_string();
        self
    }

    pub fn club(mut self, club: &str) -> Self {
        self.club = club.to_string();
        self
    }

    pub fn license(mut self, license: &str) -> Self {
        self.license = license.to_string();
        self
    }

    pub fn event(mut self, stroke: &str, distance: &str) -> Self {
        self.stroke = stroke.to_string();
        self.distance = distance.to_string();
        self
    }

    pub fn time(mut self, entrytime: &str) -> Self {
        self.entrytime = entrytime.to_string();
        self
    }

    pub fn seat(mut self, heat: u32, lane: u32) -> Self {
        self.heat = heat.to_string();
        self.lane = lane.to_string();
        self
    }

    fn record(&self) -> Vec<&str> {
        vec![
            self.lastname.as_str(),
            self.firstname.as_str(),
            "",
            self.gender.as_str(),
            self.birthday.as_str(),
            self.club.as_str(),
            self.license.as_str(),
            self.stroke.as_str(),
            self.distance.as_str(),
            self.entrytime.as_str(),
            self.lane.as_str(),
            self.heat.as_str(),
        ]
    }
}

/// 写出赛程文档
pub fn write_schedule(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("meet.lef");
    fs::write(&path, SCHEDULE_XML)?;
    Ok(path)
}

/// 写出 CSV 报名表（第 1 行为表头）
pub fn write_sheet(dir: &Path, name: &str, rows: &[SheetRow]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(path)
}

/// 默认配置 + 泳道/分组列
pub fn test_config() -> RegistrationConfig {
    let mut config = RegistrationConfig::default();
    config.location.set(RowField::Lane, 10);
    config.location.set(RowField::Heat, 11);
    config
}

/// 年龄计算参考日期（2013 年出生 → 11 岁）
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// 创建临时历史库文件
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();
    Ok((temp_file, db_path))
}
