// ==========================================
// 游泳赛事报名转换系统 - 身份解析器
// ==========================================
// 职责: 俱乐部/运动员去重（单次转换内）
// 存储: 整数索引的 arena，俱乐部仅持有运动员索引
// 键:
//   - 俱乐部: 名称小写
//   - 运动员: "名;姓;父称;性别;出生日期原文" 小写
// ==========================================

use crate::config::RegistrationConfig;
use crate::domain::row::{Cell, FieldValue, Row, RowField};
use crate::engine::context::IdGenerator;
use crate::importer::data_cleaner::{normalize_license, parse_birthday, parse_handicap, resolve_gender};
use crate::importer::error::{RowError, RowResult};
use crate::lenex::model::{Athlete, Club};
use std::collections::HashMap;
use tracing::debug;

/// 运动员 arena 索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AthleteId(usize);

/// 俱乐部 arena 索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClubId(usize);

#[derive(Debug, Clone)]
struct ClubRecord {
    name: String,
    athletes: Vec<AthleteId>,
}

#[derive(Debug)]
pub struct IdentityRegistry {
    athletes: Vec<Athlete>,
    athlete_index: HashMap<String, AthleteId>,
    clubs: Vec<ClubRecord>,
    club_index: HashMap<String, ClubId>,
    ids: IdGenerator,
}

impl IdentityRegistry {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            athletes: Vec::new(),
            athlete_index: HashMap::new(),
            clubs: Vec::new(),
            club_index: HashMap::new(),
            ids,
        }
    }

    /// 解析行对应的运动员（必要时创建俱乐部与运动员）
    ///
    /// # 返回
    /// - Ok(AthleteId): 已有或新建的运动员
    /// - Err: 必填字段缺失、性别或出生日期无法识别（仅影响当前行）
    pub fn resolve(&mut self, row: &Row, config: &RegistrationConfig) -> RowResult<AthleteId> {
        let club = self.club(row)?;

        let key = athlete_key(row);
        if let Some(id) = self.athlete_index.get(&key) {
            return Ok(*id);
        }

        let athlete = self.build_athlete(row, config)?;
        debug!(
            athleteid = athlete.athleteid,
            row = row.row_index,
            "新建运动员"
        );

        let id = AthleteId(self.athletes.len());
        self.athletes.push(athlete);
        self.athlete_index.insert(key, id);
        // 仅在首次创建时加入俱乐部
        self.clubs[club.0].athletes.push(id);
        Ok(id)
    }

    fn club(&mut self, row: &Row) -> RowResult<ClubId> {
        let name = required(&row.club, RowField::Club)?;
        let key = name.to_lowercase();
        if let Some(id) = self.club_index.get(&key) {
            return Ok(*id);
        }

        let id = ClubId(self.clubs.len());
        self.clubs.push(ClubRecord {
            name: name.clone(),
            athletes: Vec::new(),
        });
        self.club_index.insert(key, id);
        Ok(id)
    }

    fn build_athlete(&mut self, row: &Row, config: &RegistrationConfig) -> RowResult<Athlete> {
        let lastname = required(&row.lastname, RowField::Lastname)?;
        let firstname = required(&row.firstname, RowField::Firstname)?;
        let birthday = required(&row.birthday, RowField::Birthday)?;
        let gender_text = required(&row.gender, RowField::Gender)?;

        let birthdate = parse_birthday(birthday, &config.birthday)?;
        let gender = resolve_gender(gender_text, &config.genders)?;

        let mut athlete = Athlete::new(self.ids.next_id(), lastname, firstname, gender, birthdate);
        athlete.license = row
            .license
            .as_deref()
            .and_then(|raw| normalize_license(raw, &config.replacement, &config.licenses));
        athlete.handicap = row.handicap.as_deref().and_then(parse_handicap);
        Ok(athlete)
    }

    pub fn athlete(&self, id: AthleteId) -> &Athlete {
        &self.athletes[id.0]
    }

    pub fn athlete_mut(&mut self, id: AthleteId) -> &mut Athlete {
        &mut self.athletes[id.0]
    }

    /// 按创建顺序遍历运动员
    pub fn athletes(&self) -> impl Iterator<Item = &Athlete> {
        self.athletes.iter()
    }

    pub fn club_count(&self) -> usize {
        self.clubs.len()
    }

    pub fn athlete_count(&self) -> usize {
        self.athletes.len()
    }

    pub fn entry_count(&self) -> usize {
        self.athletes.iter().map(|a| a.entries.len()).sum()
    }

    /// 生成文档中的俱乐部列表（按创建顺序，运动员按加入顺序）
    pub fn into_clubs(self) -> Vec<Club> {
        let mut slots: Vec<Option<Athlete>> = self.athletes.into_iter().map(Some).collect();
        self.clubs
            .into_iter()
            .map(|record| {
                let mut club = Club::new(record.name);
                club.athletes = record
                    .athletes
                    .iter()
                    .filter_map(|id| slots[id.0].take())
                    .collect();
                club
            })
            .collect()
    }
}

fn required<T>(value: &FieldValue<T>, field: RowField) -> RowResult<&T> {
    value.value().ok_or(RowError::MissingField(field))
}

fn athlete_key(row: &Row) -> String {
    let birthday = row.birthday.value().map(Cell::to_string).unwrap_or_default();
    [
        row.firstname.to_string(),
        row.lastname.to_string(),
        row.middlename.clone().unwrap_or_else(|| "None".to_string()),
        row.gender.to_string(),
        birthday,
    ]
    .join(";")
    .to_lowercase()
}
