// ==========================================
// 游泳赛事报名转换系统 - LENEX 文档模型
// ==========================================
// 依据: LENEX 3.0 元素结构
//   LENEX > MEETS > MEET > SESSIONS > SESSION > EVENTS > EVENT
//   EVENT > SWIMSTYLE / AGEGROUPS / HEATS
//   MEET > CLUBS > CLUB > ATHLETES > ATHLETE > HANDICAP / ENTRIES
// 职责: 引擎读写的字段强类型化，其余属性/子元素原样保留
// ==========================================

use crate::domain::types::{EntryStatus, Gender, HeatStatus, SwimTime};
use crate::lenex::error::{LenexError, LenexResult};
use crate::lenex::xml::XmlNode;
use chrono::NaiveDate;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// Extra - 未建模的属性与子元素
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extra {
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Extra {
    fn from_rest(node: XmlNode) -> Self {
        Self {
            attrs: node.attrs,
            children: node.children,
        }
    }

    fn to_node(&self, name: &str) -> XmlNode {
        let mut node = XmlNode::new(name);
        self.apply(&mut node);
        node
    }

    fn apply(&self, node: &mut XmlNode) {
        node.attrs.extend(self.attrs.iter().cloned());
        node.children.extend(self.children.iter().cloned());
    }
}

// ===== 属性解析辅助 =====

fn required(node: &mut XmlNode, attr: &str) -> LenexResult<String> {
    node.take_attr(attr).ok_or_else(|| LenexError::MissingAttribute {
        element: node.name.clone(),
        attribute: attr.to_string(),
    })
}

fn parse_value<T: FromStr>(element: &str, attr: &str, value: String) -> LenexResult<T> {
    value.trim().parse::<T>().map_err(|_| LenexError::InvalidAttribute {
        element: element.to_string(),
        attribute: attr.to_string(),
        value,
    })
}

fn required_num<T: FromStr>(node: &mut XmlNode, attr: &str) -> LenexResult<T> {
    let value = required(node, attr)?;
    parse_value(&node.name, attr, value)
}

fn optional_num<T: FromStr>(node: &mut XmlNode, attr: &str) -> LenexResult<Option<T>> {
    node.take_attr(attr)
        .map(|v| parse_value(&node.name, attr, v))
        .transpose()
}

/// 取出容器元素下的条目列表（如 EVENTS > EVENT）
fn take_list(node: &mut XmlNode, container: &str, item: &str) -> Vec<XmlNode> {
    node.take_children(container)
        .into_iter()
        .flat_map(|mut c| c.take_children(item))
        .collect()
}

fn push_list(node: &mut XmlNode, container: &str, items: Vec<XmlNode>) {
    if items.is_empty() {
        return;
    }
    let mut wrapper = XmlNode::new(container);
    wrapper.children = items;
    node.children.push(wrapper);
}

// ==========================================
// Lenex - 文档根
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Lenex {
    pub version: String,
    pub meets: Vec<Meet>,
    pub extra: Extra,
}

impl Lenex {
    pub fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        if node.name != "LENEX" {
            return Err(LenexError::Structure(format!(
                "根元素应为 LENEX，实际为 {}",
                node.name
            )));
        }
        let version = node.take_attr("version").unwrap_or_else(|| "3.0".to_string());
        let meets = take_list(&mut node, "MEETS", "MEET")
            .into_iter()
            .map(Meet::from_node)
            .collect::<LenexResult<Vec<_>>>()?;

        Ok(Self {
            version,
            meets,
            extra: Extra::from_rest(node),
        })
    }

    pub fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("LENEX");
        node.set_attr("version", self.version.clone());
        self.extra.apply(&mut node);
        push_list(
            &mut node,
            "MEETS",
            self.meets.iter().map(Meet::to_node).collect(),
        );
        node
    }

    /// 第一个赛事（报名转换只处理单赛事文档）
    pub fn meet(&self) -> Option<&Meet> {
        self.meets.first()
    }

    pub fn meet_mut(&mut self) -> Option<&mut Meet> {
        self.meets.first_mut()
    }
}

// ==========================================
// Meet - 赛事
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Meet {
    pub name: String,
    pub course: Option<String>, // LCM / SCM / SCY ...
    pub sessions: Vec<Session>,
    pub clubs: Vec<Club>,
    pub extra: Extra,
}

impl Meet {
    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let name = node.take_attr("name").unwrap_or_default();
        let course = node.take_attr("course");
        let sessions = take_list(&mut node, "SESSIONS", "SESSION")
            .into_iter()
            .map(Session::from_node)
            .collect::<LenexResult<Vec<_>>>()?;
        let clubs = take_list(&mut node, "CLUBS", "CLUB")
            .into_iter()
            .map(Club::from_node)
            .collect::<LenexResult<Vec<_>>>()?;

        Ok(Self {
            name,
            course,
            sessions,
            clubs,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("MEET");
        node.set_attr("name", self.name.clone());
        if let Some(course) = &self.course {
            node.set_attr("course", course.clone());
        }
        self.extra.apply(&mut node);
        push_list(
            &mut node,
            "CLUBS",
            self.clubs.iter().map(Club::to_node).collect(),
        );
        push_list(
            &mut node,
            "SESSIONS",
            self.sessions.iter().map(Session::to_node).collect(),
        );
        node
    }

    /// 按赛程顺序遍历全部项目
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.sessions.iter().flat_map(|s| s.events.iter())
    }

    pub fn event_mut(&mut self, session: usize, event: usize) -> Option<&mut Event> {
        self.sessions.get_mut(session)?.events.get_mut(event)
    }
}

// ==========================================
// Session - 场次
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub number: Option<u32>,
    pub events: Vec<Event>,
    pub extra: Extra,
}

impl Session {
    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let number = optional_num(&mut node, "number")?;
        let events = take_list(&mut node, "EVENTS", "EVENT")
            .into_iter()
            .map(Event::from_node)
            .collect::<LenexResult<Vec<_>>>()?;
        Ok(Self {
            number,
            events,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("SESSION");
        if let Some(number) = self.number {
            node.set_attr("number", number.to_string());
        }
        self.extra.apply(&mut node);
        push_list(
            &mut node,
            "EVENTS",
            self.events.iter().map(Event::to_node).collect(),
        );
        node
    }
}

// ==========================================
// Event - 项目
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub eventid: u32,
    pub number: Option<u32>,
    pub gender: Option<String>, // M / F / X / A，缺省为不限
    pub swimstyle: SwimStyle,
    pub agegroups: Vec<AgeGroup>,
    pub heats: Vec<Heat>,
    pub extra: Extra,
}

impl Event {
    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let eventid = required_num(&mut node, "eventid")?;
        let number = optional_num(&mut node, "number")?;
        let gender = node.take_attr("gender");
        let swimstyle = node
            .take_child("SWIMSTYLE")
            .ok_or_else(|| {
                LenexError::Structure(format!("项目 {} 缺少 SWIMSTYLE", eventid))
            })
            .and_then(SwimStyle::from_node)?;
        let agegroups = take_list(&mut node, "AGEGROUPS", "AGEGROUP")
            .into_iter()
            .map(AgeGroup::from_node)
            .collect::<LenexResult<Vec<_>>>()?;
        let heats = take_list(&mut node, "HEATS", "HEAT")
            .into_iter()
            .map(Heat::from_node)
            .collect::<LenexResult<Vec<_>>>()?;

        Ok(Self {
            eventid,
            number,
            gender,
            swimstyle,
            agegroups,
            heats,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("EVENT");
        node.set_attr("eventid", self.eventid.to_string());
        if let Some(number) = self.number {
            node.set_attr("number", number.to_string());
        }
        if let Some(gender) = &self.gender {
            node.set_attr("gender", gender.clone());
        }
        self.extra.apply(&mut node);
        node.children.push(self.swimstyle.to_node());
        push_list(
            &mut node,
            "AGEGROUPS",
            self.agegroups.iter().map(AgeGroup::to_node).collect(),
        );
        push_list(
            &mut node,
            "HEATS",
            self.heats.iter().map(Heat::to_node).collect(),
        );
        node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwimStyle {
    pub distance: u32,
    pub stroke: String,
    pub extra: Extra,
}

impl SwimStyle {
    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let distance = required_num(&mut node, "distance")?;
        let stroke = required(&mut node, "stroke")?;
        Ok(Self {
            distance,
            stroke,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("SWIMSTYLE");
        node.set_attr("distance", self.distance.to_string());
        node.set_attr("stroke", self.stroke.clone());
        self.extra.apply(&mut node);
        node
    }
}

/// 年龄组；-1 表示该侧不设限
#[derive(Debug, Clone, PartialEq)]
pub struct AgeGroup {
    pub agemin: i32,
    pub agemax: i32,
    pub extra: Extra,
}

impl AgeGroup {
    pub fn new(agemin: i32, agemax: i32) -> Self {
        Self {
            agemin,
            agemax,
            extra: Extra::default(),
        }
    }

    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let agemin = optional_num(&mut node, "agemin")?.unwrap_or(-1);
        let agemax = optional_num(&mut node, "agemax")?.unwrap_or(-1);
        Ok(Self {
            agemin,
            agemax,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = self.extra.to_node("AGEGROUP");
        node.set_attr("agemin", self.agemin.to_string());
        node.set_attr("agemax", self.agemax.to_string());
        node
    }
}

// ==========================================
// Heat - 分组
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Heat {
    pub heatid: u32,
    pub number: u32,
    pub order: Option<u32>,
    pub status: Option<String>,
    pub extra: Extra,
}

impl Heat {
    /// 报名转换生成的已编排分组（order = number）
    pub fn seeded(heatid: u32, number: u32) -> Self {
        Self {
            heatid,
            number,
            order: Some(number),
            status: Some(HeatStatus::Seeded.lenex_code().to_string()),
            extra: Extra::default(),
        }
    }

    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        Ok(Self {
            heatid: required_num(&mut node, "heatid")?,
            number: required_num(&mut node, "number")?,
            order: optional_num(&mut node, "order")?,
            status: node.take_attr("status"),
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("HEAT");
        node.set_attr("heatid", self.heatid.to_string());
        node.set_attr("number", self.number.to_string());
        if let Some(order) = self.order {
            node.set_attr("order", order.to_string());
        }
        if let Some(status) = &self.status {
            node.set_attr("status", status.clone());
        }
        self.extra.apply(&mut node);
        node
    }
}

// ==========================================
// Club - 俱乐部
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Club {
    pub name: String,
    pub athletes: Vec<Athlete>,
    pub extra: Extra,
}

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            athletes: Vec::new(),
            extra: Extra::default(),
        }
    }

    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let name = node.take_attr("name").unwrap_or_default();
        let athletes = take_list(&mut node, "ATHLETES", "ATHLETE")
            .into_iter()
            .map(Athlete::from_node)
            .collect::<LenexResult<Vec<_>>>()?;
        Ok(Self {
            name,
            athletes,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("CLUB");
        node.set_attr("name", self.name.clone());
        self.extra.apply(&mut node);
        push_list(
            &mut node,
            "ATHLETES",
            self.athletes.iter().map(Athlete::to_node).collect(),
        );
        node
    }
}

// ==========================================
// Athlete - 运动员
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Athlete {
    pub athleteid: u32,
    pub lastname: String,
    pub firstname: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub license: Option<String>,
    pub handicap: Option<Handicap>,
    pub entries: Vec<Entry>,
    pub extra: Extra,
}

impl Athlete {
    pub fn new(
        athleteid: u32,
        lastname: impl Into<String>,
        firstname: impl Into<String>,
        gender: Gender,
        birthdate: NaiveDate,
    ) -> Self {
        Self {
            athleteid,
            lastname: lastname.into(),
            firstname: firstname.into(),
            gender,
            birthdate,
            license: None,
            handicap: None,
            entries: Vec::new(),
            extra: Extra::default(),
        }
    }

    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let athleteid = required_num(&mut node, "athleteid")?;
        let lastname = node.take_attr("lastname").unwrap_or_default();
        let firstname = node.take_attr("firstname").unwrap_or_default();
        let gender = required_num::<Gender>(&mut node, "gender")?;
        let raw_birthdate = required(&mut node, "birthdate")?;
        let birthdate = NaiveDate::parse_from_str(raw_birthdate.trim(), DATE_FORMAT).map_err(|_| {
            LenexError::InvalidAttribute {
                element: node.name.clone(),
                attribute: "birthdate".to_string(),
                value: raw_birthdate.clone(),
            }
        })?;
        let license = node.take_attr("license");
        let handicap = node
            .take_child("HANDICAP")
            .map(Handicap::from_node)
            .transpose()?;
        let entries = take_list(&mut node, "ENTRIES", "ENTRY")
            .into_iter()
            .map(Entry::from_node)
            .collect::<LenexResult<Vec<_>>>()?;

        Ok(Self {
            athleteid,
            lastname,
            firstname,
            gender,
            birthdate,
            license,
            handicap,
            entries,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("ATHLETE");
        node.set_attr("athleteid", self.athleteid.to_string());
        node.set_attr("lastname", self.lastname.clone());
        node.set_attr("firstname", self.firstname.clone());
        node.set_attr("gender", self.gender.code());
        node.set_attr("birthdate", self.birthdate.format(DATE_FORMAT).to_string());
        if let Some(license) = &self.license {
            node.set_attr("license", license.clone());
        }
        self.extra.apply(&mut node);
        if let Some(handicap) = &self.handicap {
            node.children.push(handicap.to_node());
        }
        push_list(
            &mut node,
            "ENTRIES",
            self.entries.iter().map(Entry::to_node).collect(),
        );
        node
    }
}

/// 残疾分级（LENEX HANDICAP: free / breast / medley）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handicap {
    pub free: Option<u8>,
    pub breast: Option<u8>,
    pub medley: Option<u8>,
    pub extra: Extra,
}

impl Handicap {
    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        Ok(Self {
            free: optional_num(&mut node, "free")?,
            breast: optional_num(&mut node, "breast")?,
            medley: optional_num(&mut node, "medley")?,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = self.extra.to_node("HANDICAP");
        for (key, value) in [
            ("free", self.free),
            ("breast", self.breast),
            ("medley", self.medley),
        ] {
            if let Some(v) = value {
                node.set_attr(key, v.to_string());
            }
        }
        node
    }
}

// ==========================================
// Entry - 报名
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub eventid: u32,
    pub entrytime: SwimTime,
    pub status: EntryStatus,
    pub heatid: Option<u32>,
    pub lane: Option<u32>,
    pub extra: Extra,
}

impl Entry {
    pub fn new(eventid: u32, entrytime: SwimTime, status: EntryStatus) -> Self {
        Self {
            eventid,
            entrytime,
            status,
            heatid: None,
            lane: None,
            extra: Extra::default(),
        }
    }

    fn from_node(mut node: XmlNode) -> LenexResult<Self> {
        let eventid = required_num(&mut node, "eventid")?;
        let entrytime = match node.take_attr("entrytime") {
            Some(raw) => SwimTime::parse_lenex(&raw).ok_or_else(|| LenexError::InvalidAttribute {
                element: node.name.clone(),
                attribute: "entrytime".to_string(),
                value: raw.clone(),
            })?,
            None => SwimTime::ZERO,
        };
        // 仅 EXH 建模，其余状态码原样保留
        let status = if node.attr("status") == Some("EXH") {
            node.take_attr("status");
            EntryStatus::Exh
        } else {
            EntryStatus::Normal
        };

        Ok(Self {
            eventid,
            entrytime,
            status,
            heatid: optional_num(&mut node, "heatid")?,
            lane: optional_num(&mut node, "lane")?,
            extra: Extra::from_rest(node),
        })
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("ENTRY");
        node.set_attr("eventid", self.eventid.to_string());
        node.set_attr("entrytime", self.entrytime.to_lenex());
        if let Some(status) = self.status.lenex_code() {
            node.set_attr("status", status);
        }
        if let Some(heatid) = self.heatid {
            node.set_attr("heatid", heatid.to_string());
        }
        if let Some(lane) = self.lane {
            node.set_attr("lane", lane.to_string());
        }
        self.extra.apply(&mut node);
        node
    }
}
