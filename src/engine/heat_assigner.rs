// ==========================================
// 游泳赛事报名转换系统 - 分组/泳道分配
// ==========================================
// 规则:
//   - 行同时给出分组号与泳道才分配
//   - 键 (项目, 运动员性别, 分组号) 首次出现 → 新分组追加到项目
//   - 重复出现复用同一分组编号
// ==========================================

use crate::domain::types::Gender;
use crate::engine::context::IdGenerator;
use crate::lenex::model::{Entry, Event, Heat};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HeatKey {
    eventid: u32,
    gender: Gender,
    number: u32,
}

#[derive(Debug)]
pub struct HeatRegistry {
    ids: IdGenerator,
    heats: HashMap<HeatKey, u32>,
}

impl HeatRegistry {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            ids,
            heats: HashMap::new(),
        }
    }

    /// 为报名分配分组与泳道
    ///
    /// # 返回
    /// - Some(heatid): 已分配
    /// - None: 行未同时给出分组号与泳道，报名保持未分组
    pub fn assign(
        &mut self,
        event: &mut Event,
        gender: Gender,
        heat: Option<u32>,
        lane: Option<u32>,
        entry: &mut Entry,
    ) -> Option<u32> {
        let (number, lane) = match (heat, lane) {
            (Some(h), Some(l)) if h > 0 && l > 0 => (h, l),
            _ => return None,
        };

        let key = HeatKey {
            eventid: event.eventid,
            gender,
            number,
        };
        let heatid = match self.heats.get(&key) {
            Some(id) => *id,
            None => {
                let id = self.ids.next_id();
                self.heats.insert(key, id);
                event.heats.push(Heat::seeded(id, number));
                debug!(eventid = event.eventid, heatid = id, number, "新建分组");
                id
            }
        };

        entry.heatid = Some(heatid);
        entry.lane = Some(lane);
        Some(heatid)
    }

    /// 本次转换新建的分组数
    pub fn len(&self) -> usize {
        self.heats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heats.is_empty()
    }
}
