// ==========================================
// 游泳赛事报名转换系统 - 单次转换上下文
// ==========================================
// 职责: 持有单次转换的全部可变登记表
//   - 俱乐部/运动员登记（IdentityRegistry）
//   - 分组登记（HeatRegistry）
//   - 年龄计算参考日期
// 生命周期: 每次转换新建，转换结束即丢弃
// ==========================================

use crate::engine::heat_assigner::HeatRegistry;
use crate::engine::identity::IdentityRegistry;
use crate::lenex::model::Meet;
use chrono::NaiveDate;

/// 新运动员编号下限
pub const ATHLETE_ID_FLOOR: u32 = 100_000;
/// 新分组编号下限
pub const HEAT_ID_FLOOR: u32 = 1_000;

// ==========================================
// IdGenerator - 顺序编号
// ==========================================
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// 从文档中已有的最大编号之后开始，且不低于下限
    pub fn after(existing: impl IntoIterator<Item = u32>, floor: u32) -> Self {
        let next = existing
            .into_iter()
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(floor)
            .max(floor);
        Self { next }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

// ==========================================
// RunContext
// ==========================================
#[derive(Debug)]
pub struct RunContext {
    pub reference_date: NaiveDate,
    pub registry: IdentityRegistry,
    pub heats: HeatRegistry,
}

impl RunContext {
    pub fn new(meet: &Meet, reference_date: NaiveDate) -> Self {
        let athlete_ids = meet
            .clubs
            .iter()
            .flat_map(|c| c.athletes.iter().map(|a| a.athleteid));
        let heat_ids = meet
            .events()
            .flat_map(|e| e.heats.iter().map(|h| h.heatid));

        Self {
            reference_date,
            registry: IdentityRegistry::new(IdGenerator::after(athlete_ids, ATHLETE_ID_FLOOR)),
            heats: HeatRegistry::new(IdGenerator::after(heat_ids, HEAT_ID_FLOOR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_floor() {
        let mut ids = IdGenerator::after(Vec::<u32>::new(), 1_000);
        assert_eq!(ids.next_id(), 1_000);
        assert_eq!(ids.next_id(), 1_001);

        let mut ids = IdGenerator::after(vec![5, 12], 1_000);
        assert_eq!(ids.next_id(), 1_000);
    }

    #[test]
    fn test_id_generator_after_existing() {
        let mut ids = IdGenerator::after(vec![1_500, 1_200], 1_000);
        assert_eq!(ids.next_id(), 1_501);
    }
}
