// ==========================================
// 游泳赛事报名转换系统 - 引擎层
// ==========================================
// 职责: 逐行转换规则（身份、项目匹配、积分、分组）与编排
// 红线: Engine 不拼 SQL，行级问题全部进入问题报告
// ==========================================

pub mod context;
pub mod event_matcher;
pub mod heat_assigner;
pub mod identity;
pub mod points;
pub mod service;
pub mod translator;

// 重导出核心引擎
pub use context::{IdGenerator, RunContext};
pub use event_matcher::{AgeSpan, Candidate, EventIndex, EventMatch, EventMatcher};
pub use heat_assigner::HeatRegistry;
pub use identity::{AthleteId, ClubId, IdentityRegistry};
pub use points::{PointsOutcome, PointsValidator};
pub use service::TranslatorService;
pub use translator::{Translation, Translator};
