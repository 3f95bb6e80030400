// ==========================================
// 游泳赛事报名转换系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 转换历史的持久化，屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod report_repo;
pub mod report_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use report_repo::ReportRepository;
pub use report_repo_impl::ReportRepositoryImpl;
