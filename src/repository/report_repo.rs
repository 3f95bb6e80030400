// ==========================================
// 游泳赛事报名转换系统 - 转换历史 Repository Trait
// ==========================================
// 职责: 定义转换记录与问题报告的数据访问接口
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::issue::{Issue, IssueReport, TranslationRun};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ReportRepository Trait
// ==========================================
// 实现者: ReportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// 保存一次转换及其全部问题（事务化）
    async fn save_run(&self, run: &TranslationRun, report: &IssueReport) -> RepositoryResult<()>;

    /// 最近的转换记录（按开始时间倒序）
    async fn list_runs(&self, limit: usize) -> RepositoryResult<Vec<TranslationRun>>;

    async fn get_run(&self, run_id: &str) -> RepositoryResult<Option<TranslationRun>>;

    /// 指定转换的问题（按记录顺序）
    async fn get_issues(&self, run_id: &str) -> RepositoryResult<Vec<Issue>>;

    /// 删除转换记录（问题级联删除）
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    async fn delete_run(&self, run_id: &str) -> RepositoryResult<bool>;
}
