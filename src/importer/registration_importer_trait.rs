// ==========================================
// 游泳赛事报名转换系统 - 报名导入 Trait
// ==========================================
// 职责: 定义异步转换接口（不包含实现）
// ==========================================

use crate::domain::issue::TranslationRun;
use crate::engine::translator::Translation;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// 一次转换的输入
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub schedule: PathBuf,       // 赛程文档 (.lef / .xml / .lxf)
    pub sheet: PathBuf,          // 报名表 (.xlsx / .xls / .csv)
    pub output: Option<PathBuf>, // 写出路径；None 时不落盘
}

/// 一次转换的输出
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub run: TranslationRun,
    pub translation: Translation,
}

// ==========================================
// RegistrationImporter Trait
// ==========================================
// 实现者: TranslatorService
#[async_trait]
pub trait RegistrationImporter: Send + Sync {
    /// 转换一组文件
    ///
    /// # 返回
    /// - Ok(TranslationOutcome): 文档 + 问题报告 + 运行记录
    /// - Err: 文件读取、文档结构或写出错误（行级问题不会导致失败）
    async fn translate_files(&self, request: TranslationRequest) -> ImportResult<TranslationOutcome>;

    /// 批量转换（并发执行，互不影响）
    async fn batch_translate(
        &self,
        requests: Vec<TranslationRequest>,
    ) -> Vec<Result<TranslationOutcome, String>>;
}
