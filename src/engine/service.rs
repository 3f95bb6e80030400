// ==========================================
// 游泳赛事报名转换系统 - 转换服务
// ==========================================
// 职责: RegistrationImporter 的实现
//   文件读取与逐行转换放入阻塞线程池
//   写出结果文档、保存转换历史
// ==========================================

use crate::config::{BaseTimeTable, RegistrationConfig};
use crate::domain::issue::TranslationRun;
use crate::engine::translator::{Translation, Translator};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::registration_importer_trait::{
    RegistrationImporter, TranslationOutcome, TranslationRequest,
};
use crate::lenex::write_lenex;
use crate::repository::ReportRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

// ==========================================
// TranslatorService
// ==========================================
pub struct TranslatorService {
    config: Arc<RegistrationConfig>,
    base_times: Arc<BaseTimeTable>,
    reference_date: Option<NaiveDate>,
    report_repo: Option<Arc<dyn ReportRepository>>,
}

impl TranslatorService {
    /// 创建服务实例（不保存历史）
    ///
    /// # 参数
    /// - config: 转换配置
    /// - base_times: 积分基准时间表
    pub fn new(config: RegistrationConfig, base_times: BaseTimeTable) -> Self {
        Self {
            config: Arc::new(config),
            base_times: Arc::new(base_times),
            reference_date: None,
            report_repo: None,
        }
    }

    /// 每次转换后写入历史库
    pub fn with_report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    /// 固定年龄计算参考日期
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    async fn run_blocking(&self, request: &TranslationRequest) -> ImportResult<Translation> {
        let config = Arc::clone(&self.config);
        let base_times = Arc::clone(&self.base_times);
        let reference_date = self.reference_date;
        let request = request.clone();

        tokio::task::spawn_blocking(move || {
            let mut translator = Translator::new(&config, &base_times);
            if let Some(date) = reference_date {
                translator = translator.with_reference_date(date);
            }
            let translation = translator.translate_files(&request.schedule, &request.sheet)?;
            if let Some(output) = &request.output {
                write_lenex(output, &translation.lenex)?;
                info!(output = %output.display(), "结果文档已写出");
            }
            Ok(translation)
        })
        .await
        .map_err(|e| ImportError::TaskFailed(e.to_string()))?
    }

    async fn save_history(&self, run: &TranslationRun, translation: &Translation) {
        let Some(repo) = &self.report_repo else {
            return;
        };
        // 历史写入失败不影响本次转换结果
        if let Err(e) = repo.save_run(run, &translation.report).await {
            warn!(run_id = %run.run_id, error = %e, "转换历史保存失败");
        }
    }
}

#[async_trait]
impl RegistrationImporter for TranslatorService {
    async fn translate_files(&self, request: TranslationRequest) -> ImportResult<TranslationOutcome> {
        let started_at = Utc::now();
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        info!(
            run_id = %run_id,
            schedule = %request.schedule.display(),
            sheet = %request.sheet.display(),
            "开始转换"
        );

        let translation = match self.run_blocking(&request).await {
            Ok(translation) => translation,
            Err(e) => {
                error!(run_id = %run_id, error = %e, "转换失败");
                return Err(e);
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as i64;
        let meet_name = translation
            .lenex
            .meet()
            .map(|meet| meet.name.clone())
            .unwrap_or_default();

        let run = TranslationRun {
            run_id,
            schedule_file: request.schedule.display().to_string(),
            sheet_file: request.sheet.display().to_string(),
            output_file: request.output.as_ref().map(|p| p.display().to_string()),
            meet_name,
            summary: translation.summary.clone(),
            elapsed_ms,
            config_snapshot: self.config.snapshot()?,
            started_at,
        };

        info!(
            run_id = %run.run_id,
            entries = run.summary.entries,
            issues = run.summary.issue_total(),
            elapsed_ms = elapsed_ms,
            "转换完成"
        );

        self.save_history(&run, &translation).await;
        Ok(TranslationOutcome { run, translation })
    }

    async fn batch_translate(
        &self,
        requests: Vec<TranslationRequest>,
    ) -> Vec<Result<TranslationOutcome, String>> {
        use futures::future::join_all;

        info!(count = requests.len(), "开始批量转换");

        let tasks = requests.into_iter().map(|request| {
            let sheet = request.sheet.display().to_string();
            async move {
                match self.translate_files(request).await {
                    Ok(outcome) => {
                        info!(sheet = %sheet, entries = outcome.run.summary.entries, "报名表转换成功");
                        Ok(outcome)
                    }
                    Err(e) => {
                        error!(sheet = %sheet, error = %e, "报名表转换失败");
                        Err(format!("报名表 {} 转换失败: {}", sheet, e))
                    }
                }
            }
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量转换完成"
        );

        results
    }
}
