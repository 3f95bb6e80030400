// ==========================================
// 游泳赛事报名转换系统 - 转换编排器
// ==========================================
// 流程（逐行，按表格顺序）:
//   解码 → 身份解析 → 项目匹配 → 积分校验 → 分组/泳道 → 写入报名
// 收尾:
//   俱乐部写入赛事 → 重复报名检查 → 统计
// 隔离: 行级错误只跳过当前行，转换总是返回尽力而为的文档
// ==========================================

use crate::config::{BaseTimeTable, RegistrationConfig};
use crate::domain::issue::{Issue, IssueReport, RunSummary};
use crate::domain::row::{Cell, DecodedRow};
use crate::domain::types::{IssueCategory, Severity};
use crate::engine::context::RunContext;
use crate::engine::event_matcher::{EventIndex, EventMatcher};
use crate::engine::points::PointsValidator;
use crate::i18n::t_in;
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult, RowError, RowResult};
use crate::importer::file_parser::{Sheet, UniversalFileParser};
use crate::importer::issue_collector::IssueCollector;
use crate::importer::row_decoder::RowDecoder;
use crate::lenex::model::{Entry, Lenex, Meet};
use crate::lenex::read_lenex;
use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// Translation - 单次转换结果
// ==========================================
#[derive(Debug, Clone)]
pub struct Translation {
    pub lenex: Lenex,
    pub report: IssueReport,
    pub summary: RunSummary,
}

// ==========================================
// Translator
// ==========================================
pub struct Translator<'a> {
    config: &'a RegistrationConfig,
    base_times: &'a BaseTimeTable,
    reference_date: NaiveDate,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a RegistrationConfig, base_times: &'a BaseTimeTable) -> Self {
        Self {
            config,
            base_times,
            reference_date: Local::now().date_naive(),
        }
    }

    /// 指定年龄计算参考日期（缺省为当天）
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    /// 读取赛程文档与报名表并转换
    pub fn translate_files(&self, schedule: &Path, sheet: &Path) -> ImportResult<Translation> {
        debug!("步骤 1: 读取赛程文档");
        let lenex = read_lenex(schedule)?;

        debug!("步骤 2: 解析报名表");
        let sheet = UniversalFileParser.parse(sheet)?;
        if sheet.header().is_empty() && sheet.data_row_count() == 0 {
            return Err(ImportError::EmptySheet(sheet.name.clone()));
        }

        self.translate(lenex, &sheet)
    }

    #[instrument(skip_all, fields(sheet = %sheet.name, rows = sheet.data_row_count()))]
    pub fn translate(&self, mut lenex: Lenex, sheet: &Sheet) -> ImportResult<Translation> {
        let meet = lenex.meet_mut().ok_or(ImportError::NoMeet)?;
        info!(meet = %meet.name, "转换开始");

        let index = EventIndex::build(meet);
        let decoder = RowDecoder::new(&self.config.location);
        let matcher = EventMatcher::new(&index, self.config);
        let course = meet.course.clone();
        let points = PointsValidator::new(
            &self.config.points,
            self.base_times,
            course.as_deref(),
            &self.config.locale,
        );
        let mut ctx = RunContext::new(meet, self.reference_date);
        let mut issues = IssueCollector::new();
        let mut summary = RunSummary::default();

        debug!(candidates = index.len(), "步骤 3: 逐行处理");
        for (row_index, cells) in sheet.data_rows() {
            summary.rows_total += 1;
            if cells
                .get(self.config.presence_column)
                .map_or(true, Cell::is_empty)
            {
                summary.rows_skipped += 1;
                continue;
            }

            if self.config.debug {
                debug!(row = row_index, cells = ?cells, "处理行");
            }

            let decoded = match decoder.decode(cells, row_index, sheet) {
                Ok(decoded) => decoded,
                Err(err) => {
                    summary.rows_failed += 1;
                    let repr = cells.iter().map(Cell::to_string).collect::<Vec<_>>().join(" | ");
                    let mut issue = self.failure_issue(&err).with_repr(repr);
                    issue.row_index = Some(row_index);
                    issues.add(issue);
                    continue;
                }
            };

            let step = PipelineStep {
                matcher: &matcher,
                points: &points,
            };
            if let Err(err) = self.process_row(meet, &mut ctx, &step, &decoded, &mut issues) {
                summary.rows_failed += 1;
                // 项目/年龄错误已由匹配器记录
                if !err.is_reported() {
                    issues.add(self.failure_issue(&err).with_row(&decoded.row));
                }
            }
        }

        debug!("步骤 4: 收尾");
        summary.clubs = ctx.registry.club_count();
        summary.athletes = ctx.registry.athlete_count();
        summary.entries = ctx.registry.entry_count();
        summary.heats = ctx.heats.len();
        info!(
            clubs = summary.clubs,
            athletes = summary.athletes,
            entries = summary.entries,
            heats = summary.heats,
            "登记统计"
        );

        self.report_duplicates(&ctx, &mut issues);
        attach_clubs(meet, ctx);

        summary.issues = issues.counts();
        info!(
            rows = summary.rows_total,
            skipped = summary.rows_skipped,
            failed = summary.rows_failed,
            issues = summary.issue_total(),
            "转换完成"
        );

        Ok(Translation {
            lenex,
            report: issues.into_report(),
            summary,
        })
    }

    fn process_row(
        &self,
        meet: &mut Meet,
        ctx: &mut RunContext,
        step: &PipelineStep<'_>,
        decoded: &DecodedRow,
        issues: &mut IssueCollector,
    ) -> RowResult<()> {
        let row = &decoded.row;

        for warning in &decoded.warnings {
            let message = t_in(
                &self.config.locale,
                "issue.entry_time_ignored",
                &[("value", warning.value.as_str())],
            );
            issues.add(
                Issue::new(IssueCategory::ParseError, message, Severity::Warning)
                    .with_row(row)
                    .with_extra("field", warning.field.name())
                    .with_extra("value", warning.value.clone()),
            );
        }

        let athlete_id = ctx.registry.resolve(row, self.config)?;
        let athlete = ctx.registry.athlete(athlete_id);
        let gender = athlete.gender;

        let matched = step
            .matcher
            .match_event(athlete, row, ctx.reference_date, issues)?;
        let entrytime = step.points.validate(
            row.entrytime,
            gender,
            matched.distance,
            &matched.stroke,
            row,
            issues,
        );

        let mut entry = Entry::new(matched.candidate.eventid, entrytime, matched.status);
        if let Some(event) = meet.event_mut(matched.candidate.session, matched.candidate.event) {
            ctx.heats.assign(event, gender, row.heat, row.lane, &mut entry);
        }
        ctx.registry.athlete_mut(athlete_id).entries.push(entry);
        Ok(())
    }

    fn failure_issue(&self, err: &RowError) -> Issue {
        let message = err.to_string();
        let message = t_in(
            &self.config.locale,
            "issue.parse_error",
            &[("kind", err.kind()), ("message", message.as_str())],
        );
        Issue::new(err.category(), message, Severity::Error)
    }

    /// 重复报名: 仅报告，不删除
    fn report_duplicates(&self, ctx: &RunContext, issues: &mut IssueCollector) {
        for duplicate in ConflictHandler.detect_duplicate_entries(ctx.registry.athletes()) {
            let name = format!("{} {}", duplicate.firstname, duplicate.lastname);
            let message = t_in(
                &self.config.locale,
                "issue.duplicate_entry",
                &[("name", name.as_str())],
            );
            issues.add(
                Issue::new(IssueCategory::DuplicateEntry, message, Severity::Warning)
                    .with_repr(name)
                    .with_extra("athleteid", duplicate.athleteid)
                    .with_extra("eventid", duplicate.eventid),
            );
        }
    }
}

/// 单行管道中不随行变化的组件
struct PipelineStep<'a> {
    matcher: &'a EventMatcher<'a>,
    points: &'a PointsValidator<'a>,
}

fn attach_clubs(meet: &mut Meet, ctx: RunContext) {
    if !meet.clubs.is_empty() {
        warn!(count = meet.clubs.len(), "赛程文档中已有的俱乐部将被替换");
    }
    meet.clubs = ctx.registry.into_clubs();
}
