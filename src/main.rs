// ==========================================
// 游泳赛事报名转换系统 - 命令行入口
// ==========================================
// 子命令: translate / detect-columns / config / history / to-results
// 日志写 stderr，结果摘要写 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swim_reg::config::{BaseTimeTable, ConfigManager, RegistrationConfig};
use swim_reg::domain::RunSummary;
use swim_reg::engine::TranslatorService;
use swim_reg::i18n::t_in;
use swim_reg::importer::{detect_columns, RegistrationImporter, TranslationRequest, UniversalFileParser};
use swim_reg::lenex::transform_file;
use swim_reg::logging::{self, LogFormat};
use swim_reg::repository::{ReportRepository, ReportRepositoryImpl};
use tracing::info;

const HISTORY_DB: &str = "history.db";

#[derive(Parser)]
#[command(name = "swim-reg", version, about = "Registration sheets → LENEX entries")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// 配置文件（缺省为系统配置目录下的 swim-reg/config.json）
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 日志格式
    #[arg(long = "log-format", value_enum, default_value = "text", global = true)]
    log_format: LogFormatArg,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// 将报名表写入赛程文档
    Translate(TranslateArgs),

    /// 按表头文字定位列
    DetectColumns {
        #[arg(long, value_name = "PATH")]
        sheet: PathBuf,
    },

    /// 配置文件管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 查看转换历史
    History(HistoryArgs),

    /// 报名文档转换为成绩模板
    ToResults {
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
}

#[derive(Parser)]
struct TranslateArgs {
    /// 赛程文档 (.lef / .xml / .lxf)
    #[arg(long, value_name = "PATH")]
    schedule: PathBuf,

    /// 报名表 (.xlsx / .xls / .csv)，可多次指定
    #[arg(long, value_name = "PATH", required = true)]
    sheet: Vec<PathBuf>,

    /// 输出文档；多个报名表时作为目录
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// 问题报告 (JSON)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// 按表头自动定位列
    #[arg(long)]
    auto_columns: bool,

    /// 年龄计算参考日期 (YYYY-MM-DD)，缺省为当天
    #[arg(long, value_name = "DATE")]
    reference_date: Option<NaiveDate>,

    /// 保存转换历史
    #[arg(long, value_name = "PATH")]
    history_db: Option<PathBuf>,

    /// 不保存转换历史
    #[arg(long, conflicts_with = "history_db")]
    no_history: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 写出默认配置
    Init {
        #[arg(long)]
        force: bool,
    },
    /// 显示当前生效的配置
    Show,
}

#[derive(Parser)]
struct HistoryArgs {
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// 显示指定转换的全部问题
    #[arg(long, value_name = "RUN_ID")]
    run: Option<String>,

    /// 删除指定转换
    #[arg(long, value_name = "RUN_ID", conflicts_with = "run")]
    delete: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    };
    logging::init_with(format, if cli.verbose { "debug" } else { "warn" });

    let manager = match &cli.config {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::with_default_path()?,
    };

    match cli.command {
        Command::Translate(args) => translate(&manager, args).await,
        Command::DetectColumns { sheet } => detect(&manager, &sheet),
        Command::Config { action } => config_command(&manager, action),
        Command::History(args) => history(&manager, args).await,
        Command::ToResults { input, output } => to_results(&manager, &input, &output),
    }
}

async fn translate(manager: &ConfigManager, args: TranslateArgs) -> Result<()> {
    let mut config = manager.load().context("加载配置失败")?;
    let base_times = BaseTimeTable::load(config.points.base_times.as_deref())
        .context("加载积分基准时间失败")?;

    if args.auto_columns {
        // 以第一个报名表的表头为准
        let sheet = UniversalFileParser.parse(&args.sheet[0])?;
        let detection = detect_columns(sheet.header(), &config.auto_location, &config.location);
        info!(matched = detection.matched.len(), not_found = detection.not_found.len(), "自动定位列");
        config.location = detection.mapping;
    }

    let locale = config.locale.clone();
    let mut service = TranslatorService::new(config, base_times);
    if let Some(date) = args.reference_date {
        service = service.with_reference_date(date);
    }
    if !args.no_history {
        let db = match &args.history_db {
            Some(path) => path.clone(),
            None => default_history_db(manager),
        };
        service = service.with_report_repo(open_history(&db)?);
    }

    let requests = build_requests(&args)?;
    let single = requests.len() == 1;
    let outcomes = service.batch_translate(requests).await;

    let mut reports = Vec::new();
    let mut failures = 0;
    for outcome in outcomes {
        match outcome {
            Ok(outcome) => {
                let output = outcome.run.output_file.clone().unwrap_or_default();
                println!("{}", t_in(&locale, "cli.translate_done", &[("output", output.as_str())]));
                print_summary(&locale, &outcome.run.summary);
                reports.push((outcome.run.sheet_file.clone(), outcome.translation.report));
            }
            Err(message) => {
                eprintln!("{}", message);
                failures += 1;
            }
        }
    }

    if let Some(path) = &args.report {
        let json = if single {
            serde_json::to_string_pretty(&reports.first().map(|(_, report)| report))?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        fs::write(path, json).with_context(|| format!("写出问题报告失败: {}", path.display()))?;
        let path = path.display().to_string();
        println!("{}", t_in(&locale, "cli.report_written", &[("path", path.as_str())]));
    }

    if failures > 0 {
        bail!("{} 个报名表转换失败", failures);
    }
    Ok(())
}

fn build_requests(args: &TranslateArgs) -> Result<Vec<TranslationRequest>> {
    if args.sheet.len() == 1 {
        return Ok(vec![TranslationRequest {
            schedule: args.schedule.clone(),
            sheet: args.sheet[0].clone(),
            output: Some(args.output.clone()),
        }]);
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("无法创建输出目录: {}", args.output.display()))?;
    let extension = args
        .schedule
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("lef");

    args.sheet
        .iter()
        .map(|sheet| {
            let stem = sheet
                .file_stem()
                .and_then(|s| s.to_str())
                .context("报名表文件名无效")?;
            Ok(TranslationRequest {
                schedule: args.schedule.clone(),
                sheet: sheet.clone(),
                output: Some(args.output.join(format!("{}.{}", stem, extension))),
            })
        })
        .collect()
}

fn print_summary(locale: &str, summary: &RunSummary) {
    let numbers = [
        ("rows", summary.rows_total),
        ("skipped", summary.rows_skipped),
        ("failed", summary.rows_failed),
        ("clubs", summary.clubs),
        ("athletes", summary.athletes),
        ("entries", summary.entries),
        ("heats", summary.heats),
    ]
    .map(|(key, value)| (key, value.to_string()));
    let args: Vec<(&str, &str)> = numbers.iter().map(|(k, v)| (*k, v.as_str())).collect();
    println!("{}", t_in(locale, "cli.summary", &args));

    if summary.issues.is_empty() {
        println!("{}", t_in(locale, "cli.no_issues", &[]));
        return;
    }
    let total = summary.issue_total().to_string();
    println!("{}", t_in(locale, "cli.issues_header", &[("total", total.as_str())]));
    for (category, count) in &summary.issues {
        let count = count.to_string();
        println!(
            "{}",
            t_in(
                locale,
                "cli.issues_category",
                &[("category", category.as_str()), ("count", count.as_str())]
            )
        );
    }
}

fn detect(manager: &ConfigManager, sheet: &Path) -> Result<()> {
    let config = manager.load()?;
    let sheet = UniversalFileParser.parse(sheet)?;
    let detection = detect_columns(sheet.header(), &config.auto_location, &config.location);

    println!("{}", t_in(&config.locale, "cli.columns_header", &[]));
    for (field, (column, header)) in &detection.matched {
        println!("  {:<12} {:>3}  {}", field.name(), column, header);
    }
    if !detection.not_found.is_empty() {
        let fields = detection
            .not_found
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}", t_in(&config.locale, "cli.columns_not_found", &[("fields", fields.as_str())]));
    }
    println!("{}", serde_json::to_string_pretty(&detection.mapping)?);
    Ok(())
}

fn config_command(manager: &ConfigManager, action: ConfigAction) -> Result<()> {
    let path = manager.path().display().to_string();
    match action {
        ConfigAction::Init { force } => {
            let locale = RegistrationConfig::default().locale;
            let key = if manager.init(force)? {
                "cli.config_created"
            } else {
                "cli.config_exists"
            };
            println!("{}", t_in(&locale, key, &[("path", path.as_str())]));
        }
        ConfigAction::Show => {
            let config = manager.load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

async fn history(manager: &ConfigManager, args: HistoryArgs) -> Result<()> {
    let locale = manager.load()?.locale;
    let db = args.db.unwrap_or_else(|| default_history_db(manager));
    let repo = open_history(&db)?;

    if let Some(run_id) = &args.delete {
        if !repo.delete_run(run_id).await? {
            bail!("转换记录不存在: {}", run_id);
        }
        println!("{}", run_id);
        return Ok(());
    }

    if let Some(run_id) = &args.run {
        let run = repo
            .get_run(run_id)
            .await?
            .with_context(|| format!("转换记录不存在: {}", run_id))?;
        println!("{}  {}  {}", run.run_id, run.started_at.format("%Y-%m-%d %H:%M:%S"), run.meet_name);
        print_summary(&locale, &run.summary);
        for issue in repo.get_issues(run_id).await? {
            println!("  [{}] {}", issue.category.as_str(), issue.message);
        }
        return Ok(());
    }

    let runs = repo.list_runs(args.limit).await?;
    if runs.is_empty() {
        println!("{}", t_in(&locale, "cli.history_empty", &[]));
    }
    for run in runs {
        println!(
            "{}  {}  {:<30} {:>5} {:>5}  {}",
            run.run_id,
            run.started_at.format("%Y-%m-%d %H:%M"),
            run.meet_name,
            run.summary.entries,
            run.summary.issue_total(),
            run.sheet_file
        );
    }
    Ok(())
}

fn to_results(manager: &ConfigManager, input: &Path, output: &Path) -> Result<()> {
    let locale = manager.load()?.locale;
    let stats = transform_file(input, output)?;
    for stat in stats {
        let count = stat.count.to_string();
        println!(
            "{}",
            t_in(
                &locale,
                "cli.replacements",
                &[("from", stat.from), ("to", stat.to), ("count", count.as_str())]
            )
        );
    }
    let output = output.display().to_string();
    println!("{}", t_in(&locale, "cli.translate_done", &[("output", output.as_str())]));
    Ok(())
}

/// 历史库与配置文件放在同一目录
fn default_history_db(manager: &ConfigManager) -> PathBuf {
    manager
        .path()
        .parent()
        .map(|dir| dir.join(HISTORY_DB))
        .unwrap_or_else(|| PathBuf::from(HISTORY_DB))
}

fn open_history(path: &Path) -> Result<Arc<dyn ReportRepository>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let db = path.to_str().context("历史库路径无效")?;
    let repo = ReportRepositoryImpl::new(db)
        .with_context(|| format!("打开历史库失败: {}", path.display()))?;
    Ok(Arc::new(repo))
}
