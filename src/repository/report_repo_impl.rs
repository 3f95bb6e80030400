// ==========================================
// 游泳赛事报名转换系统 - 转换历史 Repository 实现
// ==========================================
// 职责: 实现转换记录与问题的数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::issue::{Issue, IssueReport, RunSummary, TranslationRun};
use crate::domain::types::{IssueCategory, Severity};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::report_repo::ReportRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, Transaction};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const RUN_COLUMNS: &str = "run_id, schedule_file, sheet_file, output_file, meet_name, \
     rows_total, rows_skipped, rows_failed, clubs, athletes, entries, heats, \
     elapsed_ms, config_snapshot, started_at";

// ==========================================
// ReportRepositoryImpl
// ==========================================
pub struct ReportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepositoryImpl {
    /// 打开（或创建）历史库并建表
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用已有连接（测试或共享连接场景）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn insert_run_tx(tx: &Transaction, run: &TranslationRun) -> RepositoryResult<()> {
        let s = &run.summary;
        tx.execute(
            r#"
            INSERT INTO translation_run (
                run_id, schedule_file, sheet_file, output_file, meet_name,
                rows_total, rows_skipped, rows_failed, clubs, athletes, entries, heats,
                issue_total, elapsed_ms, config_snapshot, started_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                run.run_id,
                run.schedule_file,
                run.sheet_file,
                run.output_file,
                run.meet_name,
                s.rows_total as i64,
                s.rows_skipped as i64,
                s.rows_failed as i64,
                s.clubs as i64,
                s.athletes as i64,
                s.entries as i64,
                s.heats as i64,
                s.issue_total() as i64,
                run.elapsed_ms,
                run.config_snapshot,
                run.started_at,
            ],
        )?;
        Ok(())
    }

    fn insert_issues_tx(tx: &Transaction, run_id: &str, report: &IssueReport) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO translation_issue (
                run_id, seq, category, severity, message, row_index, row_repr, row_data, extra
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )?;

        let mut count = 0;
        for issue in report.groups.values().flatten() {
            let row_data = issue
                .row_data
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            stmt.execute(params![
                run_id,
                count as i64,
                issue.category.as_str(),
                issue.severity.as_str(),
                issue.message,
                issue.row_index.map(|i| i as i64),
                issue.row_repr,
                row_data,
                serde_json::to_string(&issue.extra)?,
            ])?;
            count += 1;
        }
        Ok(count)
    }

    fn issue_counts(conn: &Connection, run_id: &str) -> RepositoryResult<BTreeMap<IssueCategory, usize>> {
        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*) FROM translation_issue WHERE run_id = ?1 GROUP BY category",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (category, count) = row?;
            counts.insert(parse_category(&category)?, count as usize);
        }
        Ok(counts)
    }

    fn load_run(conn: &Connection, row: &Row) -> RepositoryResult<TranslationRun> {
        let run_id: String = row.get(0)?;
        let started_at: DateTime<Utc> = row.get(14)?;
        let summary = RunSummary {
            rows_total: row.get::<_, i64>(5)? as usize,
            rows_skipped: row.get::<_, i64>(6)? as usize,
            rows_failed: row.get::<_, i64>(7)? as usize,
            clubs: row.get::<_, i64>(8)? as usize,
            athletes: row.get::<_, i64>(9)? as usize,
            entries: row.get::<_, i64>(10)? as usize,
            heats: row.get::<_, i64>(11)? as usize,
            issues: Self::issue_counts(conn, &run_id)?,
        };

        Ok(TranslationRun {
            schedule_file: row.get(1)?,
            sheet_file: row.get(2)?,
            output_file: row.get(3)?,
            meet_name: row.get(4)?,
            summary,
            elapsed_ms: row.get(12)?,
            config_snapshot: row.get(13)?,
            started_at,
            run_id,
        })
    }
}

fn parse_category(raw: &str) -> RepositoryResult<IssueCategory> {
    raw.parse().map_err(|message| RepositoryError::FieldValueError {
        field: "category".to_string(),
        message,
    })
}

fn parse_severity(raw: &str) -> RepositoryResult<Severity> {
    raw.parse().map_err(|message| RepositoryError::FieldValueError {
        field: "severity".to_string(),
        message,
    })
}

fn parse_object(raw: &str) -> RepositoryResult<Map<String, Value>> {
    Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl ReportRepository for ReportRepositoryImpl {
    async fn save_run(&self, run: &TranslationRun, report: &IssueReport) -> RepositoryResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Self::insert_run_tx(&tx, run)?;
        Self::insert_issues_tx(&tx, &run.run_id, report)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    async fn list_runs(&self, limit: usize) -> RepositoryResult<Vec<TranslationRun>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM translation_run ORDER BY started_at DESC LIMIT ?1",
            RUN_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([limit as i64])?;

        let mut runs = Vec::new();
        while let Some(row) = rows.next()? {
            runs.push(Self::load_run(&conn, row)?);
        }
        Ok(runs)
    }

    async fn get_run(&self, run_id: &str) -> RepositoryResult<Option<TranslationRun>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM translation_run WHERE run_id = ?1", RUN_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([run_id])?;

        match rows.next()? {
            Some(row) => Ok(Some(Self::load_run(&conn, row)?)),
            None => Ok(None),
        }
    }

    async fn get_issues(&self, run_id: &str) -> RepositoryResult<Vec<Issue>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, severity, message, row_index, row_repr, row_data, extra
            FROM translation_issue WHERE run_id = ?1 ORDER BY seq
            "#,
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut issues = Vec::new();
        for row in rows {
            let (category, severity, message, row_index, row_repr, row_data, extra) = row?;
            issues.push(Issue {
                category: parse_category(&category)?,
                message,
                severity: parse_severity(&severity)?,
                row_index: row_index.map(|i| i as usize),
                row_repr,
                row_data: row_data.as_deref().map(parse_object).transpose()?,
                extra: parse_object(&extra)?,
            });
        }
        Ok(issues)
    }

    async fn delete_run(&self, run_id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM translation_run WHERE run_id = ?1", [run_id])?;
        Ok(deleted > 0)
    }
}
