// ==========================================
// 游泳赛事报名转换系统 - SQLite 连接初始化
// ==========================================
// 用途: 转换历史库（仅保存运行记录与问题，不保存赛事实体）
// 统一: PRAGMA、busy_timeout、建表
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER NOT NULL,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS translation_run (
    run_id          TEXT PRIMARY KEY,
    schedule_file   TEXT NOT NULL,
    sheet_file      TEXT NOT NULL,
    output_file     TEXT,
    meet_name       TEXT NOT NULL,
    rows_total      INTEGER NOT NULL,
    rows_skipped    INTEGER NOT NULL,
    rows_failed     INTEGER NOT NULL,
    clubs           INTEGER NOT NULL,
    athletes        INTEGER NOT NULL,
    entries         INTEGER NOT NULL,
    heats           INTEGER NOT NULL,
    issue_total     INTEGER NOT NULL,
    elapsed_ms      INTEGER NOT NULL,
    config_snapshot TEXT NOT NULL,
    started_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS translation_issue (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id      TEXT NOT NULL REFERENCES translation_run(run_id) ON DELETE CASCADE,
    seq         INTEGER NOT NULL,
    category    TEXT NOT NULL,
    severity    TEXT NOT NULL,
    message     TEXT NOT NULL,
    row_index   INTEGER,
    row_repr    TEXT,
    row_data    TEXT,
    extra       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_translation_issue_run ON translation_issue(run_id, seq);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// - foreign_keys 需要每个连接单独开启
/// - busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等），首次建库时写入 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;
    if read_schema_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

/// 读取 schema_version（若表不存在或为空则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
