use anyhow::Result;
use rusqlite::Connection;

use crate::parser::extract::StructuredRecord;

const DB_PATH: &str = "data/covid.sqlite";

pub fn connect() -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            label      TEXT NOT NULL,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id         INTEGER PRIMARY KEY,
            page_id    INTEGER NOT NULL REFERENCES pages(id),
            url        TEXT NOT NULL,
            label      TEXT NOT NULL,
            html       TEXT,
            status     INTEGER,
            error      TEXT,
            latency_ms INTEGER,
            processed  BOOLEAN NOT NULL DEFAULT 0,
            scraped_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_processed ON page_data(processed);

        -- Structured timeline records. city_cases holds either a JSON array
        -- of {city, case} objects or the not-available sentinel string.
        CREATE TABLE IF NOT EXISTS records (
            id           INTEGER PRIMARY KEY,
            page_data_id INTEGER NOT NULL REFERENCES page_data(id),
            url          TEXT NOT NULL,
            time         TEXT,
            new_cases    INTEGER,
            city_cases   TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_records_page ON records(page_data_id);
        ",
    )?;
    Ok(())
}

// ── Queue ──

pub fn insert_pages(conn: &Connection, pages: &[(String, String)]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url, label) VALUES (?1, ?2)")?;
        for (url, label) in pages {
            count += stmt.execute(rusqlite::params![url, label])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_unvisited(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<(i64, String, String)>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT id, url, label FROM pages WHERE visited = 0 ORDER BY id LIMIT {}",
            n
        ),
        None => "SELECT id, url, label FROM pages WHERE visited = 0 ORDER BY id".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Fetching ──

pub struct FetchRow {
    pub page_id: i64,
    pub url: String,
    pub label: String,
    pub html: Option<String>,
    pub status: Option<i32>,
    pub error: Option<String>,
    pub latency_ms: Option<i64>,
}

// ── Processing ──

pub struct ScrapedPage {
    pub page_data_id: i64,
    pub url: String,
    pub html: String,
}

pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<ScrapedPage>> {
    let sql = format!(
        "SELECT id, url, html FROM page_data
         WHERE html IS NOT NULL AND processed = 0
         ORDER BY id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ScrapedPage {
                page_data_id: row.get(0)?,
                url: row.get(1)?,
                html: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct RecordRow {
    pub page_data_id: i64,
    pub url: String,
    pub time: Option<String>,
    pub new_cases: Option<i64>,
    pub city_cases: Option<String>,
}

impl RecordRow {
    pub fn from_record(page_data_id: i64, record: &StructuredRecord) -> Self {
        RecordRow {
            page_data_id,
            url: record.url.clone(),
            time: record.time.clone(),
            new_cases: record.new_cases.map(|n| n as i64),
            city_cases: record
                .city_cases
                .as_ref()
                .and_then(|c| serde_json::to_string(c).ok()),
        }
    }
}

pub fn save_records(conn: &Connection, rows: &[RecordRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO records (page_data_id, url, time, new_cases, city_cases)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.page_data_id, r.url, r.time, r.new_cases, r.city_cases,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn mark_processed(conn: &Connection, page_data_ids: &[i64]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare("UPDATE page_data SET processed = 1 WHERE id = ?1")?;
        for id in page_data_ids {
            stmt.execute(rusqlite::params![id])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Export ──

pub struct ExportRow {
    pub url: String,
    pub time: Option<String>,
    pub new_cases: Option<i64>,
    pub city_cases: Option<String>,
}

pub fn fetch_records(conn: &Connection) -> Result<Vec<ExportRow>> {
    let mut stmt =
        conn.prepare("SELECT url, time, new_cases, city_cases FROM records ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ExportRow {
                url: row.get(0)?,
                time: row.get(1)?,
                new_cases: row.get(2)?,
                city_cases: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub scraped: usize,
    pub errors: usize,
    pub processed: usize,
    pub records: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let visited: usize =
        conn.query_row("SELECT COUNT(*) FROM pages WHERE visited = 1", [], |r| r.get(0))?;
    let scraped: usize = conn.query_row("SELECT COUNT(*) FROM page_data", [], |r| r.get(0))?;
    let errors: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let processed: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE processed = 1",
        [],
        |r| r.get(0),
    )?;
    let records: usize = conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        visited,
        unvisited: total - visited,
        scraped,
        errors,
        processed,
        records,
    })
}
