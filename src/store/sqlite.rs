use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::error::{MemoriesError, Result};
use crate::store::provider::{AssetProvider, Authorization, ChangeObserver, LibraryChange};
use crate::types::{AssetRecord, MediaKind, YearInterval};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// SQLite catalog of photos and videos. Observers hear about every committed
/// batch that changed at least one row.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
    observers: Mutex<Vec<ChangeObserver>>,
}

impl SqliteLibrary {
    pub fn open(store_path: &Path) -> Result<Self> {
        let conn = Connection::open(store_path.join("library.db"))?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("
            CREATE TABLE IF NOT EXISTS assets (
                id TEXT PRIMARY KEY,
                path TEXT UNIQUE,
                created_at INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                media_kind TEXT NOT NULL,
                imported_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_assets_created_at ON assets(created_at);
        ")?;

        Ok(Self {
            conn: Mutex::new(conn),
            observers: Mutex::new(Vec::new()),
        })
    }

    /// Insert a batch in one transaction. Assets whose path is already in the
    /// catalog are skipped.
    pub fn insert_assets(&self, assets: &[AssetRecord]) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO assets \
                     (id, path, created_at, is_favorite, media_kind, imported_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                let now = Utc::now().timestamp_millis();
                for asset in assets {
                    let changed = stmt.execute(rusqlite::params![
                        asset.id,
                        asset.path,
                        asset.created_at.timestamp_millis(),
                        asset.is_favorite,
                        asset.media_kind.as_str(),
                        now,
                    ])?;
                    if changed == 0 {
                        report.skipped += 1;
                    } else {
                        report.inserted += 1;
                    }
                }
            }
            tx.commit()?;
        }

        self.notify(LibraryChange { inserted: report.inserted, ..Default::default() });
        Ok(report)
    }

    pub fn set_favorite(&self, id: &str, favorite: bool) -> Result<bool> {
        let changed = self.lock()?.execute(
            "UPDATE assets SET is_favorite = ?1 WHERE id = ?2 AND is_favorite != ?1",
            rusqlite::params![favorite, id],
        )?;
        self.notify(LibraryChange { updated: changed, ..Default::default() });
        Ok(changed > 0)
    }

    pub fn remove_asset(&self, id: &str) -> Result<bool> {
        let changed = self
            .lock()?
            .execute("DELETE FROM assets WHERE id = ?1", rusqlite::params![id])?;
        self.notify(LibraryChange { removed: changed, ..Default::default() });
        Ok(changed > 0)
    }

    pub fn get_asset(&self, id: &str) -> Result<Option<AssetRecord>> {
        let conn = self.lock()?;
        let asset = conn
            .query_row(
                "SELECT id, path, created_at, is_favorite, media_kind FROM assets WHERE id = ?1",
                rusqlite::params![id],
                row_to_asset,
            )
            .optional()?;
        Ok(asset)
    }

    pub fn asset_count(&self) -> Result<usize> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| MemoriesError::LibraryUnavailable("catalog connection lock poisoned".into()))
    }

    fn notify(&self, change: LibraryChange) {
        if change.is_empty() {
            return;
        }
        let observers = match self.observers.lock() {
            Ok(observers) => observers.clone(),
            Err(_) => {
                tracing::warn!("library observers lock poisoned, change not delivered");
                return;
            }
        };
        for observer in observers {
            observer(&change);
        }
    }
}

impl AssetProvider for SqliteLibrary {
    /// An unreadable catalog denies access; one that has never been filled
    /// has nothing to grant yet.
    fn authorization(&self) -> Authorization {
        let Ok(conn) = self.lock() else {
            return Authorization::Denied;
        };
        match conn.query_row("SELECT EXISTS(SELECT 1 FROM assets)", [], |row| row.get::<_, bool>(0)) {
            Ok(true) => Authorization::Authorized,
            Ok(false) => Authorization::NotDetermined,
            Err(e) => {
                tracing::warn!("photo catalog unreadable: {}", e);
                Authorization::Denied
            }
        }
    }

    fn all_assets_ascending(&self) -> Result<Vec<AssetRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, path, created_at, is_favorite, media_kind \
             FROM assets ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], row_to_asset)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn assets_in_intervals(&self, intervals: &[YearInterval]) -> Result<Vec<AssetRecord>> {
        if intervals.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<String> = (0..intervals.len())
            .map(|i| format!("(created_at >= ?{} AND created_at < ?{})", 2 * i + 1, 2 * i + 2))
            .collect();
        let sql = format!(
            "SELECT id, path, created_at, is_favorite, media_kind FROM assets \
             WHERE {} ORDER BY created_at ASC, id ASC",
            clauses.join(" OR ")
        );
        let bounds: Vec<i64> = intervals
            .iter()
            .flat_map(|i| {
                [
                    i.start.timestamp_millis(),
                    (i.end + chrono::Duration::seconds(1)).timestamp_millis(),
                ]
            })
            .collect();

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bounds.iter()), row_to_asset)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn observe(&self, observer: ChangeObserver) {
        match self.observers.lock() {
            Ok(mut observers) => observers.push(observer),
            Err(_) => tracing::warn!("library observers lock poisoned, observer dropped"),
        }
    }
}

fn row_to_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssetRecord> {
    let id: String = row.get(0)?;
    let created_ms: i64 = row.get(2)?;
    let kind: String = row.get(4)?;
    let media_kind = MediaKind::from_str(&kind).unwrap_or_else(|| {
        tracing::warn!("asset {} has unknown media kind '{}', treating it as a photo", id, kind);
        MediaKind::Photo
    });
    Ok(AssetRecord {
        path: row.get(1)?,
        created_at: parse_millis(created_ms).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
        })?,
        is_favorite: row.get(3)?,
        media_kind,
        id,
    })
}

fn parse_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or(MemoriesError::TimestampOutOfRange(ms))
}
