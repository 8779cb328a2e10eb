//! SQLite record store for dictionary entries.
//!
//! The store is a file path, not a shared connection: every query opens its
//! own read-only connection, so concurrent searches share nothing and each
//! can be interrupted on its own.

use crate::cancel::CancellationToken;
use crate::entry::{
    DictionaryEntry, format_definitions, format_pinyin, parse_definitions_column,
    parse_pinyin_column,
};
use crate::error::{SearchError, StoreError};
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ErrorCode, OpenFlags, ToSql};
use std::path::{Path, PathBuf};
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY,
        traditional TEXT NOT NULL,
        simplified TEXT NOT NULL,
        pinyin TEXT NOT NULL,
        definitions TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_entries_pinyin ON entries(pinyin);
    CREATE INDEX IF NOT EXISTS idx_entries_simplified ON entries(simplified);
"#;

/// Columns every entry query must select, in this order.
pub(crate) const ENTRY_COLUMNS: &str = "traditional, simplified, pinyin, definitions";

#[derive(Debug, Clone)]
pub struct DictionaryStore {
    path: PathBuf,
}

impl DictionaryStore {
    /// Create (or reuse) a database at `path` with the dictionary schema.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("Created dictionary store at {}", path.display());
        Ok(Self { path })
    }

    /// Open an existing database, checking that it has the dictionary table.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        let conn = store.connect_read_only()?;
        let columns: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('entries')",
            [],
            |row| row.get(0),
        )?;
        if columns == 0 {
            return Err(StoreError::MissingSchema(store.path));
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append already-built entries in a single transaction.
    pub fn insert_entries(&self, entries: &[DictionaryEntry]) -> Result<usize, StoreError> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (traditional, simplified, pinyin, definitions)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                stmt.execute(rusqlite::params![
                    entry.traditional,
                    entry.simplified,
                    format_pinyin(&entry.pinyin),
                    format_definitions(&entry.definitions),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!("Inserted {} entries into {}", entries.len(), self.path.display());
        Ok(entries.len())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let conn = self.connect_read_only()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Run an entry query, interruptible through `token`.
    ///
    /// `sql` must select [`ENTRY_COLUMNS`]. With a token, the connection is
    /// interrupted when the token fires and the query reports
    /// [`SearchError::Cancelled`]; a token cancelled before the query starts
    /// never touches the database.
    pub(crate) fn query_entries(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        let conn = self.connect_read_only()?;
        register_regexp(&conn)?;

        if let Some(token) = token {
            let interrupt = conn.get_interrupt_handle();
            if !token.register_unless_cancelled(move || interrupt.interrupt()) {
                return Err(SearchError::Cancelled);
            }
        }

        let start = Instant::now();
        tracing::trace!("Executing: {}", sql);
        let rows = fetch_rows(&conn, sql, params, token);

        if let Some(token) = token {
            token.unregister();
            if token.is_cancelled() {
                tracing::debug!("Query cancelled after {:?}", start.elapsed());
                return Err(SearchError::Cancelled);
            }
        }

        let rows = rows.map_err(|e| match e {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::OperationInterrupted =>
            {
                SearchError::Cancelled
            }
            e => {
                tracing::warn!("Query against {} failed: {}", self.path.display(), e);
                SearchError::from(e)
            }
        })?;
        tracing::debug!("Fetched {} rows in {:?}", rows.len(), start.elapsed());

        rows.into_iter()
            .map(|(traditional, simplified, pinyin, definitions)| -> Result<_, StoreError> {
                Ok(DictionaryEntry {
                    traditional,
                    simplified,
                    pinyin: parse_pinyin_column(&pinyin)?,
                    definitions: parse_definitions_column(&definitions)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(SearchError::from)
    }

    fn connect_read_only(&self) -> Result<Connection, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }
}

type Row = (String, String, String, String);

fn fetch_rows(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    token: Option<&CancellationToken>,
) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    // An interrupt delivered before the first step would be ignored by SQLite.
    if token.is_some_and(CancellationToken::is_cancelled) {
        return Ok(Vec::new());
    }
    stmt.query_map(params, |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    })?
    .collect()
}

/// Install `X REGEXP Y`, backed by the `regex` crate.
///
/// The compiled pattern is cached per statement as auxiliary data.
fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern = ctx.get_or_create_aux(0, |value| -> Result<Regex, BoxError> {
                Ok(Regex::new(value.as_str()?)?)
            })?;
            let text = ctx
                .get_raw(1)
                .as_str()
                .map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;
            Ok(pattern.is_match(text))
        },
    )
}
