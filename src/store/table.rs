//! The parameter store: an append-oriented CSV table of `SiteRecord`s.
//!
//! The header row grows when a record brings columns the file has not seen
//! yet; existing rows are backfilled with empty cells and otherwise left
//! untouched. Rows are kept as raw strings so columns from newer or older
//! tools survive a load/save cycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SitepassError};

use super::record::{SiteRecord, COL_SITE_NAME};

/// In-memory copy of the store file.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    /// Path to the CSV file on disk.
    path: PathBuf,

    /// Column names, in file order.
    headers: Vec<String>,

    /// Raw cells, one `Vec` per row, aligned with `headers`.
    rows: Vec<Vec<String>>,
}

impl ParameterStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load the store at `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "parameter store missing, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                headers: Vec::new(),
                rows: Vec::new(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let mut headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();

            // Cells past the header get generated column names so a later
            // save writes them back.
            if row.len() > headers.len() {
                tracing::warn!(
                    path = %path.display(),
                    line = record.position().map_or(0, csv::Position::line),
                    cells = row.len(),
                    columns = headers.len(),
                    "row is wider than the header, adding unnamed columns"
                );
                while headers.len() < row.len() {
                    headers.push(unnamed_column(&headers));
                    for earlier in &mut rows {
                        earlier.push(String::new());
                    }
                }
            }

            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        tracing::debug!(path = %path.display(), rows = rows.len(), "loaded parameter store");

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Append `record` as a new row.
    ///
    /// Columns the header lacks are added at the end and backfilled with
    /// empty cells in every existing row. Nothing is written until `save`.
    pub fn append(&mut self, record: &SiteRecord) {
        let fields = record.to_fields();

        for (column, _) in &fields {
            if !self.headers.iter().any(|h| h == column) {
                self.headers.push(column.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let mut row = vec![String::new(); self.headers.len()];
        for (column, value) in fields {
            if let Some(i) = self.headers.iter().position(|h| *h == column) {
                row[i] = value;
            }
        }
        self.rows.push(row);
    }

    /// Parse every row, in file order.
    pub fn records(&self) -> Vec<Result<SiteRecord>> {
        self.rows
            .iter()
            .map(|row| SiteRecord::from_row(&self.headers, row))
            .collect()
    }

    /// The most recent record stored for `site_name`.
    pub fn find(&self, site_name: &str) -> Result<SiteRecord> {
        let column = self.column(COL_SITE_NAME);
        let row = column
            .and_then(|i| {
                self.rows
                    .iter()
                    .rev()
                    .find(|row| row.get(i).is_some_and(|v| v == site_name))
            })
            .ok_or_else(|| SitepassError::SiteNotFound(site_name.to_string()))?;

        SiteRecord::from_row(&self.headers, row)
    }

    /// The most recent record of each site, sorted by site name.
    ///
    /// Rows that fail to parse are returned as errors in place of a record.
    pub fn latest(&self) -> Vec<Result<SiteRecord>> {
        let Some(column) = self.column(COL_SITE_NAME) else {
            return Vec::new();
        };

        let mut latest: std::collections::BTreeMap<&str, &Vec<String>> =
            std::collections::BTreeMap::new();
        for row in &self.rows {
            let name = row.get(column).map_or("", String::as_str);
            latest.insert(name, row);
        }

        latest
            .into_values()
            .map(|row| SiteRecord::from_row(&self.headers, row))
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the store to disk atomically.
    ///
    /// Writes a sibling temp file and renames it over the store, so a failed
    /// save leaves the previous file intact. A permission error from either
    /// step means another process holds the file and is reported as
    /// `StoreLocked`.
    pub fn save(&self) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .map_err(|e| csv_error(&self.path, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| csv_error(&self.path, e))?;
        }
        let buf = writer
            .into_inner()
            .map_err(|e| SitepassError::InvalidStore(format!("flush: {e}")))?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        if let Err(e) = fs::write(&tmp_path, &buf) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(&self.path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(&self.path, e));
        }

        tracing::debug!(path = %self.path.display(), rows = self.rows.len(), "saved parameter store");
        Ok(())
    }

    /// Append `record` and save, retrying while the file is locked.
    ///
    /// `on_locked` runs after each `StoreLocked` failure, typically to ask
    /// the operator to close whatever holds the file. Returning an error
    /// from it aborts the commit; the record stays appended in memory.
    pub fn commit<F>(&mut self, record: &SiteRecord, on_locked: F) -> Result<()>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        self.commit_with(record, Self::save, on_locked)
    }

    /// `commit` with the save step supplied by the caller.
    fn commit_with<S, F>(&mut self, record: &SiteRecord, mut save: S, mut on_locked: F) -> Result<()>
    where
        S: FnMut(&Self) -> Result<()>,
        F: FnMut(&Path) -> Result<()>,
    {
        self.append(record);
        loop {
            match save(&*self) {
                Err(SitepassError::StoreLocked(path)) => {
                    tracing::warn!(path = %path.display(), "parameter store is locked");
                    on_locked(&path)?;
                }
                other => return other,
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cell at `row` / `column`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let i = self.column(column)?;
        self.rows.get(row)?.get(i).map(String::as_str)
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// First `column_<n>` name not already in `headers`, counting from the
/// position the new column takes.
fn unnamed_column(headers: &[String]) -> String {
    let mut n = headers.len() + 1;
    loop {
        let name = format!("column_{n}");
        if !headers.iter().any(|h| *h == name) {
            return name;
        }
        n += 1;
    }
}

fn csv_error(path: &Path, e: csv::Error) -> SitepassError {
    SitepassError::InvalidStore(format!("{}: {e}", path.display()))
}

/// Classify a failed write of the store file.
pub(crate) fn write_error(path: &Path, e: io::Error) -> SitepassError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        SitepassError::StoreLocked(path.to_path_buf())
    } else {
        SitepassError::Io(e)
    }
}
