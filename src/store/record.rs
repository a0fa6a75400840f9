//! `SiteRecord`: one row of the parameter store.
//!
//! Column names are the historical ones (`plen`, `char`, `rm_cha`,
//! `upper_lower`) so stores written by earlier tools keep loading.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::derive::{CaseMode, DerivationParams, Mode, DEFAULT_LENGTH, DEFAULT_START};
use crate::errors::{Result, SitepassError};

pub const COL_SITE_NAME: &str = "site_name";
pub const COL_ID: &str = "id";
pub const COL_SEED: &str = "seed";
pub const COL_LENGTH: &str = "plen";
pub const COL_MODE: &str = "char";
pub const COL_UPDATED: &str = "update_date";
pub const COL_START: &str = "start";
pub const COL_REMOVED: &str = "rm_cha";
pub const COL_CASE: &str = "upper_lower";

/// Legacy boolean case-lock columns, read but never written.
pub const COL_LEGACY_UPPER: &str = "upper";
pub const COL_LEGACY_LOWER: &str = "lower";

/// Canonical column order for newly written records.
pub const COLUMNS: [&str; 9] = [
    COL_SITE_NAME,
    COL_ID,
    COL_SEED,
    COL_LENGTH,
    COL_MODE,
    COL_UPDATED,
    COL_START,
    COL_REMOVED,
    COL_CASE,
];

/// Date format of `update_date`.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Non-secret per-site parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRecord {
    /// Lookup key, not part of the hash.
    pub site_name: String,

    /// Optional account identifier, not part of the hash.
    #[serde(rename = "id")]
    pub account_id: String,

    /// Per-site salt mixed into the hash.
    #[serde(skip)]
    pub seed: String,

    #[serde(rename = "plen")]
    pub length: usize,

    #[serde(rename = "char")]
    pub mode: Mode,

    #[serde(rename = "rm_cha")]
    pub removed: String,

    pub start: usize,

    #[serde(rename = "upper_lower")]
    pub case: CaseMode,

    #[serde(rename = "update_date")]
    pub updated: Option<NaiveDate>,

    /// Columns this version does not know about, kept verbatim.
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
}

impl SiteRecord {
    /// A fresh record with default formatting parameters.
    pub fn new(site_name: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            account_id: String::new(),
            seed: seed.into(),
            length: DEFAULT_LENGTH,
            mode: Mode::default(),
            removed: String::new(),
            start: DEFAULT_START,
            case: CaseMode::default(),
            updated: None,
            extra: BTreeMap::new(),
        }
    }

    /// The derivation parameters this record describes.
    pub fn params(&self) -> DerivationParams {
        DerivationParams {
            seed: self.seed.clone(),
            length: self.length,
            mode: self.mode,
            removed: self.removed.clone(),
            start: self.start,
            case: self.case,
        }
    }

    /// Column/value pairs in canonical order, followed by extra columns.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let updated = self
            .updated
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();

        let mut fields: Vec<(String, String)> = vec![
            (COL_SITE_NAME.into(), self.site_name.clone()),
            (COL_ID.into(), self.account_id.clone()),
            (COL_SEED.into(), self.seed.clone()),
            (COL_LENGTH.into(), self.length.to_string()),
            (COL_MODE.into(), self.mode.to_string()),
            (COL_UPDATED.into(), updated),
            (COL_START.into(), self.start.to_string()),
            (COL_REMOVED.into(), self.removed.clone()),
            (COL_CASE.into(), self.case.to_string()),
        ];
        fields.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        fields
    }

    /// Parse a stored row. `headers` and `row` are aligned by index; a row
    /// shorter than the header reads as empty cells.
    ///
    /// Empty cells fall back to defaults. Unsupported modes and conflicting
    /// legacy case flags are errors.
    pub fn from_row(headers: &[String], row: &[String]) -> Result<Self> {
        let cell = |name: &str| -> &str {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .map_or("", |v| v.as_str())
        };

        let site_name = cell(COL_SITE_NAME).to_string();

        let mode = match cell(COL_MODE).trim() {
            "" => Mode::default(),
            raw => raw.parse()?,
        };

        let case = match cell(COL_CASE).trim() {
            "" => CaseMode::from_flags(
                parse_flag(cell(COL_LEGACY_UPPER), COL_LEGACY_UPPER, &site_name)?,
                parse_flag(cell(COL_LEGACY_LOWER), COL_LEGACY_LOWER, &site_name)?,
            )?,
            raw => raw.parse()?,
        };

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !is_known_column(h))
            .filter_map(|(i, h)| {
                let value = row.get(i)?;
                (!value.is_empty()).then(|| (h.clone(), value.clone()))
            })
            .collect();

        Ok(Self {
            account_id: cell(COL_ID).to_string(),
            seed: cell(COL_SEED).to_string(),
            length: parse_count(cell(COL_LENGTH), COL_LENGTH, DEFAULT_LENGTH, &site_name)?,
            mode,
            removed: cell(COL_REMOVED).to_string(),
            start: parse_count(cell(COL_START), COL_START, DEFAULT_START, &site_name)?,
            case,
            updated: parse_date(cell(COL_UPDATED), &site_name)?,
            extra,
            site_name,
        })
    }
}

fn is_known_column(name: &str) -> bool {
    COLUMNS.contains(&name) || name == COL_LEGACY_UPPER || name == COL_LEGACY_LOWER
}

/// Whole numbers, also when an earlier writer stored them as `"20.0"`.
fn parse_count(raw: &str, column: &str, default: usize, site: &str) -> Result<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    if let Ok(n) = raw.parse::<usize>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as usize),
        _ => Err(SitepassError::InvalidStore(format!(
            "site '{site}': column '{column}' holds '{raw}', expected a whole number"
        ))),
    }
}

fn parse_flag(raw: &str, column: &str, site: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        other => Err(SitepassError::InvalidStore(format!(
            "site '{site}': column '{column}' holds '{other}', expected true or false"
        ))),
    }
}

fn parse_date(raw: &str, site: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| {
            SitepassError::InvalidStore(format!(
                "site '{site}': column '{COL_UPDATED}' holds '{raw}', expected YYYY/MM/DD"
            ))
        })
}
