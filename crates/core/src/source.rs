//! Tabular record source: locating, fetching and parsing the driver/carrier feed.
//!
//! Parsing is header-driven (see [`crate::record::headers`]), skips blank lines
//! and tolerates short rows. Fetching is fail-open at the [`load_directory`]
//! level: any error is logged and an empty [`Directory`] is returned.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, warn};

#[cfg(feature = "native")]
use crate::dedup::Directory;
#[cfg(feature = "native")]
use crate::error::Error;
use crate::error::Result;
use crate::record::{headers, RawRecord};

/// Well-known location of the record feed.
pub const DEFAULT_SOURCE: &str = "Database-Files.csv";

/// Where the tabular records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabularSource {
    /// A local file.
    File(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl Default for TabularSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl TabularSource {
    /// Interpret a string as a URL when it has an HTTP scheme, else as a path.
    pub fn from_str_or_url(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::File(PathBuf::from(s))
        }
    }

    /// Fetch the raw text of the source.
    #[cfg(feature = "native")]
    pub async fn fetch_text(&self) -> Result<String> {
        match self {
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(decode_lossy(bytes))
            }
            Self::Url(url) => {
                let resp = reqwest::get(url).await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(Error::SourceFetch {
                        source_name: url.clone(),
                        reason: format!("HTTP {}", status),
                    });
                }
                Ok(resp.text().await?)
            }
        }
    }
}

/// Decode as UTF-8, replacing invalid sequences (e.g. Latin-1 exports) so the
/// rest of the feed stays usable.
#[cfg(feature = "native")]
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("tabular source is not valid UTF-8; invalid bytes replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

impl fmt::Display for TabularSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Parse header-delimited text into rows.
///
/// Columns are matched by exact header name. When a header repeats, the last
/// column with that name wins. Undecodable rows are skipped. An unreadable
/// header line fails the whole parse.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header_row = rdr.headers()?.clone();
    let columns = headers::ALL.map(|h| {
        header_row
            .iter()
            .enumerate()
            .filter(|(_, col)| *col == h)
            .map(|(i, _)| i)
            .last()
    });

    let missing: Vec<&str> = headers::ALL
        .iter()
        .zip(&columns)
        .filter(|(_, col)| col.is_none())
        .map(|(h, _)| *h)
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "tabular source is missing expected headers");
    }
    let repeated: Vec<&str> = headers::ALL
        .iter()
        .copied()
        .filter(|h| header_row.iter().filter(|col| col == h).count() > 1)
        .collect();
    if !repeated.is_empty() {
        warn!(?repeated, "tabular source repeats headers; using the last column of each");
    }

    let field = |record: &csv::StringRecord, i: usize| -> String {
        columns[i]
            .and_then(|col| record.get(col))
            .unwrap_or("")
            .to_string()
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => rows.push(RawRecord::from_fields(
                &field(&record, 0),
                &field(&record, 1),
                &field(&record, 2),
                &field(&record, 3),
                &field(&record, 4),
            )),
            Err(e) => {
                skipped += 1;
                debug!(line = line + 2, error = %e, "skipping undecodable row");
            }
        }
    }
    if skipped > 0 && rows.is_empty() {
        warn!(skipped, "no row of the tabular source could be decoded");
    }
    Ok(rows)
}

/// Parse an in-memory CSV document.
pub fn parse_str(text: &str) -> Result<Vec<RawRecord>> {
    parse_records(text.as_bytes())
}

/// Fetch and parse the source, propagating any failure.
#[cfg(feature = "native")]
pub async fn fetch_records(source: &TabularSource) -> Result<Vec<RawRecord>> {
    let text = source.fetch_text().await?;
    parse_str(&text)
}

/// Fetch, parse and deduplicate. Never fails: errors are logged and yield an
/// empty directory.
#[cfg(feature = "native")]
pub async fn load_directory(source: &TabularSource) -> Directory {
    match fetch_records(source).await {
        Ok(rows) => {
            let directory = crate::dedup::deduplicate(&rows);
            tracing::info!(
                source = %source,
                drivers = directory.drivers.len(),
                carriers = directory.carriers.len(),
                "loaded records"
            );
            directory
        }
        Err(e) => {
            warn!(source = %source, error = %e, "error loading records; continuing with empty lists");
            Directory::default()
        }
    }
}

/// Blocking wrappers for callers without an async runtime (native only).
#[cfg(feature = "native")]
pub mod blocking {
    use super::*;

    /// Blocking [`super::fetch_records`] on a single-threaded Tokio runtime.
    pub fn fetch_records(source: &TabularSource) -> Result<Vec<RawRecord>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(super::fetch_records(source))
    }

    /// Blocking [`super::load_directory`].
    pub fn load_directory(source: &TabularSource) -> Directory {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(super::load_directory(source)),
            Err(e) => {
                warn!(error = %e, "failed to start runtime; continuing with empty lists");
                Directory::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME
D1,Alice,Reefer,C1,Acme

D2,Bob,,C1,Acme Freight
,,,C2,Bolt
";

    #[test]
    fn test_parse_skips_blank_lines() {
        let rows = parse_str(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].driver_name.as_deref(), Some("Alice"));
        assert_eq!(rows[1].trailer_type, None);
        assert_eq!(rows[2].driver_id, None);
        assert_eq!(rows[2].carrier_name.as_deref(), Some("Bolt"));
    }

    #[test]
    fn test_parse_short_rows() {
        let text = "DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME\nD9,Zed\n";
        let rows = parse_str(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver_id.as_deref(), Some("D9"));
        assert_eq!(rows[0].carrier_id, None);
        assert!(rows[0].driver().is_some());
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let text = "driver id,driver name\nD1,Alice\n";
        let rows = parse_str(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].driver().is_none());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let text = "CARRIER NAME,CARRIER ID,DRIVER NAME,DRIVER ID\nAcme,C1,Alice,D1\n";
        let rows = parse_str(text).unwrap();
        assert_eq!(rows[0].carrier().map(|c| c.id), Some("C1".to_string()));
        assert_eq!(rows[0].driver().map(|d| d.name), Some("Alice".to_string()));
    }

    #[test]
    fn test_repeated_header_last_column_wins() {
        let text = "DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME,DRIVER ID\n\
                    D1,Alice,Reefer,C1,Acme,D9\n";
        let rows = parse_str(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver_id.as_deref(), Some("D9"));
        assert_eq!(rows[0].carrier().map(|c| c.name), Some("Acme".to_string()));
    }

    #[test]
    fn test_source_from_str_or_url() {
        assert_eq!(
            TabularSource::from_str_or_url("https://example.com/db.csv"),
            TabularSource::Url("https://example.com/db.csv".into())
        );
        assert_eq!(
            TabularSource::from_str_or_url("data/db.csv"),
            TabularSource::File(PathBuf::from("data/db.csv"))
        );
        assert_eq!(TabularSource::default().to_string(), DEFAULT_SOURCE);
    }
}
