//! Output sinks for finished records
//!
//! Records are written as delimited rows with a fixed column order and a
//! header row first. Absent values become empty cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{RtveError, Result};
use crate::types::{EpisodeRecord, ProgramRecord};

/// Separator used to flatten `song_mentions` into a single cell.
pub const SONG_SEPARATOR: &str = "; ";

/// Destination for finished records.
pub trait Sink<R> {
    /// Write one record.
    fn accept(&mut self, record: &R) -> Result<()>;

    /// Flush anything buffered. Call once after the last record.
    fn finish(&mut self) -> Result<()>;
}

/// A record that can be laid out as one delimited row.
pub trait CsvRow {
    /// Column names, in output order
    const HEADERS: &'static [&'static str];

    /// Cell values in the same order as [`CsvRow::HEADERS`]
    fn to_row(&self) -> Vec<String>;
}

impl CsvRow for EpisodeRecord {
    const HEADERS: &'static [&'static str] = &[
        "title",
        "air_date",
        "duration",
        "detail_url",
        "asset_id",
        "description",
        "publish_date",
        "iso_duration",
        "embed_url",
        "thumbnail_url",
        "song_mentions",
        "keywords",
        "director",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.air_date.clone(),
            self.duration.clone(),
            cell(&self.detail_url),
            cell(&self.asset_id),
            cell(&self.description),
            cell(&self.publish_date),
            cell(&self.iso_duration),
            cell(&self.embed_url),
            cell(&self.thumbnail_url),
            self.song_mentions
                .as_ref()
                .map(|songs| songs.join(SONG_SEPARATOR))
                .unwrap_or_default(),
            cell(&self.keywords),
            cell(&self.director),
        ]
    }
}

impl CsvRow for ProgramRecord {
    const HEADERS: &'static [&'static str] = &["title", "description", "url", "image_url"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.description.clone(),
            self.url.clone(),
            cell(&self.image_url),
        ]
    }
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// UTF-8 CSV sink
///
/// The header row is written together with the first record, so a sink
/// that never receives a record produces no output at all.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
            rows: 0,
        }
    }

    /// Number of records written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| RtveError::Io(e.into_error()))
    }
}

impl<R: CsvRow, W: Write> Sink<R> for CsvSink<W> {
    fn accept(&mut self, record: &R) -> Result<()> {
        if self.rows == 0 {
            self.writer.write_record(R::HEADERS)?;
        }
        self.writer.write_record(record.to_row())?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
