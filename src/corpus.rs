//! Corpus loading and the text-frame builder.
//!
//! Raw tabular rows are normalized into a uniform frame: every surviving
//! [`Record`] carries a non-empty classification target (`genre`) and a
//! non-empty derived `text` built from title, artist, and memo. Row order is
//! preserved from the source file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RepertoireError, Result};

/// Columns that must be present in every input CSV.
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "artist", "memo", "genre"];

/// One normalized row of the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Optional source identifier; empty when the CSV has no `id` column.
    pub id: String,
    pub title: String,
    pub artist: String,
    pub memo: String,
    /// Trimmed classification target.
    pub genre: String,
    /// Derived search text: `trim(title + " " + artist + " " + memo)`.
    pub text: String,
}

/// An ordered collection of normalized records.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    has_id_column: bool,
}

impl Corpus {
    /// Load and normalize a corpus from a CSV file.
    ///
    /// Fails with a schema error if any required column is absent. Rows whose
    /// genre or derived text is empty after normalization are dropped.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let headers = reader.headers()?.clone();

        let column = |name: &str| headers.iter().position(|h| h == name);
        for required in REQUIRED_COLUMNS {
            if column(required).is_none() {
                return Err(RepertoireError::schema(format!(
                    "missing column: {required}"
                )));
            }
        }

        let title_idx = column("title");
        let artist_idx = column("artist");
        let memo_idx = column("memo");
        let genre_idx = column("genre");
        let id_idx = column("id");

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i)).unwrap_or("").to_string()
            };

            let title = field(title_idx);
            let artist = field(artist_idx);
            let memo = field(memo_idx);
            let genre = field(genre_idx).trim().to_string();
            let text = format!("{title} {artist} {memo}").trim().to_string();

            if genre.is_empty() || text.is_empty() {
                continue;
            }

            records.push(Record {
                id: field(id_idx),
                title,
                artist,
                memo,
                genre,
                text,
            });
        }

        Ok(Corpus {
            records,
            has_id_column: id_idx.is_some(),
        })
    }

    /// All surviving records, in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Derived texts, in source order.
    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.text.clone()).collect()
    }

    /// Genre labels, parallel to [`Corpus::texts`].
    pub fn genres(&self) -> Vec<String> {
        self.records.iter().map(|r| r.genre.clone()).collect()
    }

    /// Whether the source CSV carried an `id` column.
    pub fn has_id_column(&self) -> bool {
        self.has_id_column
    }

    /// Position of the first record whose id matches.
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
