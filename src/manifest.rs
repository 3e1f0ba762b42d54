//! Loading and filtering of the static record index.
//!
//! Everything here is pure apart from reading the CSV itself, so the
//! selection logic is testable without touching the network.
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::DatasetError;

/// Location of the record index, relative to the crate root.
pub const MANIFEST_PATH: &str = "data/SC-index.csv";

/// The class of a record index row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RecordType {
    /// The raw polysomnography signal recording for one night.
    #[serde(rename = "PSG")]
    Psg,
    /// The scored sleep-stage annotations for the same night.
    Hypnogram,
}

/// One row of the record index.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Anonymized participant identifier, `0..=82`.
    pub subject: u16,
    /// Night index, `1` or `2`.
    pub record: u8,
    /// Whether this row is the signal file or its annotations.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Hex SHA-1 digest of the remote file.
    pub sha: String,
    /// File name, relative to the remote archive root.
    pub fname: String,
}

/// The record index, partitioned by record class.
#[derive(Debug, Clone)]
pub struct Manifest {
    psg: Vec<Record>,
    hypnogram: Vec<Record>,
}

impl Manifest {
    /// Read the index from a CSV file with a header row and the column layout
    /// `subject,record,type,sha,fname`.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Manifest {
            path: path.to_owned(),
            source,
        })?;
        Self::collect(reader, path)
    }

    /// Parse the index from anything producing the CSV bytes.
    ///
    /// Errors are attributed to `<reader>` since there is no file behind an
    /// arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Self::collect(csv::Reader::from_reader(reader), Path::new("<reader>"))
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Self, DatasetError> {
        let mut psg = Vec::new();
        let mut hypnogram = Vec::new();
        for row in reader.deserialize() {
            let record: Record = row.map_err(|source| DatasetError::Manifest {
                path: path.to_owned(),
                source,
            })?;
            match record.record_type {
                RecordType::Psg => psg.push(record),
                RecordType::Hypnogram => hypnogram.push(record),
            }
        }
        Ok(Self { psg, hypnogram })
    }

    /// Number of signal recordings in the index.
    pub fn len(&self) -> usize {
        self.psg.len()
    }

    /// Whether the index holds no signal recordings at all.
    pub fn is_empty(&self) -> bool {
        self.psg.is_empty()
    }

    /// Matched (signal, annotation) row pairs for one subject, restricted to
    /// the requested nights, in index order.
    ///
    /// Night values outside the index match nothing. A signal row with no
    /// annotation counterpart is skipped with a warning rather than paired
    /// with the wrong file.
    pub fn pairs_for(&self, subject: u16, recording: &[u8]) -> Vec<(&Record, &Record)> {
        let mut pairs = Vec::new();
        for psg in self.psg.iter().filter(|r| r.subject == subject) {
            if !recording.contains(&psg.record) {
                continue;
            }
            let hypnogram = self
                .hypnogram
                .iter()
                .find(|r| r.subject == subject && r.record == psg.record);
            match hypnogram {
                Some(hypnogram) => pairs.push((psg, hypnogram)),
                None => log::warn!(
                    "no annotation row for subject {subject} night {}, skipping {}",
                    psg.record,
                    psg.fname
                ),
            }
        }
        pairs
    }
}
