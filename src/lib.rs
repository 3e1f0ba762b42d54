#![deny(missing_docs)]
//! Fetch local copies of the publicly available PhysioNet Sleep-EDF
//! "sleep cassette" polysomnography recordings.
//!
//! The archive is described by a static record index shipped with the crate
//! (`data/SC-index.csv`): one row per file, carrying the subject identifier
//! (`0..=82`), the night index (`1` or `2`), whether the file is the raw
//! signal recording (PSG) or its scored annotations (Hypnogram), a SHA-1
//! checksum, and the remote file name.
//!
//! [`fetch_data`] filters that index by subject and recording night, downloads
//! any missing file and verifies it against its stored checksum, and returns
//! the local paths as one `(PSG, Hypnogram)` pair per recorded night.
//!
//! **Warning**: the `sha` column currently shipped in `data/SC-index.csv`
//! holds placeholder digests, not the checksums published by PhysioNet.
//! Verification hard-fails on a mismatch, so downloads from the live archive
//! will be rejected until that column is regenerated against the real files
//! (hash each file with SHA-1, or take the digests from PhysioNet's published
//! checksum list).
//!
//! ```no_run
//! # async fn run() -> Result<(), sleep_physionet::DatasetError> {
//! let paths = sleep_physionet::fetch_data(&[0], &Default::default()).await?;
//! for (psg, hypnogram) in paths {
//!     println!("{} / {}", psg.display(), hypnogram.display());
//! }
//! # Ok(())
//! # }
//! ```
use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod fetch;
pub mod manifest;

pub use config::ENV_DATA_PATH;
pub use fetch::{fetch_data, FetchOptions, Fetcher, BASE_URL, MAX_SUBJECT};
pub use manifest::{Manifest, Record, RecordType, MANIFEST_PATH};

/// Error type for dataset fetching
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A requested subject is not part of the cohort.
    #[error("subject {0} is out of range, valid subjects are 0..={MAX_SUBJECT}")]
    SubjectOutOfRange(u16),

    /// The record index is missing or malformed.
    #[error("manifest {}: {}", path.display(), source)]
    Manifest {
        /// Location the index was read from.
        path: PathBuf,
        /// The underlying parse or read failure.
        source: csv::Error,
    },

    /// Filesystem error while storing a file.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Error in the request
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A downloaded file does not match its checksum in the record index.
    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Remote file name.
        file: String,
        /// Digest stored in the record index.
        expected: String,
        /// Digest of the bytes actually received.
        actual: String,
    },

    /// No home directory to derive the default storage root from.
    #[error("cannot determine a home directory for the dataset storage root")]
    NoHomeDir,

    /// The persisted path configuration cannot be read or written.
    #[error("config file: {0}")]
    Config(#[from] serde_json::Error),
}
