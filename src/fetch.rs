//! Download-and-verify delegation for individual archive files, and the
//! public [`fetch_data`] entry point.
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::manifest::{Manifest, MANIFEST_PATH};
use crate::{config, DatasetError};

/// Remote root of the sleep-cassette file tree.
pub const BASE_URL: &str =
    "https://physionet.org/physiobank/database/sleep-edfx/sleep-cassette/";

/// Highest valid subject identifier in the cohort.
pub const MAX_SUBJECT: u16 = 82;

/// Caller-tunable knobs for [`fetch_data`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Which night recordings to include. Values outside {1, 2} match
    /// nothing and are not an error.
    pub recording: Vec<u8>,
    /// Storage root override; `None` uses the configured location.
    pub path: Option<PathBuf>,
    /// Re-download files even when a local copy exists.
    pub force_update: bool,
    /// `Some(true)` persists the resolved storage root for future calls.
    pub update_path: Option<bool>,
    /// Remote root the record file names are resolved against.
    pub base_url: String,
    /// Location of the record index.
    pub manifest: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            recording: vec![1, 2],
            path: None,
            force_update: false,
            update_path: None,
            base_url: BASE_URL.to_string(),
            manifest: PathBuf::from(MANIFEST_PATH),
        }
    }
}

/// Downloads individual archive files into the storage root, verifying each
/// against its checksum from the record index.
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    root: PathBuf,
    force_update: bool,
}

impl Fetcher {
    /// Create a fetcher storing files under `root`.
    pub fn new(base_url: &str, root: &Path, force_update: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            root: root.to_owned(),
            force_update,
        }
    }

    /// Return the local path for `fname`, downloading and verifying it first
    /// unless a copy is already present.
    pub async fn fetch_one(&self, fname: &str, sha: &str) -> Result<PathBuf, DatasetError> {
        let destination = self.root.join(fname);
        if destination.exists() && !self.force_update {
            log::debug!("{fname} already present, skipping download");
            return Ok(destination);
        }
        std::fs::create_dir_all(&self.root)?;
        let url = format!("{}{}", self.base_url, fname);
        log::info!("downloading {url}");
        let mut response = self.client.get(&url).send().await?.error_for_status()?;

        // Hash while streaming into a sibling, and only rename into place
        // once the digest checks out. The sibling never survives a failed
        // download.
        let partial = self.root.join(format!("{fname}.part"));
        let actual = match stream_to(&mut response, &partial).await {
            Ok(digest) => digest,
            Err(err) => {
                let _ = std::fs::remove_file(&partial);
                return Err(err);
            }
        };
        if !actual.eq_ignore_ascii_case(sha) {
            std::fs::remove_file(&partial)?;
            return Err(DatasetError::ChecksumMismatch {
                file: fname.to_string(),
                expected: sha.to_string(),
                actual,
            });
        }
        std::fs::rename(&partial, &destination)?;
        Ok(destination)
    }
}

async fn stream_to(response: &mut reqwest::Response, partial: &Path) -> Result<String, DatasetError> {
    let mut file = std::fs::File::create(partial)?;
    let mut hasher = Sha1::new();
    while let Some(chunk) = response.chunk().await? {
        hasher.update(&chunk);
        file.write_all(&chunk)?;
    }
    file.flush()?;
    Ok(hex::encode(hasher.finalize()))
}

/// Get local copies of sleep-cassette records, downloading whatever is
/// missing.
///
/// `subjects` may list any participant in `0..=MAX_SUBJECT`; anything outside
/// that range fails before any file or network activity. The result holds one
/// `(PSG, Hypnogram)` local-path pair per recorded night matching
/// `options.recording`, in index order within each requested subject. Any
/// download or verification failure aborts the whole call.
pub async fn fetch_data(
    subjects: &[u16],
    options: &FetchOptions,
) -> Result<Vec<(PathBuf, PathBuf)>, DatasetError> {
    if let Some(&subject) = subjects.iter().find(|&&subject| subject > MAX_SUBJECT) {
        return Err(DatasetError::SubjectOutOfRange(subject));
    }

    let manifest = Manifest::load(&options.manifest)?;
    let root = config::data_path(options.path.as_deref(), options.update_path)?;
    let fetcher = Fetcher::new(&options.base_url, &root, options.force_update);

    let mut paths = Vec::new();
    for &subject in subjects {
        for (psg, hypnogram) in manifest.pairs_for(subject, &options.recording) {
            let psg_path = fetcher.fetch_one(&psg.fname, &psg.sha).await?;
            let hypnogram_path = fetcher.fetch_one(&hypnogram.fname, &hypnogram.sha).await?;
            paths.push((psg_path, hypnogram_path));
        }
    }
    Ok(paths)
}
