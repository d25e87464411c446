use std::fs;
use std::path::{Path, PathBuf};
use chrono::{NaiveDate, TimeDelta};
use glob::glob;
use thiserror::Error;
use crate::report::Attachment;
use crate::report::slide::{FILE_EXTENSION, FILE_PREFIX};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file pattern error: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("keep_days out of range: {0}")]
    KeepDays(i64),
}

/// Writes the attachment to the output directory and reads it back, the returned
/// attachment carries the bytes as they were stored on disk
///
/// # Arguments
///
/// * 'output_dir' - the directory to save the file to, created if missing
/// * 'attachment' - the rendered document
pub fn persist(output_dir: &str, attachment: Attachment) -> Result<(Attachment, PathBuf), StorageError> {
    fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join(&attachment.file_name);

    fs::write(&path, &attachment.bytes)?;
    let bytes = fs::read(&path)?;

    Ok((Attachment { bytes, ..attachment }, path))
}

/// Removes stored slides dated more than keep_days before today, returns the
/// number of files removed. Files whose name does not carry a date are left alone.
/// A negative or unrepresentable keep_days is an error and removes nothing.
///
/// # Arguments
///
/// * 'output_dir' - the directory holding stored slides
/// * 'keep_days' - number of days to keep slides for
/// * 'today' - the date of the current run
pub fn prune(output_dir: &str, keep_days: i64, today: NaiveDate) -> Result<usize, StorageError> {
    let keep = TimeDelta::try_days(keep_days)
        .filter(|d| *d >= TimeDelta::zero())
        .ok_or(StorageError::KeepDays(keep_days))?;

    let pattern = Path::new(output_dir)
        .join(format!("{}*.{}", FILE_PREFIX, FILE_EXTENSION))
        .to_string_lossy()
        .to_string();

    let mut removed: usize = 0;
    for path in glob(&pattern)?.flatten() {
        if let Some(date) = slide_date(&path) {
            if today - date > keep {
                fs::remove_file(path)?;
                removed += 1;
            }
        }
    }

    Ok(removed)
}

fn slide_date(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    let date = stem.strip_prefix(FILE_PREFIX)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
