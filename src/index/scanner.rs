//! Directory scanner - lists `.meta` sidecars and aggregates their records

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::IndexConfig;
use crate::error::{IndexError, Result, SkipReason};

use super::aggregate::{Aggregation, AggregationBuilder, QueryFilter};
use super::record::{parse_record, MetadataRecord};

/// A metadata file found in the base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFile {
    pub path: PathBuf,
    /// File name with the metadata suffix stripped
    pub video_name: String,
}

/// Counters for a single scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_seen: usize,
    pub kept: usize,
    pub filtered: usize,
    pub skipped: usize,
}

/// Strip `suffix` from a file name, if anything is left
pub fn video_name(file_name: &str, suffix: &str) -> Option<String> {
    file_name
        .strip_suffix(suffix)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// List metadata files directly inside `dir`, sorted by file name.
///
/// Hidden files and names that are not valid UTF-8 are left out.
pub fn list_meta_files(dir: &Path, suffix: &str) -> std::io::Result<Vec<MetaFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if let Some(video_name) = video_name(name, suffix) {
            files.push(MetaFile {
                path: entry.path(),
                video_name,
            });
        }
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}

/// Read and validate a single metadata file
pub fn read_record(file: &MetaFile) -> std::result::Result<MetadataRecord, SkipReason> {
    let body = fs::read(&file.path).map_err(|_| SkipReason::Unreadable)?;
    parse_record(&file.video_name, &body)
}

/// Scan the configured directory and aggregate every record matching `filter`.
///
/// Only a missing base directory is an error. Files that cannot be read or
/// parsed are skipped, and a directory that exists but cannot be listed
/// yields an empty result.
pub fn scan_directory(config: &IndexConfig, filter: &QueryFilter) -> Result<Aggregation> {
    scan_directory_with_summary(config, filter).map(|(aggregation, _)| aggregation)
}

/// Same as [`scan_directory`], also returning the scan counters
pub fn scan_directory_with_summary(
    config: &IndexConfig,
    filter: &QueryFilter,
) -> Result<(Aggregation, ScanSummary)> {
    let dir = config.meta_dir.as_path();
    if !fs::metadata(dir).map(|m| m.is_dir()).unwrap_or(false) {
        return Err(IndexError::DirectoryNotFound(dir.to_path_buf()));
    }

    let files = match list_meta_files(dir, &config.suffix()) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("Failed to list metadata directory {:?}: {}", dir, e);
            Vec::new()
        }
    };

    let mut summary = ScanSummary {
        files_seen: files.len(),
        ..Default::default()
    };
    let mut builder = AggregationBuilder::new();

    for file in &files {
        match read_record(file) {
            Ok(record) if filter.matches(&record) => {
                summary.kept += 1;
                builder.insert(record);
            }
            Ok(_) => summary.filtered += 1,
            Err(_) => summary.skipped += 1,
        }
    }

    tracing::debug!(
        "Scanned {:?}: files={}, kept={}, filtered={}, skipped={}",
        dir,
        summary.files_seen,
        summary.kept,
        summary.filtered,
        summary.skipped
    );

    Ok((builder.finish(), summary))
}
