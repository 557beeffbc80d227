// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::{Path, PathBuf};

use crate::error::SweepError;

/// Check if a filename matches a suffix filter
///
/// Suffixes are matched against the full filename rather than
/// `Path::extension` so that multi-dot suffixes such as `.nii.gz`
/// behave as expected. Hidden files never match; corpora copied from
/// macOS commonly carry `._` sidecar files that would otherwise
/// satisfy the filter.
///
/// # Arguments
///
/// * `name` - A filename without any leading directories
/// * `suffix` - A suffix filter (e.g. .nii.gz)
///
/// # Examples
///
/// ```
/// use segsweep_core::ut::path::has_suffix;
///
/// assert!(has_suffix("liver_001.nii.gz", ".nii.gz"));
/// assert!(!has_suffix("liver_001.txt", ".nii.gz"));
/// assert!(!has_suffix("._liver_001.nii.gz", ".nii.gz"));
/// ```
pub fn has_suffix(name: &str, suffix: &str) -> bool {
    !name.starts_with('.') && name.ends_with(suffix)
}

/// Collect all filenames in a directory that match a suffix filter
///
/// Returned names are sorted so repeated scans of an unchanged
/// directory always produce the same processing order.
///
/// # Arguments
///
/// * `directory` - A directory containing candidate files
/// * `suffix` - A suffix filter (e.g. .nii.gz)
///
/// # Examples
///
/// ```no_run
/// use segsweep_core::ut::path::list_suffix_files;
///
/// let names = list_suffix_files("data/msd/Task03_Liver/imagesTr", ".nii.gz");
/// ```
pub fn list_suffix_files<P: AsRef<Path>>(
    directory: P,
    suffix: &str,
) -> Result<Vec<String>, SweepError> {
    let message = directory.as_ref().display().to_string();

    let mut names: Vec<String> = std::fs::read_dir(directory)
        .map_err(|_| SweepError::CorpusNotFoundError(message))?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(|name| name.to_string()))
        .filter(|name| has_suffix(name, suffix))
        .collect();

    names.sort_unstable();

    Ok(names)
}

/// Ensure a directory exists, creating it and any missing parents
///
/// Repeated calls are idempotent. Resumed sweeps re-use the output
/// directories produced by earlier runs.
///
/// # Arguments
///
/// * `directory` - A new or existing directory
///
/// # Examples
///
/// ```
/// use segsweep_core::ut::path::ensure_directory;
///
/// let output_dir = ensure_directory("TEST_ENSURE_DIRECTORY/imagesTr").unwrap();
/// assert!(output_dir.exists());
///
/// ensure_directory("TEST_ENSURE_DIRECTORY/imagesTr").unwrap();
///
/// std::fs::remove_dir_all("TEST_ENSURE_DIRECTORY").unwrap();
/// ```
pub fn ensure_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, SweepError> {
    let directory = directory.as_ref();

    std::fs::create_dir_all(directory).map_err(|err| {
        SweepError::DirectoryCreationError(format!("{} ({})", directory.display(), err))
    })?;

    Ok(directory.to_path_buf())
}
