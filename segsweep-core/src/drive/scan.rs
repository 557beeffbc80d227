// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::PathBuf;

use crate::error::SweepError;
use crate::ut;

/// One eligible input file and its mirrored target path
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// Filename shared by the input file and its target
    pub name: String,
    /// Source file under the task group's input directory
    pub input: PathBuf,
    /// Destination under the task group's output directory
    pub target: PathBuf,
}

/// Collect the work set for one task group
///
/// Every file in `input_dir` matching the suffix filter becomes a work
/// item targeting the same filename under `output_dir`. Items are
/// sorted by filename so a fixed directory listing always yields the
/// same processing order. Whether an item still needs dispatching is
/// decided later, at the start of its own processing step.
///
/// # Arguments
///
/// * `input_dir` - Resolved input directory of a task group
/// * `output_dir` - Derived output directory of the task group
/// * `suffix` - Suffix filter selecting eligible files
pub fn scan_group(
    input_dir: &str,
    output_dir: &str,
    suffix: &str,
) -> Result<Vec<WorkItem>, SweepError> {
    let names = ut::path::list_suffix_files(input_dir, suffix)?;

    let input_dir = PathBuf::from(input_dir);
    let output_dir = PathBuf::from(output_dir);

    Ok(names
        .into_iter()
        .map(|name| WorkItem {
            input: input_dir.join(&name),
            target: output_dir.join(&name),
            name,
        })
        .collect())
}
