// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

/// The outcome of one work item
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Target already existed so nothing was dispatched
    Skipped,
    /// Tool exited zero and the output is in place
    Done,
    /// Tool exited non-zero (signal deaths are recorded as -1)
    Failed(i32),
    /// Tool exceeded the configured timeout and was killed
    TimedOut,
    /// Dispatch failed before or after the tool ran
    Error(String),
    /// Pending work item observed without dispatching (dry runs)
    Pending,
}

impl FileOutcome {
    /// Label used in outcome logs and report rows
    pub fn label(&self) -> String {
        match self {
            FileOutcome::Skipped => "skipped".to_string(),
            FileOutcome::Done => "done".to_string(),
            FileOutcome::Failed(code) => format!("failed ({})", code),
            FileOutcome::TimedOut => "timeout".to_string(),
            FileOutcome::Error(message) => format!("error ({})", message),
            FileOutcome::Pending => "pending".to_string(),
        }
    }
}

/// The recorded outcome for one file in a task group
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

/// The recorded outcomes for one task group
///
/// A group that could not be prepared or scanned carries the error in
/// `error` and an empty file list. Group failures never abort the run;
/// the remaining task groups are still swept.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub task: String,
    pub input_dir: String,
    pub output_dir: String,
    pub files: Vec<FileReport>,
    pub error: Option<String>,
}

impl GroupReport {
    pub fn completed(task: &str, input_dir: &str, output_dir: &str, files: Vec<FileReport>) -> Self {
        Self {
            task: task.to_string(),
            input_dir: input_dir.to_string(),
            output_dir: output_dir.to_string(),
            files,
            error: None,
        }
    }

    pub fn failed(task: &str, input_dir: &str, output_dir: &str, error: String) -> Self {
        Self {
            task: task.to_string(),
            input_dir: input_dir.to_string(),
            output_dir: output_dir.to_string(),
            files: Vec::new(),
            error: Some(error),
        }
    }

    /// Count the group's outcomes by kind
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();

        for file in &self.files {
            match file.outcome {
                FileOutcome::Skipped => tally.skipped += 1,
                FileOutcome::Done => tally.done += 1,
                FileOutcome::Failed(_) => tally.failed += 1,
                FileOutcome::TimedOut => tally.timeouts += 1,
                FileOutcome::Error(_) => tally.errors += 1,
                FileOutcome::Pending => tally.pending += 1,
            }
        }

        tally
    }
}

/// Outcome counts for one or more task groups
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
    pub timeouts: usize,
    pub errors: usize,
    pub pending: usize,
}

impl Tally {
    pub fn merge(&mut self, other: Tally) {
        self.done += other.done;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.timeouts += other.timeouts;
        self.errors += other.errors;
        self.pending += other.pending;
    }

    /// Count of items that were dispatched but produced no output
    pub fn unproductive(&self) -> usize {
        self.failed + self.timeouts + self.errors
    }
}
