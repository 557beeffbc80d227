// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

use crate::constant;
use crate::drive::outcome::FileOutcome;
use crate::drive::scan::WorkItem;
use crate::error::SweepError;
use crate::plan::ToolSpec;

/// Dispatch one work item to the external tool
///
/// The target existence check happens here, at the start of the item's
/// own processing step, so resumed and concurrent runs skip completed
/// work without invoking the tool. With staging enabled the tool
/// writes to a hidden sibling of the target which is renamed into
/// place only after a zero exit; target existence is then a reliable
/// completion marker. A staged file that cannot be renamed is left in
/// place for the stale sweep of the next run.
///
/// The tool inherits the driver's stdio so its own console output
/// stays visible.
///
/// # Arguments
///
/// * `item` - A scanned work item
/// * `tool` - The external tool description
/// * `staged` - Write to a hidden sibling and rename on success
/// * `timeout` - Optional per-invocation deadline
pub fn dispatch(
    item: &WorkItem,
    tool: &ToolSpec,
    staged: bool,
    timeout: Option<Duration>,
) -> Result<FileOutcome, SweepError> {
    if item.target.exists() {
        return Ok(FileOutcome::Skipped);
    }

    let destination = if staged {
        stage_path(&item.target)
    } else {
        item.target.clone()
    };

    let argv = tool.argv(&item.input, &destination);

    let status = wait_for_exit(&argv, timeout)
        .map_err(|err| SweepError::ToolSpawnError(format!("{} ({})", tool.program, err)))?;

    let status = match status {
        Some(status) => status,
        None => {
            remove_output(&destination);
            return Ok(FileOutcome::TimedOut);
        }
    };

    if !status.success() {
        if staged {
            remove_output(&destination);
        }
        return Ok(FileOutcome::Failed(status.code().unwrap_or(-1)));
    }

    if staged {
        std::fs::rename(&destination, &item.target).map_err(|err| {
            SweepError::StagingError(format!("{} ({})", item.target.display(), err))
        })?;
    }

    Ok(FileOutcome::Done)
}

/// Hidden sibling path the tool writes to while an item is in flight
///
/// The real filename is kept as the suffix of the staged name so tools
/// that sniff the output format from the filename still behave.
pub fn stage_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    target.with_file_name(format!("{}{}", constant::PARTIAL_PREFIX, name))
}

/// Run the tool and wait for it to exit, killing it at the deadline
///
/// Returns `Ok(None)` when the deadline passed before the tool exited.
fn wait_for_exit(
    argv: &[String],
    timeout: Option<Duration>,
) -> Result<Option<ExitStatus>, std::io::Error> {
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);

    let limit = match timeout {
        Some(limit) => limit,
        None => return command.status().map(Some),
    };

    let mut child = command.spawn()?;
    let started = Instant::now();

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if started.elapsed() >= limit {
            child.kill().ok();
            child.wait()?;
            return Ok(None);
        }

        std::thread::sleep(Duration::from_millis(constant::TIMEOUT_POLL_MS));
    }
}

// The tool may or may not have created the file yet so removal is
// best-effort
fn remove_output(path: &Path) {
    std::fs::remove_file(path).ok();
}

#[cfg(test)]
mod test {
    use super::*;

    fn copy_tool() -> ToolSpec {
        let mut tool = ToolSpec::new("cp");
        tool.input_flag = String::new();
        tool.output_flag = String::new();
        tool
    }

    // sh -c runs the item's "input" as a script with the destination
    // bound to $0, which keeps these tests free of fixture scripts
    fn shell_tool() -> ToolSpec {
        let mut tool = ToolSpec::new("sh");
        tool.input_flag = "-c".to_string();
        tool.output_flag = String::new();
        tool
    }

    fn work_item(root: &str, name: &str) -> WorkItem {
        WorkItem {
            name: name.to_string(),
            input: PathBuf::from(format!("{}/in/{}", root, name)),
            target: PathBuf::from(format!("{}/out/{}", root, name)),
        }
    }

    fn seed_item(root: &str, name: &str, contents: &str) -> WorkItem {
        let item = work_item(root, name);
        std::fs::create_dir_all(format!("{}/in", root)).unwrap();
        std::fs::create_dir_all(format!("{}/out", root)).unwrap();
        std::fs::write(&item.input, contents).unwrap();
        item
    }

    #[test]
    pub fn test_dispatch_staged() {
        let root = "TEST_DISPATCH_STAGED";
        let item = seed_item(root, "x.nii.gz", "volume");

        let outcome = dispatch(&item, &copy_tool(), true, None).unwrap();

        assert_eq!(outcome, FileOutcome::Done);
        assert_eq!(std::fs::read_to_string(&item.target).unwrap(), "volume");
        assert!(!stage_path(&item.target).exists());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_direct() {
        let root = "TEST_DISPATCH_DIRECT";
        let item = seed_item(root, "x.nii.gz", "volume");

        let outcome = dispatch(&item, &copy_tool(), false, None).unwrap();

        assert_eq!(outcome, FileOutcome::Done);
        assert_eq!(std::fs::read_to_string(&item.target).unwrap(), "volume");

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_skips_existing_target() {
        let root = "TEST_DISPATCH_SKIP";
        let item = seed_item(root, "x.nii.gz", "volume");
        std::fs::write(&item.target, "already").unwrap();

        // A tool that always fails proves nothing was invoked
        let outcome = dispatch(&item, &ToolSpec::new("false"), true, None).unwrap();

        assert_eq!(outcome, FileOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&item.target).unwrap(), "already");

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_nonzero_exit() {
        let root = "TEST_DISPATCH_NONZERO";
        let item = seed_item(root, "x.nii.gz", "volume");

        let outcome = dispatch(&item, &ToolSpec::new("false"), true, None).unwrap();

        assert_eq!(outcome, FileOutcome::Failed(1));
        assert!(!item.target.exists());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_removes_staged_output_on_failure() {
        let root = "TEST_DISPATCH_FAILURE_CLEANUP";
        let mut item = seed_item(root, "x.nii.gz", "volume");
        item.input = PathBuf::from("printf partial > \"$0\"; exit 3");

        let outcome = dispatch(&item, &shell_tool(), true, None).unwrap();

        assert_eq!(outcome, FileOutcome::Failed(3));
        assert!(!item.target.exists());
        assert!(!stage_path(&item.target).exists());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_timeout() {
        let root = "TEST_DISPATCH_TIMEOUT";
        let mut item = seed_item(root, "x.nii.gz", "volume");
        item.input = PathBuf::from("printf partial > \"$0\"; sleep 5");

        let started = Instant::now();
        let outcome = dispatch(
            &item,
            &shell_tool(),
            true,
            Some(Duration::from_millis(300)),
        )
        .unwrap();

        assert_eq!(outcome, FileOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(!item.target.exists());
        assert!(!stage_path(&item.target).exists());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_dispatch_spawn_error() {
        let root = "TEST_DISPATCH_SPAWN";
        let item = seed_item(root, "x.nii.gz", "volume");

        let outcome = dispatch(&item, &ToolSpec::new("segsweep_no_such_tool"), true, None);

        assert!(matches!(outcome, Err(SweepError::ToolSpawnError(_))));
        assert!(!item.target.exists());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    pub fn test_wait_for_exit_without_timeout() {
        let status = wait_for_exit(&["true".to_string()], None).unwrap();
        assert!(status.unwrap().success());
    }

    #[test]
    pub fn test_stage_path() {
        let staged = stage_path(Path::new("out/x.nii.gz"));
        assert_eq!(staged, PathBuf::from("out/.partial-x.nii.gz"));
    }
}
