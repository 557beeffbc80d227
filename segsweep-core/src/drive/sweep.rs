// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use kdam::BarExt;

use crate::constant;
use crate::drive::dispatch::dispatch;
use crate::drive::outcome::{FileOutcome, FileReport, GroupReport};
use crate::drive::scan::scan_group;
use crate::error::SweepError;
use crate::plan::SweepPlan;
use crate::ut;

/// Run-level switches that do not change what a sweep produces
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Log per-file outcomes and progress
    pub verbose: bool,
    /// Print the command for each pending file instead of dispatching it
    pub dry_run: bool,
}

/// Sweep every task group in a plan
///
/// Task groups are processed in their configured order and are
/// isolated from each other: a group whose input directory is missing
/// or whose output directory cannot be prepared is recorded as failed
/// and the remaining groups still run. Within a group, work items are
/// processed in sorted filename order with at most `plan.workers`
/// invocations in flight and never two invocations against the same
/// target.
///
/// Re-running an interrupted or extended sweep dispatches only the
/// work whose targets do not exist yet.
///
/// # Arguments
///
/// * `plan` - The sweep plan
/// * `opts` - Run-level switches
///
/// # Examples
///
/// ```no_run
/// use segsweep_core::drive::{RunOptions, run};
/// use segsweep_core::plan::SweepPlan;
///
/// let plan = SweepPlan::from_file("msd.json").unwrap();
/// let reports = run(&plan, &RunOptions::default()).unwrap();
/// ```
pub fn run(plan: &SweepPlan, opts: &RunOptions) -> Result<Vec<GroupReport>, SweepError> {
    plan.validate()?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| SweepError::OtherError(format!("could not start runtime ({})", err)))?;

    let mut reports = Vec::with_capacity(plan.tasks.len());

    for task in &plan.tasks {
        reports.push(runtime.block_on(run_group(plan, task, opts)));
    }

    Ok(reports)
}

/// Sweep one task group, recording rather than propagating its errors
async fn run_group(plan: &SweepPlan, task: &str, opts: &RunOptions) -> GroupReport {
    let (input_dir, output_dir) = plan.resolve_pair(task);

    if output_dir == input_dir {
        let error = SweepError::PlanValidationError(format!(
            "output rule maps {} onto itself for task {}",
            input_dir, task
        ));
        ut::track::progress_warn(&error.to_string());
        return GroupReport::failed(task, &input_dir, &output_dir, error.to_string());
    }

    ut::track::progress_log(
        &format!("Task {}: {} -> {}.", task, input_dir, output_dir),
        opts.verbose,
    );

    if !opts.dry_run {
        if let Err(error) = ut::path::ensure_directory(&output_dir) {
            ut::track::progress_warn(&error.to_string());
            return GroupReport::failed(task, &input_dir, &output_dir, error.to_string());
        }

        if plan.staged {
            sweep_stale_partials(&output_dir);
        }
    }

    let items = match scan_group(&input_dir, &output_dir, &plan.suffix) {
        Ok(items) => items,
        Err(error) => {
            ut::track::progress_warn(&error.to_string());
            return GroupReport::failed(task, &input_dir, &output_dir, error.to_string());
        }
    };

    ut::track::progress_log(
        &format!(
            "Task {}: detected {} eligible files.",
            task,
            ut::track::thousands_format(items.len())
        ),
        opts.verbose,
    );

    if opts.dry_run {
        let files = items
            .into_iter()
            .map(|item| {
                let outcome = if item.target.exists() {
                    FileOutcome::Skipped
                } else {
                    println!("{}", plan.tool.render(&item.input, &item.target));
                    FileOutcome::Pending
                };

                FileReport { name: item.name, outcome }
            })
            .collect();

        return GroupReport::completed(task, &input_dir, &output_dir, files);
    }

    let timeout = plan.timeout.map(Duration::from_secs);

    let pb = Arc::new(Mutex::new(ut::track::progress_bar(
        items.len(),
        &format!("Sweeping {}", task),
        opts.verbose,
    )));

    let mut files: Vec<FileReport> = stream::iter(items)
        .map(|item| {
            let tool = plan.tool.clone();
            let staged = plan.staged;
            let verbose = opts.verbose;
            let pb_clone = pb.clone();

            async move {
                let name = item.name.clone();

                let result =
                    tokio::task::spawn_blocking(move || dispatch(&item, &tool, staged, timeout))
                        .await
                        .unwrap_or_else(|_| {
                            Err(SweepError::OtherError(
                                "dispatch worker panicked".to_string(),
                            ))
                        });

                let outcome = match result {
                    Ok(outcome) => outcome,
                    Err(error) => {
                        ut::track::progress_warn(&format!("{}: {}", name, error));
                        FileOutcome::Error(error.to_string())
                    }
                };

                match &outcome {
                    FileOutcome::Skipped => ut::track::progress_log(
                        &format!("Skipping {} because it already exists", name),
                        verbose,
                    ),
                    FileOutcome::Failed(code) => ut::track::progress_warn(&format!(
                        "{}: external tool exited with status {}",
                        name, code
                    )),
                    FileOutcome::TimedOut => ut::track::progress_warn(&format!(
                        "{}: external tool timed out and was killed",
                        name
                    )),
                    _ => {}
                }

                if verbose {
                    pb_clone.lock().unwrap().update(1).unwrap();
                }

                FileReport { name, outcome }
            }
        })
        .buffer_unordered(plan.workers)
        .collect::<Vec<_>>()
        .await;

    if opts.verbose {
        println!();
    }

    // Completion order varies with workers so reports are fixed by name
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let report = GroupReport::completed(task, &input_dir, &output_dir, files);
    let tally = report.tally();

    let message = if tally.unproductive() > 0 {
        format!(
            "Task {} finished: {} completed, {} skipped, {} failed.",
            task,
            ut::track::thousands_format(tally.done),
            ut::track::thousands_format(tally.skipped),
            ut::track::thousands_format(tally.unproductive())
        )
    } else {
        format!(
            "Task {} finished: {} completed, {} skipped.",
            task,
            ut::track::thousands_format(tally.done),
            ut::track::thousands_format(tally.skipped)
        )
    };

    ut::track::progress_log(&message, opts.verbose);

    report
}

/// Remove staged leftovers from interrupted runs
///
/// Stale partials can never satisfy a target existence check, but left
/// alone they would accumulate in the output directory across runs.
fn sweep_stale_partials(output_dir: &str) {
    if let Ok(entries) = std::fs::read_dir(output_dir) {
        for entry in entries.filter_map(Result::ok) {
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with(constant::PARTIAL_PREFIX)
            {
                std::fs::remove_file(entry.path()).ok();
            }
        }
    }
}
