// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::sync::Mutex;

use clap::Args;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use segsweep_core::constant;
use segsweep_core::drive;
use segsweep_core::plan::{OutputRule, PathTemplate, SweepPlan, ToolSpec};
use segsweep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Sweep an external segmentation tool over the configured task groups.")]
pub struct RunArgs {
    #[arg(
        short = 'p',
        long,
        help = "Sweep plan file (json). Mutually exclusive with the plan field flags."
    )]
    pub plan: Option<String>,

    #[arg(long, help = "Comma-separated task group names (e.g. Task03_Liver,Task10_Colon).")]
    pub tasks: Option<String>,

    #[arg(
        short = 'i',
        long,
        help = "Input directory template containing the ### task placeholder."
    )]
    pub input_template: Option<String>,

    #[arg(
        long,
        help = "Substring of the input directory replaced to derive the output directory."
    )]
    pub output_find: Option<String>,

    #[arg(long, help = "Replacement substring for the output directory derivation.")]
    pub output_replace: Option<String>,

    #[arg(short = 's', long, help = "Suffix filter for eligible files (e.g. .nii.gz).")]
    pub suffix: Option<String>,

    #[arg(
        long,
        help = "External tool program. Falls back to the SEGSWEEP_PROGRAM environment variable."
    )]
    pub program: Option<String>,

    #[arg(long, help = "Flag passing the input file path to the tool.")]
    pub input_flag: Option<String>,

    #[arg(long, help = "Flag passing the output path to the tool.")]
    pub output_flag: Option<String>,

    #[arg(
        long = "tool-arg",
        help = "Fixed tool flag appended to every invocation (repeatable, e.g. --tool-arg -ml).",
        allow_hyphen_values = true
    )]
    pub tool_args: Vec<String>,

    #[arg(short = 't', long, help = "Maximum concurrent tool invocations within a task group.")]
    pub workers: Option<usize>,

    #[arg(long, help = "Per-invocation timeout in seconds.")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Write outputs directly instead of staging and renaming on success.")]
    pub no_stage: bool,

    #[arg(short = 'n', long, help = "Print each pending command instead of running it.")]
    pub dry_run: bool,

    #[arg(short = 'r', long, help = "Write a tsv report of per-file outcomes.")]
    pub report: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn run(args: &RunArgs) {
    let plan = build_plan(args);

    let opts = drive::RunOptions {
        verbose: args.verbose,
        dry_run: args.dry_run,
    };

    let reports = drive::run(&plan, &opts).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    summarize(&reports, args.verbose);

    if let Some(report_path) = args.report.to_owned() {
        write_report(&reports, &report_path);
    }
}

fn build_plan(args: &RunArgs) -> SweepPlan {
    if let Some(plan_path) = args.plan.to_owned() {
        if args.tasks.is_some()
            || args.input_template.is_some()
            || args.output_find.is_some()
            || args.output_replace.is_some()
            || args.suffix.is_some()
            || args.program.is_some()
            || args.input_flag.is_some()
            || args.output_flag.is_some()
            || !args.tool_args.is_empty()
            || args.workers.is_some()
            || args.timeout.is_some()
            || args.no_stage
        {
            eprintln!(
                "[segsweep::run] ERROR: --plan cannot be combined with plan field flags."
            );
            std::process::exit(1);
        }

        return SweepPlan::from_file(&plan_path).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });
    }

    if args.input_template.is_none() || args.output_find.is_none() || args.output_replace.is_none()
    {
        eprintln!(
            "[segsweep::run] ERROR: --input-template, --output-find, and --output-replace must be specified when no plan file is provided."
        );
        std::process::exit(1);
    }

    let tasks: Vec<String> = args
        .tasks
        .to_owned()
        .unwrap_or_default()
        .split(',')
        .map(|task| task.trim().to_string())
        .filter(|task| !task.is_empty())
        .collect();

    let program = args.program.to_owned().unwrap_or_else(|| {
        std::env::var(constant::PROGRAM_ENV_VAR).unwrap_or_default()
    });

    let mut tool = ToolSpec::new(program);

    if let Some(input_flag) = args.input_flag.to_owned() {
        tool.input_flag = input_flag;
    }

    if let Some(output_flag) = args.output_flag.to_owned() {
        tool.output_flag = output_flag;
    }

    tool.args = args.tool_args.to_owned();

    SweepPlan {
        tasks,
        template: PathTemplate::new(args.input_template.to_owned().unwrap()),
        output: OutputRule::new(
            args.output_find.to_owned().unwrap(),
            args.output_replace.to_owned().unwrap(),
        ),
        suffix: args
            .suffix
            .to_owned()
            .unwrap_or_else(|| constant::DEFAULT_VOLUME_SUFFIX.to_string()),
        tool,
        workers: args.workers.unwrap_or(1),
        timeout: args.timeout,
        staged: !args.no_stage,
    }
}

fn summarize(reports: &[drive::GroupReport], verbose: bool) {
    let mut total = drive::Tally::default();

    for report in reports {
        total.merge(report.tally());
    }

    let message = if total.pending > 0 {
        format!(
            "Complete. {} pending, {} skipped across {} task groups.",
            ut::track::thousands_format(total.pending),
            ut::track::thousands_format(total.skipped),
            ut::track::thousands_format(reports.len())
        )
    } else {
        format!(
            "Complete. {} completed, {} skipped, {} failed across {} task groups.",
            ut::track::thousands_format(total.done),
            ut::track::thousands_format(total.skipped),
            ut::track::thousands_format(total.unproductive()),
            ut::track::thousands_format(reports.len())
        )
    };

    ut::track::progress_log(&message, verbose);

    let failed_groups = reports.iter().filter(|report| report.error.is_some()).count();

    if failed_groups > 0 {
        ut::track::progress_warn(&format!(
            "{} task groups could not be processed.",
            ut::track::thousands_format(failed_groups)
        ));
    }
}

fn write_report(reports: &[drive::GroupReport], path: &str) {
    let rows: Mutex<Vec<String>> = Mutex::new(Vec::new());

    reports.par_iter().for_each(|report| {
        let mut group_rows: Vec<String> = report
            .files
            .iter()
            .map(|file| format!("{}\t{}\t{}", report.task, file.name, file.outcome.label()))
            .collect();

        if let Some(error) = &report.error {
            group_rows.push(format!("{}\t-\t{}", report.task, error));
        }

        rows.lock().unwrap().extend(group_rows);
    });

    let mut rows = rows.into_inner().unwrap();
    rows.sort_unstable();

    std::fs::write(path, rows.join("\n")).unwrap_or_else(|_| {
        eprintln!(
            "[segsweep::run] ERROR: Could not write outcome report to {}.",
            path
        );
        std::process::exit(1);
    });
}
