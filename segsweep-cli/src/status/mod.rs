// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use clap::Args;
use colored::Colorize;

use segsweep_core::constant;
use segsweep_core::drive::scan_group;
use segsweep_core::plan::{OutputRule, PathTemplate, SweepPlan};

#[derive(Debug, Args)]
#[command(about = "Report done and pending counts for each task group without dispatching.")]
pub struct StatusArgs {
    #[arg(short = 'p', long, help = "Sweep plan file (json).")]
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
}

pub fn status(args: &StatusArgs) {
    let (tasks, template, output, suffix) = collect_fields(args);

    println!("{:^76}", "\n");
    println!("| {:-^76} |", "");
    println!("| {:^76} |", "segsweep".truecolor(70, 130, 220).bold());
    println!("| {:^76} |", "Task group status");
    println!("| {:-^76} |", "");
    println!(
        "| {:^24} | {:^10} | {:^10} | {:^10} | {:^10} |",
        "task".bold(),
        "eligible".bold(),
        "done".bold(),
        "pending".bold(),
        "corpus".bold()
    );
    println!(
        "| {:-^24} | {:-^10} | {:-^10} | {:-^10} | {:-^10} |",
        "", "", "", "", ""
    );

    for task in &tasks {
        let input_dir = template.resolve(task);
        let output_dir = output.apply(&input_dir);

        match scan_group(&input_dir, &output_dir, &suffix) {
            Ok(items) => {
                let done = items.iter().filter(|item| item.target.exists()).count();

                println!(
                    "| {:^24} | {:^10} | {:^10} | {:^10} | {:^10} |",
                    task,
                    items.len(),
                    done,
                    items.len() - done,
                    "ok"
                );
            }
            Err(_) => {
                println!(
                    "| {:^24} | {:^10} | {:^10} | {:^10} | {:^10} |",
                    task, "-", "-", "-", "missing"
                );
            }
        }
    }

    println!(
        "| {:-^24} | {:-^10} | {:-^10} | {:-^10} | {:-^10} |",
        "", "", "", "", ""
    );
    println!("{:^76}", "\n");
}

fn collect_fields(args: &StatusArgs) -> (Vec<String>, PathTemplate, OutputRule, String) {
    if let Some(plan_path) = args.plan.to_owned() {
        let plan = SweepPlan::from_file(&plan_path).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

        plan.template.validate().unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

        return (plan.tasks, plan.template, plan.output, plan.suffix);
    }

    if args.tasks.is_none()
        || args.input_template.is_none()
        || args.output_find.is_none()
        || args.output_replace.is_none()
    {
        eprintln!(
            "[segsweep::status] ERROR: Either --plan or --tasks, --input-template, --output-find, and --output-replace must be specified."
        );
        std::process::exit(1);
    }

    let tasks: Vec<String> = args
        .tasks
        .to_owned()
        .unwrap()
        .split(',')
        .map(|task| task.trim().to_string())
        .filter(|task| !task.is_empty())
        .collect();

    let template = PathTemplate::new(args.input_template.to_owned().unwrap());

    template.validate().unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let output = OutputRule::new(
        args.output_find.to_owned().unwrap(),
        args.output_replace.to_owned().unwrap(),
    );

    output.validate().unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let suffix = args
        .suffix
        .to_owned()
        .unwrap_or_else(|| constant::DEFAULT_VOLUME_SUFFIX.to_string());

    (tasks, template, output, suffix)
}
