// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::SweepError;
use crate::plan::template::{OutputRule, PathTemplate};
use crate::plan::tool::ToolSpec;

/// A complete description of one corpus sweep
///
/// The plan is immutable for the duration of a run. Interrupting a
/// sweep and re-running the same plan resumes it: files whose targets
/// already exist are skipped and only the remaining work is
/// dispatched.
///
/// # Examples
///
/// ```
/// use segsweep_core::plan::SweepPlan;
///
/// let plan: SweepPlan = serde_json::from_str(
///     r#"{
///         "tasks": ["Task03_Liver", "Task10_Colon"],
///         "template": "data/msd/###/imagesTr",
///         "output": { "find": "msd", "replace": "msd_segmentation" },
///         "tool": { "program": "TotalSegmentator", "args": ["-ml"] }
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(plan.suffix, ".nii.gz");
/// assert_eq!(plan.workers, 1);
/// assert!(plan.staged);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPlan {
    // Ordered task group names
    pub tasks: Vec<String>,

    // Input directory template with the task group placeholder
    pub template: PathTemplate,

    // Output directory derivation rule
    pub output: OutputRule,

    // Suffix filter selecting eligible files
    #[serde(default = "default_suffix")]
    pub suffix: String,

    // External tool invoked once per eligible file
    pub tool: ToolSpec,

    // Maximum concurrent invocations within a task group
    #[serde(default = "default_workers")]
    pub workers: usize,

    // Per-invocation timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    // Stage outputs under a hidden name and rename on success
    #[serde(default = "default_staged")]
    pub staged: bool,
}

fn default_suffix() -> String {
    constant::DEFAULT_VOLUME_SUFFIX.to_string()
}

fn default_workers() -> usize {
    1
}

fn default_staged() -> bool {
    true
}

impl SweepPlan {
    /// Load a sweep plan from a json file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a json sweep plan
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use segsweep_core::plan::SweepPlan;
    ///
    /// let plan = SweepPlan::from_file("msd.json");
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
        let message = path.as_ref().display().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|err| SweepError::PlanReadError(format!("{} ({})", message, err)))?;

        serde_json::from_str(&contents)
            .map_err(|err| SweepError::PlanParseError(err.to_string()))
    }

    /// Check the plan before any task group is touched
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.tasks.is_empty() {
            return Err(SweepError::PlanValidationError(
                "task group list is empty".to_string(),
            ));
        }

        self.template.validate()?;
        self.output.validate()?;

        if self.suffix.is_empty() {
            return Err(SweepError::PlanValidationError(
                "suffix filter is empty".to_string(),
            ));
        }

        if self.tool.program.is_empty() {
            return Err(SweepError::PlanValidationError(format!(
                "no tool program configured (set tool.program or {})",
                constant::PROGRAM_ENV_VAR
            )));
        }

        if self.workers < 1 {
            return Err(SweepError::PlanValidationError(
                "workers must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the input and output directories for a task group
    pub fn resolve_pair(&self, task: &str) -> (String, String) {
        let input_dir = self.template.resolve(task);
        let output_dir = self.output.apply(&input_dir);
        (input_dir, output_dir)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn minimal_plan() -> SweepPlan {
        serde_json::from_str(
            r#"{
                "tasks": ["Task03_Liver"],
                "template": "data/msd/###/imagesTr",
                "output": { "find": "msd", "replace": "msd_segmentation" },
                "tool": { "program": "TotalSegmentator" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    pub fn test_defaults() {
        let plan = minimal_plan();

        assert_eq!(plan.suffix, ".nii.gz");
        assert_eq!(plan.workers, 1);
        assert_eq!(plan.timeout, None);
        assert!(plan.staged);
        assert!(plan.validate().is_ok());
    }

    #[test]
    pub fn test_resolve_pair() {
        let plan = minimal_plan();

        let (input_dir, output_dir) = plan.resolve_pair("Task05_Prostate");
        assert_eq!(input_dir, "data/msd/Task05_Prostate/imagesTr");
        assert_eq!(output_dir, "data/msd_segmentation/Task05_Prostate/imagesTr");

        assert_eq!(plan.resolve_pair("Task05_Prostate"), (input_dir, output_dir));
    }

    #[test]
    pub fn test_validate_rejects_empty_tasks() {
        let mut plan = minimal_plan();
        plan.tasks.clear();
        assert!(matches!(plan.validate(), Err(SweepError::PlanValidationError(_))));
    }

    #[test]
    pub fn test_validate_rejects_missing_placeholder() {
        let mut plan = minimal_plan();
        plan.template = PathTemplate::new("data/msd/imagesTr");
        assert!(matches!(plan.validate(), Err(SweepError::PlanValidationError(_))));
    }

    #[test]
    pub fn test_validate_rejects_missing_program() {
        let mut plan = minimal_plan();
        plan.tool.program = String::new();
        assert!(matches!(plan.validate(), Err(SweepError::PlanValidationError(_))));
    }

    #[test]
    pub fn test_validate_rejects_zero_workers() {
        let mut plan = minimal_plan();
        plan.workers = 0;
        assert!(matches!(plan.validate(), Err(SweepError::PlanValidationError(_))));
    }

    #[test]
    pub fn test_from_file_missing() {
        let plan = SweepPlan::from_file("TEST_PLAN_DOES_NOT_EXIST/plan.json");
        assert!(matches!(plan, Err(SweepError::PlanReadError(_))));
    }

    #[test]
    pub fn test_from_file_invalid_json() {
        let directory = "TEST_PLAN_INVALID_JSON";
        std::fs::create_dir_all(directory).unwrap();
        std::fs::write(format!("{}/plan.json", directory), "{ not json").unwrap();

        let plan = SweepPlan::from_file(format!("{}/plan.json", directory));
        assert!(matches!(plan, Err(SweepError::PlanParseError(_))));

        std::fs::remove_dir_all(directory).unwrap();
    }
}
