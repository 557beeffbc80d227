// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant;

/// A description of the external per-file tool
///
/// Any segmentation tool invokable as `program <input_flag> <input>
/// <output_flag> <output> [args..]` can be described here. Tools that
/// take positional input and output paths are described with empty
/// flags, which are omitted from the built command. Nothing else is
/// assumed about the tool: it is treated as an opaque executable that
/// reads one file and writes one result.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use segsweep_core::plan::ToolSpec;
///
/// let mut tool = ToolSpec::new("TotalSegmentator");
/// tool.args = vec!["-ml".to_string()];
///
/// assert_eq!(
///     tool.argv(Path::new("a.nii.gz"), Path::new("out/a.nii.gz")),
///     vec!["TotalSegmentator", "-i", "a.nii.gz", "-o", "out/a.nii.gz", "-ml"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_input_flag")]
    pub input_flag: String,

    #[serde(default = "default_output_flag")]
    pub output_flag: String,

    // Fixed mode flags appended to every invocation (e.g. -ml)
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_program() -> String {
    std::env::var(constant::PROGRAM_ENV_VAR).unwrap_or_default()
}

fn default_input_flag() -> String {
    constant::DEFAULT_INPUT_FLAG.to_string()
}

fn default_output_flag() -> String {
    constant::DEFAULT_OUTPUT_FLAG.to_string()
}

impl ToolSpec {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            input_flag: default_input_flag(),
            output_flag: default_output_flag(),
            args: Vec::new(),
        }
    }

    /// Build the full argument vector for one invocation
    pub fn argv(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut argv = vec![self.program.clone()];

        if !self.input_flag.is_empty() {
            argv.push(self.input_flag.clone());
        }

        argv.push(input.display().to_string());

        if !self.output_flag.is_empty() {
            argv.push(self.output_flag.clone());
        }

        argv.push(output.display().to_string());
        argv.extend(self.args.iter().cloned());

        argv
    }

    /// Render one invocation as a single log line
    pub fn render(&self, input: &Path, output: &Path) -> String {
        self.argv(input, output).join(" ")
    }
}
