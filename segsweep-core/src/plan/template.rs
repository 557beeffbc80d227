// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::SweepError;

/// An input directory template with a task group placeholder
///
/// Each task group's input directory is resolved by substituting the
/// group name into the `###` placeholder.
///
/// # Examples
///
/// ```
/// use segsweep_core::plan::PathTemplate;
///
/// let template = PathTemplate::new("data/msd/###/imagesTr");
///
/// assert_eq!(
///     template.resolve("Task03_Liver"),
///     "data/msd/Task03_Liver/imagesTr"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTemplate {
    template: String,
}

impl PathTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Check that the placeholder is present so distinct task groups
    /// resolve to distinct input directories
    pub fn validate(&self) -> Result<(), SweepError> {
        if !self.template.contains(constant::TEMPLATE_PLACEHOLDER) {
            return Err(SweepError::PlanValidationError(format!(
                "input template {} does not contain the {} placeholder",
                self.template,
                constant::TEMPLATE_PLACEHOLDER
            )));
        }

        Ok(())
    }

    /// Resolve the input directory for a task group name
    pub fn resolve(&self, task: &str) -> String {
        self.template
            .replace(constant::TEMPLATE_PLACEHOLDER, task)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// A substring replacement deriving an output directory from an input
/// directory
///
/// Every occurrence of `find` in the resolved input directory is
/// replaced with `replace`, mirroring the corpus layout on the output
/// side. A fixed input directory always derives the same output
/// directory.
///
/// # Examples
///
/// ```
/// use segsweep_core::plan::OutputRule;
///
/// let rule = OutputRule::new("msd", "msd_segmentation");
///
/// assert_eq!(
///     rule.apply("data/msd/Task03_Liver/imagesTr"),
///     "data/msd_segmentation/Task03_Liver/imagesTr"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRule {
    pub find: String,
    pub replace: String,
}

impl OutputRule {
    pub fn new<S: Into<String>>(find: S, replace: S) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.find.is_empty() {
            return Err(SweepError::PlanValidationError(
                "output rule find string is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Derive the output directory for a resolved input directory
    pub fn apply(&self, input_dir: &str) -> String {
        input_dir.replace(&self.find, &self.replace)
    }
}
