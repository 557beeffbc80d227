// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::fmt;

#[derive(Debug, Clone)]
pub enum SweepError {
    CorpusNotFoundError(String),
    DirectoryCreationError(String),
    PlanReadError(String),
    PlanParseError(String),
    PlanValidationError(String),
    ToolSpawnError(String),
    StagingError(String),
    OtherError(String),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SweepError::CorpusNotFoundError(message) => {
                write!(
                    f,
                    "[segsweep::CorpusNotFoundError] Input directory is missing or unreadable. {}.",
                    message
                )
            }
            SweepError::DirectoryCreationError(message) => {
                write!(
                    f,
                    "[segsweep::DirectoryCreationError] Output directory could not be prepared. {}.",
                    message
                )
            }
            SweepError::PlanReadError(message) => {
                write!(
                    f,
                    "[segsweep::PlanReadError] Sweep plan could not be read. {}.",
                    message
                )
            }
            SweepError::PlanParseError(message) => {
                write!(
                    f,
                    "[segsweep::PlanParseError] Sweep plan is not valid json. {}.",
                    message
                )
            }
            SweepError::PlanValidationError(message) => {
                write!(
                    f,
                    "[segsweep::PlanValidationError] Sweep plan failed validation. {}.",
                    message
                )
            }
            SweepError::ToolSpawnError(message) => {
                write!(
                    f,
                    "[segsweep::ToolSpawnError] External tool could not be started. {}.",
                    message
                )
            }
            SweepError::StagingError(message) => {
                write!(
                    f,
                    "[segsweep::StagingError] Staged output could not be renamed onto its target. {}.",
                    message
                )
            }
            SweepError::OtherError(message) => {
                write!(f, "[segsweep::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for SweepError {}
