// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// Default suffix identifying eligible imaging volumes
pub const DEFAULT_VOLUME_SUFFIX: &str = ".nii.gz";

// Placeholder substituted with the task group name in input templates
pub const TEMPLATE_PLACEHOLDER: &str = "###";

// Prefix for staged outputs that have not yet been renamed onto their target
pub const PARTIAL_PREFIX: &str = ".partial-";

// Default flags passing the input and output paths to the external tool
pub const DEFAULT_INPUT_FLAG: &str = "-i";
pub const DEFAULT_OUTPUT_FLAG: &str = "-o";

// Environment variable consulted when no tool program is configured
pub const PROGRAM_ENV_VAR: &str = "SEGSWEEP_PROGRAM";

// Interval between child exit polls when an invocation timeout is set
pub const TIMEOUT_POLL_MS: u64 = 50;
