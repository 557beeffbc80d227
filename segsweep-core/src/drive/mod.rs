// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

mod dispatch;
mod outcome;
mod scan;
mod sweep;

pub use dispatch::{dispatch, stage_path};
pub use outcome::{FileOutcome, FileReport, GroupReport, Tally};
pub use scan::{WorkItem, scan_group};
pub use sweep::{RunOptions, run};
