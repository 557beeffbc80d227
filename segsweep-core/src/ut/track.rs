// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use chrono;
use colored::*;
use kdam::{Bar, tqdm};

/// Generate a timestamped console prefix
fn timestamp(desc: &str) -> String {
    let now = chrono::Local::now();

    format!(
        "{} {} {} {} {}",
        "[".bold(),
        now.format("%Y-%m-%d | %H:%M:%S"),
        "]".bold(),
        "segsweep".truecolor(70, 130, 220).bold(),
        desc
    )
}

/// Initialize a progress bar for tracking dispatched work items
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = timestamp(desc),
        bar_format = "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// Print a timestamped statement to stdout
pub fn progress_log(desc: &str, verbose: bool) {
    if verbose {
        println!("{}", timestamp(desc));
    }
}

/// Print a timestamped statement to stderr regardless of verbosity
pub fn progress_warn(desc: &str) {
    eprintln!("{}", timestamp(desc));
}

/// Format counts into a readable thousands format
pub fn thousands_format<T: std::fmt::Display>(number: T) -> String {
    let digits = number.to_string();

    if digits.len() <= 4 {
        return digits;
    }

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    formatted
}
