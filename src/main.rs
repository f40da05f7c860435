// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use am_budget::cli::CliArgs;
use am_budget::error::RenderError;
use am_budget::types::CostBreakdown;
use am_budget::{config, console_format, cost, report, retry, ui};
use chrono::Local;
use log::debug;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    // Resolve parts, duration and pricing
    let job = match config::build_job(&args) {
        Ok(job) => job,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    let breakdown = cost::compute(&job.parts, &job.duration_text, &job.pricing);
    debug!("Cost detail: {:?}", breakdown.detail);

    if !args.quiet {
        if let Err(e) = report::print_terminal_report(&breakdown, args.width, args.use_colors()) {
            ui::print_error(&format!("Failed to print report: {}", e));
            std::process::exit(1);
        }
    }

    if !write_outputs(&breakdown, &args) {
        std::process::exit(1);
    }
}

/// Write every requested report file; returns false if any of them failed
fn write_outputs(breakdown: &CostBreakdown, args: &CliArgs) -> bool {
    let generated_at = Local::now().naive_local();
    let mut ok = true;

    if let Some(ref path) = args.xlsx {
        let renderer = report::SpreadsheetReport::new(generated_at);
        match retry::with_retry(&args.retry_policy(), || renderer.render(breakdown, path)) {
            Ok(()) => ui::status(&format!("Spreadsheet report saved to: {}", path.display())),
            Err(RenderError::FileBusy(path)) => {
                ui::print_error(&format!("{} is open in another program; close it and try again", path.display()));
                ok = false;
            }
            Err(e) => {
                ui::print_error(&format!("Failed to save spreadsheet report: {}", e));
                ok = false;
            }
        }
    }

    if let Some(ref path) = args.json {
        match report::export_json_report(breakdown, path, generated_at) {
            Ok(()) => ui::status(&format!("JSON report saved to: {}", path.display())),
            Err(e) => {
                ui::print_error(&format!("Failed to save JSON report: {}", e));
                ok = false;
            }
        }
    }

    if let Some(ref path) = args.text {
        let text = report::format_terminal_report(breakdown, args.width);
        match report::export_text_report(&text, path) {
            Ok(()) => ui::status(&format!("Text report saved to: {}", path.display())),
            Err(e) => {
                ui::print_error(&format!("Failed to save text report: {}", e));
                ok = false;
            }
        }
    }

    ok
}
