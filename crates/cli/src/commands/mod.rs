//! CLI command modules

pub mod setup;
pub mod vm;
pub mod web;

use crate::output::{print_error, print_success, print_warning, OutputFormat, TableDisplay};
use sentrybox_common::{OpReport, OpStatus};

impl TableDisplay for OpReport {
    fn headers() -> Vec<&'static str> {
        vec!["Status", "Message", "IP"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.status.to_string(),
            self.message.clone(),
            self.ip.clone().unwrap_or_default(),
        ]
    }
}

/// Print an operation report in the requested format. Table format gets the
/// emoji shorthand; JSON callers get the raw record.
pub fn print_report(report: &OpReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(report).unwrap_or_default()
            );
        }
        _ => match report.status {
            OpStatus::Success => {
                let mut line = report.message.clone();
                if let Some(ip) = &report.ip {
                    line = format!("{} ({})", line, ip);
                }
                print_success(&line);
            }
            OpStatus::Pending => print_warning(&report.message),
            OpStatus::Error => print_error(&report.message),
        },
    }
}
