//! Output formatters for test results
//!
//! Provides table, JSON, CSV, summary and bare-name output formats.

#![allow(dead_code)]

use std::io::Write;

use crate::models::{CollectSummary, Suite, TestNode, TestResult, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
    /// One reported identity per line
    Names,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            "names" => Some(OutputFormat::Names),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a single test result
    pub fn format_result(&self, result: &TestResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Csv => self.format_result_csv(result),
            OutputFormat::Summary => self.format_result_summary(result),
            OutputFormat::Names => result.identity.clone(),
        }
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                TestStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                TestStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                TestStatus::Pass => "✓ PASS",
                TestStatus::Fail => "✗ FAIL",
                TestStatus::Error => "! ERROR",
            }
        };

        format!(
            "{:40} {} [{:>6}ms]",
            result.identity, status_str, result.duration_ms
        )
    }

    fn format_result_csv(&self, result: &TestResult) -> String {
        format!(
            "\"{}\",{},{},\"{}\"",
            result.identity.replace('"', "\"\""),
            result.status,
            result.duration_ms,
            result.message.as_deref().unwrap_or("").replace('"', "\"\"")
        )
    }

    fn format_result_summary(&self, result: &TestResult) -> String {
        format!(
            "{} {} ({}ms)",
            result.status.symbol(),
            result.identity,
            result.duration_ms
        )
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &CollectSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => self.format_summary_csv(summary),
            OutputFormat::Summary => self.format_summary_brief(summary),
            OutputFormat::Names => summary.identities().join("\n"),
        }
    }

    fn format_summary_table(&self, summary: &CollectSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  Test Run ({})\n", summary.mode));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for result in &summary.results {
            output.push_str(&format!("║  {}\n", self.format_result_table(result)));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:3} | Pass: {} | Fail: {} | Error: {:3}\n",
            summary.total, pass_str, fail_str, summary.errors
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_csv(&self, summary: &CollectSummary) -> String {
        let mut output = String::new();
        output.push_str("identity,status,duration_ms,message\n");
        for result in &summary.results {
            output.push_str(&self.format_result_csv(result));
            output.push('\n');
        }
        output
    }

    fn format_summary_brief(&self, summary: &CollectSummary) -> String {
        format!(
            "{}: {}/{} passed, {} failed, {} errors ({:.1}%) in {}ms",
            summary.mode,
            summary.passed,
            summary.total,
            summary.failed,
            summary.errors,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Render a discovered tree, one line per suite or case
    pub fn format_tree(&self, suite: &Suite) -> String {
        let mut output = String::new();
        Self::write_tree(suite, 0, &mut output);
        output
    }

    fn write_tree(suite: &Suite, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);
        for test in suite {
            match test {
                TestNode::Suite(inner) => {
                    output.push_str(&format!("{indent}+ suite ({} entries)\n", inner.len()));
                    Self::write_tree(inner, depth + 1, output);
                }
                TestNode::Case(case) => {
                    output.push_str(&format!("{indent}- {}\n", case.description()));
                }
            }
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write results to a file
pub fn write_results_to_file(
    path: &str,
    summary: &CollectSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
