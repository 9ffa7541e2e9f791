//! Report writer

use super::types::OutputFormat;
use crate::aggregate::{AggregateCounts, NetworkSummary};
use crate::auth::TokenScheme;
use crate::engine::{RunReport, RunStats};
use crate::error::Result;
use crate::pagination::PaginationPlan;
use crate::record::Record;
use serde::Serialize;
use std::io::{self, Write};

/// Width of the footer label column
const LABEL_WIDTH: usize = 16;

/// Renders run reports
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: OutputFormat,
    dump: bool,
}

impl Reporter {
    /// Create a reporter for a format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            dump: false,
        }
    }

    /// Include every field of every record, in first-seen order
    #[must_use]
    pub fn with_dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }

    /// Write the report
    pub fn write<W: Write>(&self, report: &RunReport, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => self.write_pretty(report, out)?,
            OutputFormat::Json => self.write_json(report, out)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Render the report into a string
    pub fn render(&self, report: &RunReport) -> Result<String> {
        let mut buf = Vec::new();
        self.write(report, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_pretty<W: Write>(&self, report: &RunReport, out: &mut W) -> io::Result<()> {
        if report.filter.is_empty() {
            writeln!(out, "Networks: {}", report.query_type)?;
        } else {
            writeln!(out, "Networks: {} ({})", report.query_type, report.filter)?;
        }
        writeln!(out)?;

        if self.dump && !report.result.is_empty() {
            write_dump(out, &report.result.records)?;
            writeln!(out)?;
        }

        if report.result.networks.is_empty() {
            writeln!(out, "No networks found.")?;
        } else {
            write_summary(out, &report.result.networks)?;
        }
        writeln!(out)?;

        write_footer(out, &report.result.counts, report.plan.as_ref(), &report.stats)
    }

    fn write_json<W: Write>(&self, report: &RunReport, out: &mut W) -> Result<()> {
        let document = JsonReport {
            query_type: &report.query_type,
            filter: &report.filter,
            scheme: report.scheme,
            plan: report.plan.as_ref(),
            counts: &report.result.counts,
            networks: &report.result.networks,
            records: self.dump.then_some(report.result.records.as_slice()),
            stats: &report.stats,
        };

        serde_json::to_writer_pretty(&mut *out, &document)?;
        writeln!(out)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    query_type: &'a str,
    filter: &'a str,
    scheme: Option<TokenScheme>,
    plan: Option<&'a PaginationPlan>,
    counts: &'a AggregateCounts,
    networks: &'a [NetworkSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [Record]>,
    stats: &'a RunStats,
}

fn write_dump<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    writeln!(out, "Records")?;
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "[{}]", i + 1)?;
        for (name, value) in record.fields() {
            writeln!(out, "  {name}: {value}")?;
        }
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, networks: &[NetworkSummary]) -> io::Result<()> {
    let rows: Vec<[&str; 3]> = networks
        .iter()
        .map(|n| {
            [
                n.name.as_str(),
                n.urn.as_deref().unwrap_or("-"),
                n.href.as_deref().unwrap_or("-"),
            ]
        })
        .collect();

    write_table(out, ["NAME", "URN", "HREF"], &rows)
}

/// Columns padded to their widest cell, two spaces apart
fn write_table<W: Write, const N: usize>(
    out: &mut W,
    headers: [&str; N],
    rows: &[[&str; N]],
) -> io::Result<()> {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths.map(|w| "-".repeat(w));
    write_row(out, &headers, &widths)?;
    write_row(out, &separator.each_ref().map(String::as_str), &widths)?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[&str], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

fn write_footer<W: Write>(
    out: &mut W,
    counts: &AggregateCounts,
    plan: Option<&PaginationPlan>,
    stats: &RunStats,
) -> io::Result<()> {
    let mut line = |label: &str, value: String| -> io::Result<()> {
        writeln!(out, "{:<LABEL_WIDTH$}{value}", format!("{label}:"))
    };

    line("Total reported", counts.total_reported.to_string())?;
    line("Unique", counts.unique.to_string())?;
    line("Discarded", counts.discarded.to_string())?;
    line("Observed", counts.observed.to_string())?;

    match plan {
        Some(plan) => {
            line("Page size", plan.page_size.to_string())?;
            line(
                "Pages",
                format!(
                    "{} calculated, {} reported by server",
                    plan.calculated_total_pages, plan.last_page_from_server
                ),
            )?;
        }
        None => line("Session", "not established".to_string())?,
    }

    let failed = if stats.failed_pages.is_empty() {
        "none".to_string()
    } else {
        stats
            .failed_pages
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    line("Failed pages", failed)?;
    line("Requests", stats.requests.to_string())?;
    line("Duration", format!("{} ms", stats.duration_ms))
}
