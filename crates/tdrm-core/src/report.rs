//! Summary reporting (table and JSON)

use std::io::Write;
use std::str::FromStr;

use crate::{Error, Result, Summary};

const HEADER: [&str; 6] = [
    "TASK DEFINITION",
    "ACTIVE",
    "INACTIVE",
    "TO INACTIVE",
    "TO DELETE",
    "KEEP",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidOutputFormat(other.to_string())),
        }
    }
}

/// Ordered collection of summaries, one per scanned family
#[derive(Debug, Clone, Default)]
pub struct SummaryTable(Vec<Summary>);

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, summary: Summary) {
        self.0.push(summary);
    }

    pub fn rows(&self) -> &[Summary] {
        &self.0
    }

    pub fn print<W: Write>(&self, w: &mut W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Table => self.print_table(w),
            OutputFormat::Json => self.print_json(w),
        }
    }

    fn print_table<W: Write>(&self, w: &mut W) -> Result<()> {
        let rows: Vec<[String; 6]> = self.0.iter().map(row).collect();

        let mut widths = HEADER.map(str::len);
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.len());
            }
        }

        writeln!(w)?;
        write_line(w, &HEADER.map(String::from), &widths)?;
        for cells in &rows {
            write_line(w, cells, &widths)?;
        }
        writeln!(w)?;
        Ok(())
    }

    fn print_json<W: Write>(&self, w: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *w, &self.0)?;
        writeln!(w)?;
        Ok(())
    }
}

impl FromIterator<Summary> for SummaryTable {
    fn from_iter<I: IntoIterator<Item = Summary>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn row(s: &Summary) -> [String; 6] {
    [
        s.task_definition.clone(),
        s.active_revisions.to_string(),
        s.inactive_revisions.to_string(),
        s.to_inactive.to_string(),
        s.to_delete.to_string(),
        s.keep.to_string(),
    ]
}

fn write_line<W: Write>(w: &mut W, cells: &[String; 6], widths: &[usize; 6]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("   ");
    writeln!(w, "  {}", line.trim_end())?;
    Ok(())
}
