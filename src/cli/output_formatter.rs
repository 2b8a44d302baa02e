use colored::*;
use std::io::Write;
use std::time::Duration;

use crate::cli::cli_args::ItemFormat;
use crate::cli::json_highlighter::JsonHighlighter;
use crate::engine::pagination::PageSink;
use crate::utils::{
    config::RunConfig,
    error::{ConversionError, DynapartError, DynapartResult},
    types::{item_to_json, Item},
};

/// Formats stderr messages for CLI display
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format error message for CLI display
    pub fn format_error(error: &DynapartError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format a verbose progress note
    pub fn format_info(message: &str) -> String {
        format!("{} {}", ">>>".blue().bold(), message)
    }

    /// Format the closing item count and elapsed time line
    pub fn format_summary(items: usize, elapsed: Duration, cancelled: bool) -> String {
        let suffix = if cancelled { " (cancelled)" } else { "" };
        format!(
            "returned {} {} in {:.2?}{}",
            items,
            if items == 1 { "item" } else { "items" },
            elapsed,
            suffix
        )
    }
}

/// Writes records to `out` as JSON lines and progress to `err`.
///
/// Item numbers and progress notes go to `err` so `out` stays valid JSON lines.
pub struct ResultPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    item_format: ItemFormat,
    highlighter: Option<JsonHighlighter>,
    number_items: bool,
    verbose: bool,
    count: usize,
}

impl<W: Write, E: Write> ResultPrinter<W, E> {
    /// Create a printer configured from the run settings
    pub fn new(out: W, err: E, config: &RunConfig) -> Self {
        Self {
            out,
            err,
            item_format: config.item_format,
            highlighter: config.colors.then(JsonHighlighter::new),
            number_items: config.number_items,
            verbose: config.verbose,
            count: 0,
        }
    }

    /// Records and table names printed so far
    pub fn item_count(&self) -> usize {
        self.count
    }

    /// Render one record as a single output line, without the newline
    pub fn render_item(&self, item: &Item) -> DynapartResult<String> {
        let line = match self.item_format {
            ItemFormat::Json => {
                let value = item_to_json(item)?;
                serde_json::to_string(&value)
                    .map_err(|e| ConversionError::Serialize(e.to_string()))?
            }
        };

        Ok(match &self.highlighter {
            Some(highlighter) => highlighter.highlight(&line),
            None => line,
        })
    }

    /// Print one record
    pub fn print_item(&mut self, item: &Item) -> DynapartResult<()> {
        let line = self.render_item(item)?;
        let number = self.count + 1;
        if self.number_items {
            write!(self.err, "[#{}] ", number)?;
        }
        writeln!(self.out, "{}", line)?;
        self.count = number;
        Ok(())
    }

    /// Print one table name as plain text
    pub fn print_table_name(&mut self, name: &str) -> DynapartResult<()> {
        writeln!(self.out, "{}", name)?;
        self.count += 1;
        Ok(())
    }

    /// Print a progress note when verbose
    pub fn print_info(&mut self, message: &str) -> DynapartResult<()> {
        if self.verbose {
            writeln!(self.err, "{}", OutputFormatter::format_info(message))?;
        }
        Ok(())
    }

    /// Print the closing summary line. A stream whose reader has gone away is not an error here.
    pub fn print_summary(&mut self, elapsed: Duration, cancelled: bool) -> DynapartResult<()> {
        ignore_broken_pipe(self.out.flush())?;
        ignore_broken_pipe(writeln!(
            self.err,
            "{}",
            OutputFormatter::format_summary(self.count, elapsed, cancelled)
        ))?;
        Ok(())
    }

    /// Hand back the output streams
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}

fn ignore_broken_pipe(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

impl<W: Write, E: Write> PageSink for ResultPrinter<W, E> {
    fn on_page(&mut self, _page: usize, items: &[Item]) -> DynapartResult<()> {
        for item in items {
            self.print_item(item)?;
        }
        Ok(())
    }

    fn on_table_names(&mut self, names: &[String]) -> DynapartResult<()> {
        for name in names {
            self.print_table_name(name)?;
        }
        Ok(())
    }

    fn on_progress(&mut self, message: &str) -> DynapartResult<()> {
        self.print_info(message)
    }
}
