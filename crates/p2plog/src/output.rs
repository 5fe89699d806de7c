use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::exit::{io_error, CliError, CliResult, INTERNAL};
use crate::session::{Direction, Record};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    /// JSON is the contract; the table view is only a convenience default
    /// for a human watching a terminal with no output file.
    pub fn default_for(to_file: bool) -> Self {
        if !to_file && std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn emit(records: &[Record], output: Option<&Path>, format: OutputFormat) -> CliResult<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(records)
            .map_err(|err| CliError::new(INTERNAL, format!("failed encoding records: {err}")))?,
        OutputFormat::Table => render_table(records),
    };

    match output {
        Some(path) => fs::write(path, rendered)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err)),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn render_table(records: &[Record]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["TIME", "DIRECTION", "TYPE", "SIZE"]);
    for record in records {
        table.add_row(vec![
            record.time.to_string(),
            direction_name(record.direction).to_string(),
            record.msgtype.clone(),
            record.size.to_string(),
        ]);
    }
    table.to_string()
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Sent => "sent",
        Direction::Received => "recv",
    }
}
