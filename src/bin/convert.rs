use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "convert",
    about = "Converts a spreadsheet of orders into the line-oriented order file"
)]
struct Cli {
    /// Source workbook; the first sheet is read, skipping its header row
    #[arg(long, default_value = "example.xlsx")]
    input: PathBuf,

    /// Destination order file
    #[arg(long, default_value = "data.txt")]
    output: PathBuf,
}

/// One cell as order-file text: newlines collapsed to spaces, surrounding
/// whitespace stripped, empty cells become empty strings.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().replace('\n', " ").trim().to_string(),
    }
}

fn convert(input: &Path, output: &Path) -> Result<usize, String> {
    let mut workbook: Xlsx<_> =
        open_workbook(input).map_err(|e| format!("cannot open {}: {}", input.display(), e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| format!("{} has no worksheets", input.display()))?
        .map_err(|e| format!("cannot read {}: {}", input.display(), e))?;

    let lines: Vec<String> = range
        .rows()
        .skip(1)
        .map(|row| {
            row.iter()
                .map(cell_text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    std::fs::write(output, lines.join("\n"))
        .map_err(|e| format!("cannot write {}: {}", output.display(), e))?;
    Ok(lines.len())
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    match convert(&cli.input, &cli.output) {
        Ok(rows) => {
            tracing::info!("wrote {} order lines to {}", rows, cli.output.display());
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_strips_newlines() {
        let cell = Data::String("Order 42\nrework ".to_string());
        assert_eq!(cell_text(&cell), "Order 42 rework");
    }

    #[test]
    fn test_cell_text_formats_numbers() {
        assert_eq!(cell_text(&Data::Int(500)), "500");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
