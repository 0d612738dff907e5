mod error;
mod render;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};
use tableview_lib::ViewConfig;
use tableview_lib::filter::SearchScope;
use tableview_lib::model::{ColumnSet, Row};
use tableview_lib::sort::SortDirection;
use tableview_lib::view::TableView;

use crate::error::CliError;
use crate::render::TextRenderer;

#[derive(Debug, Parser)]
#[command(about = "Sort, search and page through a JSON table.")]
struct Cli {
    /// JSON file holding an array of objects.
    input: PathBuf,

    /// Field holding each row's id (defaults to the row position).
    #[arg(long)]
    id_field: Option<String>,

    /// Search query.
    #[arg(short, long)]
    query: Option<String>,

    /// Match letter case.
    #[arg(long)]
    case_sensitive: bool,

    /// Minimum query length before filtering.
    #[arg(long, default_value_t = 1)]
    min_length: usize,

    /// Restrict searching to a column (repeatable).
    #[arg(long = "search")]
    search_columns: Vec<String>,

    /// Sort by `column[:asc|desc]` (repeatable; first is primary).
    #[arg(short, long)]
    sort: Vec<String>,

    /// Page to show (1-indexed).
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page.
    #[arg(short = 'n', long, default_value_t = 10)]
    page_size: usize,

    /// Columns to show, in order (repeatable; defaults to every field).
    #[arg(long = "columns")]
    columns: Vec<String>,

    /// Write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at trace level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    if let Some(path) = &cli.log_file {
        init_logging(path, cli.verbose)?;
    }

    let rows = load_rows(&cli.input, cli.id_field.as_deref())?;
    let columns = if cli.columns.is_empty() {
        field_names(&rows)
    } else {
        cli.columns.clone()
    };
    log::info!("loaded {} rows from {}", rows.len(), cli.input.display());

    let config = ViewConfig::default()
        .with_page_size(cli.page_size)
        .with_min_query_length(cli.min_length)
        .with_case_sensitive(cli.case_sensitive);
    let table = TableView::with_rows(config, ColumnSet::new(), rows);

    if !cli.search_columns.is_empty() {
        table.set_search_scope(SearchScope::columns(cli.search_columns.iter().cloned()));
    }
    for (position, arg) in cli.sort.iter().enumerate() {
        let (column, direction) = parse_sort(arg)?;
        if position == 0 {
            table.set_sort(&column, direction);
        } else {
            table.add_sort(&column, direction);
        }
    }
    if let Some(query) = &cli.query {
        table.search_now(query.as_str());
    }
    if !table.goto_page(cli.page) {
        log::warn!(
            "page {} out of range; showing page {}",
            cli.page,
            table.page_state().current_page
        );
    }

    let mut renderer = TextRenderer::new(columns);
    table.render(&mut renderer);
    Ok(renderer.output().to_string())
}

fn init_logging(path: &Path, verbose: bool) -> Result<(), CliError> {
    let log_file = File::create(path).map_err(|source| CliError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    let level = if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    // A logger set by an earlier call stays in place.
    let _ = WriteLogger::init(level, Config::default(), log_file);
    Ok(())
}

fn load_rows(path: &Path, id_field: Option<&str>) -> Result<Vec<Row>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Row::list_from_json_str(&json, id_field).map_err(|source| CliError::Rows {
        path: path.to_path_buf(),
        source,
    })
}

/// Every field name, in order of first appearance.
fn field_names(rows: &[Row]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(Row::keys) {
        if !names.iter().any(|n| n == key) {
            names.push(key.to_string());
        }
    }
    names
}

/// Parse `column[:asc|desc]`.
fn parse_sort(arg: &str) -> Result<(String, SortDirection), CliError> {
    let (column, direction) = match arg.rsplit_once(':') {
        Some((column, suffix)) => match suffix.parse::<SortDirection>() {
            Ok(direction) => (column, direction),
            Err(_) => (arg, SortDirection::Ascending),
        },
        None => (arg, SortDirection::Ascending),
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(CliError::InvalidSort(arg.to_string()));
    }
    Ok((column.to_string(), direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        let (column, direction) = parse_sort("price:desc").unwrap();
        assert_eq!(column, "price");
        assert_eq!(direction, SortDirection::Descending);

        let (column, direction) = parse_sort("name").unwrap();
        assert_eq!(column, "name");
        assert_eq!(direction, SortDirection::Ascending);

        // Not a direction: part of the column name
        let (column, _) = parse_sort("time:zone").unwrap();
        assert_eq!(column, "time:zone");

        assert!(matches!(parse_sort(":asc"), Err(CliError::InvalidSort(_))));
    }

    #[test]
    fn test_field_names_in_first_seen_order() {
        let rows = vec![
            Row::new("1").set("name", "a").set("price", 1),
            Row::new("2").set("sku", "x").set("name", "b"),
        ];
        assert_eq!(field_names(&rows), vec!["name", "price", "sku"]);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "tableview",
            "rows.json",
            "-q",
            "lap",
            "-s",
            "price:desc",
            "-s",
            "name",
            "-n",
            "5",
            "--columns",
            "name",
            "--columns",
            "price",
        ]);
        assert_eq!(cli.query.as_deref(), Some("lap"));
        assert_eq!(cli.sort, vec!["price:desc", "name"]);
        assert_eq!(cli.page_size, 5);
        assert_eq!(cli.page, 1);
        assert_eq!(cli.columns, vec!["name", "price"]);
    }

    #[test]
    fn test_missing_input_fails() {
        let cli = Cli::parse_from(["tableview", "/nonexistent/rows.json"]);
        assert!(matches!(run(cli), Err(CliError::Read { .. })));
    }
}
