use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tabular_statements::config::ScannerPreferences;
use tabular_statements::syntax::strip_sql_comments_with;
use tabular_statements::{Position, QueryKey, ScanOptions, SqlDocument};

#[derive(Parser)]
#[command(name = "tabular-statements")]
#[command(about = "Split SQL buffers into statements and resolve the one under a cursor", long_about = None)]
#[command(version)]
struct Cli {
    /// Do not treat `--` as a line comment
    #[arg(long, global = true)]
    no_line_comments: bool,

    /// Do not treat `/* */` as a block comment
    #[arg(long, global = true)]
    no_block_comments: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// SQL file to read, or `-` for stdin
    file: PathBuf,
}

#[derive(Args)]
struct Cursor {
    /// Zero-based row of the caret
    #[arg(short, long)]
    row: usize,

    /// Zero-based caret column, in chars
    #[arg(short, long)]
    column: usize,
}

impl Cursor {
    fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every statement in the file
    Split {
        #[command(flatten)]
        input: Input,
    },

    /// Print the statement under a caret, or the selection if one is given
    At {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        cursor: Cursor,

        /// Selected char range, as `START..END`
        #[arg(short, long, value_parser = parse_range)]
        selection: Option<std::ops::Range<usize>>,

        /// Print one run request per statement the selection touches
        #[arg(long)]
        targets: bool,
    },

    /// Print the statements from one caret up to the statement owning another
    Range {
        #[command(flatten)]
        input: Input,

        #[arg(long)]
        start_row: usize,

        #[arg(long)]
        start_column: usize,

        #[arg(long)]
        end_row: usize,

        #[arg(long)]
        end_column: usize,
    },

    /// Print the result key of the statement under a caret
    Key {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        cursor: Cursor,
    },

    /// Check whether a result key still matches the file
    Validate {
        #[command(flatten)]
        input: Input,

        /// Key as printed by `key`, e.g. `SELECT 1@10`
        #[arg(short, long)]
        key: String,
    },

    /// Print the file with comments blanked out
    Strip {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Serialize)]
struct Validation<'a> {
    key: &'a str,
    valid: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let prefs = ScannerPreferences::load();
    tabular_statements::init_logging_with(prefs.log_filter.as_deref());

    let mut options = prefs.scan;
    if cli.no_line_comments {
        options.line_comments = false;
    }
    if cli.no_block_comments {
        options.block_comments = false;
    }

    match cli.command {
        Commands::Split { input } => cmd_split(&input, options),
        Commands::At {
            input,
            cursor,
            selection,
            targets,
        } => cmd_at(&input, &cursor, selection, targets, options),
        Commands::Range {
            input,
            start_row,
            start_column,
            end_row,
            end_column,
        } => cmd_range(
            &input,
            Position::new(start_row, start_column),
            Position::new(end_row, end_column),
            options,
        ),
        Commands::Key { input, cursor } => cmd_key(&input, &cursor, options),
        Commands::Validate { input, key } => cmd_validate(&input, &key, options),
        Commands::Strip { input } => cmd_strip(&input, options),
    }
}

fn parse_range(raw: &str) -> Result<std::ops::Range<usize>, String> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {raw}"))?;
    let start = start.trim().parse().map_err(|e| format!("bad start: {e}"))?;
    let end = end.trim().parse().map_err(|e| format!("bad end: {e}"))?;
    Ok(start..end)
}

/// Read the input and normalize line endings to `\n`.
fn read_input(input: &Input) -> Result<String> {
    let text = if input.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&input.file)
            .with_context(|| format!("Failed to read {}", input.file.display()))?
    };
    Ok(text.replace("\r\n", "\n"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_split(input: &Input, options: ScanOptions) -> Result<()> {
    let text = read_input(input)?;
    print_json(&SqlDocument::with_options(&text, options).all_statements())
}

fn cmd_at(
    input: &Input,
    cursor: &Cursor,
    selection: Option<std::ops::Range<usize>>,
    targets: bool,
    options: ScanOptions,
) -> Result<()> {
    let text = read_input(input)?;
    let doc = SqlDocument::with_options(&text, options);
    if targets {
        print_json(&doc.statements_for_selection(cursor.position(), selection))
    } else {
        print_json(&doc.resolve(cursor.position(), selection))
    }
}

fn cmd_range(input: &Input, start: Position, end: Position, options: ScanOptions) -> Result<()> {
    let text = read_input(input)?;
    print_json(&SqlDocument::with_options(&text, options).statements_in_range(start, end))
}

fn cmd_key(input: &Input, cursor: &Cursor, options: ScanOptions) -> Result<()> {
    let text = read_input(input)?;
    let statement = SqlDocument::with_options(&text, options)
        .statement_at_cursor(cursor.position())
        .with_context(|| format!("No statement at {}:{}", cursor.row, cursor.column))?;
    println!("{}", statement.query_key());
    Ok(())
}

fn cmd_validate(input: &Input, raw_key: &str, options: ScanOptions) -> Result<()> {
    let text = read_input(input)?;
    let key = QueryKey::parse(raw_key)?;
    let (query, offset) = key.split()?;
    let valid = SqlDocument::with_options(&text, options).validate_query_at_offset(offset, query);
    print_json(&Validation {
        key: key.as_str(),
        valid,
    })
}

fn cmd_strip(input: &Input, options: ScanOptions) -> Result<()> {
    let text = read_input(input)?;
    print!("{}", strip_sql_comments_with(&text, &options));
    Ok(())
}
