use clap::Parser;
use erschema::{Dialect, ParseOptions, parse_sql_with};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

/// Extract an entity-relationship model from SQL DDL and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "erschema", version, about)]
struct Cli {
    /// SQL file to read, or `-` for stdin
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force a dialect: mysql, postgres, mssql, generic (default: try mysql, postgres, mssql)
    #[arg(short, long)]
    dialect: Option<String>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Log parser decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    let options = match cli.dialect.as_deref() {
        Some(name) => match Dialect::from_str(name) {
            Some(dialect) => ParseOptions::dialect(dialect),
            None => {
                eprintln!("Invalid dialect: {}", name);
                process::exit(1);
            }
        },
        None => ParseOptions::default(),
    };

    let input = match read_input(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let schema = match parse_sql_with(&input, &options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };

    let json = if cli.compact {
        serde_json::to_string(&schema)
    } else {
        serde_json::to_string_pretty(&schema)
    };
    let json = match json {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to encode schema: {}", e);
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, format!("{json}\n")) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
