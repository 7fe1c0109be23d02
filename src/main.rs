//! domweave CLI
//!
//! Usage:
//!   domweave [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --data <FILE>      JSON payload to build the tree from
//!   -b, --bindings <FILE>  Binding attribute names (TOML format)
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use domweave::{parse_document, BindingConfig, Engine};

#[derive(Parser)]
#[command(name = "domweave")]
#[command(about = "Keyed template reconciliation for live element trees")]
struct Cli {
    /// Markup document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// JSON data file to build the tree from
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Bindings file overriding attribute names (TOML format)
    #[arg(short, long)]
    bindings: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let (source, filename) = read_input(&cli);

    let doc = match parse_document(&source) {
        Ok(doc) => doc,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error.format(&source, &filename));
            }
            process::exit(1);
        }
    };

    let bindings = match &cli.bindings {
        Some(path) => match BindingConfig::from_file(path) {
            Ok(bindings) => bindings,
            Err(error) => {
                eprintln!("{}", error);
                process::exit(1);
            }
        },
        None => BindingConfig::default(),
    };

    let mut engine = Engine::new(doc).with_bindings(bindings);

    if let Some(data_path) = &cli.data {
        let payload = match fs::read_to_string(data_path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(payload) => payload,
            Err(message) => {
                eprintln!("Error reading {}: {}", data_path.display(), message);
                process::exit(1);
            }
        };
        if let Err(error) = engine.build(&payload) {
            eprintln!("{}", error);
            process::exit(1);
        }
    }

    print!("{}", engine.document().to_source());
}

fn read_input(cli: &Cli) -> (String, String) {
    match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => (source, path.display().to_string()),
            Err(error) => {
                eprintln!("Error reading {}: {}", path.display(), error);
                process::exit(1);
            }
        },
        None => {
            if io::stdin().is_terminal() {
                eprintln!("No input file and stdin is a terminal; see --help");
                process::exit(1);
            }
            let mut source = String::new();
            if let Err(error) = io::stdin().read_to_string(&mut source) {
                eprintln!("Error reading stdin: {}", error);
                process::exit(1);
            }
            (source, "<stdin>".to_string())
        }
    }
}
