use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use sift::{
    Compiler,
    interpreter::{evaluator::function::core::standard, table::OperatorTable},
    services::Schema,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// sift compiles a filter expression against a record schema and evaluates it
/// over JSON records.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON schema declaring the root type, records, enums and options.
    #[arg(short, long)]
    schema: PathBuf,

    /// JSON file holding one root record, or an array of them. May be repeated.
    #[arg(short, long)]
    record: Vec<PathBuf>,

    /// Print the tokens of the normalized expression.
    #[arg(long)]
    tokens: bool,

    /// Print the tokens in postfix order.
    #[arg(long)]
    postfix: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes priority.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    expression: String,
}

/// Installs a compact stderr subscriber filtered by `RUST_LOG` or `-v`.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "sift=debug",
        _ => "sift=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry().with(filter)
                                  .with(fmt::layer().with_writer(std::io::stderr).compact())
                                  .init();
}

fn read(path: &PathBuf) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| {
                                format!("Failed to read '{}': {e}. Perhaps this file does not \
                                         exist?",
                                        path.display())
                            })
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::from_json(&read(&args.schema)?)?;
    let root = schema.root_type()?;
    let table = OperatorTable::standard().with_functions(standard())?;
    let compiler = Compiler::new(&table, &schema, &schema, &root).with_options(&schema.options);

    if args.tokens {
        println!("tokens:  {}", compiler.tokenize(&args.expression)?.join(" "));
    }
    if args.postfix {
        println!("postfix: {}", compiler.postfix(&args.expression)?.join(" "));
    }

    let compiled = compiler.compile(&args.expression)?;
    println!("{compiled}: {}", compiled.result_type());

    for path in &args.record {
        let json: serde_json::Value = serde_json::from_str(&read(path)?)?;
        let documents = match json {
            serde_json::Value::Array(items) => items,
            single => vec![single],
        };
        for (i, document) in documents.iter().enumerate() {
            let record = schema.record_from_json(&root.to_string(), document)?;
            println!("{}[{i}] => {}", path.display(), compiled.evaluate(&record)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
