use clap::{Parser as ClapParser, Subcommand};
use quill_lang::{
    EngineConfig, QueryEngine,
    cli::{self, CheckOptions, CheckResult, CliError},
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "quill")]
#[command(about = "Quill - compile CRUD statements for document and key-value stores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and compile a statement
    Check {
        /// The statement to compile (reads from stdin if not provided)
        query: Option<String>,

        /// Bind a parameter, as name=value (repeatable)
        #[arg(short = 'P', long = "param", value_parser = cli::parse_param)]
        params: Vec<(String, String)>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't compile
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'quill docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            params,
            pretty,
            syntax_only,
        } => run_check(query, params, pretty, syntax_only),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    query: Option<String>,
    params: Vec<(String, String)>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoQuery),
    };

    let options = CheckOptions {
        query,
        params,
        pretty,
        syntax_only,
    };

    let engine = QueryEngine::new(EngineConfig::from_env());
    match cli::execute_check(&engine, &options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Compiled(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .unwrap_or_else(|_| output.to_string());
            println!("{}", json);
        }
    }
    Ok(())
}
