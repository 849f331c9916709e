//! Netlist Front - netlist tokenizer and expression evaluator
//!
//! # Usage
//!
//! ```bash
//! netlist-front tokenize amp.cir --mode continuation
//! netlist-front eval "2 * r + 1k" -p r=4.7k --seed 42
//! ```
//!
//! Set `RUST_LOG=debug` to see grammar construction and evaluation logs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use netlist_front::{
    error::{NetlistError, Result},
    expr::parse_value,
    netlist::{self, NetlistLexerSettings, NetlistTokenKind},
    EvaluatorConfig, ExpressionEvaluator, ReadMode,
};

/// SPICE netlist front end
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of a netlist file, one per line
    Tokenize {
        /// Path to the netlist file
        #[arg(value_name = "NETLIST_FILE")]
        file: PathBuf,

        /// Treat the first line as a title (default)
        #[arg(long, overrides_with = "no_title")]
        title: bool,

        /// The first line is an ordinary netlist line
        #[arg(long)]
        no_title: bool,

        /// How the input is read
        #[arg(short, long, value_enum, default_value_t = Mode::Whole)]
        mode: Mode,

        /// Continuation marker at the start of a line
        #[arg(long, default_value_t = netlist::DEFAULT_CONTINUATION_MARKER)]
        marker: char,
    },

    /// Evaluate an expression
    Eval {
        /// The expression text
        #[arg(value_name = "EXPRESSION", allow_hyphen_values = true)]
        expression: String,

        /// Parameter assignment, `name=value`
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Seed for the random functions
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// The whole text at once
    Whole,
    /// One physical line at a time
    Line,
    /// Continuation lines spliced into their logical line
    Continuation,
}

impl From<Mode> for ReadMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Whole => ReadMode::WholeText,
            Mode::Line => ReadMode::SingleLine,
            Mode::Continuation => ReadMode::MultiLineWithContinuation,
        }
    }
}

fn parse_assignment(assignment: &str) -> Result<(String, f64)> {
    let invalid = || NetlistError::InvalidLiteral {
        text: assignment.to_string(),
    };
    let (name, value) = assignment.split_once('=').ok_or_else(invalid)?;
    let value = parse_value(value).ok_or_else(invalid)?;
    Ok((name.trim().to_string(), value))
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Tokenize {
            file,
            no_title,
            mode,
            marker,
            ..
        } => {
            let settings = NetlistLexerSettings::new()
                .with_title(!no_title)
                .with_read_mode(mode.into())
                .with_continuation_marker(marker);
            let tokens = netlist::tokenize_file(&file, &settings)?;
            info!("{} token(s) in {}", tokens.len(), file.display());

            for token in &tokens {
                let kind = NetlistTokenKind::from_code(token.token_type)
                    .map_or_else(|| token.token_type.to_string(), |k| k.name().to_string());
                println!("{:>4} {:<22} {:?}", token.line, kind, token.text);
            }
        }
        Command::Eval {
            expression,
            params,
            seed,
        } => {
            let mut config = EvaluatorConfig::new();
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let mut evaluator = ExpressionEvaluator::with_config(config);
            for assignment in &params {
                let (name, value) = parse_assignment(assignment)?;
                evaluator.set_parameter(name, value);
            }

            println!("{}", evaluator.evaluate(&expression)?);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
