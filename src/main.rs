use anyhow::Context;
use clap::{Parser, Subcommand};
use codetype::coding::{
    CodeCommand, CodeProcessor, CommandParser, DictationContext, EchoInjector, Injector,
    ProcessResult,
};
use codetype::{Config, Language};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codetype", about = "Voice commands for dictating Python and Go")]
struct Cli {
    /// Path to config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parsing and planning detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read recognized utterances from stdin, one per line
    Run {
        /// Starting language: python or gopher
        #[arg(long)]
        mode: Option<Language>,

        /// Print emissions instead of typing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Process a single utterance and print what it would type
    Say {
        #[arg(long)]
        mode: Option<Language>,

        #[arg(required = true)]
        words: Vec<String>,
    },
    /// List all voice commands
    Commands,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "codetype=debug" } else { "codetype=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn context(config: &Config, mode: Option<Language>) -> DictationContext {
    DictationContext::new(mode.unwrap_or(config.dictation.mode))
        .with_strict_class_functions(config.dictation.strict_class_functions)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let parser =
        CommandParser::new(&config.commands.custom).context("Failed to build command grammar")?;

    match cli.command.unwrap_or(Command::Run {
        mode: None,
        dry_run: false,
    }) {
        Command::Commands => {
            print!("{}", parser.help_text());
            Ok(())
        }
        Command::Say { mode, words } => {
            let injector = EchoInjector::new(io::stdout());
            let mut processor = CodeProcessor::new(parser, context(&config, mode), injector);
            report(processor.process(&words.join(" "))?);
            Ok(())
        }
        Command::Run { mode, dry_run } => {
            let ctx = context(&config, mode);
            if dry_run {
                return run(CodeProcessor::new(parser, ctx, EchoInjector::new(io::stdout())));
            }
            run_keyboard(parser, ctx, &config)
        }
    }
}

#[cfg(feature = "typing")]
fn run_keyboard(
    parser: CommandParser,
    ctx: DictationContext,
    config: &Config,
) -> anyhow::Result<()> {
    let injector =
        codetype::coding::KeyboardInjector::new(config.input.method, config.input.key_delay_ms)?;
    run(CodeProcessor::new(parser, ctx, injector))
}

#[cfg(not(feature = "typing"))]
fn run_keyboard(
    parser: CommandParser,
    ctx: DictationContext,
    _config: &Config,
) -> anyhow::Result<()> {
    warn!("Built without the `typing` feature, printing emissions instead");
    run(CodeProcessor::new(parser, ctx, EchoInjector::new(io::stdout())))
}

/// Process stdin until EOF, then release the grammar
fn run<I: Injector>(mut processor: CodeProcessor<I>) -> anyhow::Result<()> {
    info!(mode = %processor.language(), "Listening for commands on stdin");

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match processor.process(&line) {
            Ok(result) => report(result),
            Err(e) => warn!("Injection failed: {}", e),
        }
    }

    processor.unload();
    Ok(())
}

fn report(result: ProcessResult) {
    match result {
        ProcessResult::Executed {
            command: CodeCommand::SwitchMode(language),
            ..
        } => info!(mode = %language, "Mode switched"),
        ProcessResult::Executed { command, emissions } if emissions.is_empty() => {
            info!(?command, "Nothing to type in this mode");
        }
        ProcessResult::Executed { .. } | ProcessResult::Empty => {}
        ProcessResult::Unrecognized { suggestions } if suggestions.is_empty() => {
            warn!("Not a command");
        }
        ProcessResult::Unrecognized { suggestions } => {
            warn!("Not a command, did you mean: {}", suggestions.join(" / "));
        }
    }
    let _ = io::stdout().flush();
}
