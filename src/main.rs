use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rebullet::core::config::{self, ConfigError, Layout};
use rebullet::term::{self, Terminal};
use rebullet::widgets::Form;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "rebullet", about = "Run a form of interactive terminal prompts")]
struct Args {
    /// Form file (defaults to ~/.rebullet/form.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the layout named in the form
    #[arg(short, long, value_enum)]
    layout: Option<Layout>,

    /// Print every answer once the form is done
    #[arg(short, long)]
    summary: bool,

    /// Where to write the log
    #[arg(long, default_value = "rebullet.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    log::info!("rebullet starting up");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Interrupted) => {
            log::info!("Form interrupted");
            ExitCode::from(130)
        }
        Err(RunError::Config(ConfigError::Generated(path))) => {
            println!("No form found. An example was written to {}", path.display());
            println!("Edit it and run rebullet again.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("rebullet: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("interrupted")]
    Interrupted,
}

impl From<rebullet::core::PromptError> for RunError {
    fn from(e: rebullet::core::PromptError) -> Self {
        match e {
            rebullet::core::PromptError::Interrupted => RunError::Interrupted,
            rebullet::core::PromptError::Io(e) => RunError::Io(e),
        }
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let form_config = match &args.config {
        Some(path) => config::load_form(path)?,
        None => config::load_default_form()?,
    };
    let mut form = Form::from_config(&form_config, args.layout)?;

    let mut keys = term::stdin_keys();
    let mut stdout = io::stdout();
    let answers = {
        let mut terminal =
            Terminal::new(&mut *keys, &mut stdout, term::detect_width()).with_raw_mode(true);
        form.run(&mut terminal)?
    };
    log::info!("Collected {} answers", answers.len());

    if args.summary || form.summary() {
        let mut out = stdout.lock();
        form.summarize(&mut out)?;
        out.flush()?;
    }
    Ok(())
}
