mod app;
mod command;
mod config;
mod consts;
mod game;
mod util;
use crate::app::App;
use crate::config::{Config, LogConfig};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

static USAGE: &str = "\
Usage: tilesnake [<options>]

Play snake in the terminal

Options:
  -c, --config <FILE>     Read configuration from the given file
  -l, --log-file <FILE>   Write log messages to the given file
  -s, --seed <INT>        Seed the random apple placement
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit

Keys:
  Arrows, wasd, hjkl      Steer the snake
  Space                   Pause, resume, or restart after a game over
  q, Ctrl-C               Quit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum CliCommand {
    Run(Arguments),
    Help,
    Version,
}

impl CliCommand {
    fn from_parser(mut parser: Parser) -> Result<CliCommand, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(CliCommand::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(CliCommand::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('s') | Arg::Long("seed") => {
                    args.seed = Some(parser.value()?.parse()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(CliCommand::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            CliCommand::Run(args) => args.run(),
            CliCommand::Help => {
                print!("{USAGE}");
                Ok(())
            }
            CliCommand::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    seed: Option<u64>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        init_logging(&config.logging, self.log_file)?;
        info!("Starting tilesnake {}", env!("CARGO_PKG_VERSION"));
        let rng = match self.seed {
            Some(seed) => {
                info!("Using random seed {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let terminal = ratatui::init();
        let r = App::new(config.display, rng).run(terminal);
        ratatui::restore();
        r.map_err(Into::into)
    }

    /// Load the configuration file given on the command line or, if there was
    /// none, the default configuration file if it exists
    fn load_config(&self) -> anyhow::Result<Config> {
        if let Some(ref path) = self.config {
            Config::load(path, false)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        } else if let Ok(path) = Config::default_path() {
            Config::load(&path, true)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }
}

/// Send log messages to a file, if one was requested on the command line or
/// in the configuration.  A terminal game has nowhere else to put them.
fn init_logging(cfg: &LogConfig, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = log_file.or_else(|| cfg.file.clone()) else {
        return Ok(());
    };
    let fp = fs_err::File::create(&path)?;
    WriteLogger::init(cfg.level, simplelog::Config::default(), fp)
        .context("failed to initialize logger")?;
    Ok(())
}

fn main() -> ExitCode {
    let r = CliCommand::from_parser(Parser::from_env())
        .map_err(anyhow::Error::from)
        .and_then(CliCommand::run);
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e
                .downcast_ref::<io::Error>()
                .is_some_and(|ioe| ioe.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tilesnake: {e:?}");
            ExitCode::from(2)
        }
    }
}
