use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use kmsl::{Config, Session, io::Services, repl::Repl, util::source::normalize};
use log::{LevelFilter, debug};

/// kmsl runs keyboard and mouse automation scripts, or starts an interactive
/// session when no script is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to run.
    file: Option<PathBuf>,

    /// Logs the tokens, trees and service calls of every run.
    #[arg(short, long)]
    verbose: bool,

    /// Skips characters that no token matches instead of reporting them.
    #[arg(long)]
    lenient: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new().filter_level(if args.verbose {
                                                LevelFilter::Debug
                                            } else {
                                                LevelFilter::Warn
                                            })
                              .parse_default_env()
                              .init();

    let strict_lexing = !args.lenient;
    let Some(path) = args.file else {
        let session = Session::new(Services::host(),
                                   Config { interactive: true,
                                            strict_lexing });
        if let Err(e) = Repl::new(session).run() {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let script = match fs::read_to_string(&path) {
        Ok(script) => normalize(&script),
        Err(e) => {
            eprintln!("Failed to read the input file '{}': {e}", path.display());
            return ExitCode::FAILURE;
        },
    };
    debug!("running {}", path.display());

    let report = Session::new(Services::host(),
                              Config { interactive: false,
                                       strict_lexing })
                         .run(&script);
    if report.has_errors() {
        eprint!("{}", report.rendered);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
