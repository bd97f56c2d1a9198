// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! wb - Hierarchical Workbench Environment Manager CLI

use clap::{CommandFactory, Parser, Subcommand};
use workbench::Config;

mod cmd_activate;
mod cmd_new;
mod cmd_path;
mod cmd_run;

use cmd_activate::CmdActivate;
use cmd_new::CmdNew;
use cmd_path::{CmdBench, CmdShelf};
use cmd_run::CmdRun;

#[derive(Parser)]
#[clap(
    name = "wb",
    about = "Hierarchical Workbench Environment Manager",
    version,
    long_about = "Compose nested shelf and bench fragments under WORKBENCH_HOME into executable sessions"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    /// Print environment entries carrying the WORKBENCH_ prefix
    #[clap(short = 'E')]
    env_entries: bool,

    #[clap(subcommand)]
    cmd: Option<Command>,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a shelf path, or list all shelves
    #[clap(name = "s")]
    Shelf(CmdShelf),

    /// Resolve a bench path, or list all benches
    #[clap(name = "b")]
    Bench(CmdBench),

    /// Activate a bench interactively
    #[clap(name = "a", visible_alias = "w")]
    Activate(CmdActivate),

    /// Run a bench's command hook non-interactively
    #[clap(name = "c", visible_alias = "r")]
    Run(CmdRun),

    /// Create a new bench and run its creation hook
    #[clap(name = "n")]
    New(CmdNew),
}

impl Opt {
    fn run(self) -> workbench::Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        let config = Config::from_env()?;

        if self.env_entries {
            for (name, value) in config.env_entries() {
                println!("{name}={value}");
            }
            return Ok(0);
        }

        match self.cmd {
            Some(Command::Shelf(cmd)) => cmd.run(&config),
            Some(Command::Bench(cmd)) => cmd.run(&config),
            Some(Command::Activate(cmd)) => cmd.run(&config),
            Some(Command::Run(cmd)) => cmd.run(&config),
            Some(Command::New(cmd)) => cmd.run(&config),
            None => {
                Opt::command()
                    .print_help()
                    .map_err(|e| workbench::Error::ExecFailed(e.to_string()))?;
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod main_test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_cli_definition_is_consistent() {
        Opt::command().debug_assert();
    }

    #[rstest]
    #[case(&["wb", "a", "one"])]
    #[case(&["wb", "w", "one"])]
    #[case(&["wb", "c", "one", "make", "all"])]
    #[case(&["wb", "r", "one", "--dump"])]
    #[case(&["wb", "n", "deep/bench"])]
    #[case(&["wb", "s", "-n", "-y", "outer/"])]
    #[case(&["wb", "b"])]
    #[case(&["wb", "-E"])]
    fn test_accepted_invocations(#[case] argv: &[&str]) {
        Opt::try_parse_from(argv).unwrap();
    }

    #[rstest]
    fn test_mode_aliases_map_to_same_command() {
        let a = Opt::try_parse_from(["wb", "a", "one"]).unwrap();
        let w = Opt::try_parse_from(["wb", "w", "one"]).unwrap();
        assert!(matches!(a.cmd, Some(Command::Activate(_))));
        assert!(matches!(w.cmd, Some(Command::Activate(_))));
    }
}

fn main() {
    let opt = Opt::parse();
    let code = match opt.run() {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
