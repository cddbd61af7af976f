use std::ffi::OsString;

use bs_core::BrickScopeError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod commands;
mod error_map;

pub(crate) use cli_args::{
    Cli, Command, MergeArgs, ProjectArgs, RenameSceneArgs, SceneFilterArgs, TeardownArgs,
};
pub(crate) use error_map::{emit_error, map_cli_output, map_cli_project_path};

pub const LOG_ENV: &str = "BRICKSCOPE_LOG";

/// Structured logs go to stderr so stdout stays line oriented.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            0
        }
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<Vec<String>, BrickScopeError> {
    match cli.command {
        Command::Inspect(args) => commands::run_inspect(args),
        Command::Merge(args) => commands::run_merge(args),
        Command::RenameScene(args) => commands::run_rename_scene(args),
        Command::Rehydrate(args) => commands::run_rehydrate(args),
        Command::TeardownClones(args) => commands::run_teardown_clones(args),
        Command::Messages(args) => commands::run_messages(args),
    }
}
