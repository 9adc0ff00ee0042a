mod commands;
mod data;
mod options;
mod raster;
mod render;
mod textures;

use std::process;

use structopt::StructOpt;

use crate::options::{Options, Subcommand};

fn main() {
    let options = Options::from_args();

    let log_filter = match options.global.verbosity {
        0 => "info",
        1 => "info,papertile=debug,shelfpack=debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter))
        .format_timestamp(None)
        .init();

    match run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    match options.command {
        Subcommand::Optimize(optimize_options) => commands::optimize(optimize_options)?,
        Subcommand::Plan(plan_options) => commands::plan(plan_options)?,
        Subcommand::Export(export_options) => commands::export(export_options)?,
    }

    Ok(())
}
