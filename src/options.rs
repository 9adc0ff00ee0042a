use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "A tool to print large artwork across a grid of paper sheets")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times. Ignored if the
    /// RUST_LOG environment variable is set.
    #[structopt(long = "verbose", short, global = true, parse(from_occurrences))]
    pub verbosity: u8,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Choose a sheet grid and arrange every object on it so that as little
    /// paper as possible is wasted. Writes the result back to the project.
    Optimize(OptimizeOptions),

    /// Print what would be drawn on each sheet, as JSON, without rendering
    /// anything.
    Plan(PlanOptions),

    /// Render every sheet of the project to a PNG file, ready to print.
    Export(ExportOptions),
}

#[derive(Debug, StructOpt)]
pub struct OptimizeOptions {
    /// The path to a Papertile project file, or a folder containing one.
    /// Defaults to the current working directory.
    pub project_path: Option<PathBuf>,

    /// Report the chosen layout without saving it.
    #[structopt(long)]
    pub dry_run: bool,
}

#[derive(Debug, StructOpt)]
pub struct PlanOptions {
    /// The path to a Papertile project file, or a folder containing one.
    /// Defaults to the current working directory.
    pub project_path: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct ExportOptions {
    /// The path to a Papertile project file, or a folder containing one.
    /// Defaults to the current working directory.
    pub project_path: Option<PathBuf>,

    /// The folder to write pages into. Created if it doesn't exist.
    #[structopt(long, short)]
    pub output: PathBuf,

    /// Print resolution, in dots per inch.
    #[structopt(long, default_value = "150")]
    pub dpi: f64,

    /// Width of the outline drawn around every piece, in millimeters.
    #[structopt(long, default_value = "0.3")]
    pub outline_width: f64,
}
