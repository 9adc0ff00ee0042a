use std::io::{self, Write};

use super::open_project;
use crate::{options::PlanOptions, textures::read_texture_sizes};

pub fn plan(options: PlanOptions) -> anyhow::Result<()> {
    let project = open_project(options.project_path)?;
    let texture_sizes = read_texture_sizes(&project.textures())?;
    let pages = project.paginate(&texture_sizes)?;

    log::info!(
        "{} of {} sheets have something on them",
        pages.len(),
        project.grid.columns * project.grid.rows
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &pages)?;
    writeln!(handle)?;

    Ok(())
}
