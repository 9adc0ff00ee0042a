mod export;
mod optimize;
mod plan;

use std::{env, path::PathBuf};

use crate::data::{Project, ProjectError, PROJECT_FILENAME};

pub use export::*;
pub use optimize::*;
pub use plan::*;

/// Reads the project at `project_path`, or in the current directory if no
/// path was given.
fn open_project(project_path: Option<PathBuf>) -> Result<Project, ProjectError> {
    let project_path = match project_path {
        Some(path) => path,
        None => env::current_dir()?,
    };

    Project::read_from_folder_or_file(&project_path).map_err(|err| {
        if err.is_not_found() {
            log::error!(
                "No {} found at {}. Pass the path to a project file or folder.",
                PROJECT_FILENAME,
                project_path.display()
            );
        }

        err
    })
}
