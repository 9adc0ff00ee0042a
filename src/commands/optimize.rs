use shelfpack::{optimise, MAX_COLUMNS};
use thiserror::Error;

use super::open_project;
use crate::{data::ProjectError, options::OptimizeOptions};

pub fn optimize(options: OptimizeOptions) -> Result<(), OptimizeError> {
    let mut project = open_project(options.project_path)?;
    let sheet = project.sheet_size()?;

    if project.objects.is_empty() {
        return Err(OptimizeError::NoObjects { name: project.name });
    }

    let result = match optimise(&project.rectangles(), sheet) {
        Some(result) => result,
        None => {
            let widest = project
                .objects
                .iter()
                .max_by(|a, b| a.width.total_cmp(&b.width))
                .map(|object| (object.id.clone(), object.width))
                .unwrap_or_default();

            return Err(OptimizeError::NoFeasibleLayout {
                id: widest.0,
                width: widest.1,
                max_width: f64::from(MAX_COLUMNS) * sheet.width,
            });
        }
    };

    log::info!(
        "Arranged {} objects on a {}x{} grid of {}x{}mm sheets ({:.1}% used, {:.0}mm² spare)",
        result.placements.len(),
        result.columns,
        result.rows,
        sheet.width,
        sheet.height,
        result.utilization() * 100.0,
        result.waste_area
    );

    project.apply(&result);

    if options.dry_run {
        log::info!("Dry run, leaving {} untouched", project.file_path.display());
    } else {
        project.write()?;
        log::info!("Saved layout to {}", project.file_path.display());
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("{name} has no objects to arrange")]
    NoObjects { name: String },

    #[error(
        "No sheet grid fits every object: {id} is {width}mm wide but a grid of {} sheets is \
         only {max_width}mm wide. Use larger sheets or make {id} smaller.",
        MAX_COLUMNS
    )]
    NoFeasibleLayout {
        id: String,
        width: f64,
        max_width: f64,
    },

    #[error(transparent)]
    Project {
        #[from]
        source: ProjectError,
    },
}
