use std::{
    collections::BTreeMap,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use fs_err as fs;
use serde::Serialize;
use shelfpack::Page;
use thiserror::Error;

use super::open_project;
use crate::{
    data::ProjectError,
    options::ExportOptions,
    render::{render_page, RenderError, RenderOptions},
    textures::{load_textures, TextureLoadError},
};

/// Summary of an export, written next to the pages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ExportManifest<'a> {
    project: &'a str,
    columns: u32,
    rows: u32,
    dpi: f64,
    pages: Vec<ExportedPage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ExportedPage<'a> {
    label: String,
    file: String,

    #[serde(flatten)]
    page: &'a Page,
}

pub fn export(options: ExportOptions) -> Result<(), ExportError> {
    if !(options.dpi.is_finite() && options.dpi > 0.0) {
        return Err(ExportError::InvalidDpi { dpi: options.dpi });
    }

    let project = open_project(options.project_path)?;
    let sheet = project.sheet_size()?;

    // Every texture has to load before anything gets drawn.
    let textures = load_textures(project.textures())?;
    let texture_sizes: BTreeMap<_, _> = textures
        .iter()
        .map(|(id, texture)| (id.clone(), texture.pixel_size()))
        .collect();

    let pages = project.paginate(&texture_sizes)?;

    let render_options = RenderOptions {
        dpi: options.dpi,
        outline_width: options.outline_width,
    };

    fs::create_dir_all(&options.output)?;

    let mut exported = Vec::with_capacity(pages.len());

    for page in &pages {
        let label = page.label();
        let file = format!("page-{}.png", label);
        let path = options.output.join(&file);

        let image = render_page(page, sheet, &textures, &render_options)?;

        let mut writer = BufWriter::new(fs::File::create(&path)?);
        image
            .encode_png(&mut writer)
            .map_err(|source| ExportError::Png {
                path: path.clone(),
                source,
            })?;
        writer.flush()?;

        log::debug!(
            "Wrote sheet {} ({}x{}px) to {}",
            label,
            image.size().0,
            image.size().1,
            path.display()
        );

        exported.push(ExportedPage { label, file, page });
    }

    let manifest = ExportManifest {
        project: &project.name,
        columns: project.grid.columns,
        rows: project.grid.rows,
        dpi: options.dpi,
        pages: exported,
    };

    let manifest_path = options.output.join("pages.json");
    let mut file = BufWriter::new(fs::File::create(&manifest_path)?);
    serde_json::to_writer_pretty(&mut file, &manifest)?;
    file.flush()?;

    log::info!(
        "Exported {} pages to {}",
        pages.len(),
        options.output.display()
    );

    Ok(())
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{dpi} is not a usable resolution")]
    InvalidDpi { dpi: f64 },

    #[error("Couldn't encode {}: {source}", path.display())]
    Png {
        path: PathBuf,
        source: png::EncodingError,
    },

    #[error(transparent)]
    Project {
        #[from]
        source: ProjectError,
    },

    #[error(transparent)]
    Texture {
        #[from]
        source: TextureLoadError,
    },

    #[error(transparent)]
    Render {
        #[from]
        source: RenderError,
    },

    #[error(transparent)]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}
