use std::{
    collections::{BTreeMap, HashSet},
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use shelfpack::{
    tile, Id, Page, Paint, PackingResult, Rect, Rectangle, Rgb, SheetSize, TileObject,
};
use thiserror::Error;

pub static PROJECT_FILENAME: &str = "papertile.toml";

/// A Papertile project, contained in a papertile.toml file.
///
/// Describes the paper being printed on, how many sheets make up the grid and
/// every object laid out on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Project {
    /// The name of the project, used in messages.
    pub name: String,

    pub sheet: SheetConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub objects: Vec<ObjectConfig>,

    /// The path that this project came from. Texture paths are relative to
    /// the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

/// Size of a single sheet of paper, either from a named preset or given
/// explicitly in millimeters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SheetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Turns the sheet on its side. Only applies to presets.
    #[serde(default)]
    pub landscape: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ObjectConfig {
    pub id: String,

    /// Real-world size in millimeters.
    pub width: f64,
    pub height: f64,

    /// Top-left corner in layout space, in millimeters.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,

    /// Fill color, used when there's no texture.
    #[serde(default = "default_color")]
    pub color: Rgb,

    #[serde(default = "default_outline")]
    pub outline: Rgb,

    /// An image stretched over the whole object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
}

fn default_color() -> Rgb {
    Rgb(220, 220, 220)
}

fn default_outline() -> Rgb {
    Rgb::BLACK
}

impl ObjectConfig {
    pub fn rect(&self) -> Rect {
        Rect::new((self.x, self.y), (self.width, self.height))
    }
}

impl Project {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ProjectError> {
        let folder_path = folder_path.as_ref();
        let file_path = &folder_path.join(PROJECT_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let contents = fs::read(path)?;

        let mut project: Self =
            toml::from_slice(&contents).map_err(|source| ProjectError::Toml {
                path: path.to_owned(),
                source,
            })?;
        project.file_path = path.to_owned();
        project.validate()?;

        log::trace!(
            "Read project \"{}\" with {} objects from {}",
            project.name,
            project.objects.len(),
            path.display()
        );

        Ok(project)
    }

    /// Writes the project back to the file it was read from.
    pub fn write(&self) -> Result<(), ProjectError> {
        let serialized = toml::to_string_pretty(self)?;
        fs::write(&self.file_path, serialized)?;

        log::trace!("Saved project to {}", self.file_path.display());

        Ok(())
    }

    /// The path that texture paths in this project are relative to.
    pub fn folder(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn sheet_size(&self) -> Result<SheetSize, ProjectError> {
        let sheet = &self.sheet;

        let size = match (&sheet.preset, sheet.width, sheet.height) {
            (Some(preset), None, None) => {
                let size: SheetSize = preset.parse().map_err(|err| self.invalid(err))?;

                if sheet.landscape {
                    size.landscape()
                } else {
                    size
                }
            }
            (None, Some(width), Some(height)) => SheetSize::new(width, height),
            _ => {
                return Err(self.invalid(
                    "the sheet needs either a preset or both a width and a height",
                ))
            }
        };

        if !is_positive(size.width) || !is_positive(size.height) {
            return Err(self.invalid("the sheet must have a positive width and height"));
        }

        Ok(size)
    }

    /// Every object as a rectangle for the optimizer, in project order.
    pub fn rectangles(&self) -> Vec<Rectangle> {
        self.objects
            .iter()
            .map(|object| Rectangle::new(object.id.as_str(), (object.width, object.height)))
            .collect()
    }

    /// Takes on the grid and object positions chosen by the optimizer.
    pub fn apply(&mut self, result: &PackingResult) {
        self.grid = GridConfig {
            columns: result.columns,
            rows: result.rows,
        };

        for object in &mut self.objects {
            match result.placements.get(&Id::from(object.id.as_str())) {
                Some(placement) => {
                    object.x = placement.x;
                    object.y = placement.y;
                }
                None => log::warn!("The optimizer did not place {}", object.id),
            }
        }
    }

    /// Objects that have a texture, with the absolute path to it.
    pub fn textures(&self) -> Vec<(Id, PathBuf)> {
        self.objects
            .iter()
            .filter_map(|object| {
                let texture = object.texture.as_ref()?;
                Some((Id::from(object.id.as_str()), self.folder().join(texture)))
            })
            .collect()
    }

    /// Cuts the project into pages. `texture_sizes` holds the pixel size of
    /// every object's texture; objects without one are filled with their
    /// color.
    pub fn paginate(
        &self,
        texture_sizes: &BTreeMap<Id, (u32, u32)>,
    ) -> Result<Vec<Page>, ProjectError> {
        let sheet = self.sheet_size()?;
        let grid = sheet.grid_extent(self.grid.columns, self.grid.rows);

        let objects: Vec<_> = self
            .objects
            .iter()
            .map(|object| {
                let id = Id::from(object.id.as_str());
                let rect = object.rect();

                if rect.intersection(&grid) != Some(rect) {
                    log::warn!(
                        "{} reaches outside the {}x{} sheet grid and will be cut off",
                        object.id,
                        self.grid.columns,
                        self.grid.rows
                    );
                }

                let paint = match texture_sizes.get(&id) {
                    Some(&pixel_size) => Paint::Texture { pixel_size },
                    None => Paint::Color(object.color),
                };

                TileObject {
                    id,
                    rect,
                    paint,
                    outline: object.outline,
                }
            })
            .collect();

        let pages = tile(&objects, sheet, self.grid.columns, self.grid.rows);

        if pages.is_empty() {
            return Err(ProjectError::EmptyLayout {
                name: self.name.clone(),
                columns: self.grid.columns,
                rows: self.grid.rows,
            });
        }

        Ok(pages)
    }

    fn validate(&self) -> Result<(), ProjectError> {
        self.sheet_size()?;

        if self.grid.columns == 0 || self.grid.rows == 0 {
            return Err(self.invalid("the grid needs at least one column and one row"));
        }

        let mut seen = HashSet::new();

        for object in &self.objects {
            if !seen.insert(object.id.as_str()) {
                return Err(self.invalid(format!("object id '{}' is used twice", object.id)));
            }

            if !is_positive(object.width) || !is_positive(object.height) {
                return Err(self.invalid(format!(
                    "object '{}' must have a positive width and height",
                    object.id
                )));
            }

            if !object.x.is_finite() || !object.y.is_finite() {
                return Err(self.invalid(format!("object '{}' has an invalid position", object.id)));
            }
        }

        Ok(())
    }

    fn invalid<R: ToString>(&self, reason: R) -> ProjectError {
        ProjectError::Invalid {
            path: self.file_path.clone(),
            reason: reason.to_string(),
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{source} in {}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid project {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error(
        "Nothing in {name} lies on its {columns}x{rows} sheet grid. Move objects onto the \
         grid or run 'papertile optimize'."
    )]
    EmptyLayout { name: String, columns: u32, rows: u32 },

    #[error(transparent)]
    Serialize {
        #[from]
        source: toml::ser::Error,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ProjectError {
    /// Tells whether this error originated because of a path not existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ProjectError::Io { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use shelfpack::{optimise, DrawKind};

    fn write_project(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_FILENAME);
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    static MURAL: &str = r#"
name = "mural"

[sheet]
preset = "a4"

[grid]
columns = 2
rows = 1

[[objects]]
id = "sun"
width = 300.0
height = 100.0
color = [250, 200, 40]

[[objects]]
id = "photo"
width = 50.0
height = 50.0
x = 10.0
y = 150.0
texture = "photo.png"
"#;

    #[test]
    fn read_from_folder() {
        let (dir, path) = write_project(MURAL);

        let project = Project::read_from_folder_or_file(dir.path()).unwrap();

        assert_eq!(project.name, "mural");
        assert_eq!(project.file_path, path);
        assert_eq!(project.sheet_size().unwrap(), SheetSize::A4);
        assert_eq!(project.objects[0].color, Rgb(250, 200, 40));
        assert_eq!(project.objects[0].outline, Rgb::BLACK);
        assert_eq!(project.objects[1].color, Rgb(220, 220, 220));
        assert_eq!(project.objects[1].rect(), Rect::new((10.0, 150.0), (50.0, 50.0)));
        assert_eq!(
            project.textures(),
            vec![(Id::from("photo"), dir.path().join("photo.png"))]
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = Project::read_from_folder(dir.path()).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn explicit_landscape_and_custom_sizes() {
        let (_dir, path) = write_project(
            "name = \"a\"\n[sheet]\npreset = \"a3\"\nlandscape = true\n",
        );
        let project = Project::read_from_file(&path).unwrap();
        assert_eq!(project.sheet_size().unwrap(), SheetSize::new(420.0, 297.0));
        assert_eq!(project.grid, GridConfig::default());

        let (_dir, path) = write_project("name = \"b\"\n[sheet]\nwidth = 100.0\nheight = 80.0\n");
        let project = Project::read_from_file(&path).unwrap();
        assert_eq!(project.sheet_size().unwrap(), SheetSize::new(100.0, 80.0));
    }

    #[test]
    fn rejects_invalid_projects() {
        let cases = [
            "name = \"x\"\n[sheet]\npreset = \"b9\"\n",
            "name = \"x\"\n[sheet]\nwidth = 100.0\n",
            "name = \"x\"\n[sheet]\nwidth = -1.0\nheight = 10.0\n",
            "name = \"x\"\n[sheet]\npreset = \"a4\"\n[grid]\ncolumns = 0\nrows = 1\n",
            "name = \"x\"\n[sheet]\npreset = \"a4\"\n[[objects]]\nid = \"a\"\nwidth = 0.0\nheight = 5.0\n",
            "name = \"x\"\n[sheet]\npreset = \"a4\"\n[[objects]]\nid = \"a\"\nwidth = 1.0\nheight = 5.0\n[[objects]]\nid = \"a\"\nwidth = 1.0\nheight = 5.0\n",
        ];

        for case in &cases {
            let (_dir, path) = write_project(case);

            match Project::read_from_file(&path) {
                Err(ProjectError::Invalid { .. }) => {}
                other => panic!("expected invalid project for {:?}, got {:?}", case, other),
            }
        }
    }

    #[test]
    fn unknown_fields_are_errors() {
        let (_dir, path) = write_project("name = \"x\"\ncolour = 3\n[sheet]\npreset = \"a4\"\n");

        match Project::read_from_file(&path) {
            Err(ProjectError::Toml { .. }) => {}
            other => panic!("expected a toml error, got {:?}", other),
        }
    }

    #[test]
    fn apply_and_write_back() {
        let (_dir, path) = write_project(MURAL);
        let mut project = Project::read_from_file(&path).unwrap();

        let result = optimise(&project.rectangles(), project.sheet_size().unwrap()).unwrap();
        project.apply(&result);
        project.write().unwrap();

        let reread = Project::read_from_file(&path).unwrap();

        assert_eq!(reread, project);
        assert_eq!(reread.grid.columns, result.columns);
        assert_eq!(reread.grid.rows, result.rows);
        assert_eq!(reread.objects[0].x, 0.0);
        assert_eq!(reread.objects[0].y, 0.0);
        assert_eq!(reread.objects[1].texture, Some(PathBuf::from("photo.png")));
    }

    #[test]
    fn paginate_uses_texture_sizes() {
        let (_dir, path) = write_project(MURAL);
        let project = Project::read_from_file(&path).unwrap();

        let mut sizes = BTreeMap::new();
        sizes.insert(Id::from("photo"), (100, 100));

        let pages = project.paginate(&sizes).unwrap();

        // The sun spans both sheets; the photo sits on the first.
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].commands.len(), 2);
        assert_eq!(pages[1].commands.len(), 1);
        assert_eq!(
            pages[0].commands[0].kind,
            DrawKind::Fill {
                color: Rgb(250, 200, 40)
            }
        );
        match pages[0].commands[1].kind {
            DrawKind::ImageCrop { source } => assert_eq!(source.width, 100.0),
            other => panic!("expected an image crop, got {:?}", other),
        }
    }

    #[test]
    fn nothing_on_the_grid() {
        let (_dir, path) = write_project(
            "name = \"lost\"\n[sheet]\npreset = \"a4\"\n[[objects]]\nid = \"a\"\nwidth = 10.0\nheight = 10.0\nx = -100.0\ny = -100.0\n",
        );
        let project = Project::read_from_file(&path).unwrap();

        match project.paginate(&BTreeMap::new()) {
            Err(ProjectError::EmptyLayout { .. }) => {}
            other => panic!("expected an empty layout, got {:?}", other),
        }
    }
}
