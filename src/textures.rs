//! Loads the images attached to objects.
//!
//! Every texture is decoded on its own task and the results are joined. If any
//! one of them fails, the whole load fails and nothing is returned.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use futures::{
    executor::{block_on, ThreadPool},
    future::try_join_all,
    task::{SpawnError, SpawnExt},
};
use image::RgbaImage;
use shelfpack::Id;
use thiserror::Error;

/// A decoded texture, kept as 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbaImage,
}

impl Texture {
    pub fn pixel_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Decodes every texture in `requests` concurrently.
pub fn load_textures(requests: Vec<(Id, PathBuf)>) -> Result<BTreeMap<Id, Texture>, TextureLoadError> {
    if requests.is_empty() {
        return Ok(BTreeMap::new());
    }

    log::trace!("Decoding {} textures", requests.len());

    let pool = ThreadPool::new().map_err(|source| TextureLoadError::ThreadPool { source })?;

    let handles = requests
        .into_iter()
        .map(|(id, path)| pool.spawn_with_handle(async move { decode(id, path) }))
        .collect::<Result<Vec<_>, SpawnError>>()?;

    let textures = block_on(try_join_all(handles))?;

    Ok(textures.into_iter().collect())
}

/// Reads just the pixel size of every texture in `requests`, without decoding
/// the image data.
pub fn read_texture_sizes(
    requests: &[(Id, PathBuf)],
) -> Result<BTreeMap<Id, (u32, u32)>, TextureLoadError> {
    requests
        .iter()
        .map(|(id, path)| {
            let size = image::image_dimensions(path).map_err(|source| TextureLoadError::Decode {
                id: id.clone(),
                path: path.clone(),
                source,
            })?;

            Ok((id.clone(), size))
        })
        .collect()
}

fn decode(id: Id, path: PathBuf) -> Result<(Id, Texture), TextureLoadError> {
    log::trace!("Decoding texture for {} from {}", id, path.display());

    match open_rgba(&path) {
        Ok(image) => {
            log::debug!(
                "Decoded {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );

            Ok((id, Texture { image }))
        }
        Err(source) => Err(TextureLoadError::Decode { id, path, source }),
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("Couldn't load the texture for {id} from {}: {source}", path.display())]
    Decode {
        id: Id,
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Couldn't start texture decoding: {source}")]
    ThreadPool { source: io::Error },

    #[error("Couldn't schedule texture decoding: {source}")]
    Spawn {
        #[from]
        source: SpawnError,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    use image::Rgba;

    fn save_texture(dir: &Path, name: &str, size: (u32, u32)) -> PathBuf {
        let path = dir.join(name);
        let image = RgbaImage::from_pixel(size.0, size.1, Rgba([10, 20, 30, 255]));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let requests = vec![
            (Id::from("a"), save_texture(dir.path(), "a.png", (4, 3))),
            (Id::from("b"), save_texture(dir.path(), "b.png", (7, 9))),
        ];

        let textures = load_textures(requests).unwrap();

        assert_eq!(textures.len(), 2);
        assert_eq!(textures[&Id::from("a")].pixel_size(), (4, 3));
        assert_eq!(textures[&Id::from("b")].pixel_size(), (7, 9));
        assert_eq!(
            textures[&Id::from("b")].image.get_pixel(6, 8),
            &Rgba([10, 20, 30, 255])
        );
    }

    #[test]
    fn one_failure_fails_all() {
        let dir = tempfile::tempdir().unwrap();
        let requests = vec![
            (Id::from("good"), save_texture(dir.path(), "good.png", (2, 2))),
            (Id::from("missing"), dir.path().join("missing.png")),
        ];

        match load_textures(requests) {
            Err(TextureLoadError::Decode { id, .. }) => assert_eq!(id, Id::from("missing")),
            other => panic!("expected a decode error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = load_textures(vec![(Id::from("broken"), path)]);

        assert!(matches!(result, Err(TextureLoadError::Decode { .. })));
    }

    #[test]
    fn sizes_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let requests = vec![(Id::from("a"), save_texture(dir.path(), "a.png", (12, 5)))];

        let sizes = read_texture_sizes(&requests).unwrap();

        assert_eq!(sizes[&Id::from("a")], (12, 5));
    }

    #[test]
    fn nothing_to_load() {
        assert!(load_textures(Vec::new()).unwrap().is_empty());
    }
}
