use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::errors::GenerationError;
use crate::photo::{PhotoMeta, PhotoRenderer, RendererBackend, STUB_SUFFIX};

/// Writes the overlay lines to `<photo path>.txt` instead of an image.
#[derive(Debug, Clone)]
pub struct StubRenderer {
    photos_dir: PathBuf,
}

impl StubRenderer {
    pub fn new(photos_dir: &Path) -> Self {
        Self {
            photos_dir: photos_dir.to_path_buf(),
        }
    }
}

impl PhotoRenderer for StubRenderer {
    fn backend(&self) -> RendererBackend {
        RendererBackend::Stub
    }

    fn render(
        &self,
        meta: &PhotoMeta<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<PathBuf, GenerationError> {
        let mut path = OsString::from(meta.photo_path(&self.photos_dir));
        path.push(STUB_SUFFIX);
        let path = PathBuf::from(path);

        let mut contents = meta.overlay_lines().join("\n");
        contents.push('\n');
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
