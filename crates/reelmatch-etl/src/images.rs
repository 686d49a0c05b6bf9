//! Image folder enumeration.

use std::io;
use std::path::{Path, PathBuf};

use reelmatch_search::Vocabulary;
use walkdir::WalkDir;

use crate::error::{ResolveError, ResolveResult};

/// Lists candidate file names for the image-link batch.
pub trait FileEnumerator {
    /// Bare file names (no directory part).
    fn list_files(&self) -> io::Result<Vec<String>>;
}

/// A flat directory of image files. Subdirectories are not descended into.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
}

impl ImageFolder {
    /// Open an existing folder.
    pub fn open(root: impl Into<PathBuf>) -> ResolveResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ResolveError::FolderNotFound(root));
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileEnumerator for ImageFolder {
    /// Regular files in name order.
    fn list_files(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => log::warn!("Skipping non UTF-8 file name: {}", entry.path().display()),
            }
        }
        Ok(names)
    }
}

/// The stem of `file_name` when its extension is a configured image
/// extension.
pub fn image_stem<'a>(file_name: &'a str, vocabulary: &Vocabulary) -> Option<&'a str> {
    let path = Path::new(file_name);
    let ext = path.extension()?.to_str()?;
    if !vocabulary.is_image_extension(ext) {
        return None;
    }
    path.file_stem()?.to_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_image_stem() {
        let vocabulary = Vocabulary::default();
        assert_eq!(image_stem("The_Matrix.JPG", &vocabulary), Some("The_Matrix"));
        assert_eq!(image_stem("m_heat.webp", &vocabulary), Some("m_heat"));
        assert_eq!(image_stem("poster.v2.png", &vocabulary), Some("poster.v2"));
        assert_eq!(image_stem("notes.txt", &vocabulary), None);
        assert_eq!(image_stem("README", &vocabulary), None);
        assert_eq!(image_stem(".png", &vocabulary), None);
    }

    #[test]
    fn test_list_files_is_flat_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.jpg"), b"").unwrap();
        fs::write(temp_dir.path().join("a.png"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("c.jpg"), b"").unwrap();

        let folder = ImageFolder::open(temp_dir.path()).unwrap();
        assert_eq!(folder.list_files().unwrap(), vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_missing_folder() {
        let temp_dir = TempDir::new().unwrap();
        let err = ImageFolder::open(temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ResolveError::FolderNotFound(_)));
    }
}
