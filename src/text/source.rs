//! Where canonical passages come from.

use crate::error::{LectometroError, Result};
use crate::text::Form;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Backing store for canonical passages.
///
/// This trait allows swapping implementations (files on disk vs in-memory).
pub trait TextSource: Send + Sync {
    /// Return the raw passage for `form`.
    ///
    /// Fails with [`LectometroError::MissingResource`] when the form is valid
    /// but its passage has not been provisioned.
    fn load(&self, form: Form) -> Result<String>;
}

impl<T: TextSource + ?Sized> TextSource for Arc<T> {
    fn load(&self, form: Form) -> Result<String> {
        (**self).load(form)
    }
}

/// Reads `fluidez_<form>.txt` from a directory.
#[derive(Debug, Clone)]
pub struct DirTextSource {
    dir: PathBuf,
}

impl DirTextSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, form: Form) -> PathBuf {
        self.dir.join(form.resource_name())
    }
}

impl TextSource for DirTextSource {
    fn load(&self, form: Form) -> Result<String> {
        let path = self.path_for(form);
        std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LectometroError::MissingResource {
                    resource: path.display().to_string(),
                }
            } else {
                LectometroError::Other(format!(
                    "Failed to read canonical text '{}': {}",
                    path.display(),
                    e
                ))
            }
        })
    }
}

/// Passages held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextSource {
    texts: HashMap<Form, String>,
}

impl MemoryTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, form: Form, text: impl Into<String>) -> Self {
        self.texts.insert(form, text.into());
        self
    }
}

impl TextSource for MemoryTextSource {
    fn load(&self, form: Form) -> Result<String> {
        self.texts
            .get(&form)
            .cloned()
            .ok_or_else(|| LectometroError::MissingResource {
                resource: form.resource_name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn dir_source_reads_form_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("fluidez_2A.txt"), "el gato duerme").unwrap();

        let source = DirTextSource::new(dir.path());
        assert_eq!(source.load(Form::Form2A).unwrap(), "el gato duerme");
    }

    #[test]
    fn dir_source_missing_file_names_resource() {
        let dir = TempDir::new().unwrap();
        let source = DirTextSource::new(dir.path());

        let err = source.load(Form::Form2B).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingResource);
        assert!(
            err.to_string().contains("fluidez_2B.txt"),
            "error should name the resource: {}",
            err
        );
    }

    #[test]
    fn dir_source_path_is_form_derived() {
        let source = DirTextSource::new("/srv/textos");
        assert_eq!(
            source.path_for(Form::Form2B),
            PathBuf::from("/srv/textos/fluidez_2B.txt")
        );
        assert_eq!(source.dir(), Path::new("/srv/textos"));
    }

    #[test]
    fn memory_source_serves_registered_forms() {
        let source = MemoryTextSource::new().with_text(Form::Form2A, "hola mundo");
        assert_eq!(source.load(Form::Form2A).unwrap(), "hola mundo");

        let err = source.load(Form::Form2B).unwrap_err();
        assert!(matches!(
            err,
            LectometroError::MissingResource { ref resource } if resource == "fluidez_2B.txt"
        ));
    }

    #[test]
    fn arc_source_delegates() {
        let source: Arc<dyn TextSource> =
            Arc::new(MemoryTextSource::new().with_text(Form::Form2B, "texto"));
        assert_eq!(source.load(Form::Form2B).unwrap(), "texto");
    }
}
