//! Per-form cache of tokenized canonical passages.

use crate::error::{LectometroError, Result};
use crate::text::source::TextSource;
use crate::text::{CanonicalText, Form};
use std::sync::{Arc, OnceLock};

/// Owns the text source and memoizes each form's tokens.
///
/// A form is loaded at most once; afterwards every caller shares the same
/// immutable [`CanonicalText`]. Failed loads are not cached, so a passage
/// provisioned after startup is picked up on the next request.
pub struct CanonicalTextRegistry {
    source: Box<dyn TextSource>,
    cache: [OnceLock<Arc<CanonicalText>>; 2],
}

impl CanonicalTextRegistry {
    pub fn new(source: impl TextSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: [OnceLock::new(), OnceLock::new()],
        }
    }

    /// Tokenized passage for `form`, loading it on first use.
    pub fn get(&self, form: Form) -> Result<Arc<CanonicalText>> {
        let cell = &self.cache[form.index()];
        if let Some(text) = cell.get() {
            return Ok(Arc::clone(text));
        }

        let raw = self.source.load(form)?;
        let loaded = Arc::new(CanonicalText::new(form, &raw));
        tracing::debug!(
            form = %form,
            words = loaded.word_count(),
            "Loaded canonical text"
        );

        // A concurrent loader may have won; both parsed the same passage.
        Ok(Arc::clone(cell.get_or_init(|| loaded)))
    }

    pub fn word_count(&self, form: Form) -> Result<usize> {
        Ok(self.get(form)?.word_count())
    }

    pub fn is_loaded(&self, form: Form) -> bool {
        self.cache[form.index()].get().is_some()
    }

    /// Load every form up front. Returns the forms that could not be loaded.
    pub fn preload(&self) -> Vec<(Form, LectometroError)> {
        Form::ALL
            .into_iter()
            .filter_map(|form| self.get(form).err().map(|e| (form, e)))
            .collect()
    }
}

impl std::fmt::Debug for CanonicalTextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalTextRegistry")
            .field("loaded_2a", &self.is_loaded(Form::Form2A))
            .field("loaded_2b", &self.is_loaded(Form::Form2B))
            .finish()
    }
}
