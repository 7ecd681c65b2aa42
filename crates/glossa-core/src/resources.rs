use std::collections::HashMap;

use crate::translator::Translator;

/// The application's own string table
pub trait StringResources: Send + Sync {
    fn string(&self, id: &str) -> Option<String>;

    /// Every id the table knows, used for prefetching
    fn ids(&self) -> Vec<String>;
}

impl StringResources for HashMap<String, String> {
    fn string(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

/// String table whose reads go through the translator's cache.
///
/// Reads never wait on the network: strings without a cached translation,
/// or any string while translation is disabled, come back unchanged.
pub struct TranslatedResources<R, E> {
    inner: R,
    translator: Translator<E>,
}

impl<R, E> TranslatedResources<R, E>
where
    R: StringResources,
    E: Send + Sync + 'static,
{
    pub fn wrap(inner: R, translator: Translator<E>) -> Self {
        Self { inner, translator }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R, E> StringResources for TranslatedResources<R, E>
where
    R: StringResources,
    E: Send + Sync + 'static,
{
    fn string(&self, id: &str) -> Option<String> {
        self.inner
            .string(id)
            .map(|text| self.translator.translate_text(&text))
    }

    fn ids(&self) -> Vec<String> {
        self.inner.ids()
    }
}
