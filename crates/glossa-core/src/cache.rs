use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    translation: String,
    /// Insertion order, decides reverse-mapping collisions
    sequence: u64,
}

/// Process-lifetime source -> translation map.
///
/// Append-only: the first translation stored for a source text is the one
/// every later reader sees. Safe for concurrent use.
#[derive(Default)]
pub struct TranslationCache {
    entries: scc::HashMap<String, Entry>,
    sequence: AtomicU64,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<String> {
        self.entries
            .read_sync(source, |_, entry| entry.translation.clone())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_sync(source)
    }

    /// Store `translation` unless `source` already has one.
    /// Returns the translation now held for `source`.
    pub fn insert(&self, source: String, translation: String) -> String {
        let entry = Entry {
            translation: translation.clone(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };

        match self.entries.insert_sync(source, entry) {
            Ok(()) => translation,
            Err((source, _)) => self.get(&source).unwrap_or(translation),
        }
    }

    /// Translation -> source. When two sources share a translation the one
    /// inserted last wins.
    pub fn reversed(&self) -> HashMap<String, String> {
        let mut entries = Vec::with_capacity(self.entries.len());
        // Visits every entry; nothing is removed
        self.entries.retain_sync(|source, entry| {
            entries.push((entry.sequence, entry.translation.clone(), source.clone()));
            true
        });
        entries.sort_unstable_by_key(|(sequence, _, _)| *sequence);

        entries
            .into_iter()
            .map(|(_, translation, source)| (translation, source))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn comparable(text: &str) -> String {
    text.chars()
        .map(|c| if c == '：' { ':' } else { c })
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when `translation` only differs from `source` by case, whitespace or
/// a full-width colon.
pub fn is_same_translation(source: &str, translation: &str) -> bool {
    comparable(source) == comparable(translation)
}
