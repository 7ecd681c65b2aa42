//! Reading and writing the translatable text of UI elements.
//!
//! Each element kind exposes a fixed, ordered list of text slots through a
//! [`TextAccessor`]. Accessors are looked up through an [`AccessorChain`] of
//! factories; an element no factory recognizes is ignored by the translator.

use std::sync::Arc;

use glossa_types::TextSlots;

/// Extracts and injects the text slots of one element kind
pub trait TextAccessor<E>: Send + Sync {
    /// Current slot values; slots that should not be translated are `None`
    fn extract(&self, element: &E) -> TextSlots;

    /// Write back every `Some` slot by position. Positions the element does
    /// not have are ignored.
    fn inject(&self, element: &mut E, texts: &[Option<String>]);
}

pub trait AccessorFactory<E>: Send + Sync {
    fn accessor_for(&self, element: &E) -> Option<Arc<dyn TextAccessor<E>>>;
}

impl<E, F> AccessorFactory<E> for F
where
    F: Fn(&E) -> Option<Arc<dyn TextAccessor<E>>> + Send + Sync,
{
    fn accessor_for(&self, element: &E) -> Option<Arc<dyn TextAccessor<E>>> {
        self(element)
    }
}

/// Factories queried in registration order; the first match wins
pub struct AccessorChain<E> {
    factories: Vec<Arc<dyn AccessorFactory<E>>>,
}

impl<E> AccessorChain<E> {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    pub fn push(&mut self, factory: Arc<dyn AccessorFactory<E>>) {
        self.factories.push(factory);
    }

    pub fn find(&self, element: &E) -> Option<Arc<dyn TextAccessor<E>>> {
        self.factories
            .iter()
            .find_map(|factory| factory.accessor_for(element))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<E> Default for AccessorChain<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<Arc<dyn AccessorFactory<E>>> for AccessorChain<E> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn AccessorFactory<E>>>>(iter: I) -> Self {
        Self {
            factories: iter.into_iter().collect(),
        }
    }
}

/// Zero of every decimal digit run accepted as "only digits"
const DIGIT_ZEROS: &[char] = &[
    '0', '\u{0660}', '\u{06F0}', '\u{0966}', '\u{09E6}', '\u{0A66}', '\u{0AE6}', '\u{0B66}',
    '\u{0BE6}', '\u{0C66}', '\u{0CE6}', '\u{0D66}', '\u{0E50}', '\u{0ED0}', '\u{0F20}',
    '\u{1040}', '\u{17E0}', '\u{1810}', '\u{FF10}',
];

/// Decimal digit in any of the common scripts. Fractions, superscripts and
/// roman numerals are not digits.
fn is_decimal_digit(c: char) -> bool {
    DIGIT_ZEROS
        .iter()
        .any(|&zero| (zero..=char::from_u32(zero as u32 + 9).unwrap_or(zero)).contains(&c))
}

/// `Some(text)` when the text should be sent for translation:
/// not empty and not made only of digits.
pub fn translatable(text: &str) -> Option<String> {
    if text.is_empty() || text.chars().all(is_decimal_digit) {
        None
    } else {
        Some(text.to_string())
    }
}

/// Calls `write` with the position and value of every `Some` slot
pub fn for_each_slot(texts: &[Option<String>], mut write: impl FnMut(usize, &str)) {
    texts
        .iter()
        .enumerate()
        .filter_map(|(index, text)| text.as_deref().map(|text| (index, text)))
        .for_each(|(index, text)| write(index, text));
}

type Reader<E> = fn(&E) -> Option<&str>;
type Writer<E> = fn(&mut E, String);

/// Accessor assembled from per-slot reader/writer functions, for element
/// types that do not warrant a hand-written accessor.
pub struct SlotAccessor<E> {
    slots: Vec<(Reader<E>, Writer<E>)>,
}

impl<E> SlotAccessor<E> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append the next slot position
    pub fn slot(mut self, read: Reader<E>, write: Writer<E>) -> Self {
        self.slots.push((read, write));
        self
    }
}

impl<E> Default for SlotAccessor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TextAccessor<E> for SlotAccessor<E> {
    fn extract(&self, element: &E) -> TextSlots {
        self.slots
            .iter()
            .map(|(read, _)| read(element).and_then(translatable))
            .collect()
    }

    fn inject(&self, element: &mut E, texts: &[Option<String>]) {
        for_each_slot(texts, |index, text| {
            if let Some((_, write)) = self.slots.get(index) {
                write(element, text.to_string());
            }
        });
    }
}

/// Factory matching elements by predicate
pub struct KindFactory<E> {
    matches: fn(&E) -> bool,
    accessor: Arc<dyn TextAccessor<E>>,
}

impl<E> KindFactory<E> {
    pub fn new(matches: fn(&E) -> bool, accessor: Arc<dyn TextAccessor<E>>) -> Self {
        Self { matches, accessor }
    }
}

impl<E> AccessorFactory<E> for KindFactory<E> {
    fn accessor_for(&self, element: &E) -> Option<Arc<dyn TextAccessor<E>>> {
        (self.matches)(element).then(|| self.accessor.clone())
    }
}
