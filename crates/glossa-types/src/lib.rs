mod locale;

pub use locale::Locale;

/// Service-side language identifier ("EN", "PL", ...)
pub type LanguageCode = String;

/// Positional text slots of one UI element.
///
/// `None` marks a slot that does not take part in translation.
pub type TextSlots = Vec<Option<String>>;
