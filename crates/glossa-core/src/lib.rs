pub mod accessor;
pub mod animation;
pub mod cache;
pub mod element;
pub mod error;
pub mod pipeline;
pub mod prefs;
mod queue;
pub mod registry;
pub mod resources;
pub mod state;
pub mod translator;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use accessor::{AccessorChain, AccessorFactory, SlotAccessor, TextAccessor};
pub use animation::{Animator, NoAnimation};
pub use cache::TranslationCache;
pub use element::{ElementHandle, ElementTable};
pub use error::OverlayError;
pub use pipeline::FetchPipeline;
pub use prefs::{MemoryPreferences, PreferenceStore};
pub use registry::ElementRegistry;
pub use resources::{StringResources, TranslatedResources};
pub use state::{AvailabilityState, Locales, StateListener};
pub use translator::{Collaborators, InitOptions, Translator};
