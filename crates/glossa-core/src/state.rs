//! Translation availability: does this device need translation, can the
//! service provide it, and where model acquisition stands.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use glossa_service::{LanguagePair, TranslateError, TranslationService};
use glossa_types::Locale;

#[derive(Debug, Clone)]
pub enum AvailabilityState {
    Initialising,
    /// The device language is one the application already ships
    NotRequired,
    /// The service has no mapping for the default or the device language
    LocaleNotSupported,
    ModelDownloading,
    ModelDownloaded,
    ModelDownloadError(Arc<TranslateError>),
}

impl AvailabilityState {
    /// Only a new translator instance leaves a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            AvailabilityState::Initialising | AvailabilityState::ModelDownloading
        )
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AvailabilityState::ModelDownloaded)
    }
}

impl PartialEq for AvailabilityState {
    fn eq(&self, other: &Self) -> bool {
        use AvailabilityState::*;

        match (self, other) {
            (ModelDownloadError(a), ModelDownloadError(b)) => a.to_string() == b.to_string(),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// Observer of availability transitions
pub trait StateListener: Send + Sync {
    fn on_state_changed(&self, state: &AvailabilityState);
}

impl<F> StateListener for F
where
    F: Fn(&AvailabilityState) + Send + Sync,
{
    fn on_state_changed(&self, state: &AvailabilityState) {
        self(state)
    }
}

#[derive(Debug, Clone)]
pub struct Locales {
    /// Language the application's strings are written in
    pub default: Locale,
    /// Languages the application ships its own resources for
    pub supported: Vec<Locale>,
    /// Device locale
    pub active: Locale,
}

impl Locales {
    pub fn translation_required(&self) -> bool {
        !self
            .supported
            .iter()
            .any(|locale| locale.language() == self.active.language())
    }
}

/// Outcome of the one-time availability evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    NotRequired,
    LocaleNotSupported,
    Download(LanguagePair),
}

pub fn evaluate(locales: &Locales, service: &dyn TranslationService) -> Decision {
    if !locales.translation_required() {
        return Decision::NotRequired;
    }

    let source = service.language_for_code(locales.default.language());
    let target = service.language_for_code(locales.active.language());
    match (source, target) {
        (Some(from), Some(to)) => Decision::Download(LanguagePair { from, to }),
        _ => Decision::LocaleNotSupported,
    }
}

/// Current state plus weakly held listeners
pub struct Availability {
    state: RwLock<AvailabilityState>,
    listeners: RwLock<Vec<Weak<dyn StateListener>>>,
}

impl Availability {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(AvailabilityState::Initialising),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn current(&self) -> AvailabilityState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The caller keeps `listener` alive; it is notified right away with the
    /// current state and then on every transition.
    pub fn add_listener<L: StateListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<dyn StateListener> = Arc::downgrade(listener) as Weak<dyn StateListener>;
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(weak);

        listener.on_state_changed(&self.current());
    }

    pub fn transition(&self, next: AvailabilityState) {
        tracing::debug!(state = ?next, "Availability changed");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();

        // Notify outside the lock so listeners may register others
        let listeners: Vec<_> = {
            let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        for listener in listeners {
            listener.on_state_changed(&next);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn locales(supported: &[&str], active: &str) -> Locales {
        Locales {
            default: Locale::new("en"),
            supported: supported.iter().map(|l| Locale::new(*l)).collect(),
            active: Locale::new(active),
        }
    }

    #[test]
    fn supported_device_language_needs_no_translation() {
        assert!(!locales(&["en", "pl"], "pl").translation_required());
        assert!(locales(&["en"], "de").translation_required());
    }

    #[test]
    fn dropped_listener_is_skipped() {
        let availability = Availability::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorder = {
            let seen = seen.clone();
            Arc::new(move |state: &AvailabilityState| seen.lock().unwrap().push(state.clone()))
        };
        let transient = Arc::new(|_: &AvailabilityState| {});

        availability.add_listener(&recorder);
        availability.add_listener(&transient);
        drop(transient);

        availability.transition(AvailabilityState::NotRequired);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![AvailabilityState::Initialising, AvailabilityState::NotRequired]
        );
        assert_eq!(availability.listener_count(), 1);
    }

    #[test]
    fn download_errors_compare_by_cause() {
        let a = AvailabilityState::ModelDownloadError(Arc::new(TranslateError::RateLimitExceeded));
        let b = AvailabilityState::ModelDownloadError(Arc::new(TranslateError::RateLimitExceeded));
        let c = AvailabilityState::ModelDownloadError(Arc::new(TranslateError::AuthenticationError));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_terminal());
        assert!(!AvailabilityState::ModelDownloading.is_terminal());
    }
}
