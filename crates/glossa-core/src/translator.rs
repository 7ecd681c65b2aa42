//! The orchestrator: owns the registry, cache and availability state, and
//! drives enable/disable sweeps over the registered elements.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use glossa_config::Config;
use glossa_config::overlay::OverlayConfig;
use glossa_service::{LanguagePair, TranslateError, TranslationService};
use glossa_types::TextSlots;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::accessor::{AccessorChain, AccessorFactory, TextAccessor, translatable};
use crate::animation::{Animator, NoAnimation};
use crate::cache::TranslationCache;
use crate::element::{ElementHandle, ElementTable};
use crate::error::OverlayError;
use crate::pipeline::FetchPipeline;
use crate::prefs::PreferenceStore;
use crate::queue::{Command, DeliveryQueue, QueueHandler};
use crate::registry::ElementRegistry;
use crate::resources::StringResources;
use crate::state::{self, Availability, AvailabilityState, Decision, Locales, StateListener};

/// External parts the translator works with
pub struct Collaborators<E> {
    /// Element table owned by the UI layer
    pub elements: Arc<ElementTable<E>>,
    pub service: Arc<dyn TranslationService>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub animator: Arc<dyn Animator>,
}

impl<E> Collaborators<E> {
    pub fn new(
        elements: Arc<ElementTable<E>>,
        service: Arc<dyn TranslationService>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            elements,
            service,
            preferences,
            animator: Arc::new(NoAnimation),
        }
    }

    pub fn with_animator(mut self, animator: Arc<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }
}

pub struct InitOptions<E> {
    pub locales: Locales,
    /// Queried in order when looking up an element's accessor
    pub factories: Vec<Arc<dyn AccessorFactory<E>>>,
    /// Strings to translate ahead of display once the model is ready
    pub prefetch: Option<Arc<dyn StringResources>>,
}

impl<E> InitOptions<E> {
    pub fn new(locales: Locales) -> Self {
        Self {
            locales,
            factories: Vec::new(),
            prefetch: None,
        }
    }

    pub fn factory(mut self, factory: Arc<dyn AccessorFactory<E>>) -> Self {
        self.factories.push(factory);
        self
    }

    pub fn prefetch(mut self, source: Arc<dyn StringResources>) -> Self {
        self.prefetch = Some(source);
        self
    }
}

/// Everything fixed by `initialize`
struct Session<E> {
    locales: Locales,
    accessors: AccessorChain<E>,
    pair: Option<LanguagePair>,
    prefetch_source: Option<Arc<dyn StringResources>>,
    queue: DeliveryQueue<E>,
}

struct Inner<E> {
    config: OverlayConfig,
    enabled_key: String,
    elements: Arc<ElementTable<E>>,
    registry: ElementRegistry,
    cache: Arc<TranslationCache>,
    service: Arc<dyn TranslationService>,
    preferences: Arc<dyn PreferenceStore>,
    animator: Arc<dyn Animator>,
    availability: Availability,
    animation_enabled: AtomicBool,
    session: OnceLock<Session<E>>,
    prefetch: Mutex<Option<CancellationToken>>,
}

/// Runtime translation overlay.
///
/// One instance per process: build it, register state listeners, then call
/// [`initialize`](Self::initialize) once. Setting up again means building a
/// new instance. Cloning is cheap and shares all state.
pub struct Translator<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for Translator<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: Send + Sync + 'static> Translator<E> {
    pub fn new(config: &Config, collaborators: Collaborators<E>) -> Self {
        let Collaborators {
            elements,
            service,
            preferences,
            animator,
        } = collaborators;

        Self {
            inner: Arc::new(Inner {
                config: config.overlay.clone(),
                enabled_key: config.preferences.enabled_key.clone(),
                elements,
                registry: ElementRegistry::new(),
                cache: Arc::new(TranslationCache::new()),
                service,
                preferences,
                animator,
                availability: Availability::new(),
                animation_enabled: AtomicBool::new(config.overlay.animation_enabled),
                session: OnceLock::new(),
                prefetch: Mutex::new(None),
            }),
        }
    }

    /// Evaluate availability and, when translation is needed and possible,
    /// start acquiring the model. Must run inside a tokio runtime.
    pub fn initialize(&self, options: InitOptions<E>) -> Result<AvailabilityState, OverlayError> {
        if self.inner.session.get().is_some() {
            return Err(OverlayError::AlreadyInitialized);
        }
        let runtime = Handle::try_current().map_err(|_| OverlayError::NoRuntime)?;

        let InitOptions {
            locales,
            factories,
            prefetch,
        } = options;

        let decision = state::evaluate(&locales, self.inner.service.as_ref());
        tracing::debug!(
            default = %locales.default,
            active = %locales.active,
            ?decision,
            "Evaluated translation availability"
        );

        let pair = match &decision {
            Decision::Download(pair) => Some(pair.clone()),
            _ => None,
        };
        let queue = DeliveryQueue::spawn(
            runtime,
            Arc::downgrade(&self.inner),
            self.inner.config.debounce(),
        );
        let session = Session {
            locales,
            accessors: factories.into_iter().collect(),
            pair,
            prefetch_source: prefetch,
            queue,
        };
        self.inner
            .session
            .set(session)
            .map_err(|_| OverlayError::AlreadyInitialized)?;
        let session = self.inner.session()?;

        match decision {
            Decision::NotRequired => self
                .inner
                .availability
                .transition(AvailabilityState::NotRequired),
            Decision::LocaleNotSupported => self
                .inner
                .availability
                .transition(AvailabilityState::LocaleNotSupported),
            Decision::Download(pair) => {
                self.inner
                    .availability
                    .transition(AvailabilityState::ModelDownloading);

                let service = self.inner.service.clone();
                let tx = session.queue.sender();
                session.queue.runtime().spawn(async move {
                    let result = service.download_model(&pair).await;
                    if tx.send(Command::ModelReady(result)).await.is_err() {
                        tracing::debug!("Model download finished after shutdown");
                    }
                });
            }
        }

        Ok(self.state())
    }

    pub fn state(&self) -> AvailabilityState {
        self.inner.availability.current()
    }

    /// Only a weak reference is kept, so the caller must hold on to
    /// `listener`. It receives the current state immediately.
    pub fn add_state_listener<L: StateListener + 'static>(&self, listener: &Arc<L>) {
        self.inner.availability.add_listener(listener);
    }

    /// The user's persisted choice
    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), OverlayError> {
        self.inner
            .preferences
            .set_bool(&self.inner.enabled_key, enabled)?;
        self.request_sweep(true);
        Ok(())
    }

    /// False until initialized
    pub fn is_translation_required(&self) -> bool {
        self.inner
            .session
            .get()
            .is_some_and(|session| session.locales.translation_required())
    }

    /// Whether the service maps both the default and the device language
    pub fn is_translation_available(&self) -> bool {
        self.inner.session.get().is_some_and(|session| {
            let service = &self.inner.service;
            service
                .language_for_code(session.locales.default.language())
                .is_some()
                && service
                    .language_for_code(session.locales.active.language())
                    .is_some()
        })
    }

    pub fn animation_enabled(&self) -> bool {
        self.inner.animation_enabled()
    }

    pub fn set_animation_enabled(&self, enabled: bool) {
        self.inner.animation_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn register_element(&self, handle: ElementHandle) {
        if self.inner.registry.register(handle) {
            tracing::trace!(element = ?handle, "Registered element");
        }
        self.request_sweep(false);
    }

    /// Creation hook for the UI layer: store the element and register it
    pub fn attach(&self, element: E) -> ElementHandle {
        let handle = self.inner.elements.insert(element);
        self.register_element(handle);
        handle
    }

    /// Destruction hook for the UI layer
    pub fn detach(&self, handle: ElementHandle) -> Option<E> {
        self.inner.registry.unregister(handle);
        self.inner.elements.remove(handle)
    }

    /// Schedule a sweep when translation is required and enabled, or always
    /// when `force` is set. Bursts of requests collapse into one sweep.
    pub fn request_sweep(&self, force: bool) {
        self.inner.request_sweep(force);
    }

    /// Cached translation of `text` while enabled, otherwise `text` itself.
    /// Never waits on the service.
    pub fn translate_text(&self, text: &str) -> String {
        if !self.is_enabled() {
            return text.to_string();
        }
        self.inner
            .cache
            .get(text)
            .unwrap_or_else(|| text.to_string())
    }

    /// One-off service translation, bypassing the cache
    pub async fn fetch_translation(&self, text: &str) -> Result<String, OverlayError> {
        let pipeline = self
            .inner
            .session
            .get()
            .and_then(|session| self.inner.pipeline(session))
            .ok_or(OverlayError::ModelNotReady)?;

        let translation = self
            .inner
            .service
            .translate(text, pipeline.pair())
            .await?;
        Ok(translation.text)
    }

    /// Translate every string of `source` in the background, replacing any
    /// prefetch still running.
    pub fn prefetch(&self, source: Arc<dyn StringResources>) -> Result<(), OverlayError> {
        let session = self.inner.session()?;
        let pipeline = self
            .inner
            .pipeline(session)
            .ok_or(OverlayError::ModelNotReady)?;

        self.inner
            .start_prefetch(session.queue.runtime(), pipeline, source);
        Ok(())
    }

    pub fn cancel_prefetch(&self) {
        if let Some(token) = self
            .inner
            .prefetch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }

    /// Delete every model the service holds. Failures are only logged.
    pub fn cleanup_models(&self) -> Result<(), OverlayError> {
        let runtime = Handle::try_current().map_err(|_| OverlayError::NoRuntime)?;
        self.inner.cleanup_models(&runtime);
        Ok(())
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.inner.cache
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.inner.registry
    }

    pub fn elements(&self) -> &Arc<ElementTable<E>> {
        &self.inner.elements
    }
}

impl<E: Send + Sync + 'static> Inner<E> {
    fn session(&self) -> Result<&Session<E>, OverlayError> {
        self.session.get().ok_or(OverlayError::ModelNotReady)
    }

    fn is_enabled(&self) -> bool {
        self.preferences.get_bool(&self.enabled_key, false)
    }

    fn animation_enabled(&self) -> bool {
        self.animation_enabled.load(Ordering::Relaxed)
    }

    fn request_sweep(&self, force: bool) {
        let Some(session) = self.session.get() else {
            tracing::trace!("Sweep requested before initialization");
            return;
        };

        if (session.locales.translation_required() && self.is_enabled()) || force {
            session.queue.request_sweep();
        }
    }

    /// Pipeline for the session's language pair, once the model is ready
    fn pipeline(&self, session: &Session<E>) -> Option<FetchPipeline> {
        if !self.availability.current().is_ready() {
            return None;
        }
        let pair = session.pair.clone()?;
        Some(FetchPipeline::new(
            self.service.clone(),
            self.cache.clone(),
            pair,
        ))
    }

    fn sweep(&self, session: &Session<E>) {
        if self.is_enabled() {
            self.enable_pass(session);
        } else {
            self.disable_pass(session);
        }
    }

    fn enable_pass(&self, session: &Session<E>) {
        let Some(pipeline) = self.pipeline(session) else {
            tracing::debug!("Translation model not ready, sweep skipped");
            return;
        };
        tracing::debug!("Enabling translation");

        let mut gone = Vec::new();
        for handle in self.registry.snapshot() {
            if !self.elements.contains(handle) {
                gone.push(handle);
                continue;
            }
            if !self.registry.mark_processed(handle) {
                continue;
            }

            let extracted = self.elements.with(handle, |element| {
                session
                    .accessors
                    .find(element)
                    .map(|accessor| {
                        let texts = accessor.extract(element);
                        (accessor, texts)
                    })
            });
            let Some(Some((accessor, texts))) = extracted else {
                continue;
            };
            if texts.iter().all(Option::is_none) {
                continue;
            }

            self.spawn_fetch(session, pipeline.clone(), handle, accessor, texts);
        }

        self.prune(&gone);
    }

    fn spawn_fetch(
        &self,
        session: &Session<E>,
        pipeline: FetchPipeline,
        element: ElementHandle,
        accessor: Arc<dyn TextAccessor<E>>,
        texts: TextSlots,
    ) {
        let elements = self.elements.clone();
        let animator = self.animator.clone();
        let faded = self.animation_enabled();
        let fade_out = self.config.fade_out();
        let tx = session.queue.sender();

        session.queue.runtime().spawn(async move {
            if faded {
                animator.fade_out(element, fade_out).await;
            }

            let Some(texts) = pipeline
                .resolve_while(texts, || elements.contains(element))
                .await
            else {
                tracing::trace!(?element, "Element destroyed during fetch");
                return;
            };

            let resolved = Command::Resolved {
                element,
                accessor,
                texts,
                faded,
            };
            if tx.send(resolved).await.is_err() {
                tracing::debug!("Delivery queue closed before injection");
            }
        });
    }

    fn disable_pass(&self, session: &Session<E>) {
        tracing::debug!("Disabling translation");
        if self.cache.is_empty() {
            return;
        }

        let reversed = self.cache.reversed();
        let mut gone = Vec::new();
        for handle in self.registry.snapshot() {
            let restored = self.elements.with_mut(handle, |element| {
                let Some(accessor) = session.accessors.find(element) else {
                    return;
                };
                let originals: TextSlots = accessor
                    .extract(element)
                    .into_iter()
                    .map(|text| text.and_then(|text| reversed.get(&text).cloned()))
                    .collect();
                accessor.inject(element, &originals);
            });

            if restored.is_none() {
                gone.push(handle);
            }
        }

        self.registry.clear_processed();
        self.prune(&gone);
    }

    /// Forget elements the UI layer has destroyed
    fn prune(&self, gone: &[ElementHandle]) {
        if gone.is_empty() {
            return;
        }
        for handle in gone {
            self.registry.unregister(*handle);
        }
        tracing::trace!("Pruned {} destroyed elements", gone.len());
    }

    fn inject(
        &self,
        session: &Session<E>,
        element: ElementHandle,
        accessor: Arc<dyn TextAccessor<E>>,
        texts: TextSlots,
        faded: bool,
    ) {
        let injected = self
            .elements
            .with_mut(element, |target| accessor.inject(target, &texts))
            .is_some();
        if !injected {
            tracing::trace!(?element, "Element destroyed before injection");
            return;
        }

        if faded {
            let animator = self.animator.clone();
            let fade_in = self.config.fade_in();
            session.queue.runtime().spawn(async move {
                animator.fade_in(element, fade_in).await;
            });
        }
    }

    fn on_model_ready(&self, session: &Session<E>, result: Result<(), TranslateError>) {
        match result {
            Ok(()) => {
                tracing::info!("Translations loaded");
                self.availability
                    .transition(AvailabilityState::ModelDownloaded);
                self.request_sweep(false);

                if let (Some(source), Some(pipeline)) =
                    (session.prefetch_source.clone(), self.pipeline(session))
                {
                    self.start_prefetch(session.queue.runtime(), pipeline, source);
                }
            }
            Err(e) => {
                tracing::error!("Translations failed to load: {e}");
                self.availability
                    .transition(AvailabilityState::ModelDownloadError(Arc::new(e)));
                self.cleanup_models(session.queue.runtime());
            }
        }
    }

    fn start_prefetch(
        &self,
        runtime: &Handle,
        pipeline: FetchPipeline,
        source: Arc<dyn StringResources>,
    ) {
        let token = CancellationToken::new();
        let previous = self
            .prefetch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        tracing::debug!("Prefetching translations");
        runtime.spawn(async move {
            for id in source.ids() {
                if token.is_cancelled() {
                    tracing::debug!("Prefetch cancelled");
                    return;
                }
                let Some(text) = source.string(&id).as_deref().and_then(translatable) else {
                    continue;
                };
                tracing::trace!("Fetching {id} - {text}");

                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!("Prefetch cancelled");
                        return;
                    }
                    _ = pipeline.resolve_one(&text) => {}
                }
            }
            tracing::debug!("Prefetch finished");
        });
    }

    fn cleanup_models(&self, runtime: &Handle) {
        let service = self.service.clone();
        runtime.spawn(async move {
            let models = match service.downloaded_models().await {
                Ok(models) => models,
                Err(e) => {
                    tracing::warn!("Failed to cleanup translation models: {e}");
                    return;
                }
            };

            for model in models {
                match service.delete_model(&model).await {
                    Ok(()) => tracing::debug!("Deleted translation model {}", model.language),
                    Err(e) => tracing::warn!(
                        "Failed to delete translation model {}: {e}",
                        model.language
                    ),
                }
            }
        });
    }
}

impl<E: Send + Sync + 'static> QueueHandler<E> for Inner<E> {
    fn handle(&self, command: Command<E>) {
        let Some(session) = self.session.get() else {
            return;
        };

        match command {
            Command::Sweep => self.sweep(session),
            Command::Resolved {
                element,
                accessor,
                texts,
                faded,
            } => self.inject(session, element, accessor, texts, faded),
            Command::ModelReady(result) => self.on_model_ready(session, result),
        }
    }
}
