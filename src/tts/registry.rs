//! Engine registry: one-time capability probing and active-engine selection.
//!
//! Built once at process start and read-only afterwards, so request handlers
//! share it behind an `Arc` without locking.
//!
//! # Selection policy
//!
//! 1. An explicit [`BackendPreference::Engine`] wins if that engine probed as
//!    available.
//! 2. Otherwise the first available engine in [`EngineName::ALL`] order.
//! 3. Otherwise no active engine: the registry is degraded and requests that
//!    do not name an engine fail with `NoEngineAvailable`.

use std::sync::Arc;

use crate::config::{BackendPreference, TtsConfig};
use crate::tts::engine::{EngineName, SpeechEngine};
use crate::tts::espeak::EspeakEngine;
use crate::tts::neural::NeuralEngine;
use crate::tts::say::SayEngine;

// ---------------------------------------------------------------------------
// EngineDescriptor
// ---------------------------------------------------------------------------

/// A known engine together with its startup probe outcome.
#[derive(Clone)]
pub struct EngineDescriptor {
    pub name: EngineName,
    pub available: bool,
    pub engine: Arc<dyn SpeechEngine>,
}

impl std::fmt::Debug for EngineDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineDescriptor")
            .field("name", &self.name)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EngineRegistry
// ---------------------------------------------------------------------------

/// Probed engines plus the selected default.
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    /// Every registered engine, in probe order.
    engines: Vec<EngineDescriptor>,
    /// Always the name of an available entry of `engines`, when set.
    active: Option<EngineName>,
}

/// The production engine set, in probe order.
pub fn default_engines(config: &TtsConfig) -> Vec<Arc<dyn SpeechEngine>> {
    vec![
        Arc::new(NeuralEngine::voxcpm(config)),
        Arc::new(NeuralEngine::index_tts2(config)),
        Arc::new(EspeakEngine::from_config(config)),
        Arc::new(SayEngine::from_config(config)),
    ]
}

impl EngineRegistry {
    /// Probe every engine once, in the given order, and select the active
    /// engine.
    ///
    /// A failing probe only marks that engine unavailable; it never aborts
    /// construction.  A later duplicate of an already registered name is
    /// ignored.
    pub async fn probe(
        engines: Vec<Arc<dyn SpeechEngine>>,
        preference: BackendPreference,
    ) -> Self {
        let mut descriptors: Vec<EngineDescriptor> = Vec::with_capacity(engines.len());

        for engine in engines {
            let name = engine.name();
            if descriptors.iter().any(|d| d.name == name) {
                log::warn!("Engine {name} registered twice; keeping the first");
                continue;
            }
            let available = match engine.probe().await {
                Ok(()) => {
                    log::info!("{name} available");
                    true
                }
                Err(e) => {
                    log::warn!("{name} not available: {e}");
                    false
                }
            };
            descriptors.push(EngineDescriptor {
                name,
                available,
                engine,
            });
        }

        Self::from_descriptors(descriptors, preference)
    }

    /// Build from already-probed descriptors.
    pub fn from_descriptors(
        descriptors: Vec<EngineDescriptor>,
        preference: BackendPreference,
    ) -> Self {
        let available: Vec<EngineName> = descriptors
            .iter()
            .filter(|d| d.available)
            .map(|d| d.name)
            .collect();
        let active = select_active(&available, preference);

        match active {
            Some(name) => log::info!("Active TTS engine: {name}"),
            None => log::error!("No TTS engine available!"),
        }
        log::info!(
            "Available TTS engines: [{}]",
            available.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", ")
        );

        Self {
            engines: descriptors,
            active,
        }
    }

    /// The default engine, or `None` when degraded.
    pub fn active(&self) -> Option<EngineName> {
        self.active
    }

    /// Names of the engines that probed as available, in probe order.
    pub fn available(&self) -> Vec<EngineName> {
        self.engines
            .iter()
            .filter(|d| d.available)
            .map(|d| d.name)
            .collect()
    }

    pub fn is_available(&self, name: EngineName) -> bool {
        self.descriptor(name).is_some_and(|d| d.available)
    }

    pub fn descriptor(&self, name: EngineName) -> Option<&EngineDescriptor> {
        self.engines.iter().find(|d| d.name == name)
    }

    /// The invocation handle for `name`, available or not.
    pub fn engine(&self, name: EngineName) -> Option<&Arc<dyn SpeechEngine>> {
        self.descriptor(name).map(|d| &d.engine)
    }

    pub fn descriptors(&self) -> &[EngineDescriptor] {
        &self.engines
    }
}

/// Apply the selection policy to the available set.
pub(crate) fn select_active(
    available: &[EngineName],
    preference: BackendPreference,
) -> Option<EngineName> {
    if let BackendPreference::Engine(preferred) = preference {
        if available.contains(&preferred) {
            return Some(preferred);
        }
        log::warn!("Preferred TTS backend {preferred} is not available; using priority order");
    }
    EngineName::ALL
        .into_iter()
        .find(|name| available.contains(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
