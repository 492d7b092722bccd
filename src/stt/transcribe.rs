//! Whisper inference parameters.
//!
//! [`TranscribeParams`] is fixed when the engine loads.  The language hint is
//! not part of it: it arrives with each request.

use crate::config::AsrConfig;

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Mirrors `whisper_rs::SamplingStrategy` but is owned and `Clone`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Single-pass decoding.
    Greedy {
        /// Candidates evaluated per step.  1 is fastest.
        best_of: i32,
    },
    /// Beam-search decoding.
    BeamSearch {
        beam_size: i32,
        /// Patience factor; 1.0 is standard beam search.
        patience: f32,
    },
}

impl SamplingStrategy {
    /// Greedy for `beam_size <= 1`, standard beam search above that.
    pub fn from_beam_size(beam_size: i32) -> Self {
        if beam_size > 1 {
            Self::BeamSearch {
                beam_size,
                patience: 1.0,
            }
        } else {
            Self::default()
        }
    }
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Parameters for every Whisper run of a loaded engine.
///
/// Inference always runs in 32-bit float; only GPU offload is selectable.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeParams {
    pub strategy: SamplingStrategy,
    /// CPU threads handed to Whisper.
    pub n_threads: i32,
    /// Offload to the GPU when whisper.cpp was built with GPU support.
    pub use_gpu: bool,
    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            use_gpu: false,
            suppress_progress: true,
        }
    }
}

impl TranscribeParams {
    /// `device == "cpu"` (any case) disables GPU offload; a non-positive
    /// `n_threads` picks [`optimal_threads`].
    pub fn from_config(config: &AsrConfig) -> Self {
        Self {
            strategy: SamplingStrategy::from_beam_size(config.beam_size),
            n_threads: if config.n_threads > 0 {
                config.n_threads
            } else {
                optimal_threads()
            },
            use_gpu: !config.device.eq_ignore_ascii_case("cpu"),
            ..Self::default()
        }
    }
}

/// Available CPU parallelism, capped at 8 where Whisper stops scaling.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
