use std::fmt;

/// Errors surfaced by the synth.
///
/// Only acquiring an audio context can fail; every other operation is
/// infallible (parameter updates without a live filter are no-ops).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// The host denied or failed to provide an audio output context.
    AudioBackendUnavailable { reason: String },
}

impl SynthError {
    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        SynthError::AudioBackendUnavailable {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::AudioBackendUnavailable { reason } => {
                write!(f, "Unable to start audio: {reason}")
            }
        }
    }
}

impl std::error::Error for SynthError {}
