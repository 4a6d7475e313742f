//! Silence-aware collection of speech-to-text transcripts.
//!
//! The recognition substrate itself is external; it feeds this module a
//! stream of transcript events. Capture ends on a final transcript, on an
//! explicit stop, or after a fixed silence window with no new partials. The
//! window timer resets on every partial, and whichever way capture ends, the
//! last transcript observed is retained for grading.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use talk100_core::model::AppSettings;

/// One event from the speech-recognition substrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Interim transcript; replaces the previous one.
    Partial(String),
    /// Recognition finished with a final transcript.
    Final(String),
    /// The user stopped listening.
    Stopped,
}

/// Why capture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEnd {
    FinalResult,
    Stopped,
    Silence,
    /// Event source dropped without a terminal event.
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedTranscript {
    pub text: String,
    pub end: CaptureEnd,
}

/// Collects transcript events until the utterance is over.
#[derive(Debug, Clone, Copy)]
pub struct VoiceCapture {
    silence_window: Duration,
}

impl VoiceCapture {
    #[must_use]
    pub fn new(silence_window: Duration) -> Self {
        Self { silence_window }
    }

    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(Duration::from_secs(u64::from(settings.voice_silence_secs())))
    }

    /// Consume events until a terminal condition, returning the last
    /// transcript observed.
    pub async fn capture(&self, rx: &mut mpsc::Receiver<TranscriptEvent>) -> CapturedTranscript {
        let mut last = String::new();
        loop {
            match timeout(self.silence_window, rx.recv()).await {
                Err(_) => {
                    return CapturedTranscript {
                        text: last,
                        end: CaptureEnd::Silence,
                    };
                }
                Ok(None) => {
                    return CapturedTranscript {
                        text: last,
                        end: CaptureEnd::Disconnected,
                    };
                }
                Ok(Some(TranscriptEvent::Partial(text))) => last = text,
                Ok(Some(TranscriptEvent::Final(text))) => {
                    return CapturedTranscript {
                        text,
                        end: CaptureEnd::FinalResult,
                    };
                }
                Ok(Some(TranscriptEvent::Stopped)) => {
                    return CapturedTranscript {
                        text: last,
                        end: CaptureEnd::Stopped,
                    };
                }
            }
        }
    }
}
