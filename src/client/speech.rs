//! Device speech capabilities used by the conversation.
//!
//! Speech-to-text and text-to-speech are platform services that may be
//! missing. The conversation only talks to them through these traits, so it
//! can run against the `Unavailable*` implementations or test doubles.

use crate::client::Language;
use tokio::sync::mpsc::UnboundedSender;

/// Identifies one utterance in the events a synthesizer emits.
pub type UtteranceId = u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech capability is not available on this device")]
    Unavailable,
    #[error("Speech device error: {0}")]
    Device(String),
}

/// Options for starting speech capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub language: Language,
    /// Keep listening across pauses until stopped
    pub continuous: bool,
}

/// Speech-to-text capture.
pub trait SpeechRecognizer: Send {
    fn is_available(&self) -> bool;

    fn is_listening(&self) -> bool;

    fn start_capture(&mut self, options: CaptureOptions) -> Result<(), SpeechError>;

    /// Stops capture. Stopping while not listening does nothing.
    fn stop_capture(&mut self) -> Result<(), SpeechError>;

    /// Text recognized since the last reset, interim results included.
    fn transcript(&self) -> String;

    fn reset_transcript(&mut self);
}

/// A voice offered by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// Locale tag, e.g. `hi-IN`
    pub locale: String,
}

/// A single unit of speech output.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    /// `None` leaves the choice to the platform default
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
}

/// Playback notifications, delivered on the sink given to the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started(UtteranceId),
    Ended(UtteranceId),
    Error(UtteranceId, String),
}

/// Text-to-speech output.
pub trait SpeechSynthesizer: Send {
    fn is_available(&self) -> bool;

    fn voices(&self) -> Vec<Voice>;

    fn is_speaking(&self) -> bool;

    /// Registers where start, end and error events are sent.
    fn set_event_sink(&mut self, sink: UnboundedSender<SpeechEvent>);

    fn speak(&mut self, utterance: Utterance) -> Result<UtteranceId, SpeechError>;

    /// Stops the current utterance, if any.
    fn cancel(&mut self);
}

/// Recognizer for devices without speech input.
#[derive(Debug, Default)]
pub struct UnavailableRecognizer;

impl SpeechRecognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn is_listening(&self) -> bool {
        false
    }

    fn start_capture(&mut self, _options: CaptureOptions) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn stop_capture(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn transcript(&self) -> String {
        String::new()
    }

    fn reset_transcript(&mut self) {}
}

/// Synthesizer for devices without speech output.
#[derive(Debug, Default)]
pub struct UnavailableSynthesizer;

impl SpeechSynthesizer for UnavailableSynthesizer {
    fn is_available(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn set_event_sink(&mut self, _sink: UnboundedSender<SpeechEvent>) {}

    fn speak(&mut self, _utterance: Utterance) -> Result<UtteranceId, SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn cancel(&mut self) {}
}
