use crate::client::gateway::{GatewayClient, GatewayReply, QueryRequest};
use crate::client::speech::{
    CaptureOptions, SpeechEvent, SpeechRecognizer, SpeechSynthesizer, Utterance, UtteranceId,
};
use crate::client::{sanitize, ChatMessage, Language, Transcript};
use crate::constants::{CONNECTION_ERROR_REPLY, FALLBACK_REPLY, SPEECH_PITCH, SPEECH_RATE};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, error, warn};

/// Result of toggling the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrophoneState {
    Listening,
    Stopped,
    /// No recognizer on this device; nothing changed
    Unavailable,
}

/// A chat session with the health assistant.
///
/// Owns the transcript, the input line and the speech state. Each question
/// is sent on its own; the gateway sees no history.
pub struct Conversation {
    gateway: Box<dyn GatewayClient>,
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    speech_events: UnboundedReceiver<SpeechEvent>,
    transcript: Transcript,
    input: String,
    language: Language,
    muted: bool,
    current_utterance: Option<UtteranceId>,
    speaking: bool,
}

impl Conversation {
    pub fn new(
        gateway: Box<dyn GatewayClient>,
        recognizer: Box<dyn SpeechRecognizer>,
        mut synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        let (sink, speech_events) = unbounded_channel();
        synthesizer.set_event_sink(sink);
        Self {
            gateway,
            recognizer,
            synthesizer,
            speech_events,
            transcript: Transcript::new(),
            input: String::new(),
            language: Language::default(),
            muted: false,
            current_utterance: None,
            speaking: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Applies to the next request, capture and utterance.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// While muted, replies are not spoken automatically.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_listening(&self) -> bool {
        self.recognizer.is_listening()
    }

    pub fn is_speaking(&mut self) -> bool {
        self.poll_speech_events();
        self.speaking
    }

    /// Sends a question and records the answer.
    ///
    /// Blank text is ignored: nothing is sent and the transcript is left
    /// alone. Failures never escape; they end up as an assistant message.
    /// Returns the assistant message that was added, if any.
    pub async fn submit(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));
        self.input.clear();
        self.recognizer.reset_transcript();

        let request = QueryRequest {
            query: text.to_string(),
            lang: self.language,
        };
        let (reply, speak) = match self.gateway.ask(&request).await {
            Ok(GatewayReply::Reply(reply)) if !reply.is_empty() => (sanitize(&reply), true),
            Ok(GatewayReply::Error(message)) => {
                warn!("Gateway reported an error: {}", message);
                (sanitize(FALLBACK_REPLY), true)
            }
            Ok(GatewayReply::Reply(_)) | Ok(GatewayReply::Empty) => {
                (sanitize(FALLBACK_REPLY), true)
            }
            Err(e) => {
                error!("Failed to reach gateway: {}", e);
                (CONNECTION_ERROR_REPLY.to_string(), false)
            }
        };

        if speak && !self.muted {
            self.speak(&reply);
        }
        Some(self.transcript.push(ChatMessage::assistant(&reply)))
    }

    /// Submits the input line, or the live speech transcript when the line is empty.
    pub async fn submit_input(&mut self) -> Option<&ChatMessage> {
        let text = if self.input.trim().is_empty() {
            self.recognizer.transcript()
        } else {
            self.input.clone()
        };
        self.submit(&text).await
    }

    /// Starts or stops speech capture.
    ///
    /// Stopping moves the captured text into the input line without
    /// submitting it.
    pub fn toggle_microphone(&mut self) -> MicrophoneState {
        if self.recognizer.is_listening() {
            self.stop_microphone();
            return MicrophoneState::Stopped;
        }

        if !self.recognizer.is_available() {
            return MicrophoneState::Unavailable;
        }
        self.recognizer.reset_transcript();
        let options = CaptureOptions {
            language: self.language,
            continuous: true,
        };
        match self.recognizer.start_capture(options) {
            Ok(()) => MicrophoneState::Listening,
            Err(e) => {
                warn!("Could not start speech capture: {}", e);
                MicrophoneState::Unavailable
            }
        }
    }

    /// Stops capture and keeps what was heard. Does nothing when not listening.
    pub fn stop_microphone(&mut self) {
        if !self.recognizer.is_listening() {
            return;
        }
        if let Err(e) = self.recognizer.stop_capture() {
            warn!("Could not stop speech capture: {}", e);
        }
        self.input = self.recognizer.transcript();
        self.recognizer.reset_transcript();
    }

    /// Mirrors interim recognition results into the input line while listening.
    pub fn poll_transcript(&mut self) -> &str {
        if self.recognizer.is_listening() {
            self.input = self.recognizer.transcript();
        }
        &self.input
    }

    /// Speaks `text` after stripping markup, replacing anything already playing.
    ///
    /// Uses a voice matching the selected language when the device has one.
    /// Does nothing on devices without speech output.
    pub fn speak(&mut self, text: &str) {
        if !self.synthesizer.is_available() {
            return;
        }
        self.cancel_speech();

        let locale = self.language.tag().to_string();
        let voice = self
            .synthesizer
            .voices()
            .into_iter()
            .find(|v| v.locale == locale);
        let utterance = Utterance {
            text: sanitize(text),
            locale,
            voice,
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
        };

        match self.synthesizer.speak(utterance) {
            Ok(id) => {
                debug!("Speaking utterance {}", id);
                self.current_utterance = Some(id);
            }
            Err(e) => warn!("Speech output failed: {}", e),
        }
    }

    /// Replays the latest assistant message.
    pub fn speak_last_reply(&mut self) -> bool {
        match self.transcript.last_assistant().map(|m| m.text.clone()) {
            Some(text) => {
                self.speak(&text);
                true
            }
            None => false,
        }
    }

    /// Mutes automatic replies and silences the current utterance.
    pub fn mute(&mut self) {
        self.muted = true;
        self.cancel_speech();
    }

    fn cancel_speech(&mut self) {
        if self.synthesizer.is_speaking() {
            self.synthesizer.cancel();
        }
        self.current_utterance = None;
        self.speaking = false;
    }

    /// Applies pending start/end/error notifications from the synthesizer.
    pub fn poll_speech_events(&mut self) {
        while let Ok(event) = self.speech_events.try_recv() {
            match event {
                SpeechEvent::Started(id) => {
                    if self.current_utterance == Some(id) {
                        self.speaking = true;
                    }
                }
                SpeechEvent::Ended(id) => {
                    if self.current_utterance == Some(id) {
                        self.speaking = false;
                    }
                }
                SpeechEvent::Error(id, message) => {
                    warn!("Utterance {} failed: {}", id, message);
                    if self.current_utterance == Some(id) {
                        self.speaking = false;
                    }
                }
            }
        }
    }
}
