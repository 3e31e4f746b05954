//! Speech output through the `espeak-ng` program.

use crate::client::speech::{
    SpeechError, SpeechEvent, SpeechSynthesizer, Utterance, UtteranceId, Voice,
};
use crate::client::Language;
use std::process::{Command as StdCommand, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tracing::{debug, warn};

const DEFAULT_PROGRAM: &str = "espeak-ng";
/// espeak-ng speaking rate in words per minute at `rate == 1.0`.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
/// espeak-ng pitch (0-99) at `pitch == 1.0`.
const BASE_PITCH: f32 = 50.0;

struct Playback {
    id: UtteranceId,
    stop: oneshot::Sender<()>,
    finished: Arc<AtomicBool>,
}

/// Synthesizer that runs one `espeak-ng` child process per utterance.
///
/// Starting a new utterance kills the previous child, so at most one plays.
/// `speak` must be called from within a Tokio runtime.
pub struct EspeakSynthesizer {
    program: String,
    available: bool,
    next_id: UtteranceId,
    current: Option<Playback>,
    sink: Option<UnboundedSender<SpeechEvent>>,
}

impl EspeakSynthesizer {
    /// Probes for `espeak-ng` on the `PATH`.
    pub fn detect() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    pub fn with_program(program: &str) -> Self {
        let available = StdCommand::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !available {
            debug!("{} not found, speech output disabled", program);
        }

        EspeakSynthesizer {
            program: program.to_string(),
            available,
            next_id: 0,
            current: None,
            sink: None,
        }
    }

    /// espeak-ng voice name for a locale tag.
    pub fn voice_name(language: Language) -> &'static str {
        match language {
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Kannada => "kn",
            Language::English => "en",
        }
    }

    fn emit(sink: &Option<UnboundedSender<SpeechEvent>>, event: SpeechEvent) {
        if let Some(sink) = sink {
            let _ = sink.send(event);
        }
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        if !self.available {
            return Vec::new();
        }
        Language::ALL
            .into_iter()
            .map(|lang| Voice {
                name: Self::voice_name(lang).to_string(),
                locale: lang.tag().to_string(),
            })
            .collect()
    }

    fn is_speaking(&self) -> bool {
        self.current
            .as_ref()
            .map(|p| !p.finished.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn set_event_sink(&mut self, sink: UnboundedSender<SpeechEvent>) {
        self.sink = Some(sink);
    }

    fn speak(&mut self, utterance: Utterance) -> Result<UtteranceId, SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechError::Device(e.to_string()))?;

        self.cancel();

        let mut command = Command::new(&self.program);
        if let Some(voice) = &utterance.voice {
            command.arg("-v").arg(&voice.name);
        }
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        let pitch = (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        command
            .arg("-s")
            .arg(words_per_minute.to_string())
            .arg("-p")
            .arg(pitch.to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| SpeechError::Device(e.to_string()))?;

        self.next_id += 1;
        let id = self.next_id;
        let (stop_tx, stop_rx) = oneshot::channel();
        let finished = Arc::new(AtomicBool::new(false));
        let sink = self.sink.clone();
        let done = Arc::clone(&finished);
        let text = utterance.text;

        Self::emit(&sink, SpeechEvent::Started(id));
        runtime.spawn(async move {
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    warn!("Failed to pass text to speech synthesizer: {}", e);
                }
            }

            let event = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => SpeechEvent::Ended(id),
                    Ok(status) => {
                        SpeechEvent::Error(id, format!("synthesizer exited with {status}"))
                    }
                    Err(e) => SpeechEvent::Error(id, e.to_string()),
                },
                _ = stop_rx => {
                    let _ = child.kill().await;
                    SpeechEvent::Ended(id)
                }
            };
            done.store(true, Ordering::SeqCst);
            Self::emit(&sink, event);
        });

        self.current = Some(Playback {
            id,
            stop: stop_tx,
            finished,
        });
        Ok(id)
    }

    fn cancel(&mut self) {
        if let Some(playback) = self.current.take() {
            if !playback.finished.load(Ordering::SeqCst) {
                debug!("Cancelling utterance {}", playback.id);
                let _ = playback.stop.send(());
            }
        }
    }
}
