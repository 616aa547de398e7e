use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Key-press acknowledgement. Playing never blocks and never fails.
pub trait ClickSound {
    fn play(&self);
}

/// Which acknowledgement to use
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SoundKind {
    Silent,
    Bell,
    Wav,
}

/// Fallback when nothing else can play
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ClickSound for Silent {
    fn play(&self) {}
}

/// Rings the terminal bell
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl ClickSound for TerminalBell {
    fn play(&self) {
        let mut out = io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

#[cfg(feature = "audio")]
pub use wav::WavClick;

#[cfg(feature = "audio")]
mod wav {
    use std::io::Cursor;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use super::ClickSound;
    use crate::error::AppError;

    /// Plays a WAV file through the default output device
    pub struct WavClick {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        bytes: Vec<u8>,
    }

    impl WavClick {
        pub fn open(path: &Path) -> Result<Self, AppError> {
            let bytes = std::fs::read(path)?;
            // reject undecodable files up front rather than on every key
            Decoder::new(Cursor::new(bytes.clone()))
                .map_err(|e| AppError::Audio(e.to_string()))?;
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AppError::Audio(e.to_string()))?;

            Ok(Self {
                _stream: stream,
                handle,
                bytes,
            })
        }
    }

    impl ClickSound for WavClick {
        fn play(&self) {
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            let Ok(source) = Decoder::new(Cursor::new(self.bytes.clone())) else {
                return;
            };
            sink.append(source);
            sink.detach();
        }
    }
}

/// Build the configured sound, falling back to [`Silent`] on any failure.
pub fn from_config(kind: SoundKind, file: Option<&Path>) -> Box<dyn ClickSound> {
    match kind {
        SoundKind::Silent => Box::new(Silent),
        SoundKind::Bell => Box::new(TerminalBell),
        SoundKind::Wav => open_wav(file),
    }
}

#[cfg(feature = "audio")]
fn open_wav(file: Option<&Path>) -> Box<dyn ClickSound> {
    let Some(path) = file else {
        tracing::warn!("wav sound selected without a sound file, staying silent");
        return Box::new(Silent);
    };
    match WavClick::open(path) {
        Ok(click) => {
            tracing::info!(path = %path.display(), "loaded click sound");
            Box::new(click)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not load click sound, staying silent");
            Box::new(Silent)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_wav(file: Option<&Path>) -> Box<dyn ClickSound> {
    tracing::warn!(
        file = ?file,
        "built without the audio feature, staying silent"
    );
    Box::new(Silent)
}
