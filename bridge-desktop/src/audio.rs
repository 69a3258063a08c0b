//! Audio output using `rodio`

use bridge_traits::{
    error::{BridgeError, Result},
    playback::AudioDevice,
};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type FileSource = Decoder<BufReader<File>>;

/// Default-output-device player backed by a `rodio::Sink`
///
/// `load` decodes the file header up front so unreadable or unsupported
/// files fail there, and `play` hands the decoder to a fresh sink. A new sink
/// per stream keeps exactly one stream audible at a time.
pub struct RodioAudioDevice {
    // Dropping the stream closes the output device.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    pending: Option<(PathBuf, FileSource)>,
}

impl RodioAudioDevice {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            BridgeError::NotAvailable(format!("No audio output device: {}", e))
        })?;
        debug!("Opened default audio output");

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            pending: None,
        })
    }
}

impl AudioDevice for RodioAudioDevice {
    fn load(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| BridgeError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = ?path, "Loaded audio file");
        self.pending = Some((path.to_path_buf(), decoder));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let (path, source) = self
            .pending
            .take()
            .ok_or(BridgeError::NothingLoaded)?;

        let sink = Sink::try_new(&self.handle).map_err(|e| {
            warn!(path = ?path, error = %e, "Output device rejected stream");
            BridgeError::OperationFailed(format!("Cannot start playback: {}", e))
        })?;
        sink.append(source);
        sink.play();

        if let Some(previous) = self.sink.replace(sink) {
            previous.stop();
        }
        debug!(path = ?path, "Playback started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("Playback stopped");
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}
