//! Audio output bridge.
//!
//! The playback sequencer drives exactly one stream at a time through this
//! trait. Hosts provide the concrete device (rodio on desktop, a recording
//! fake in tests).

use crate::error::Result;
use std::path::Path;

/// Single-stream audio output capability.
///
/// The contract mirrors a classic "music channel" mixer:
///
/// - `load` opens and prepares a file, replacing anything previously loaded
/// - `play` starts the loaded stream from the beginning
/// - `stop` halts output; it never fails
/// - `is_busy` reports whether audio is still being produced
///
/// Callers are expected to `stop` a busy device before loading a new file;
/// the device itself does not enforce it.
///
/// # Errors
///
/// `load` fails when the file cannot be opened or decoded, `play` when
/// nothing is loaded or the output device rejects the stream. Both use
/// [`BridgeError`](crate::error::BridgeError) so the message can be reported
/// as-is.
pub trait AudioDevice {
    /// Open `path` and make it the current stream.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start playing the current stream.
    fn play(&mut self) -> Result<()>;

    /// Stop output. Safe to call when idle.
    fn stop(&mut self);

    /// `true` while the device is producing audio.
    fn is_busy(&self) -> bool;
}

impl<D: AudioDevice + ?Sized> AudioDevice for Box<D> {
    fn load(&mut self, path: &Path) -> Result<()> {
        (**self).load(path)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}
