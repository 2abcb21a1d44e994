use std::io::{self, Write};

use log::warn;
use thiserror::Error;

use crate::config::SoundMode;
use crate::game::RoundEvent;

const BELL: &[u8] = b"\x07";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to ring terminal bell: {0}")]
    Io(#[from] io::Error),
}

/// Receives the per-tick round events. Implementations may do nothing.
pub trait AudioNotifier {
    fn notify(&mut self, event: RoundEvent);
}

/// Notifier used when sound is disabled or unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl AudioNotifier for SilentNotifier {
    fn notify(&mut self, _event: RoundEvent) {}
}

/// Rings the terminal bell on every event.
///
/// The first write failure turns the notifier silent for the rest of the
/// session.
#[derive(Debug)]
pub struct BellNotifier<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> BellNotifier<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out, enabled: true }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn ring(&mut self) -> Result<(), AudioError> {
        self.out.write_all(BELL)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> AudioNotifier for BellNotifier<W> {
    fn notify(&mut self, event: RoundEvent) {
        if !self.enabled {
            return;
        }
        if let Err(error) = self.ring() {
            warn!("{error}; continuing without sound after {event:?}");
            self.enabled = false;
        }
    }
}

/// Builds the notifier for the configured sound mode.
#[must_use]
pub fn notifier_for(mode: SoundMode) -> Box<dyn AudioNotifier> {
    match mode {
        SoundMode::Bell => Box::new(BellNotifier::new(io::stdout())),
        SoundMode::Off => Box::new(SilentNotifier),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use crate::game::RoundEvent;

    use super::{AudioNotifier, BellNotifier};

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bell_is_written_per_event() {
        let mut notifier = BellNotifier::new(Vec::new());

        notifier.notify(RoundEvent::Eaten);
        notifier.notify(RoundEvent::Crashed);

        assert_eq!(notifier.out, b"\x07\x07");
    }

    #[test]
    fn write_failure_degrades_to_silence() {
        let mut notifier = BellNotifier::new(BrokenPipe);

        notifier.notify(RoundEvent::Eaten);
        assert!(!notifier.is_enabled());

        // Further events are swallowed without touching the writer.
        notifier.notify(RoundEvent::Crashed);
        assert!(!notifier.is_enabled());
    }
}
