use log::info;

/// Reads step text aloud. Speech playback itself lives outside this crate;
/// implementations forward to whatever text-to-speech facility the host has.
pub trait Narrator: Send {
    /// Start reading `text`, replacing anything currently being read.
    fn speak(&mut self, text: &str);

    /// Stop any read-aloud in progress.
    fn cancel(&mut self);
}

/// Narrator that does nothing.
#[derive(Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&mut self, _text: &str) {}

    fn cancel(&mut self) {}
}

/// Narrator that writes to the log instead of speaking.
#[derive(Debug, Default)]
pub struct LogNarrator {
    speaking: bool,
}

impl LogNarrator {
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
}

impl Narrator for LogNarrator {
    fn speak(&mut self, text: &str) {
        info!("Reading aloud: {}", text);
        self.speaking = true;
    }

    fn cancel(&mut self) {
        if self.speaking {
            info!("Read-aloud cancelled");
        }
        self.speaking = false;
    }
}
