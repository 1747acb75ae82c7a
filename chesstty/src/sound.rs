//! Terminal bell on each committed move, toggled with `d`.

use std::io::Write;

#[derive(Debug, Clone)]
pub struct Sound {
    enabled: bool,
    pending: u32,
}

impl Default for Sound {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Sound {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.pending = 0;
        tracing::debug!(enabled = self.enabled, "Sound toggled");
    }

    /// Queue a bell if sound is on.
    pub fn move_played(&mut self) {
        if self.enabled {
            self.pending += 1;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Write queued bells, collapsed into one.
    pub fn ring<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        if self.pending == 0 {
            return Ok(());
        }
        self.pending = 0;
        out.write_all(b"\x07")?;
        out.flush()
    }
}
