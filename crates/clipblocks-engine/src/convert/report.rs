use serde::Serialize;

/// What happened during one conversion call.
///
/// Counts cover top-level blocks only: `blocks_converted + blocks_skipped`
/// always equals `blocks_input`. Children that fail are visible through
/// `degraded` and `errors` but are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConversionReport {
    pub blocks_input: usize,
    pub blocks_converted: usize,
    pub blocks_skipped: usize,
    /// Lossy conversions, each listed once.
    pub degraded: Vec<String>,
    pub errors: Vec<String>,
}

impl ConversionReport {
    pub fn new(blocks_input: usize) -> Self {
        Self {
            blocks_input,
            ..Default::default()
        }
    }

    /// Records a lossy conversion unless the same message is already present.
    pub fn degrade(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.degraded.contains(&message) {
            self.degraded.push(message);
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Counts one top-level block as converted or skipped.
    pub fn count(&mut self, converted: bool) {
        if converted {
            self.blocks_converted += 1;
        } else {
            self.blocks_skipped += 1;
        }
    }

    /// True when nothing was lost.
    pub fn is_clean(&self) -> bool {
        self.blocks_skipped == 0 && self.degraded.is_empty() && self.errors.is_empty()
    }
}
