//! Warning and info notifications.
//!
//! Anything on the vessel may raise a warning at any time, often every tick
//! for as long as a condition holds. [`VesselState::show_warning`] records
//! the text immediately and queues at most one voice callout; the
//! `ShowWarningPostStep` then decides once per tick whether the queued
//! callout plays, collapsing repeats to a human pace. Info messages play at
//! once.

use std::collections::VecDeque;

use xrvessel_logic::constants::notify::MAX_TEXT_LINES;

use crate::sound::{files, Playback, SoundSlot, SoundType};
use crate::vessel::VesselState;

/// A voice callout waiting for the warning channel.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningQueueEntry {
    pub sound_file: String,
    pub sound_type: SoundType,
    pub message: String,
    /// Plays even over a callout in progress and skips repeat suppression.
    pub forced: bool,
}

/// One line of the info/warning text panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    /// Warnings are highlighted, info is not.
    pub highlighted: bool,
}

/// Most recent text lines, oldest first.
#[derive(Debug, Clone, Default)]
pub struct TextLines {
    lines: VecDeque<TextLine>,
}

impl TextLines {
    /// Add a message; `&` starts a new line.
    pub fn add(&mut self, message: &str, highlighted: bool) {
        for part in message.split('&') {
            if self.lines.len() == MAX_TEXT_LINES {
                self.lines.pop_front();
            }
            self.lines.push_back(TextLine {
                text: part.to_string(),
                highlighted,
            });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&TextLine> {
        self.lines.back()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|l| l.text == text)
    }

    /// Number of lines exactly equal to `text`.
    pub fn count(&self, text: &str) -> usize {
        self.lines.iter().filter(|l| l.text == text).count()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Notification state owned by the vessel.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    pub pending: Option<WarningQueueEntry>,
    /// Last warning text shown; an identical warning adds no new line.
    pub last_warning_message: String,
    pub text: TextLines,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the queued callout.
    pub fn take_pending(&mut self) -> Option<WarningQueueEntry> {
        self.pending.take()
    }
}

impl VesselState {
    /// Show a warning and queue its callout. Ignored once crashed.
    ///
    /// The text is added unless it repeats the last warning. A new callout
    /// replaces any still-queued one.
    pub fn show_warning(&mut self, sound_file: Option<&str>, sound_type: SoundType, message: &str, force: bool) {
        if self.crash.is_crashed {
            return;
        }
        if !message.is_empty() && self.notifier.last_warning_message != message {
            log::info!("warning: {}", message.replace('&', " "));
            self.notifier.text.add(message, true);
            self.notifier.last_warning_message = message.to_string();
        }
        if let Some(file) = sound_file {
            self.notifier.pending = Some(WarningQueueEntry {
                sound_file: file.to_string(),
                sound_type,
                message: message.to_string(),
                forced: force,
            });
        }
    }

    /// Show an info message and play its callout right away. Ignored once
    /// crashed. Clears the last warning so that warning can show again.
    pub fn show_info(&mut self, sound_file: Option<&str>, sound_type: SoundType, message: &str) {
        if self.crash.is_crashed {
            return;
        }
        if !message.is_empty() {
            log::debug!("info: {}", message.replace('&', " "));
            self.notifier.text.add(message, false);
        }
        if let Some(file) = sound_file.filter(|f| !f.is_empty()) {
            self.sound.load_sound(SoundSlot::Info, file, Playback::Radio);
            self.sound.play_sound(SoundSlot::Info, sound_type, 255, false);
        }
        self.notifier.last_warning_message.clear();
    }

    pub fn play_error_beep(&mut self) {
        self.sound.play_sound(SoundSlot::Error1, SoundType::Other, 255, false);
    }

    /// Load the fixed-slot sounds. Voice slots are loaded on demand.
    pub(crate) fn load_standard_sounds(&mut self) {
        self.sound.load_sound(SoundSlot::Error1, files::ERROR1, Playback::InternalOnly);
        self.sound.load_sound(SoundSlot::WarningBeep, files::WARNING_BEEP, Playback::InternalOnly);
        self.sound.load_sound(SoundSlot::DoorThump, files::DOOR_THUMP, Playback::Global);
        self.sound.load_sound(SoundSlot::Crash, files::CRASH, Playback::Global);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_split_on_ampersand() {
        let mut lines = TextLines::default();
        lines.add("Welcome aboard, Commander!&All systems nominal.", false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.last().map(|l| l.text.as_str()), Some("All systems nominal."));
    }

    #[test]
    fn test_text_lines_bounded() {
        let mut lines = TextLines::default();
        for i in 0..100 {
            lines.add(&format!("line {}", i), false);
        }
        assert_eq!(lines.len(), MAX_TEXT_LINES);
        assert!(!lines.contains("line 0"));
        assert!(lines.contains("line 99"));
    }
}
