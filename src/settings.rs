//! Committed timer configuration and the small value types it is built from.

use crate::alarm::AlarmSound;
use crate::config::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widget grid snapping. `Step(n)` snaps widgets to an `n x n` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<[u32; 2]>", into = "Option<[u32; 2]>")]
pub enum GridSize {
    #[default]
    Unset,
    Step(u32),
}

impl GridSize {
    /// Map a grid slider value onto a grid size. Zero is the "no grid" position.
    pub fn from_slider(step: u32) -> Self {
        if step == 0 {
            GridSize::Unset
        } else {
            GridSize::Step(step)
        }
    }

    /// Slider position for this grid size.
    pub fn slider_value(self) -> u32 {
        match self {
            GridSize::Unset => 0,
            GridSize::Step(step) => step,
        }
    }

    pub fn as_pair(self) -> Option<(u32, u32)> {
        match self {
            GridSize::Unset => None,
            GridSize::Step(step) => Some((step, step)),
        }
    }
}

impl From<Option<[u32; 2]>> for GridSize {
    fn from(value: Option<[u32; 2]>) -> Self {
        match value {
            Some([step, _]) => GridSize::from_slider(step),
            None => GridSize::Unset,
        }
    }
}

impl From<GridSize> for Option<[u32; 2]> {
    fn from(value: GridSize) -> Self {
        value.as_pair().map(|(x, y)| [x, y])
    }
}

/// One of the three configurable timer lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationField {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl DurationField {
    pub const ALL: [DurationField; 3] = [
        DurationField::Pomodoro,
        DurationField::ShortBreak,
        DurationField::LongBreak,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DurationField::Pomodoro => "Pomodoro",
            DurationField::ShortBreak => "Short Break",
            DurationField::LongBreak => "Long Break",
        }
    }

    /// DOM id prefix used by the stepper buttons of this field.
    pub fn id_prefix(self) -> &'static str {
        match self {
            DurationField::Pomodoro => "session",
            DurationField::ShortBreak => "short-break",
            DurationField::LongBreak => "long-break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Decrement,
    Increment,
}

/// Selectable page backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    City,
    Japan,
    LofiGirl,
}

impl Background {
    pub const ALL: [Background; 3] = [Background::City, Background::Japan, Background::LofiGirl];

    pub fn title(self) -> &'static str {
        match self {
            Background::City => "City",
            Background::Japan => "Japan",
            Background::LofiGirl => "Lofi Girl",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Background::City => "bg-city",
            Background::Japan => "bg-japan",
            Background::LofiGirl => "bg-lofigirl",
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The committed, application-wide timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub pomodoro_length: u32,
    pub short_break_length: u32,
    pub long_break_length: u32,
    pub audio_volume: f64,
    pub alarm: AlarmSound,
    pub grid: GridSize,
    pub widgets_locked: bool,
}

impl Settings {
    pub fn duration(&self, field: DurationField) -> u32 {
        match field {
            DurationField::Pomodoro => self.pomodoro_length,
            DurationField::ShortBreak => self.short_break_length,
            DurationField::LongBreak => self.long_break_length,
        }
    }

    pub fn duration_mut(&mut self, field: DurationField) -> &mut u32 {
        match field {
            DurationField::Pomodoro => &mut self.pomodoro_length,
            DurationField::ShortBreak => &mut self.short_break_length,
            DurationField::LongBreak => &mut self.long_break_length,
        }
    }
}

/// Factory defaults.
impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_length: DEFAULT_POMODORO_SECS,
            short_break_length: DEFAULT_SHORT_BREAK_SECS,
            long_break_length: DEFAULT_LONG_BREAK_SECS,
            audio_volume: DEFAULT_VOLUME,
            alarm: AlarmSound::Beep,
            grid: GridSize::Unset,
            widgets_locked: false,
        }
    }
}
