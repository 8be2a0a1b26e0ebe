//! Application-level configuration constants.

// Timer durations (seconds)
pub const DURATION_STEP_SECS: u32 = 60;
pub const MIN_DURATION_SECS: u32 = 60;
pub const MAX_DURATION_SECS: u32 = 3600;

// Alarm volume slider
pub const MIN_VOLUME: f64 = 0.0;
pub const MAX_VOLUME: f64 = 1.0;
pub const VOLUME_STEP: f64 = 0.1;

// Grid snapping slider; 0 means "no grid"
pub const GRID_STEP: u32 = 50;
pub const MAX_GRID_STEP: u32 = 150;

// Factory defaults
pub const DEFAULT_POMODORO_SECS: u32 = 1500;
pub const DEFAULT_SHORT_BREAK_SECS: u32 = 300;
pub const DEFAULT_LONG_BREAK_SECS: u32 = 900;
pub const DEFAULT_VOLUME: f64 = 0.7;
pub const DEFAULT_ALARM_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/cdn/master/build/testable-projects-fcc/audio/BeepSound.wav";

// Built-in alarm assets
pub const ARCADE_ALARM_PATH: &str = "/assets/music/arcade.wav";
pub const BELLS_ALARM_PATH: &str = "/assets/music/bells.wav";
pub const FLUTE_ALARM_PATH: &str = "/assets/music/flute.wav";
pub const PIANO_ALARM_PATH: &str = "/assets/music/piano.wav";

// Persistence
pub const STORAGE_KEY: &str = "lofi-pomodoro.state.v1";
pub const STORAGE_VERSION: u32 = 1;

// UI behavior
pub const TOAST_DURATION_MS: u32 = 3000;
pub const SETTINGS_SAVED_MESSAGE: &str = "Settings saved";
pub const INFO_VISIBLE_MESSAGE: &str = "Info now visible";
pub const RESET_CONFIRM_PROMPT: &str = "Are you sure you want to reset to defaults?";
