//! Settings logic for the lofi Pomodoro front-end.
//!
//! Everything in this crate root is free of rendering concerns: the Yew
//! components in the binary drive these types and render their state.

pub mod alarm;
pub mod config;
pub mod draft;
pub mod settings;
pub mod store;
pub mod utils;

pub use alarm::{AlarmSound, AudioPreview, HtmlAudioPreview, PreviewError};
pub use draft::{commit, reset_to_defaults, unhide_info, Confirm, SettingsDraft, Toast, WindowConfirm};
pub use settings::{Background, DurationField, GridSize, Settings, StepDirection};
pub use store::{AppStore, SettingsStore, StoreError, StoreSubscription};

/// Format a duration in seconds as `MM:SS`.
pub fn format_secs_to_minsec(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_secs_to_minsec(1500), "25:00");
        assert_eq!(format_secs_to_minsec(61), "01:01");
        assert_eq!(format_secs_to_minsec(5400), "90:00");
    }
}
