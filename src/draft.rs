//! Settings draft: the panel's private, uncommitted copy of the configuration.
//!
//! Edits land in a [`SettingsDraft`] and only reach the store through
//! [`commit`] (all fields at once) or [`reset_to_defaults`]. Time-related
//! edits are silently ignored while a timer session is running.

use crate::alarm::{AlarmSound, AudioPreview};
use crate::config::*;
use crate::settings::{DurationField, GridSize, Settings, StepDirection};
use crate::store::{SettingsStore, StoreError};
use crate::utils::{minutes_to_seconds, parse_minutes};
use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info, warn};

/// A confirmation notification for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: &'static str,
    /// Render with the dark theme.
    pub dark: bool,
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, message: &str) -> LocalBoxFuture<'static, bool>;
}

/// `window.confirm()`. Blocks the page while open; resolves immediately after.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, message: &str) -> LocalBoxFuture<'static, bool> {
        let answer = gloo_utils::window()
            .confirm_with_message(message)
            .unwrap_or(false);
        futures::future::ready(answer).boxed_local()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    values: Settings,
}

impl SettingsDraft {
    /// Seed a draft from the committed configuration.
    pub fn from_committed(committed: &Settings) -> Self {
        Self {
            values: committed.clone(),
        }
    }

    pub fn factory() -> Self {
        Self {
            values: Settings::default(),
        }
    }

    pub fn values(&self) -> &Settings {
        &self.values
    }

    pub fn duration(&self, field: DurationField) -> u32 {
        self.values.duration(field)
    }

    /// Move a duration one step. Ignored while `running`, and when the value
    /// already sits on the bound it would move past.
    ///
    /// Returns whether the draft changed.
    pub fn adjust_duration(
        &mut self,
        field: DurationField,
        direction: StepDirection,
        running: bool,
    ) -> bool {
        if running {
            debug!("Ignoring {:?} {:?} while timer is running", field, direction);
            return false;
        }

        let current = self.values.duration_mut(field);
        match direction {
            StepDirection::Decrement if *current > MIN_DURATION_SECS => {
                *current = current.saturating_sub(DURATION_STEP_SECS).max(MIN_DURATION_SECS);
                true
            }
            StepDirection::Increment if *current < MAX_DURATION_SECS => {
                *current = (*current + DURATION_STEP_SECS).min(MAX_DURATION_SECS);
                true
            }
            _ => false,
        }
    }

    /// Overwrite a duration from typed minutes.
    ///
    /// Unlike the stepper this does not enforce the duration bounds: whatever
    /// parses is stored as `minutes * 60`, rounded to the nearest second, so
    /// fractional minutes such as "1.5" are kept. Ignored while `running` and
    /// for unparseable text.
    pub fn enter_minutes(&mut self, field: DurationField, input: &str, running: bool) -> bool {
        if running {
            debug!("Ignoring typed {:?} while timer is running", field);
            return false;
        }

        match parse_minutes(input).and_then(minutes_to_seconds) {
            Ok(secs) => {
                *self.values.duration_mut(field) = secs;
                true
            }
            Err(e) => {
                debug!("Ignoring typed {:?}: {}", field, e);
                false
            }
        }
    }

    /// Set the alarm volume, snapped to the slider's step.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let per_unit = (1.0 / VOLUME_STEP).round();
        self.values.audio_volume = (volume.clamp(MIN_VOLUME, MAX_VOLUME) * per_unit).round() / per_unit;
    }

    /// Play `sound` at the draft volume and make it the draft alarm.
    /// The selection sticks even if the preview cannot play.
    pub fn select_alarm(&mut self, sound: AlarmSound, preview: &dyn AudioPreview) {
        if let Err(e) = preview.preview(sound, self.values.audio_volume) {
            warn!("Alarm preview for {} failed: {}", sound, e);
        }
        self.set_alarm(sound);
    }

    /// Make `sound` the draft alarm without playing anything.
    pub fn set_alarm(&mut self, sound: AlarmSound) {
        self.values.alarm = sound;
    }

    pub fn set_grid_step(&mut self, step: u32) {
        self.values.grid = GridSize::from_slider(step);
    }

    pub fn toggle_widgets_locked(&mut self) {
        self.values.widgets_locked = !self.values.widgets_locked;
    }
}

/// Write the whole draft to the store. On error nothing is applied.
pub fn commit(draft: &SettingsDraft, store: &dyn SettingsStore) -> Result<Toast, StoreError> {
    store.replace(draft.values.clone())?;
    info!("Settings saved: {:?}", draft.values);
    Ok(Toast {
        message: SETTINGS_SAVED_MESSAGE,
        dark: store.is_dark(),
    })
}

/// Ask for confirmation, then restore factory defaults.
///
/// Returns the draft the panel should adopt, or `None` when nothing changed
/// (timer running, or the user declined).
pub async fn reset_to_defaults(
    store: &dyn SettingsStore,
    confirm: &dyn Confirm,
) -> Result<Option<SettingsDraft>, StoreError> {
    if store.has_started() {
        debug!("Ignoring reset while timer is running");
        return Ok(None);
    }

    if !confirm.confirm(RESET_CONFIRM_PROMPT).await {
        debug!("Reset declined");
        return Ok(None);
    }

    // The prompt may have been open while a session started.
    if store.has_started() {
        debug!("Timer started during reset prompt; ignoring reset");
        return Ok(None);
    }

    store.restore_defaults()?;
    info!("Settings reset to defaults");
    Ok(Some(SettingsDraft::factory()))
}

/// Reveal the hidden info section.
pub fn unhide_info(store: &dyn SettingsStore) -> Result<Toast, StoreError> {
    store.set_info_visible(true)?;
    Ok(Toast {
        message: INFO_VISIBLE_MESSAGE,
        dark: store.is_dark(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::PreviewError;
    use crate::store::{AppStore, MemoryPersist};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn memory_store() -> (AppStore, Rc<MemoryPersist>) {
        let persist = Rc::new(MemoryPersist::new());
        (AppStore::open(persist.clone()), persist)
    }

    struct Answer {
        yes: bool,
        asked: Cell<usize>,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self { yes, asked: Cell::new(0) }
        }
    }

    impl Confirm for Answer {
        fn confirm(&self, message: &str) -> LocalBoxFuture<'static, bool> {
            assert_eq!(message, RESET_CONFIRM_PROMPT);
            self.asked.set(self.asked.get() + 1);
            futures::future::ready(self.yes).boxed_local()
        }
    }

    /// Says yes, but starts the timer while the prompt is open.
    struct StartsTimer(AppStore);

    impl Confirm for StartsTimer {
        fn confirm(&self, _message: &str) -> LocalBoxFuture<'static, bool> {
            self.0.set_has_started(true).unwrap();
            futures::future::ready(true).boxed_local()
        }
    }

    #[derive(Default)]
    struct RecordingPreview {
        played: RefCell<Vec<(AlarmSound, f64)>>,
        fail: bool,
    }

    impl AudioPreview for RecordingPreview {
        fn preview(&self, sound: AlarmSound, volume: f64) -> Result<(), PreviewError> {
            self.played.borrow_mut().push((sound, volume));
            if self.fail {
                Err(PreviewError::Playback("NotAllowedError".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn customized() -> Settings {
        Settings {
            pomodoro_length: 1200,
            short_break_length: 240,
            long_break_length: 600,
            audio_volume: 0.3,
            alarm: AlarmSound::Piano,
            grid: GridSize::Step(150),
            widgets_locked: true,
        }
    }

    #[test]
    fn draft_starts_as_committed_copy() {
        let draft = SettingsDraft::from_committed(&customized());
        assert_eq!(draft.values(), &customized());
    }

    #[test]
    fn steps_are_ignored_while_running() {
        for field in DurationField::ALL {
            for d in (60..=3600).step_by(60) {
                let mut settings = Settings::default();
                *settings.duration_mut(field) = d;
                let mut draft = SettingsDraft::from_committed(&settings);
                assert!(!draft.adjust_duration(field, StepDirection::Increment, true));
                assert!(!draft.adjust_duration(field, StepDirection::Decrement, true));
                assert_eq!(draft.duration(field), d);
            }
        }
    }

    #[test]
    fn steps_move_by_one_minute_within_bounds() {
        for d in (60..3600).step_by(60) {
            let mut settings = Settings::default();
            settings.pomodoro_length = d;
            let mut draft = SettingsDraft::from_committed(&settings);
            assert!(draft.adjust_duration(DurationField::Pomodoro, StepDirection::Increment, false));
            assert_eq!(draft.duration(DurationField::Pomodoro), d + 60);
            assert!(draft.duration(DurationField::Pomodoro) <= MAX_DURATION_SECS);
        }
        for d in (120..=3600).step_by(60) {
            let mut settings = Settings::default();
            settings.long_break_length = d;
            let mut draft = SettingsDraft::from_committed(&settings);
            assert!(draft.adjust_duration(DurationField::LongBreak, StepDirection::Decrement, false));
            assert_eq!(draft.duration(DurationField::LongBreak), d - 60);
            assert!(draft.duration(DurationField::LongBreak) >= MIN_DURATION_SECS);
        }
    }

    #[test]
    fn steps_stop_at_bounds() {
        let mut settings = Settings::default();
        settings.short_break_length = 60;
        settings.long_break_length = 3600;
        let mut draft = SettingsDraft::from_committed(&settings);

        assert!(!draft.adjust_duration(DurationField::ShortBreak, StepDirection::Decrement, false));
        assert_eq!(draft.duration(DurationField::ShortBreak), 60);
        assert!(!draft.adjust_duration(DurationField::LongBreak, StepDirection::Increment, false));
        assert_eq!(draft.duration(DurationField::LongBreak), 3600);
    }

    #[test]
    fn stepping_from_off_grid_value_stays_in_bounds() {
        let mut draft = SettingsDraft::factory();
        draft.enter_minutes(DurationField::Pomodoro, "0", false);
        // 0 is below the floor: decrement refuses, increment clamps onto it
        assert!(!draft.adjust_duration(DurationField::Pomodoro, StepDirection::Decrement, false));
        assert!(draft.adjust_duration(DurationField::Pomodoro, StepDirection::Increment, false));
        assert_eq!(draft.duration(DurationField::Pomodoro), 60);
    }

    #[test]
    fn typed_minutes_are_stored_without_bounds_check() {
        let (store, _) = memory_store();
        let mut draft = SettingsDraft::from_committed(&store.settings());

        assert!(draft.enter_minutes(DurationField::Pomodoro, "90", false));
        assert!(draft.enter_minutes(DurationField::ShortBreak, "0", false));
        assert_eq!(draft.duration(DurationField::Pomodoro), 5400);

        commit(&draft, &store).unwrap();
        assert_eq!(store.settings().pomodoro_length, 5400);
        assert_eq!(store.settings().short_break_length, 0);
    }

    #[test]
    fn typed_fractional_minutes_round_to_seconds() {
        let (store, _) = memory_store();
        let mut draft = SettingsDraft::from_committed(&store.settings());

        assert!(draft.enter_minutes(DurationField::Pomodoro, "1.5", false));
        assert!(draft.enter_minutes(DurationField::LongBreak, "0.01", false));
        assert_eq!(draft.duration(DurationField::Pomodoro), 90);
        assert_eq!(draft.duration(DurationField::LongBreak), 1);

        commit(&draft, &store).unwrap();
        assert_eq!(store.settings().pomodoro_length, 90);
    }

    #[test]
    fn typed_minutes_ignored_while_running_or_unparseable() {
        let mut draft = SettingsDraft::factory();
        assert!(!draft.enter_minutes(DurationField::Pomodoro, "30", true));
        assert!(!draft.enter_minutes(DurationField::Pomodoro, "thirty", false));
        assert!(!draft.enter_minutes(DurationField::Pomodoro, "", false));
        assert!(!draft.enter_minutes(DurationField::Pomodoro, "٢٥", false));
        assert_eq!(draft.duration(DurationField::Pomodoro), DEFAULT_POMODORO_SECS);
    }

    #[test]
    fn volume_snaps_to_slider_steps() {
        let mut draft = SettingsDraft::factory();
        draft.set_volume(0.9);
        assert_eq!(draft.values().audio_volume, 0.9);
        draft.set_volume(0.34);
        assert_eq!(draft.values().audio_volume, 0.3);
        draft.set_volume(1.7);
        assert_eq!(draft.values().audio_volume, 1.0);
        draft.set_volume(f64::NAN);
        assert_eq!(draft.values().audio_volume, 1.0);
    }

    #[test]
    fn alarm_preview_uses_draft_volume() {
        let preview = RecordingPreview::default();
        let mut draft = SettingsDraft::factory();
        draft.set_volume(0.4);
        draft.select_alarm(AlarmSound::Bells, &preview);

        assert_eq!(*preview.played.borrow(), vec![(AlarmSound::Bells, 0.4)]);
        assert_eq!(draft.values().alarm, AlarmSound::Bells);
    }

    #[test]
    fn alarm_selection_survives_failed_preview() {
        let preview = RecordingPreview {
            fail: true,
            ..Default::default()
        };
        let mut draft = SettingsDraft::factory();
        draft.select_alarm(AlarmSound::Flute, &preview);
        assert_eq!(draft.values().alarm, AlarmSound::Flute);
    }

    #[test]
    fn set_alarm_plays_nothing() {
        let mut draft = SettingsDraft::factory();
        draft.set_alarm(AlarmSound::Piano);
        assert_eq!(draft.values().alarm, AlarmSound::Piano);
    }

    #[test]
    fn grid_step_zero_unsets_grid() {
        let mut draft = SettingsDraft::factory();
        draft.set_grid_step(100);
        assert_eq!(draft.values().grid.as_pair(), Some((100, 100)));
        draft.set_grid_step(0);
        assert_eq!(draft.values().grid, GridSize::Unset);
    }

    #[test]
    fn widget_lock_toggles() {
        let mut draft = SettingsDraft::factory();
        draft.toggle_widgets_locked();
        assert!(draft.values().widgets_locked);
        draft.toggle_widgets_locked();
        assert!(!draft.values().widgets_locked);
    }

    #[test]
    fn edits_do_not_touch_store_until_commit() {
        let (store, _) = memory_store();
        let mut draft = SettingsDraft::from_committed(&store.settings());
        draft.adjust_duration(DurationField::Pomodoro, StepDirection::Increment, false);
        draft.toggle_widgets_locked();
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn commit_writes_every_field() {
        let (store, _) = memory_store();
        let mut settings = Settings::default();
        settings.audio_volume = 0.5;
        store.replace(settings).unwrap();

        let mut draft = SettingsDraft::from_committed(&store.settings());
        draft.adjust_duration(DurationField::Pomodoro, StepDirection::Increment, false);
        assert_eq!(draft.duration(DurationField::Pomodoro), 1560);
        draft.set_volume(0.9);

        let toast = commit(&draft, &store).unwrap();
        assert_eq!(toast.message, "Settings saved");
        assert!(!toast.dark);
        assert_eq!(store.settings().pomodoro_length, 1560);
        assert_eq!(store.settings().audio_volume, 0.9);
        assert_eq!(&store.settings(), draft.values());
    }

    #[test]
    fn commit_toast_follows_theme() {
        let (store, _) = memory_store();
        store.set_dark(true).unwrap();
        let toast = commit(&SettingsDraft::factory(), &store).unwrap();
        assert!(toast.dark);
    }

    #[test]
    fn interrupted_commit_applies_nothing() {
        let (store, persist) = memory_store();
        store.replace(customized()).unwrap();

        let mut draft = SettingsDraft::from_committed(&store.settings());
        draft.adjust_duration(DurationField::ShortBreak, StepDirection::Increment, false);
        draft.set_volume(1.0);
        draft.set_grid_step(0);
        draft.toggle_widgets_locked();

        persist.set_fail_writes(true);
        assert!(commit(&draft, &store).is_err());
        assert_eq!(store.settings(), customized());
    }

    #[test]
    fn running_decrement_never_reaches_store() {
        let (store, _) = memory_store();
        store.set_has_started(true).unwrap();

        let mut draft = SettingsDraft::from_committed(&store.settings());
        draft.adjust_duration(DurationField::ShortBreak, StepDirection::Decrement, store.has_started());
        assert_eq!(draft.duration(DurationField::ShortBreak), 300);

        commit(&draft, &store).unwrap();
        assert_eq!(store.settings().short_break_length, 300);
    }

    #[test]
    fn reset_is_ignored_while_running() {
        for yes in [true, false] {
            let (store, _) = memory_store();
            store.replace(customized()).unwrap();
            store.set_has_started(true).unwrap();
            let answer = Answer::new(yes);

            let outcome = block_on(reset_to_defaults(&store, &answer)).unwrap();
            assert!(outcome.is_none());
            assert_eq!(answer.asked.get(), 0);
            assert_eq!(store.settings(), customized());
        }
    }

    #[test]
    fn declined_reset_changes_nothing() {
        let (store, _) = memory_store();
        store.replace(customized()).unwrap();
        let answer = Answer::new(false);

        let outcome = block_on(reset_to_defaults(&store, &answer)).unwrap();
        assert!(outcome.is_none());
        assert_eq!(answer.asked.get(), 1);
        assert_eq!(store.settings(), customized());
    }

    #[test]
    fn confirmed_reset_restores_factory_defaults() {
        let (store, _) = memory_store();
        store.replace(customized()).unwrap();

        let draft = block_on(reset_to_defaults(&store, &Answer::new(true)))
            .unwrap()
            .expect("reset applied");

        for values in [draft.values().clone(), store.settings()] {
            assert_eq!(values.pomodoro_length, 1500);
            assert_eq!(values.short_break_length, 300);
            assert_eq!(values.long_break_length, 900);
            assert_eq!(values.audio_volume, 0.7);
            assert_eq!(values.alarm.source(), DEFAULT_ALARM_URL);
            assert_eq!(values.grid, GridSize::Unset);
            assert!(!values.widgets_locked);
        }
    }

    #[test]
    fn reset_rechecks_running_after_prompt() {
        let (store, _) = memory_store();
        store.replace(customized()).unwrap();

        let outcome = block_on(reset_to_defaults(&store, &StartsTimer(store.clone()))).unwrap();
        assert!(outcome.is_none());
        assert_eq!(store.settings(), customized());
    }

    #[test]
    fn failed_reset_reports_error() {
        let (store, persist) = memory_store();
        store.replace(customized()).unwrap();
        persist.set_fail_writes(true);

        let result = block_on(reset_to_defaults(&store, &Answer::new(true)));
        assert!(matches!(result, Err(StoreError::Write(_))));
        assert_eq!(store.settings(), customized());
    }

    #[test]
    fn unhide_info_sets_flag_even_while_running() {
        let (store, _) = memory_store();
        store.set_has_started(true).unwrap();

        let toast = unhide_info(&store).unwrap();
        assert_eq!(toast.message, "Info now visible");
        assert!(store.info_visible());
    }
}
