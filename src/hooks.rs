use gloo_events::EventListener;
use log::{debug, error, warn};
use lofi_pomodoro::{
    commit, reset_to_defaults, unhide_info, AlarmSound, AppStore, AudioPreview, DurationField,
    HtmlAudioPreview, SettingsDraft, SettingsStore, StepDirection, Toast, WindowConfirm,
};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::Node;
use yew::prelude::*;

/// Decide whether a pointer press dismisses a floating panel.
///
/// `inside` is `None` when the panel element is not mounted, which counts as
/// outside.
pub fn should_dismiss(active: bool, inside: Option<bool>) -> bool {
    active && inside != Some(true)
}

/// Emit `on_outside` whenever the pointer goes down outside `node`.
///
/// The document listener only exists while `active` is true and is dropped
/// when it turns false or the component unmounts.
#[hook]
pub fn use_click_outside(node: NodeRef, active: bool, on_outside: Callback<()>) {
    // Keep the newest callback without resubscribing on every render.
    let latest = use_mut_ref(|| on_outside.clone());
    *latest.borrow_mut() = on_outside;

    use_effect_with(active, move |&active| {
        let listener = active.then(|| {
            debug!("Subscribing outside-click listener");
            EventListener::new(&gloo_utils::document(), "mousedown", move |event| {
                let inside = node.get().map(|container| {
                    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                    container.contains(target.as_ref())
                });
                if should_dismiss(true, inside) {
                    latest.borrow().emit(());
                }
            })
        });
        move || {
            if listener.is_some() {
                debug!("Releasing outside-click listener");
            }
            drop(listener)
        }
    });
}

/// The application store from context. Re-renders the caller on every change.
#[hook]
pub fn use_store() -> AppStore {
    let store = use_context::<AppStore>().expect("AppStore context not provided");
    let update = use_force_update();

    use_effect_with(store.clone(), move |store| {
        let subscription = store.subscribe(move || update.force_update());
        move || drop(subscription)
    });

    store
}

pub enum DraftAction {
    Step(DurationField, StepDirection, bool),
    Minutes(DurationField, String, bool),
    Volume(f64),
    Alarm(AlarmSound),
    Grid(u32),
    ToggleLock,
    Replace(SettingsDraft),
}

#[derive(PartialEq)]
struct DraftState(SettingsDraft);

impl Reducible for DraftState {
    type Action = DraftAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut draft = self.0.clone();
        match action {
            DraftAction::Step(field, direction, running) => {
                if !draft.adjust_duration(field, direction, running) {
                    return self;
                }
            }
            DraftAction::Minutes(field, text, running) => {
                if !draft.enter_minutes(field, &text, running) {
                    return self;
                }
            }
            DraftAction::Volume(volume) => draft.set_volume(volume),
            DraftAction::Alarm(sound) => draft.set_alarm(sound),
            DraftAction::Grid(step) => draft.set_grid_step(step),
            DraftAction::ToggleLock => draft.toggle_widgets_locked(),
            DraftAction::Replace(next) => draft = next,
        }
        Rc::new(DraftState(draft))
    }
}

/// Holds the settings draft and the callbacks that edit, save or reset it.
#[derive(Clone)]
pub struct SettingsDraftHandle {
    /// Current draft values.
    pub draft: SettingsDraft,
    /// Running-state signal at render time.
    pub running: bool,
    pub on_step: Callback<(DurationField, StepDirection)>,
    /// Raw text typed into a minutes box.
    pub on_minutes: Callback<(DurationField, String)>,
    pub on_volume: Callback<f64>,
    /// Preview and select an alarm.
    pub on_alarm: Callback<AlarmSound>,
    pub on_grid: Callback<u32>,
    pub on_toggle_lock: Callback<()>,
    pub on_save: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_unhide: Callback<()>,
}

/// Draft editing for the settings panel. The draft is seeded from the store
/// when the panel mounts and dropped with it.
#[hook]
pub fn use_settings_draft(
    store: AppStore,
    on_close: Callback<()>,
    on_toast: Callback<Toast>,
) -> SettingsDraftHandle {
    let state = {
        let store = store.clone();
        use_reducer(move || DraftState(SettingsDraft::from_committed(&store.settings())))
    };

    let on_step = {
        let (state, store) = (state.clone(), store.clone());
        Callback::from(move |(field, direction): (DurationField, StepDirection)| {
            state.dispatch(DraftAction::Step(field, direction, store.has_started()))
        })
    };

    let on_minutes = {
        let (state, store) = (state.clone(), store.clone());
        Callback::from(move |(field, text): (DurationField, String)| {
            state.dispatch(DraftAction::Minutes(field, text, store.has_started()))
        })
    };

    let on_volume = {
        let state = state.clone();
        Callback::from(move |volume: f64| state.dispatch(DraftAction::Volume(volume)))
    };

    let on_alarm = {
        let state = state.clone();
        Callback::from(move |sound: AlarmSound| {
            // Preview here so the reducer stays free of side effects.
            if let Err(e) = HtmlAudioPreview.preview(sound, state.0.values().audio_volume) {
                warn!("Alarm preview for {} failed: {}", sound, e);
            }
            state.dispatch(DraftAction::Alarm(sound))
        })
    };

    let on_grid = {
        let state = state.clone();
        Callback::from(move |step: u32| state.dispatch(DraftAction::Grid(step)))
    };

    let on_toggle_lock = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(DraftAction::ToggleLock))
    };

    let on_save = {
        let (state, store) = (state.clone(), store.clone());
        let (on_close, on_toast) = (on_close.clone(), on_toast.clone());
        Callback::from(move |_: ()| match commit(&state.0, &store) {
            Ok(toast) => {
                on_close.emit(());
                on_toast.emit(toast);
            }
            Err(e) => error!("Saving settings failed: {}", e),
        })
    };

    let on_reset = {
        let (state, store) = (state.clone(), store.clone());
        Callback::from(move |_: ()| {
            let state = state.clone();
            let store = store.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match reset_to_defaults(&store, &WindowConfirm).await {
                    Ok(Some(draft)) => state.dispatch(DraftAction::Replace(draft)),
                    Ok(None) => {}
                    Err(e) => error!("Resetting settings failed: {}", e),
                }
            });
        })
    };

    let on_unhide = {
        let store = store.clone();
        Callback::from(move |_: ()| match unhide_info(&store) {
            Ok(toast) => {
                on_close.emit(());
                on_toast.emit(toast);
            }
            Err(e) => error!("Revealing info failed: {}", e),
        })
    };

    SettingsDraftHandle {
        draft: state.0.clone(),
        running: store.has_started(),
        on_step,
        on_minutes,
        on_volume,
        on_alarm,
        on_grid,
        on_toggle_lock,
        on_save,
        on_reset,
        on_unhide,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_inside_mounted_panel_keeps_it_open() {
        assert!(!should_dismiss(true, Some(true)));
    }

    #[test]
    fn press_outside_or_without_panel_dismisses() {
        assert!(should_dismiss(true, Some(false)));
        assert!(should_dismiss(true, None));
    }

    #[test]
    fn inactive_controller_never_dismisses() {
        for inside in [Some(true), Some(false), None] {
            assert!(!should_dismiss(false, inside));
        }
    }

    #[test]
    fn reducer_keeps_state_on_ignored_step() {
        let state = Rc::new(DraftState(SettingsDraft::factory()));
        let next = state.clone().reduce(DraftAction::Step(
            DurationField::Pomodoro,
            StepDirection::Increment,
            true,
        ));
        assert!(Rc::ptr_eq(&state, &next));

        let next = state.clone().reduce(DraftAction::Step(
            DurationField::Pomodoro,
            StepDirection::Increment,
            false,
        ));
        assert_eq!(next.0.duration(DurationField::Pomodoro), 1560);
    }

    #[test]
    fn reducer_applies_typed_minutes_and_replace() {
        let state = Rc::new(DraftState(SettingsDraft::factory()));
        let next = state.reduce(DraftAction::Minutes(
            DurationField::ShortBreak,
            "7".to_string(),
            false,
        ));
        assert_eq!(next.0.duration(DurationField::ShortBreak), 420);

        let next = next.reduce(DraftAction::Replace(SettingsDraft::factory()));
        assert_eq!(next.0, SettingsDraft::factory());
    }

    #[test]
    fn reducer_selects_alarm_without_audio() {
        let state = Rc::new(DraftState(SettingsDraft::factory()));
        let next = state.reduce(DraftAction::Alarm(AlarmSound::Piano));
        assert_eq!(next.0.values().alarm, AlarmSound::Piano);
    }

    #[test]
    fn reducer_applies_fractional_minutes() {
        let state = Rc::new(DraftState(SettingsDraft::factory()));
        let next = state.reduce(DraftAction::Minutes(
            DurationField::Pomodoro,
            "1.5".to_string(),
            false,
        ));
        assert_eq!(next.0.duration(DurationField::Pomodoro), 90);
    }
}
