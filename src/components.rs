//! Yew view components for the Pomodoro front-end.
//!
//! The small controls here are stateless and render from props. The two
//! panels ([`BackgroundNav`] and [`TimerSettings`]) wire those controls to the
//! store through the hooks in `hooks.rs`.

use crate::hooks::{use_click_outside, use_settings_draft, use_store};
use lofi_pomodoro::config::*;
use lofi_pomodoro::utils::seconds_to_minutes;
use lofi_pomodoro::{AlarmSound, Background, DurationField, SettingsStore, StepDirection, Toast};
use log::warn;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Minus/plus stepper with a minutes box for one timer length.
#[derive(Properties, PartialEq)]
pub struct DurationStepperProps {
    pub field: DurationField,
    pub secs: u32,
    pub running: bool,
    pub on_step: Callback<(DurationField, StepDirection)>,
    pub on_minutes: Callback<(DurationField, String)>,
}

#[function_component(DurationStepper)]
pub fn duration_stepper(props: &DurationStepperProps) -> Html {
    let field = props.field;
    let prefix = field.id_prefix();
    let step = |direction: StepDirection| props.on_step.reform(move |_: MouseEvent| (field, direction));
    let oninput = props.on_minutes.reform(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        (field, input.value())
    });

    html! {
        <div class="toggle-option">
            <div class="toggle-title">{ field.title() }</div>
            <div class="toggle-controls">
                <button id={format!("{}-decrement", prefix)}
                    disabled={props.running}
                    onclick={step(StepDirection::Decrement)}>{ "-" }</button>
                <input type="number"
                    id={format!("{}-length", prefix)}
                    min="1"
                    readonly={props.running}
                    value={seconds_to_minutes(props.secs).to_string()}
                    oninput={oninput}
                />
                <button id={format!("{}-increment", prefix)}
                    disabled={props.running}
                    onclick={step(StepDirection::Increment)}>{ "+" }</button>
            </div>
        </div>
    }
}

/// Range slider for the alarm volume.
#[derive(Properties, PartialEq)]
pub struct VolumeSliderProps {
    pub volume: f64,
    pub on_change: Callback<f64>,
}

#[function_component(VolumeSlider)]
pub fn volume_slider(props: &VolumeSliderProps) -> Html {
    let on_change = props.on_change.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match input.value().parse::<f64>() {
            Ok(volume) => on_change.emit(volume),
            Err(_) => warn!("Unexpected volume slider value {:?}", input.value()),
        }
    });

    html! {
        <div class="settings-section">
            <div class="section-title">{ "Alarm Volume" }</div>
            <div class="slider-with-value">
                <input type="range"
                    min={MIN_VOLUME.to_string()}
                    max={MAX_VOLUME.to_string()}
                    step={VOLUME_STEP.to_string()}
                    value={props.volume.to_string()}
                    oninput={oninput}
                />
                <span class="slider-value">{ format!("{:.0}%", props.volume * 100.0) }</span>
            </div>
        </div>
    }
}

/// Buttons for the built-in alarm sounds; the selected one is highlighted.
#[derive(Properties, PartialEq)]
pub struct AlarmPickerProps {
    pub selected: AlarmSound,
    pub on_select: Callback<AlarmSound>,
}

#[function_component(AlarmPicker)]
pub fn alarm_picker(props: &AlarmPickerProps) -> Html {
    html! {
        <div class="settings-section">
            <div class="section-title">{ "Alarm Sound" }</div>
            <div class="alarm-choices">
                { AlarmSound::CHOICES.iter().map(|&sound| {
                    let class = classes!(
                        "alarm-choice",
                        (props.selected == sound).then_some("picked")
                    );
                    html! {
                        <div class="alarm-option" key={sound.title()}>
                            <div class="alarm-title">{ sound.title() }</div>
                            <div class={class} onclick={props.on_select.reform(move |_: MouseEvent| sound)}>
                                { "♪" }
                            </div>
                        </div>
                    }
                }).collect::<Html>() }
            </div>
        </div>
    }
}

/// Slider for the widget snapping grid. Position 0 turns snapping off.
#[derive(Properties, PartialEq)]
pub struct GridSliderProps {
    pub step: u32,
    pub on_change: Callback<u32>,
}

#[function_component(GridSlider)]
pub fn grid_slider(props: &GridSliderProps) -> Html {
    let on_change = props.on_change.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        if let Ok(step) = input.value().parse::<u32>() {
            on_change.emit(step);
        }
    });

    html! {
        <div class="settings-section">
            <div class="section-title">{ "Grid Size (increasing Step Size)" }</div>
            <div class="slider-with-value">
                <input type="range"
                    min="0"
                    max={MAX_GRID_STEP.to_string()}
                    step={GRID_STEP.to_string()}
                    value={props.step.to_string()}
                    oninput={oninput}
                />
                <span class="slider-value">{
                    if props.step == 0 { "Off".to_string() } else { format!("{}px", props.step) }
                }</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LockToggleProps {
    pub locked: bool,
    pub on_toggle: Callback<()>,
}

#[function_component(LockToggle)]
pub fn lock_toggle(props: &LockToggleProps) -> Html {
    let class = classes!("lock-button", props.locked.then_some("danger"));
    html! {
        <div class="settings-section">
            <div class="section-title">{ "Lock Widgets In-place" }</div>
            <button class={class} onclick={props.on_toggle.reform(|_: MouseEvent| ())}>
                { if props.locked { "Unlock Widgets" } else { "Lock Widgets" } }
            </button>
        </div>
    }
}

/// Success notification.
#[derive(Properties, PartialEq)]
pub struct ToastViewProps {
    pub toast: Option<Toast>,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastViewProps) -> Html {
    match &props.toast {
        Some(toast) => html! {
            <div class={classes!("toast", "toast-success", toast.dark.then_some("toast-dark"))}
                role="status">
                { toast.message }
            </div>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct BackgroundDropdownItemProps {
    pub background: Background,
    pub picked: bool,
    pub on_pick: Callback<Background>,
}

#[function_component(BackgroundDropdownItem)]
pub fn background_dropdown_item(props: &BackgroundDropdownItemProps) -> Html {
    let background = props.background;
    html! {
        <div class={classes!("dropdown-item", props.picked.then_some("picked"))}
            role="menuitem"
            onclick={props.on_pick.reform(move |_: MouseEvent| background)}>
            { background.title() }
        </div>
    }
}

/// Dropdown for choosing the page background. Closes on any press outside it.
#[derive(Properties, PartialEq)]
pub struct BackgroundNavProps {
    pub visible: bool,
    pub on_close: Callback<()>,
}

#[function_component(BackgroundNav)]
pub fn background_nav(props: &BackgroundNavProps) -> Html {
    let store = use_store();
    let menu_ref = use_node_ref();
    use_click_outside(menu_ref.clone(), props.visible, props.on_close.clone());

    if !props.visible {
        return html! {};
    }

    let current = store.background();
    let on_pick = {
        let store = store.clone();
        Callback::from(move |background: Background| {
            if let Err(e) = store.set_background(background) {
                warn!("Could not switch background to {}: {}", background, e);
            }
        })
    };

    html! {
        <div class="dropdown" role="menu" ref={menu_ref}>
            { Background::ALL.iter().map(|&background| html! {
                <BackgroundDropdownItem key={background.title()}
                    background={background}
                    picked={current == background}
                    on_pick={on_pick.clone()} />
            }).collect::<Html>() }
        </div>
    }
}

/// Settings panel. The draft lives as long as this component is mounted.
#[derive(Properties, PartialEq)]
pub struct TimerSettingsProps {
    pub on_close: Callback<()>,
    pub on_toast: Callback<Toast>,
}

#[function_component(TimerSettings)]
pub fn timer_settings(props: &TimerSettingsProps) -> Html {
    let store = use_store();
    let panel_ref = use_node_ref();
    use_click_outside(panel_ref.clone(), true, props.on_close.clone());
    let handle = use_settings_draft(store, props.on_close.clone(), props.on_toast.clone());
    let values = handle.draft.values();

    html! {
        <div class="settings-panel" ref={panel_ref}>
            <div class="settings-header">
                <h2>{ "Settings" }</h2>
                <button class="close-button" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                    { "✕" }
                </button>
            </div>

            <div class="settings-section">
                <div class="section-title">{ "Time " }<span class="unit">{ "(minutes)" }</span></div>
                <div class="toggle-row">
                    { DurationField::ALL.iter().map(|&field| html! {
                        <DurationStepper key={field.id_prefix()}
                            field={field}
                            secs={values.duration(field)}
                            running={handle.running}
                            on_step={handle.on_step.clone()}
                            on_minutes={handle.on_minutes.clone()} />
                    }).collect::<Html>() }
                </div>
            </div>

            <VolumeSlider volume={values.audio_volume} on_change={handle.on_volume.clone()} />
            <AlarmPicker selected={values.alarm} on_select={handle.on_alarm.clone()} />
            <GridSlider step={values.grid.slider_value()} on_change={handle.on_grid.clone()} />
            <LockToggle locked={values.widgets_locked} on_toggle={handle.on_toggle_lock.clone()} />

            <div class="settings-actions">
                <button class="tertiary" disabled={handle.running}
                    onclick={handle.on_reset.reform(|_: MouseEvent| ())}>{ "Default" }</button>
                <button class="secondary"
                    onclick={handle.on_unhide.reform(|_: MouseEvent| ())}>{ "Unhide Info" }</button>
                <button class="primary"
                    onclick={handle.on_save.reform(|_: MouseEvent| ())}>{ "Save" }</button>
            </div>
        </div>
    }
}
