//! Main module for the lofi Pomodoro front-end using Yew.
//! Wires the store, the floating panels and toast notifications.

use gloo_timers::callback::Timeout;
use lofi_pomodoro::config::TOAST_DURATION_MS;
use lofi_pomodoro::{format_secs_to_minsec, AppStore, DurationField, SettingsStore, Toast};
use log::warn;
use yew::prelude::*;

mod components;
mod hooks;

use components::{BackgroundNav, TimerSettings, ToastView};
use hooks::use_store;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Show `toast` and hide it after `delay_ms`, cancelling any pending hide.
fn show_toast(
    toast_state: &UseStateHandle<Option<Toast>>,
    timer_handle: &UseStateHandle<Option<Timeout>>,
    toast: Toast,
    delay_ms: u32,
) {
    // Dropping the previous Timeout cancels it
    timer_handle.set(None);
    toast_state.set(Some(toast));

    let toast_state = toast_state.clone();
    let timer_handle_clone = timer_handle.clone();
    let handle = Timeout::new(delay_ms, move || {
        toast_state.set(None);
        timer_handle_clone.set(None);
    });
    timer_handle.set(Some(handle));
}

/// Toggle callback for a nav button. Stops the press from reaching the
/// document so an open panel's outside-click listener does not close it first.
fn nav_toggle(open: &UseStateHandle<bool>) -> (Callback<MouseEvent>, Callback<MouseEvent>) {
    let open = open.clone();
    let onmousedown = Callback::from(|e: MouseEvent| e.stop_propagation());
    let onclick = Callback::from(move |_: MouseEvent| open.set(!*open));
    (onmousedown, onclick)
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component: nav bar, panels, timer summary and toasts.
#[function_component(Main)]
fn main_component() -> Html {
    let store = use_store();
    let state = store.snapshot();

    let settings_open = use_state(|| false);
    let background_open = use_state(|| false);
    let toast = use_state(|| None::<Toast>);
    let toast_timer = use_state(|| None::<Timeout>);

    let on_toast = {
        let toast = toast.clone();
        let toast_timer = toast_timer.clone();
        Callback::from(move |next: Toast| show_toast(&toast, &toast_timer, next, TOAST_DURATION_MS))
    };
    let close_settings = {
        let settings_open = settings_open.clone();
        Callback::from(move |_: ()| settings_open.set(false))
    };
    let close_background = {
        let background_open = background_open.clone();
        Callback::from(move |_: ()| background_open.set(false))
    };

    let toggle_running = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = store.set_has_started(!store.has_started()) {
                warn!("Could not toggle timer: {}", e);
            }
        })
    };
    let toggle_dark = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = store.set_dark(!store.is_dark()) {
                warn!("Could not toggle theme: {}", e);
            }
        })
    };

    let (settings_mousedown, settings_click) = nav_toggle(&settings_open);
    let (background_mousedown, background_click) = nav_toggle(&background_open);

    let settings = &state.settings;
    let grid = settings
        .grid
        .as_pair()
        .map(|(x, y)| format!("{}x{}", x, y))
        .unwrap_or_else(|| "off".to_string());

    html! {
        <div class={classes!("app", state.background.css_class(), state.is_dark.then_some("dark"))}>
            <nav class="nav-bar">
                <button onclick={toggle_running}>
                    { if state.has_started { "Pause" } else { "Start" } }
                </button>
                <button onclick={toggle_dark}>{ if state.is_dark { "Light" } else { "Dark" } }</button>
                <button onmousedown={background_mousedown} onclick={background_click}>
                    { "Background" }
                </button>
                <button onmousedown={settings_mousedown} onclick={settings_click}>
                    { "Settings" }
                </button>
            </nav>

            <BackgroundNav visible={*background_open} on_close={close_background} />

            if *settings_open {
                <TimerSettings on_close={close_settings} on_toast={on_toast} />
            }

            <div class="timer-summary"
                data-grid={grid}
                data-locked={settings.widgets_locked.to_string()}>
                { DurationField::ALL.iter().map(|&field| html! {
                    <div class="timer-length" key={field.id_prefix()}>
                        <span class="timer-label">{ field.title() }</span>
                        <span class="timer-value">{ format_secs_to_minsec(settings.duration(field)) }</span>
                    </div>
                }).collect::<Html>() }
                <div class="timer-alarm">{ format!("Alarm: {}", settings.alarm) }</div>
            </div>

            if state.info_visible {
                <section class="info">
                    <h2>{ "About" }</h2>
                    <p>{ "A Pomodoro timer with lofi backgrounds. Work in focused sessions, \
                          take short breaks, and a longer break after a few rounds." }</p>
                </section>
            }

            <ToastView toast={(*toast).clone()} />
        </div>
    }
}

/// App wrapper providing the store to every component.
#[function_component]
pub fn App() -> Html {
    let store = use_memo((), |_| AppStore::browser());
    html! {
        <ContextProvider<AppStore> context={(*store).clone()}>
            <Main />
        </ContextProvider<AppStore>>
    }
}

/// Entry point: installs logging and panic hooks, then renders the App.
fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
