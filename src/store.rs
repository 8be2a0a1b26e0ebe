//! Application store shared by every widget.
//!
//! The settings panel only talks to the [`SettingsStore`] trait. [`AppStore`]
//! is the browser implementation: a single-threaded cell with change
//! listeners, persisted through a pluggable [`Persist`] backend.
//!
//! Every write goes through one path: build the next state, persist it, and
//! only then swap it in. A failed write leaves the store untouched.

use crate::alarm::AlarmSound;
use crate::config::{STORAGE_KEY, STORAGE_VERSION};
use crate::settings::{Background, DurationField, GridSize, Settings};
use crate::utils::js_error_text;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum StoreError {
    /// State could not be encoded or decoded.
    Serialize(String),
    /// The storage backend is not reachable (e.g. `localStorage` disabled).
    Unavailable,
    /// The backend rejected the write (quota, private mode, ...).
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Serialize(msg) => write!(f, "Could not encode store state: {}", msg),
            StoreError::Unavailable => write!(f, "Storage backend unavailable"),
            StoreError::Write(msg) => write!(f, "Storage write failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e.to_string())
    }
}

/// Read/write access to the committed configuration and the flags the
/// settings panel observes.
pub trait SettingsStore {
    fn settings(&self) -> Settings;

    /// Overwrite every setting at once.
    fn replace(&self, next: Settings) -> Result<(), StoreError>;

    fn restore_defaults(&self) -> Result<(), StoreError> {
        self.replace(Settings::default())
    }

    /// Running-state signal: a timer session is active.
    fn has_started(&self) -> bool;

    fn is_dark(&self) -> bool;

    fn info_visible(&self) -> bool;

    fn set_info_visible(&self, visible: bool) -> Result<(), StoreError>;

    fn background(&self) -> Background;

    fn set_background(&self, background: Background) -> Result<(), StoreError>;

    fn set_duration(&self, field: DurationField, secs: u32) -> Result<(), StoreError> {
        let mut next = self.settings();
        *next.duration_mut(field) = secs;
        self.replace(next)
    }

    fn set_audio_volume(&self, volume: f64) -> Result<(), StoreError> {
        let mut next = self.settings();
        next.audio_volume = volume;
        self.replace(next)
    }

    fn set_alarm(&self, alarm: AlarmSound) -> Result<(), StoreError> {
        let mut next = self.settings();
        next.alarm = alarm;
        self.replace(next)
    }

    fn set_grid(&self, grid: GridSize) -> Result<(), StoreError> {
        let mut next = self.settings();
        next.grid = grid;
        self.replace(next)
    }

    fn set_widgets_locked(&self, locked: bool) -> Result<(), StoreError> {
        let mut next = self.settings();
        next.widgets_locked = locked;
        self.replace(next)
    }
}

/// Where the store keeps its serialized blob between page loads.
pub trait Persist {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, blob: &str) -> Result<(), StoreError>;
}

/// Persists into `window.localStorage` under a fixed key.
#[derive(Debug, Clone, Copy)]
pub struct LocalStoragePersist {
    key: &'static str,
}

impl LocalStoragePersist {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        gloo_utils::window()
            .local_storage()
            .ok()
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl Default for LocalStoragePersist {
    fn default() -> Self {
        Self::new(STORAGE_KEY)
    }
}

impl Persist for LocalStoragePersist {
    fn load(&self) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(self.key)
            .map_err(|_| StoreError::Unavailable)
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(self.key, blob)
            .map_err(|e| StoreError::Write(js_error_text(&e)))
    }
}

/// Keeps the blob in memory. Used when no browser storage is reachable.
#[derive(Debug, Default)]
pub struct MemoryPersist {
    blob: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
}

impl MemoryPersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, simulating an interrupted save.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl Persist for MemoryPersist {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.borrow().clone())
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Write("writes disabled".to_string()));
        }
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}

/// Everything the store holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub settings: Settings,
    pub background: Background,
    pub info_visible: bool,
    pub is_dark: bool,
    /// Session-only; never persisted.
    pub has_started: bool,
}

/// On-disk layout of [`StoreState`].
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    settings: Settings,
    background: Background,
    info_visible: bool,
    is_dark: bool,
}

impl PersistedState {
    fn from_state(state: &StoreState) -> Self {
        Self {
            version: STORAGE_VERSION,
            settings: state.settings.clone(),
            background: state.background,
            info_visible: state.info_visible,
            is_dark: state.is_dark,
        }
    }

    fn into_state(self) -> StoreState {
        StoreState {
            settings: self.settings,
            background: self.background,
            info_visible: self.info_visible,
            is_dark: self.is_dark,
            has_started: false,
        }
    }
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: usize,
    entries: Vec<(usize, Listener)>,
}

/// Browser-side application store. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AppStore {
    state: Rc<RefCell<StoreState>>,
    persist: Rc<dyn Persist>,
    listeners: Rc<RefCell<Listeners>>,
}

impl PartialEq for AppStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for AppStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AppStore {
    /// Open the store, restoring whatever the backend holds. Unreadable or
    /// outdated blobs fall back to factory defaults.
    pub fn open(persist: Rc<dyn Persist>) -> Self {
        let state = match persist.load() {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedState>(&blob) {
                Ok(saved) if saved.version == STORAGE_VERSION => saved.into_state(),
                Ok(saved) => {
                    warn!(
                        "Ignoring stored state with version {} (expected {})",
                        saved.version, STORAGE_VERSION
                    );
                    StoreState::default()
                }
                Err(e) => {
                    warn!("Ignoring unreadable stored state: {}", e);
                    StoreState::default()
                }
            },
            Ok(None) => StoreState::default(),
            Err(e) => {
                warn!("Could not load stored state: {}", e);
                StoreState::default()
            }
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            persist,
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    /// Store backed by `localStorage`, or by memory if the browser has none.
    pub fn browser() -> Self {
        let local = LocalStoragePersist::default();
        if local.storage().is_ok() {
            Self::open(Rc::new(local))
        } else {
            warn!("localStorage unavailable; settings will not survive a reload");
            Self::open(Rc::new(MemoryPersist::new()))
        }
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Apply `f` to a copy of the state, persist it, then publish it.
    /// Changes confined to session-only fields skip the backend entirely.
    fn update(&self, f: impl FnOnce(&mut StoreState)) -> Result<(), StoreError> {
        let mut next = self.state.borrow().clone();
        f(&mut next);
        if next == *self.state.borrow() {
            return Ok(());
        }

        let saved = PersistedState::from_state(&next);
        if saved != PersistedState::from_state(&self.state.borrow()) {
            let blob = serde_json::to_string(&saved)?;
            self.persist.save(&blob)?;
        }
        *self.state.borrow_mut() = next;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        // Snapshot first: listeners read the store and may subscribe.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        debug!("Store changed; notifying {} listener(s)", listeners.len());
        for listener in listeners {
            listener();
        }
    }

    /// Register a change listener. It stays registered while the returned
    /// handle is alive.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> StoreSubscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        StoreSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn set_has_started(&self, started: bool) -> Result<(), StoreError> {
        self.update(|s| s.has_started = started)
    }

    pub fn set_dark(&self, dark: bool) -> Result<(), StoreError> {
        self.update(|s| s.is_dark = dark)
    }
}

impl SettingsStore for AppStore {
    fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    fn replace(&self, next: Settings) -> Result<(), StoreError> {
        self.update(|s| s.settings = next)
    }

    fn has_started(&self) -> bool {
        self.state.borrow().has_started
    }

    fn is_dark(&self) -> bool {
        self.state.borrow().is_dark
    }

    fn info_visible(&self) -> bool {
        self.state.borrow().info_visible
    }

    fn set_info_visible(&self, visible: bool) -> Result<(), StoreError> {
        self.update(|s| s.info_visible = visible)
    }

    fn background(&self) -> Background {
        self.state.borrow().background
    }

    fn set_background(&self, background: Background) -> Result<(), StoreError> {
        self.update(|s| s.background = background)
    }
}

/// Keeps a store listener registered; unregisters on drop.
pub struct StoreSubscription {
    id: usize,
    listeners: std::rc::Weak<RefCell<Listeners>>,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
