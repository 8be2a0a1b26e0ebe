//! Alarm sounds and the audible preview played when one is picked.

use crate::config::*;
use crate::utils::js_error_text;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alarm sounds offered by the settings panel.
///
/// Persisted as the asset path (or URL) so stored values stay readable by
/// anything that only knows the sound's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlarmSound {
    Retro,
    Bells,
    Flute,
    Piano,
    /// Hosted beep used by the factory defaults.
    Beep,
}

impl AlarmSound {
    /// The sounds shown as choices in the picker, in display order.
    pub const CHOICES: [AlarmSound; 4] = [
        AlarmSound::Retro,
        AlarmSound::Bells,
        AlarmSound::Flute,
        AlarmSound::Piano,
    ];

    pub fn source(self) -> &'static str {
        match self {
            AlarmSound::Retro => ARCADE_ALARM_PATH,
            AlarmSound::Bells => BELLS_ALARM_PATH,
            AlarmSound::Flute => FLUTE_ALARM_PATH,
            AlarmSound::Piano => PIANO_ALARM_PATH,
            AlarmSound::Beep => DEFAULT_ALARM_URL,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AlarmSound::Retro => "Retro",
            AlarmSound::Bells => "Bells",
            AlarmSound::Flute => "Flute",
            AlarmSound::Piano => "Piano",
            AlarmSound::Beep => "Beep",
        }
    }

    pub fn from_source(source: &str) -> Option<Self> {
        [
            AlarmSound::Retro,
            AlarmSound::Bells,
            AlarmSound::Flute,
            AlarmSound::Piano,
            AlarmSound::Beep,
        ]
        .into_iter()
        .find(|sound| sound.source() == source)
    }
}

impl fmt::Display for AlarmSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl TryFrom<String> for AlarmSound {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AlarmSound::from_source(&value).ok_or_else(|| format!("Unknown alarm sound: {}", value))
    }
}

impl From<AlarmSound> for String {
    fn from(value: AlarmSound) -> Self {
        value.source().to_string()
    }
}

/// Failure to start an audio preview.
#[derive(Debug)]
pub enum PreviewError {
    /// The audio element could not be created.
    Element(String),
    /// The browser refused to start playback.
    Playback(String),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::Element(msg) => write!(f, "Could not create audio element: {}", msg),
            PreviewError::Playback(msg) => write!(f, "Audio playback failed: {}", msg),
        }
    }
}

impl std::error::Error for PreviewError {}

/// Plays a short sample of an alarm sound.
///
/// Implementations must not block: playback is dispatched and forgotten.
pub trait AudioPreview {
    fn preview(&self, sound: AlarmSound, volume: f64) -> Result<(), PreviewError>;
}

/// Preview backed by an `HTMLAudioElement`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HtmlAudioPreview;

impl AudioPreview for HtmlAudioPreview {
    fn preview(&self, sound: AlarmSound, volume: f64) -> Result<(), PreviewError> {
        let audio = web_sys::HtmlAudioElement::new_with_src(sound.source())
            .map_err(|e| PreviewError::Element(js_error_text(&e)))?;
        audio.set_volume(volume.clamp(MIN_VOLUME, MAX_VOLUME));
        let promise = audio
            .play()
            .map_err(|e| PreviewError::Playback(js_error_text(&e)))?;

        debug!("Previewing alarm {} at volume {:.1}", sound, volume);
        wasm_bindgen_futures::spawn_local(async move {
            // Autoplay policies reject the promise; nothing to recover.
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                warn!("Alarm preview rejected: {}", js_error_text(&e));
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_round_trip_through_lookup() {
        for sound in AlarmSound::CHOICES {
            assert_eq!(AlarmSound::from_source(sound.source()), Some(sound));
        }
        assert_eq!(AlarmSound::from_source(DEFAULT_ALARM_URL), Some(AlarmSound::Beep));
        assert_eq!(AlarmSound::from_source("/assets/music/kazoo.wav"), None);
    }

    #[test]
    fn persists_as_asset_path() {
        let json = serde_json::to_string(&AlarmSound::Piano).unwrap();
        assert_eq!(json, "\"/assets/music/piano.wav\"");
        let err = serde_json::from_str::<AlarmSound>("\"nope.wav\"");
        assert!(err.is_err());
    }
}
