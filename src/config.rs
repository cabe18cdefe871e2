use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// What the binder does with numeric control text that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Substitute the field's declared fallback value.
    #[default]
    Fallback,
    /// Bind NaN and let the model normalize it (browser `Number()` behaviour).
    Passthrough,
    /// Fail the bind with [`crate::error::PageError::InvalidNumber`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_container_fraction")]
    pub container_fraction: f64,
    #[serde(default = "default_plot_floor")]
    pub plot_floor: f64,
    #[serde(default = "default_image_floor")]
    pub image_floor: f64,
    /// Multiply the backing store by the device pixel ratio. Off by default: pages
    /// have always sized the backing store to the logical size.
    #[serde(default)]
    pub scale_backing_by_dpr: bool,
}

fn default_container_fraction() -> f64 {
    0.8
}

fn default_plot_floor() -> f64 {
    600.0
}

fn default_image_floor() -> f64 {
    400.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            container_fraction: default_container_fraction(),
            plot_floor: default_plot_floor(),
            image_floor: default_image_floor(),
            scale_backing_by_dpr: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u32,
}

fn default_interval_ms() -> u32 {
    75
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Status readout texts. `{ms}` and `{error}` are substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMessages {
    pub loaded: String,
    pub rendering: String,
    pub rendered: String,
    pub failed: String,
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            loaded: "WebAssembly loaded!".to_string(),
            rendering: "Rendering...".to_string(),
            rendered: "Rendered in {ms}ms".to_string(),
            failed: "Render failed: {error}".to_string(),
        }
    }
}

impl StatusMessages {
    pub fn rendered_message(&self, ms: u64) -> String {
        self.rendered.replace("{ms}", &ms.to_string())
    }

    pub fn failed_message(&self, error: &dyn Display) -> String {
        self.failed.replace("{error}", &error.to_string())
    }
}

/// DOM ids of the elements every page shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub canvas: String,
    pub image: String,
    pub status: String,
    pub caption: String,
    pub step: String,
    pub rewind: String,
    pub play_pause: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            canvas: "canvas".to_string(),
            image: "image".to_string(),
            status: "status".to_string(),
            caption: "canvas_text".to_string(),
            step: "step".to_string(),
            rewind: "rewind".to_string(),
            play_pause: "play_pause".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub coercion: CoercionPolicy,
    #[serde(default)]
    pub messages: StatusMessages,
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PageConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
