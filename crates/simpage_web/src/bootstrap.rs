//! Page bootstrap decisions that do not need a browser.

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;

use simpage::config::PageConfig;
use simpage_demos::DemoKind;

/// `<script type="application/json">` element holding page overrides.
pub const CONFIG_ELEMENT_ID: &str = "simpage-config";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("unknown demo page: {0}")]
    UnknownDemo(String),

    #[error("model module has no export `{0}`")]
    MissingExport(String),

    #[error("page element #{0} is missing")]
    MissingElement(String),

    #[error("browser call failed: {0}")]
    Js(String),
}

pub fn resolve_demo(name: &str) -> Result<DemoKind, BootstrapError> {
    DemoKind::from_label(name).ok_or_else(|| BootstrapError::UnknownDemo(name.to_string()))
}

/// Page config from the embedded JSON, or the defaults when it is absent or
/// malformed.
pub fn resolve_config(raw: Option<&str>) -> PageConfig {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PageConfig::default();
    };
    match PageConfig::from_json_str(text) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed page config");
            PageConfig::default()
        }
    }
}

pub fn log_level(raw: &str) -> Level {
    Level::from_str(raw.trim()).unwrap_or(Level::INFO)
}

/// How seed control text is handed to a model's `u64` setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedArg {
    /// Passed as a `BigInt`.
    Integer(u64),
    /// Passed through unchanged; the model's own conversion reports the error.
    Text(String),
}

impl SeedArg {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(v) => SeedArg::Integer(v),
            Err(_) => SeedArg::Text(raw.to_string()),
        }
    }
}

/// How far `Page::main` got. A failed step is retried on the next call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    #[default]
    Fresh,
    Listening,
    Mounted,
}

impl Startup {
    /// Attach listeners once, then mount once. Listeners from a failed attach
    /// are dropped through `detach` so the retry starts clean.
    pub fn advance<T, E>(
        &mut self,
        page: &mut T,
        listen: impl FnOnce(&mut T) -> Result<(), E>,
        detach: impl FnOnce(&mut T),
        mount: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Result<(), E> {
        if *self == Startup::Fresh {
            if let Err(err) = listen(page) {
                detach(page);
                return Err(err);
            }
            *self = Startup::Listening;
        }
        if *self == Startup::Listening {
            mount(page)?;
            *self = Startup::Mounted;
        }
        Ok(())
    }
}
