//! # simpage
//!
//! Reactive page controllers for browser-hosted simulation demos.
//!
//! Each demo page reads a handful of form controls, binds them into an immutable
//! parameter record, hands that record to an externally compiled model, and shows
//! the rendered result with a caption and a latency readout. This crate holds the
//! part of that loop that does not depend on a browser, so it can be unit-tested
//! on the host.
//!
//! ## Quick Start
//!
//! ```
//! use simpage::prelude::*;
//!
//! let schema = ParamSchema::new(vec![
//!     FieldSpec::integer("rule").clamped(0.0, 255.0),
//!     FieldSpec::enumerated("boundary"),
//! ]);
//!
//! let record = schema
//!     .builder(CoercionPolicy::Fallback)
//!     .number("rule", "300")?
//!     .text("boundary", "periodic")?
//!     .build()?;
//!
//! assert_eq!(record.number("rule"), Some(255.0));
//! # Ok::<(), simpage::error::PageError>(())
//! ```
//!
//! ## Modules
//!
//! - [`params`]: field schema, fluent binder, immutable records
//! - [`simplex`]: three-compartment fraction rebalancing
//! - [`viewport`]: responsive canvas/image sizing
//! - [`render`]: model capability traits and the latency-measuring pipeline
//! - [`playback`]: step-indexed animation state machine
//! - [`page`]: the per-page composition root
//! - [`config`]: serde-backed page configuration

pub mod config;
pub mod error;
pub mod float_fmt;
pub mod page;
pub mod params;
pub mod playback;
pub mod render;
pub mod simplex;
pub mod time;
pub mod viewport;

/// Prelude module for convenient imports.
///
/// ```
/// use simpage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{CoercionPolicy, PageConfig};
    pub use crate::error::{ModelError, PageError, PageResult};
    pub use crate::page::{
        CaptionContext, Controls, DrawTag, FieldBinding, PageController, PageDefinition,
        PageHost, Source, SurfaceKind, Variant,
    };
    pub use crate::params::{
        FieldKind, FieldSpec, ParamBuilder, ParamSchema, ParamValue, ParameterRecord,
        ParamsBuilder,
    };
    pub use crate::playback::{PlaybackController, PlaybackState, ScheduledTick, TickToken};
    pub use crate::render::{
        Clock, DrawingSurface, ModelFactory, ModelInstance, NoInstance, RenderPipeline,
        RenderResult, SolverBranch, SolverChoice, StatusSink, TickScheduler,
    };
    pub use crate::simplex::{Compartment, Compartments};
    pub use crate::time::MonotonicClock;
    pub use crate::viewport::{LayoutTarget, ViewportManager, ViewportSpec};
}
