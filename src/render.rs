//! Render pipeline and the capability traits the external model and the host
//! page provide.

use crate::config::StatusMessages;
use crate::error::{ModelError, PageResult};
use crate::params::ParameterRecord;
use crate::playback::{ScheduledTick, TickToken};

/// Status and caption readouts.
pub trait StatusSink {
    fn set_status(&mut self, text: &str);

    /// Caption markup under the paint target.
    fn set_caption(&mut self, html: &str);

    /// Ask the math typesetter to process the caption.
    fn typeset(&mut self) {}
}

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Single-shot timer capability used by the playback loop.
pub trait TickScheduler {
    fn schedule_tick(&mut self, tick: ScheduledTick);
    fn cancel_tick(&mut self, token: TickToken);
}

/// Canvas-like target the external model paints on.
pub trait DrawingSurface {
    fn pixel_size(&self) -> (u32, u32);
    fn set_pixel_size(&mut self, width: u32, height: u32);

    /// Encode the current contents, e.g. `image/png`.
    fn to_data_url(&self, mime: &str) -> Result<String, ModelError>;
}

/// The external module's `Model` class, for a surface type `S`.
pub trait ModelFactory<S: ?Sized> {
    type Instance: ModelInstance<S>;

    /// `Model.draw(surface, [tag,] params)`; a pure function of the parameters.
    fn draw(
        &mut self,
        surface: &mut S,
        tag: Option<&str>,
        params: &ParameterRecord,
    ) -> Result<(), ModelError>;

    /// `Model.build(params)` for stateful demos.
    fn build(&mut self, params: &ParameterRecord) -> Result<Self::Instance, ModelError> {
        let _ = params;
        Err(ModelError::Unsupported("build"))
    }
}

/// A built model holding a precomputed step sequence.
pub trait ModelInstance<S: ?Sized> {
    fn draw(&mut self, surface: &mut S, step: u32) -> Result<(), ModelError>;
    fn max_step(&self) -> u32;
}

/// Instance type for factories that only draw.
#[derive(Debug)]
pub enum NoInstance {}

impl<S: ?Sized> ModelInstance<S> for NoInstance {
    fn draw(&mut self, _surface: &mut S, _step: u32) -> Result<(), ModelError> {
        match *self {}
    }

    fn max_step(&self) -> u32 {
        match *self {}
    }
}

/// Which numerical solver family a multi-solver page selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverBranch {
    Stochastic,
    Ode,
}

impl SolverBranch {
    pub fn tag(self) -> &'static str {
        match self {
            SolverBranch::Stochastic => "ssa",
            SolverBranch::Ode => "ode",
        }
    }
}

/// Solver selector value split into draw tag and record branch.
///
/// `"ssa"` selects the stochastic branch (which carries the seed field); any other
/// value is an ODE method name passed through as the `solver` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverChoice {
    branch: SolverBranch,
    method: String,
}

impl SolverChoice {
    pub fn from_value(raw: &str) -> Self {
        let branch = if raw == "ssa" {
            SolverBranch::Stochastic
        } else {
            SolverBranch::Ode
        };
        Self {
            branch,
            method: raw.to_string(),
        }
    }

    pub fn branch(&self) -> SolverBranch {
        self.branch
    }

    pub fn tag(&self) -> &'static str {
        self.branch.tag()
    }

    /// ODE method name; `None` on the stochastic branch.
    pub fn method(&self) -> Option<&str> {
        match self.branch {
            SolverBranch::Ode => Some(&self.method),
            SolverBranch::Stochastic => None,
        }
    }
}

/// Opaque handle for a completed render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderResult {
    id: u64,
}

impl RenderResult {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Latency-measuring wrapper around one model call.
#[derive(Debug)]
pub struct RenderPipeline<K: Clock> {
    clock: K,
    messages: StatusMessages,
    last: Option<RenderResult>,
    renders: u64,
}

impl<K: Clock> RenderPipeline<K> {
    pub fn new(clock: K, messages: StatusMessages) -> Self {
        Self {
            clock,
            messages,
            last: None,
            renders: 0,
        }
    }

    pub fn last_result(&self) -> Option<RenderResult> {
        self.last
    }

    pub fn messages(&self) -> &StatusMessages {
        &self.messages
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Publish "in progress", run `draw`, publish the caption, then publish the
    /// measured latency. A failed draw leaves the caption untouched and puts the
    /// failure message on the status readout.
    pub fn run<H, F>(
        &mut self,
        host: &mut H,
        caption: &str,
        typeset: bool,
        draw: F,
    ) -> PageResult<RenderResult>
    where
        H: StatusSink + ?Sized,
        F: FnOnce(&mut H) -> PageResult<()>,
    {
        host.set_status(&self.messages.rendering);
        let start = self.clock.now_ms();

        if let Err(err) = draw(host) {
            tracing::warn!(error = %err, "render failed");
            host.set_status(&self.messages.failed_message(&err));
            return Err(err);
        }

        host.set_caption(caption);
        if typeset {
            host.typeset();
        }

        let end = self.clock.now_ms();
        let ms = (end - start).ceil().max(0.0) as u64;
        host.set_status(&self.messages.rendered_message(ms));

        self.renders += 1;
        let result = RenderResult { id: self.renders };
        self.last = Some(result);
        tracing::debug!(render = result.id, ms, "rendered");
        Ok(result)
    }
}
