//! Per-page composition root.
//!
//! A [`PageDefinition`] says which controls a page has and how they map onto the
//! external model's builder. [`PageController`] owns everything a page needs at
//! runtime (host, model, binder schema, viewport, pipeline, playback) and turns
//! host events into renders.

use std::fmt;

use hashbrown::HashMap;

use crate::config::{PageConfig, ViewportConfig};
use crate::error::{PageError, PageResult};
use crate::params::{
    parse_js_number, FieldKind, FieldSpec, ParamBuilder, ParamSchema, ParameterRecord,
};
use crate::playback::{PlaybackController, TickToken, Transition};
use crate::render::{
    Clock, DrawingSurface, ModelFactory, ModelInstance, RenderPipeline, RenderResult,
    SolverChoice, StatusSink, TickScheduler,
};
use crate::simplex::{Compartment, Compartments};
use crate::viewport::{LayoutTarget, ViewportManager};

const IMAGE_MIME: &str = "image/png";

/// Where the model paints and where the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The model draws straight into the visible canvas.
    Canvas,
    /// The model draws into an off-screen canvas copied into an `<img>`.
    Image,
}

impl SurfaceKind {
    pub fn floor(self, config: &ViewportConfig) -> f64 {
        match self {
            SurfaceKind::Canvas => config.plot_floor,
            SurfaceKind::Image => config.image_floor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `Model.draw(surface, [tag,] params)` on every input.
    Stateless,
    /// `Model.build(params)` once per structural change, then `draw(surface, step)`.
    Stepped,
}

/// Extra leading argument passed to `Model.draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTag {
    None,
    /// Raw value of a plot-type selector.
    PlotType { control: &'static str },
    /// Solver selector; see [`SolverChoice`].
    Solver { control: &'static str },
}

impl DrawTag {
    fn control(self) -> Option<&'static str> {
        match self {
            DrawTag::None => None,
            DrawTag::PlotType { control } | DrawTag::Solver { control } => Some(control),
        }
    }
}

/// Where a field's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Control(&'static str),
    /// Three controls feeding a three-argument setter.
    Controls([&'static str; 3]),
    /// Constant arguments for a three-argument setter.
    Fixed([f64; 3]),
    /// The controller's rebalanced compartment fractions.
    Compartment(Compartment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub spec: FieldSpec,
    pub source: Source,
}

impl FieldBinding {
    pub fn control(spec: FieldSpec, id: &'static str) -> Self {
        Self {
            spec,
            source: Source::Control(id),
        }
    }

    pub fn controls(spec: FieldSpec, ids: [&'static str; 3]) -> Self {
        Self {
            spec,
            source: Source::Controls(ids),
        }
    }

    pub fn fixed(spec: FieldSpec, values: [f64; 3]) -> Self {
        Self {
            spec,
            source: Source::Fixed(values),
        }
    }

    pub fn compartment(spec: FieldSpec, compartment: Compartment) -> Self {
        Self {
            spec,
            source: Source::Compartment(compartment),
        }
    }
}

/// Controls holding the three compartment fractions. Pages without a recovered
/// control derive it from the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompartmentControls {
    pub susceptible: &'static str,
    pub infected: &'static str,
    pub recovered: Option<&'static str>,
}

impl CompartmentControls {
    fn control(&self, c: Compartment) -> Option<&'static str> {
        match c {
            Compartment::Susceptible => Some(self.susceptible),
            Compartment::Infected => Some(self.infected),
            Compartment::Recovered => self.recovered,
        }
    }

    fn compartment_of(&self, id: &str) -> Option<Compartment> {
        Compartment::ALL
            .into_iter()
            .find(|&c| self.control(c) == Some(id))
    }
}

/// What a caption function can see: raw control text, the bound record and the
/// current step.
pub struct CaptionContext<'a> {
    values: &'a HashMap<&'static str, String>,
    record: Option<&'a ParameterRecord>,
    step: Option<u32>,
}

impl<'a> CaptionContext<'a> {
    pub fn new(
        values: &'a HashMap<&'static str, String>,
        record: Option<&'a ParameterRecord>,
        step: Option<u32>,
    ) -> Self {
        Self {
            values,
            record,
            step,
        }
    }

    /// Raw control text, as the user typed it.
    pub fn raw(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    /// Control text parsed like `Number(text)`; NaN when malformed.
    pub fn raw_number(&self, id: &str) -> f64 {
        parse_js_number(self.raw(id)).unwrap_or(f64::NAN)
    }

    /// Bound numeric field, NaN when absent.
    pub fn field(&self, name: &str) -> f64 {
        self.record
            .and_then(|r| r.number(name))
            .unwrap_or(f64::NAN)
    }

    pub fn step(&self) -> u32 {
        self.step.unwrap_or(0)
    }
}

pub type CaptionFn = fn(&CaptionContext<'_>) -> String;

/// Static description of one demo page.
#[derive(Clone)]
pub struct PageDefinition {
    pub label: &'static str,
    pub title: &'static str,
    /// Class name in the external module; its builder is `<export>_Params`.
    pub export: &'static str,
    pub surface: SurfaceKind,
    pub variant: Variant,
    pub draw_tag: DrawTag,
    pub bindings: Vec<FieldBinding>,
    pub compartments: Option<CompartmentControls>,
    pub caption: CaptionFn,
    /// Caption carries math notation to typeset.
    pub typeset: bool,
}

impl fmt::Debug for PageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDefinition")
            .field("label", &self.label)
            .field("export", &self.export)
            .field("surface", &self.surface)
            .field("variant", &self.variant)
            .field("draw_tag", &self.draw_tag)
            .field("bindings", &self.bindings.len())
            .field("typeset", &self.typeset)
            .finish_non_exhaustive()
    }
}

impl PageDefinition {
    pub fn schema(&self) -> ParamSchema {
        ParamSchema::new(self.bindings.iter().map(|b| b.spec.clone()).collect())
    }

    pub fn params_export(&self) -> String {
        format!("{}_Params", self.export)
    }

    /// Every control whose `input` event the page listens to, without duplicates,
    /// in first-use order. The step slider of stepped pages is not included.
    pub fn input_controls(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        let mut push = |id: &'static str| {
            if !out.contains(&id) {
                out.push(id);
            }
        };
        if let Some(id) = self.draw_tag.control() {
            push(id);
        }
        for binding in &self.bindings {
            match &binding.source {
                Source::Control(id) => push(*id),
                Source::Controls(ids) => ids.iter().copied().for_each(&mut push),
                Source::Fixed(_) => {}
                Source::Compartment(c) => {
                    if let Some(id) = self.compartments.and_then(|cc| cc.control(*c)) {
                        push(id);
                    }
                }
            }
        }
        if let Some(cc) = self.compartments {
            Compartment::ALL
                .into_iter()
                .filter_map(|c| cc.control(c))
                .for_each(&mut push);
        }
        out
    }
}

/// Form controls of the page.
pub trait Controls {
    fn control_value(&self, id: &str) -> Option<String>;
    fn set_control_value(&mut self, id: &str, value: &str);
    fn set_control_max(&mut self, id: &str, max: u32);
}

/// Everything the controller needs from the page it is attached to.
pub trait PageHost: Controls + StatusSink + TickScheduler {
    type Surface: DrawingSurface;

    /// The visible element sized by the viewport manager.
    fn layout(&mut self) -> &mut dyn LayoutTarget;

    /// The surface the model paints on.
    fn surface(&mut self) -> &mut Self::Surface;

    /// Show an encoded snapshot in the visible image element.
    fn show_image(&mut self, data_url: &str);

    /// Switch the play/pause button icon.
    fn show_playing(&mut self, playing: bool);
}

pub struct PageController<H, M, K>
where
    H: PageHost,
    M: ModelFactory<H::Surface>,
    K: Clock,
{
    definition: PageDefinition,
    config: PageConfig,
    schema: ParamSchema,
    host: H,
    model: M,
    viewport: ViewportManager,
    pipeline: RenderPipeline<K>,
    playback: Option<PlaybackController>,
    instance: Option<M::Instance>,
    /// Why the last rebuild left no instance.
    build_error: Option<PageError>,
    record: Option<ParameterRecord>,
    compartments: Option<Compartments>,
}

impl<H, M, K> PageController<H, M, K>
where
    H: PageHost,
    M: ModelFactory<H::Surface>,
    K: Clock,
{
    pub fn new(definition: PageDefinition, config: PageConfig, host: H, model: M, clock: K) -> Self {
        let schema = definition.schema();
        let viewport =
            ViewportManager::from_config(&config.viewport, definition.surface.floor(&config.viewport));
        let pipeline = RenderPipeline::new(clock, config.messages.clone());
        let playback = match definition.variant {
            Variant::Stepped => Some(PlaybackController::new(config.playback.interval_ms)),
            Variant::Stateless => None,
        };
        Self {
            definition,
            config,
            schema,
            host,
            model,
            viewport,
            pipeline,
            playback,
            instance: None,
            build_error: None,
            record: None,
            compartments: None,
        }
    }

    pub fn definition(&self) -> &PageDefinition {
        &self.definition
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn playback(&self) -> Option<&PlaybackController> {
        self.playback.as_ref()
    }

    pub fn instance(&self) -> Option<&M::Instance> {
        self.instance.as_ref()
    }

    pub fn compartments(&self) -> Option<&Compartments> {
        self.compartments.as_ref()
    }

    pub fn last_render(&self) -> Option<RenderResult> {
        self.pipeline.last_result()
    }

    /// Initial mount: announce readiness, seed compartments, build the stepped
    /// model, then size the viewport and render once.
    pub fn mount(&mut self) -> PageResult<()> {
        self.host.set_status(&self.config.messages.loaded);
        tracing::info!(page = self.definition.label, "mounting page");

        if self.definition.compartments.is_some() {
            self.seed_compartments()?;
        }
        if self.playback.is_some() {
            let transition = self.rebuild()?;
            self.execute(Transition {
                render: false,
                ..transition
            })?;
        }
        self.on_resize()
    }

    /// `input` event on control `id`.
    pub fn on_input(&mut self, id: &str) -> PageResult<()> {
        if self.playback.is_some() {
            if id == self.config.elements.step {
                return self.scrub();
            }
            self.known_control(id)?;
            // Every bound control of a stepped page is structural.
            let transition = self.rebuild()?;
            return self.execute(transition);
        }

        self.known_control(id)?;
        if let Some(c) = self.definition.compartments.and_then(|cc| cc.compartment_of(id)) {
            self.rebalance(c, id)?;
        }
        self.render_now().map(|_| ())
    }

    /// Window resize (and initial layout).
    pub fn on_resize(&mut self) -> PageResult<()> {
        let spec = self.viewport.resize(self.host.layout());
        if self.definition.surface == SurfaceKind::Image {
            self.host
                .surface()
                .set_pixel_size(spec.backing_width, spec.backing_height);
        }
        self.render_now().map(|_| ())
    }

    pub fn on_rewind(&mut self) -> PageResult<()> {
        match self.playback.as_mut() {
            Some(p) => {
                let transition = p.rewind();
                self.execute(transition)
            }
            None => Ok(()),
        }
    }

    pub fn on_play_pause(&mut self) -> PageResult<()> {
        match self.playback.as_mut() {
            Some(p) => {
                let transition = p.toggle();
                self.execute(transition)
            }
            None => Ok(()),
        }
    }

    /// Single-shot timer fired.
    pub fn on_tick(&mut self, token: TickToken) -> PageResult<()> {
        match self.playback.as_mut() {
            Some(p) => {
                let transition = p.tick(token);
                if transition.is_noop() {
                    return Ok(());
                }
                self.execute(transition)
            }
            None => Ok(()),
        }
    }

    /// Render from the freshest control values (or the current step).
    pub fn render_now(&mut self) -> PageResult<RenderResult> {
        let values = match self.read_controls() {
            Ok(v) => v,
            Err(err) => return Err(self.report(err)),
        };
        match self.definition.variant {
            Variant::Stateless => self.render_stateless(&values),
            Variant::Stepped => self.render_step(&values),
        }
    }

    fn render_stateless(&mut self, values: &HashMap<&'static str, String>) -> PageResult<RenderResult> {
        let (record, tag) = match self.bind(values) {
            Ok(bound) => bound,
            Err(err) => return Err(self.report(err)),
        };
        let caption = (self.definition.caption)(&CaptionContext::new(values, Some(&record), None));
        let present = self.definition.surface == SurfaceKind::Image;
        let model = &mut self.model;

        let result = self
            .pipeline
            .run(&mut self.host, &caption, self.definition.typeset, |host| {
                model.draw(host.surface(), tag.as_deref(), &record)?;
                if present {
                    let url = host.surface().to_data_url(IMAGE_MIME)?;
                    host.show_image(&url);
                }
                Ok(())
            })?;
        self.record = Some(record);
        Ok(result)
    }

    fn render_step(&mut self, values: &HashMap<&'static str, String>) -> PageResult<RenderResult> {
        if self.instance.is_none() {
            let err = self
                .build_error
                .clone()
                .unwrap_or(PageError::NoModelInstance);
            return Err(self.report(err));
        }
        let step = self.playback.as_ref().map(PlaybackController::index).unwrap_or(0);
        let caption = (self.definition.caption)(&CaptionContext::new(
            values,
            self.record.as_ref(),
            Some(step),
        ));
        let present = self.definition.surface == SurfaceKind::Image;
        let Some(instance) = self.instance.as_mut() else {
            return Err(PageError::NoModelInstance);
        };

        self.pipeline
            .run(&mut self.host, &caption, self.definition.typeset, |host| {
                instance.draw(host.surface(), step)?;
                if present {
                    let url = host.surface().to_data_url(IMAGE_MIME)?;
                    host.show_image(&url);
                }
                Ok(())
            })
    }

    /// Bind the record for the current controls, with the draw tag it goes with.
    pub fn bind(
        &self,
        values: &HashMap<&'static str, String>,
    ) -> PageResult<(ParameterRecord, Option<String>)> {
        let mut builder = self.schema.builder(self.config.coercion);
        let tag = match self.definition.draw_tag {
            DrawTag::None => None,
            DrawTag::PlotType { control } => Some(lookup(values, control)?.to_string()),
            DrawTag::Solver { control } => {
                let choice = SolverChoice::from_value(lookup(values, control)?);
                builder = builder.branch(choice.branch());
                Some(choice.tag().to_string())
            }
        };

        let branch = builder.selected_branch();
        for binding in &self.definition.bindings {
            if binding.spec.applies_to(branch) {
                builder = bind_field(builder, binding, values, self.compartments.as_ref())?;
            }
        }
        Ok((builder.build()?, tag))
    }

    fn rebuild(&mut self) -> PageResult<Transition> {
        match self.try_rebuild() {
            Ok(max_step) => {
                self.host.set_control_max(&self.config.elements.step, max_step);
                let transition = match self.playback.as_mut() {
                    Some(p) => p.reset(max_step),
                    None => Transition::default(),
                };
                tracing::info!(page = self.definition.label, max_step, "model rebuilt");
                Ok(transition)
            }
            Err(err) => {
                self.instance = None;
                self.build_error = Some(err.clone());
                if let Some(token) = self.playback.as_mut().and_then(|p| p.reset(0).cancel) {
                    self.host.cancel_tick(token);
                }
                self.host.show_playing(false);
                Err(self.report(err))
            }
        }
    }

    fn try_rebuild(&mut self) -> PageResult<u32> {
        let values = self.read_controls()?;
        let (record, _) = self.bind(&values)?;
        let instance = self.model.build(&record)?;
        let max_step = instance.max_step();
        self.instance = Some(instance);
        self.build_error = None;
        self.record = Some(record);
        Ok(max_step)
    }

    fn scrub(&mut self) -> PageResult<()> {
        let raw = lookup_host(&self.host, &self.config.elements.step)?;
        let value = parse_js_number(&raw).unwrap_or(f64::NAN);
        match self.playback.as_mut() {
            Some(p) => {
                let transition = p.scrub(value);
                self.execute(transition)
            }
            None => Ok(()),
        }
    }

    fn execute(&mut self, transition: Transition) -> PageResult<()> {
        if let Some(token) = transition.cancel {
            self.host.cancel_tick(token);
        }
        if let Some(tick) = transition.schedule {
            self.host.schedule_tick(tick);
        }
        let (index, playing) = match self.playback.as_ref() {
            Some(p) => (p.index(), p.is_playing()),
            None => return Ok(()),
        };
        self.host
            .set_control_value(&self.config.elements.step, &index.to_string());
        self.host.show_playing(playing);

        if !transition.render {
            return Ok(());
        }
        if let Err(err) = self.render_now() {
            if let Some(token) = self.playback.as_mut().and_then(|p| p.pause().cancel) {
                self.host.cancel_tick(token);
            }
            self.host.show_playing(false);
            return Err(err);
        }
        Ok(())
    }

    fn seed_compartments(&mut self) -> PageResult<()> {
        let Some(cc) = self.definition.compartments else {
            return Ok(());
        };
        let read = |id: &str| -> PageResult<f64> {
            Ok(parse_js_number(&lookup_host(&self.host, id)?).unwrap_or(0.0))
        };
        let s = read(cc.susceptible)?;
        let i = read(cc.infected)?;
        let r = match cc.recovered {
            Some(id) => read(id)?,
            None => (1.0 - s - i).max(0.0),
        };
        self.compartments = Some(Compartments::normalized(s, i, r));
        self.sync_compartment_controls();
        Ok(())
    }

    fn rebalance(&mut self, edited: Compartment, id: &str) -> PageResult<()> {
        let raw = lookup_host(&self.host, id)?;
        let value = parse_js_number(&raw).unwrap_or(f64::NAN);
        self.compartments
            .get_or_insert_with(Compartments::default)
            .rebalance(edited, value);
        self.sync_compartment_controls();
        Ok(())
    }

    /// Write back fractions whose control text no longer matches. Controls that
    /// already parse to the stored value are left alone so partial typing survives.
    fn sync_compartment_controls(&mut self) {
        let (Some(cc), Some(comps)) = (self.definition.compartments, self.compartments) else {
            return;
        };
        for c in Compartment::ALL {
            let Some(id) = cc.control(c) else {
                continue;
            };
            let stored = comps.get(c);
            let shown = self
                .host
                .control_value(id)
                .and_then(|raw| parse_js_number(&raw));
            let in_sync = matches!(shown, Some(v) if (v - stored).abs() <= 1e-9);
            if !in_sync {
                self.host
                    .set_control_value(id, &crate::float_fmt::fmt_trimmed(stored, 6));
            }
        }
    }

    fn read_controls(&self) -> PageResult<HashMap<&'static str, String>> {
        self.definition
            .input_controls()
            .into_iter()
            .map(|id| -> PageResult<(&'static str, String)> {
                Ok((id, lookup_host(&self.host, id)?))
            })
            .collect()
    }

    fn known_control(&self, id: &str) -> PageResult<()> {
        if self.definition.input_controls().iter().any(|c| *c == id) {
            Ok(())
        } else {
            Err(PageError::UnknownControl { id: id.to_string() })
        }
    }

    fn report(&mut self, err: PageError) -> PageError {
        tracing::warn!(page = self.definition.label, error = %err, "page update failed");
        self.host
            .set_status(&self.config.messages.failed_message(&err));
        err
    }
}

fn lookup<'v>(values: &'v HashMap<&'static str, String>, id: &str) -> PageResult<&'v str> {
    values
        .get(id)
        .map(String::as_str)
        .ok_or_else(|| PageError::UnknownControl { id: id.to_string() })
}

fn lookup_host<C: Controls + ?Sized>(host: &C, id: &str) -> PageResult<String> {
    host.control_value(id)
        .ok_or_else(|| PageError::UnknownControl { id: id.to_string() })
}

fn bind_field<'s>(
    builder: ParamBuilder<'s>,
    binding: &FieldBinding,
    values: &HashMap<&'static str, String>,
    compartments: Option<&Compartments>,
) -> PageResult<ParamBuilder<'s>> {
    let name = binding.spec.name;
    match &binding.source {
        Source::Control(id) => {
            let raw = lookup(values, id)?;
            match binding.spec.kind {
                FieldKind::Enum => builder.text(name, raw),
                FieldKind::Seed => builder.seed(name, raw),
                _ => builder.number(name, raw),
            }
        }
        Source::Controls([a, b, c]) => {
            let raws = [lookup(values, a)?, lookup(values, b)?, lookup(values, c)?];
            builder.triple(name, raws)
        }
        Source::Fixed(v) => builder.triple_value(name, *v),
        Source::Compartment(c) => {
            let comps = compartments.ok_or_else(|| PageError::MissingField {
                field: name.to_string(),
            })?;
            builder.number_value(name, comps.get(*c))
        }
    }
}
