//! DOM-backed [`PageHost`].

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, Window};

use simpage::config::ElementIds;
use simpage::error::ModelError;
use simpage::float_fmt::fmt_trimmed;
use simpage::page::{Controls, PageHost, SurfaceKind};
use simpage::playback::{ScheduledTick, TickToken};
use simpage::render::{DrawingSurface, StatusSink, TickScheduler};
use simpage::viewport::{LayoutTarget, ViewportSpec};

use crate::bootstrap::BootstrapError;

use super::dom;
use super::js_model::describe;
use super::latex;
use super::timer::TickTimer;

const PLAY_ICON: &str = r#"<svg class="w-6 h-6 text-gray-800" aria-hidden="true" xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="currentColor" viewBox="0 0 24 24"><path fill-rule="evenodd" d="M8.6 5.2A1 1 0 0 0 7 6v12a1 1 0 0 0 1.6.8l8-6a1 1 0 0 0 0-1.6l-8-6Z" clip-rule="evenodd"/></svg>"#;
const PAUSE_ICON: &str = r#"<svg class="w-6 h-6 text-gray-800" aria-hidden="true" xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="currentColor" viewBox="0 0 24 24"><path fill-rule="evenodd" d="M8 5a2 2 0 0 0-2 2v10a2 2 0 0 0 2 2h1a2 2 0 0 0 2-2V7a2 2 0 0 0-2-2H8Zm7 0a2 2 0 0 0-2 2v10a2 2 0 0 0 2 2h1a2 2 0 0 0 2-2V7a2 2 0 0 0-2-2h-1Z" clip-rule="evenodd"/></svg>"#;

/// The canvas a model paints on: the visible one, or an off-screen one whose
/// snapshot feeds the `<img>`.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for CanvasSurface {
    fn pixel_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn to_data_url(&self, mime: &str) -> Result<String, ModelError> {
        self.canvas
            .to_data_url_with_type(mime)
            .map_err(|e| ModelError::RenderFailed(describe(&e)))
    }
}

enum Visible {
    Canvas(HtmlCanvasElement),
    Image(HtmlImageElement),
}

/// The element the viewport manager sizes.
pub struct DomLayout {
    window: Window,
    visible: Visible,
}

impl DomLayout {
    fn element(&self) -> &HtmlElement {
        match &self.visible {
            Visible::Canvas(c) => c,
            Visible::Image(i) => i,
        }
    }
}

impl LayoutTarget for DomLayout {
    fn container_width(&self) -> f64 {
        self.element()
            .parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
            .map(|p| p.offset_width() as f64)
            .unwrap_or(0.0)
    }

    fn authored_size(&self) -> (f64, f64) {
        match &self.visible {
            Visible::Canvas(c) => (c.width() as f64, c.height() as f64),
            Visible::Image(i) => (i.width() as f64, i.height() as f64),
        }
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn apply(&mut self, spec: &ViewportSpec) {
        let style = self.element().style();
        let width = format!("{}px", fmt_trimmed(spec.logical_width, 3));
        let height = format!("{}px", fmt_trimmed(spec.logical_height, 3));
        if style.set_property("width", &width).is_err()
            || style.set_property("height", &height).is_err()
        {
            tracing::warn!("could not size the paint target");
        }
        match &self.visible {
            Visible::Canvas(c) => {
                c.set_width(spec.backing_width);
                c.set_height(spec.backing_height);
            }
            Visible::Image(i) => {
                i.set_width(spec.backing_width);
                i.set_height(spec.backing_height);
            }
        }
    }
}

pub struct DomHost {
    document: Document,
    elements: ElementIds,
    layout: DomLayout,
    surface: CanvasSurface,
    image: Option<HtmlImageElement>,
    timer: TickTimer,
}

impl DomHost {
    pub fn new(
        document: Document,
        elements: &ElementIds,
        surface: SurfaceKind,
        timer: TickTimer,
    ) -> Result<Self, BootstrapError> {
        let window = dom::window()?;
        let (visible, canvas, image) = match surface {
            SurfaceKind::Canvas => {
                let canvas: HtmlCanvasElement = dom::element(&document, &elements.canvas)?;
                (Visible::Canvas(canvas.clone()), canvas, None)
            }
            SurfaceKind::Image => {
                let image: HtmlImageElement = dom::element(&document, &elements.image)?;
                let canvas = document
                    .create_element("canvas")
                    .map_err(|e| BootstrapError::Js(describe(&e)))?
                    .dyn_into::<HtmlCanvasElement>()
                    .map_err(|_| BootstrapError::Js("created element is not a canvas".to_string()))?;
                (Visible::Image(image.clone()), canvas, Some(image))
            }
        };
        Ok(Self {
            document,
            elements: elements.clone(),
            layout: DomLayout { window, visible },
            surface: CanvasSurface { canvas },
            image,
            timer,
        })
    }
}

impl Controls for DomHost {
    fn control_value(&self, id: &str) -> Option<String> {
        dom::control_value(&self.document, id)
    }

    fn set_control_value(&mut self, id: &str, value: &str) {
        dom::set_control_value(&self.document, id, value);
    }

    fn set_control_max(&mut self, id: &str, max: u32) {
        dom::set_input_max(&self.document, id, &max.to_string());
    }
}

impl StatusSink for DomHost {
    fn set_status(&mut self, text: &str) {
        dom::set_text(&self.document, &self.elements.status, text);
    }

    fn set_caption(&mut self, html: &str) {
        dom::set_inner_html(&self.document, &self.elements.caption, html);
    }

    fn typeset(&mut self) {
        latex::typeset();
    }
}

impl TickScheduler for DomHost {
    fn schedule_tick(&mut self, tick: ScheduledTick) {
        self.timer.schedule(tick);
    }

    fn cancel_tick(&mut self, token: TickToken) {
        self.timer.cancel(token);
    }
}

impl PageHost for DomHost {
    type Surface = CanvasSurface;

    fn layout(&mut self) -> &mut dyn LayoutTarget {
        &mut self.layout
    }

    fn surface(&mut self) -> &mut CanvasSurface {
        &mut self.surface
    }

    fn show_image(&mut self, data_url: &str) {
        if let Some(image) = &self.image {
            image.set_src(data_url);
        }
    }

    fn show_playing(&mut self, playing: bool) {
        let icon = if playing { PAUSE_ICON } else { PLAY_ICON };
        dom::set_inner_html(&self.document, &self.elements.play_pause, icon);
    }
}
