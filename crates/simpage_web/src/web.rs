use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use simpage::error::PageResult;
use simpage::page::{PageController, PageDefinition, Variant};
use simpage::time::MonotonicClock;

use crate::bootstrap::{self, BootstrapError, Startup, CONFIG_ELEMENT_ID};

mod dom;
mod host;
mod js_model;
mod latex;
mod logging;
mod timer;

use host::DomHost;
use js_model::JsModel;
use timer::{HandlerSlot, TickTimer};

type Controller = PageController<DomHost, JsModel, MonotonicClock>;

fn to_js(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Run one event against the controller. Events that arrive while another
/// handler holds the controller are dropped.
fn dispatch(
    controller: &Weak<RefCell<Controller>>,
    event: &str,
    f: impl FnOnce(&mut Controller) -> PageResult<()>,
) {
    let Some(controller) = controller.upgrade() else {
        return;
    };
    let Ok(mut controller) = controller.try_borrow_mut() else {
        tracing::debug!(event, "controller busy, dropping event");
        return;
    };
    if let Err(err) = f(&mut controller) {
        tracing::warn!(event, error = %err, "page event failed");
    }
}

/// One mounted demo page.
#[wasm_bindgen]
pub struct Page {
    controller: Rc<RefCell<Controller>>,
    listeners: Vec<EventListener>,
    startup: Startup,
}

#[wasm_bindgen]
impl Page {
    /// `demo` is a page path (`cellular_automata/maze`) or export name
    /// (`CA_MAZE`); `model` and `params` are the two exported classes.
    pub fn setup(demo: &str, model: JsValue, params: JsValue) -> Result<Page, JsValue> {
        let definition = bootstrap::resolve_demo(demo).map_err(to_js)?.definition();
        let model = JsModel::new(&definition, model, params);
        Self::create(definition, model).map_err(to_js)
    }

    /// Like [`Page::setup`], looking both classes up on a module namespace.
    #[wasm_bindgen(js_name = setupFromModule)]
    pub fn setup_from_module(demo: &str, module: &JsValue) -> Result<Page, JsValue> {
        let definition = bootstrap::resolve_demo(demo).map_err(to_js)?.definition();
        let model = JsModel::from_module(&definition, module).map_err(to_js)?;
        Self::create(definition, model).map_err(to_js)
    }

    /// Attach the event listeners and run the initial mount.
    pub fn main(&mut self) -> Result<(), JsValue> {
        let mut startup = self.startup;
        let result = startup.advance(
            self,
            |page| page.listen().map_err(to_js),
            |page| page.listeners.clear(),
            |page| {
                let mounted = page.controller.borrow_mut().mount();
                mounted.map_err(to_js)
            },
        );
        self.startup = startup;
        result
    }

    /// Re-read every control and render once.
    #[wasm_bindgen(js_name = renderNow)]
    pub fn render_now(&self) -> Result<(), JsValue> {
        let mut controller = self
            .controller
            .try_borrow_mut()
            .map_err(|_| to_js("page is busy"))?;
        controller.render_now().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.controller.borrow().definition().label.to_string()
    }
}

impl Page {
    fn create(definition: PageDefinition, model: JsModel) -> Result<Page, BootstrapError> {
        let document = dom::document()?;
        let config =
            bootstrap::resolve_config(dom::script_text(&document, CONFIG_ELEMENT_ID).as_deref());
        logging::init(bootstrap::log_level(&config.log_level));

        let slot: HandlerSlot = Rc::new(RefCell::new(None));
        let host = DomHost::new(
            document,
            &config.elements,
            definition.surface,
            TickTimer::new(slot.clone()),
        )?;
        tracing::info!(page = definition.label, export = definition.export, "page created");

        let controller = Rc::new(RefCell::new(PageController::new(
            definition,
            config,
            host,
            model,
            MonotonicClock::new(),
        )));
        let weak = Rc::downgrade(&controller);
        *slot.borrow_mut() = Some(Rc::new(move |token| {
            dispatch(&weak, "tick", |c| c.on_tick(token));
        }));

        Ok(Page {
            controller,
            listeners: Vec::new(),
            startup: Startup::default(),
        })
    }

    fn on(&mut self, target: &Element, event: &'static str, f: fn(&mut Controller, &str) -> PageResult<()>) {
        let weak = Rc::downgrade(&self.controller);
        let id = target.id();
        self.listeners.push(EventListener::new(target, event, move |_| {
            dispatch(&weak, event, |c| f(c, &id));
        }));
    }

    fn listen(&mut self) -> Result<(), BootstrapError> {
        let document = dom::document()?;
        let (controls, variant, elements) = {
            let controller = self.controller.borrow();
            let definition = controller.definition();
            (
                definition.input_controls(),
                definition.variant,
                controller.config().elements.clone(),
            )
        };

        for id in controls {
            let el: Element = dom::element(&document, id)?;
            self.on(&el, "input", |c, id| c.on_input(id));
        }

        if variant == Variant::Stepped {
            let step: Element = dom::element(&document, &elements.step)?;
            self.on(&step, "input", |c, id| c.on_input(id));
            let rewind: Element = dom::element(&document, &elements.rewind)?;
            self.on(&rewind, "click", |c, _| c.on_rewind());
            let play_pause: Element = dom::element(&document, &elements.play_pause)?;
            self.on(&play_pause, "click", |c, _| c.on_play_pause());
        }

        let window = dom::window()?;
        let weak = Rc::downgrade(&self.controller);
        self.listeners.push(EventListener::new(&window, "resize", move |_| {
            dispatch(&weak, "resize", |c| c.on_resize());
        }));

        tracing::debug!(count = self.listeners.len(), "listeners attached");
        Ok(())
    }
}
