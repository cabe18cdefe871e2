//! The compiled model module, reached through `Reflect`.
//!
//! Every demo export is a class pair: `<EXPORT>` with static `draw`/`build`
//! and `<EXPORT>_Params` with a static `builder()` whose setters consume the
//! builder and return the next one.

use js_sys::{Array, BigInt, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use simpage::error::ModelError;
use simpage::page::PageDefinition;
use simpage::params::{FieldKind, ParamValue, ParameterRecord, ParamsBuilder};
use simpage::render::{ModelFactory, ModelInstance};

use crate::bootstrap::{BootstrapError, SeedArg};

use super::host::CanvasSurface;

/// Best-effort message out of a thrown value.
pub fn describe(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn call(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let f = Reflect::get(target, &JsValue::from_str(method))?;
    let f: Function = f
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("`{method}` is not a function")))?;
    f.apply(target, args)
}

fn export(module: &JsValue, name: &str) -> Result<JsValue, BootstrapError> {
    Reflect::get(module, &JsValue::from_str(name))
        .ok()
        .filter(JsValue::is_function)
        .ok_or_else(|| BootstrapError::MissingExport(name.to_string()))
}

pub struct JsModel {
    model: JsValue,
    params: JsValue,
    seeds: Vec<&'static str>,
}

impl JsModel {
    pub fn new(definition: &PageDefinition, model: JsValue, params: JsValue) -> Self {
        let seeds = definition
            .bindings
            .iter()
            .filter(|b| b.spec.kind == FieldKind::Seed)
            .map(|b| b.spec.name)
            .collect();
        Self {
            model,
            params,
            seeds,
        }
    }

    /// Look the class pair up on an imported module namespace.
    pub fn from_module(
        definition: &PageDefinition,
        module: &JsValue,
    ) -> Result<Self, BootstrapError> {
        let model = export(module, definition.export)?;
        let params = export(module, &definition.params_export())?;
        Ok(Self::new(definition, model, params))
    }

    fn bind(&self, record: &ParameterRecord) -> Result<JsValue, ModelError> {
        record.apply(self)
    }
}

impl ParamsBuilder for JsModel {
    type Params = JsValue;

    fn builder(&self) -> Result<JsValue, ModelError> {
        call(&self.params, "builder", &Array::new())
            .map_err(|e| ModelError::InvalidParameters(describe(&e)))
    }

    fn set(
        &self,
        params: JsValue,
        field: &str,
        value: &ParamValue,
    ) -> Result<JsValue, ModelError> {
        let args = Array::new();
        let is_seed = self.seeds.iter().any(|s| *s == field);
        match value {
            ParamValue::Number(v) => {
                args.push(&JsValue::from_f64(*v));
            }
            ParamValue::Text(t) if is_seed => match SeedArg::from_raw(t) {
                SeedArg::Integer(v) => {
                    args.push(&BigInt::from(v));
                }
                SeedArg::Text(t) => {
                    args.push(&JsValue::from_str(&t));
                }
            },
            ParamValue::Text(t) => {
                args.push(&JsValue::from_str(t));
            }
            ParamValue::Triple(vs) => {
                for v in vs {
                    args.push(&JsValue::from_f64(*v));
                }
            }
        }
        call(&params, field, &args)
            .map_err(|e| ModelError::InvalidParameters(format!("{field}: {}", describe(&e))))
    }
}

impl ModelFactory<CanvasSurface> for JsModel {
    type Instance = JsInstance;

    fn draw(
        &mut self,
        surface: &mut CanvasSurface,
        tag: Option<&str>,
        params: &ParameterRecord,
    ) -> Result<(), ModelError> {
        let built = self.bind(params)?;
        let args = Array::new();
        args.push(surface.canvas());
        if let Some(tag) = tag {
            args.push(&JsValue::from_str(tag));
        }
        args.push(&built);
        call(&self.model, "draw", &args)
            .map(|_| ())
            .map_err(|e| ModelError::RenderFailed(describe(&e)))
    }

    fn build(&mut self, params: &ParameterRecord) -> Result<JsInstance, ModelError> {
        let built = self.bind(params)?;
        let instance = call(&self.model, "build", &Array::of1(&built))
            .map_err(|e| ModelError::InvalidParameters(describe(&e)))?;
        let max_step = call(&instance, "max_step", &Array::new())
            .map_err(|e| ModelError::RenderFailed(describe(&e)))?
            .as_f64()
            .ok_or_else(|| ModelError::RenderFailed("max_step is not a number".to_string()))?;
        Ok(JsInstance {
            instance,
            max_step: max_step.max(0.0) as u32,
        })
    }
}

/// A built model; frees its wasm-side memory when replaced.
pub struct JsInstance {
    instance: JsValue,
    max_step: u32,
}

impl ModelInstance<CanvasSurface> for JsInstance {
    fn draw(&mut self, surface: &mut CanvasSurface, step: u32) -> Result<(), ModelError> {
        let args = Array::of2(surface.canvas(), &JsValue::from_f64(step as f64));
        call(&self.instance, "draw", &args)
            .map(|_| ())
            .map_err(|e| ModelError::RenderFailed(describe(&e)))
    }

    fn max_step(&self) -> u32 {
        self.max_step
    }
}

impl Drop for JsInstance {
    fn drop(&mut self) {
        let _ = call(&self.instance, "free", &Array::new());
    }
}
