use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, HtmlSelectElement, Window};

use crate::bootstrap::BootstrapError;

pub fn window() -> Result<Window, BootstrapError> {
    web_sys::window().ok_or_else(|| BootstrapError::Js("no global window".to_string()))
}

pub fn document() -> Result<Document, BootstrapError> {
    window()?
        .document()
        .ok_or_else(|| BootstrapError::Js("no document".to_string()))
}

/// Element `#id` as a concrete element type.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, BootstrapError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| BootstrapError::MissingElement(id.to_string()))
}

/// Current value of an `<input>` or `<select>`.
pub fn control_value(document: &Document, id: &str) -> Option<String> {
    let el = document.get_element_by_id(id)?;
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
}

pub fn set_control_value(document: &Document, id: &str, value: &str) {
    let Some(el) = document.get_element_by_id(id) else {
        return;
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    }
}

pub fn set_input_max(document: &Document, id: &str, max: &str) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_max(max);
    }
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_inner_html(document: &Document, id: &str, html: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_inner_html(html);
    }
}

/// Text of an embedded `<script>` block, if the page has one.
pub fn script_text(document: &Document, id: &str) -> Option<String> {
    document.get_element_by_id(id)?.text_content()
}
