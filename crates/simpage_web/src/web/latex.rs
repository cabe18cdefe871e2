use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = MathJax, js_name = typeset, catch)]
    fn mathjax_typeset() -> Result<(), JsValue>;
}

/// Typeset math in the page. Pages without MathJax just keep the raw markup.
pub fn typeset() {
    if let Err(err) = mathjax_typeset() {
        tracing::debug!(error = ?err, "MathJax.typeset unavailable");
    }
}
