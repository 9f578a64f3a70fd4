//! WASM bindings for the atomic CSS builder.
//!
//! Exposes `compile()` to JavaScript via wasm-bindgen.
//! Accepts the catalog and config as plain JS values and returns
//! `{ css, selectors }` or throws on error.

use atomic_core::{Catalog, Config, Engine};
use atomic_css::EmitOptions;
use wasm_bindgen::prelude::*;

/// The result of a native compile: CSS text plus selector count.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub css: String,
    pub selectors: usize,
}

/// Run the whole pipeline on JSON values.
pub fn compile_values(
    catalog: &serde_json::Value,
    config: &serde_json::Value,
    minify: bool,
) -> Result<Compiled, String> {
    let catalog = Catalog::from_value(catalog).map_err(|e| e.to_string())?;
    let config = Config::from_value(config).map_err(|e| e.to_string())?;
    let engine = Engine::new(catalog, config).map_err(|e| e.to_string())?;

    let view = engine.build_view().map_err(|e| e.to_string())?;
    let settings = engine
        .config()
        .and_then(|c| c.settings.clone())
        .unwrap_or_default();
    let css = atomic_css::generate(&view, &settings, &EmitOptions { minify })
        .map_err(|e| e.to_string())?;

    Ok(Compiled {
        css,
        selectors: engine.build().len(),
    })
}

/// Compile a catalog and config into CSS.
///
/// Returns a JS object with `{ css: string, selectors: number }`.
/// Throws a JS error if loading, expansion or emission fails.
#[wasm_bindgen]
pub fn compile(catalog: JsValue, config: JsValue, minify: bool) -> Result<JsValue, JsError> {
    let catalog: serde_json::Value =
        serde_wasm_bindgen::from_value(catalog).map_err(|e| JsError::new(&e.to_string()))?;
    let config: serde_json::Value =
        serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?;

    let output = compile_values(&catalog, &config, minify).map_err(|e| JsError::new(&e))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"css".into(), &output.css.into())
        .map_err(|_| JsError::new("Failed to set css property"))?;
    js_sys::Reflect::set(&js_obj, &"selectors".into(), &(output.selectors as f64).into())
        .map_err(|_| JsError::new("Failed to set selectors property"))?;

    Ok(js_obj.into())
}

/// Get the builder version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
