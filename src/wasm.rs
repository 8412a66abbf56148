//! WASM bindings for Logic Scheme.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmScheme } from 'logic_scheme';
//!
//! await init();
//!
//! const scheme = new WasmScheme();
//! scheme.execute(`
//!   add variable v 0 0
//!   add not n 1 0
//!   out v --> in n
//! `);
//! console.log(scheme.run()); // "v.out = 0\nn.out = 1\n"
//! ```

use wasm_bindgen::prelude::*;

use crate::scheme::Scheme;
use crate::script;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// JavaScript-friendly wrapper around a [`Scheme`].
#[wasm_bindgen]
pub struct WasmScheme {
    scheme: Scheme,
}

#[wasm_bindgen]
impl WasmScheme {
    /// Create an empty scheme.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmScheme {
        WasmScheme {
            scheme: Scheme::new(),
        }
    }

    /// Apply a command script.
    ///
    /// # Returns
    /// The text of the last report produced by a `run` command, or an
    /// empty string if the script did not run the scheme.
    #[wasm_bindgen]
    pub fn execute(&mut self, source: &str) -> Result<String, JsValue> {
        let parsed = script::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let reports = script::execute(&mut self.scheme, &parsed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(reports.last().map(|r| r.to_string()).unwrap_or_default())
    }

    /// Evaluate the scheme and return one `id.pin = 0|1|X` line per pin.
    #[wasm_bindgen]
    pub fn run(&mut self) -> Result<String, JsValue> {
        self.scheme
            .run()
            .map(|report| report.to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of elements in the scheme.
    #[wasm_bindgen(getter)]
    pub fn element_count(&self) -> usize {
        self.scheme.len()
    }
}

impl Default for WasmScheme {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
