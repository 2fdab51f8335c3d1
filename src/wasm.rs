//! WASM bindings for Phasor Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { analyze_netlist } from 'phasor_core';
//!
//! await init();
//!
//! const netlist = `
//!   V1 1 0 120 0 60
//!   R1 1 2 3
//!   L1 2 0 10.61m
//! `;
//!
//! try {
//!   const result = JSON.parse(analyze_netlist(netlist));
//!   console.log(result.system_summary.power_factor);
//! } catch (e) {
//!   console.error(e); // "Parse error at line 2: ..."
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::solver::Analyzer;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Analyze netlist text and return the result as a JSON string.
///
/// Errors are thrown as strings carrying the error message.
#[wasm_bindgen]
pub fn analyze_netlist(netlist: &str) -> Result<String, JsValue> {
    Analyzer::new()
        .analyze(netlist)
        .and_then(|result| result.to_json())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
