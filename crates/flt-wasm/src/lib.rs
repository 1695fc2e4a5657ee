//! WASM bindings for flt-core.
//!
//! Exposes `json_to_flt` and `flt_to_json` as `#[wasm_bindgen]` functions so a
//! browser page can convert filters in-page. Saving or uploading the bytes is
//! left to the JavaScript side.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p flt-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/flt_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Encode a JSON filter into FLT bytes (a `Uint8Array` on the JS side).
///
/// Throws a JS error if the JSON does not describe a valid filter.
#[wasm_bindgen]
pub fn json_to_flt(json: &str) -> std::result::Result<Vec<u8>, JsValue> {
    flt_core::json_to_bytes(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode FLT bytes into a compact JSON filter string.
///
/// Throws a JS error if the bytes are not a well-formed FLT file.
#[wasm_bindgen]
pub fn flt_to_json(bytes: &[u8]) -> std::result::Result<String, JsValue> {
    flt_core::bytes_to_json(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}
