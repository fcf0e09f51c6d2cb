//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate provides WASM bindings to expose the retouch-core editing
//! session to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The editing session (load, filters, geometry, selection, text, save)
//! - `types` - WASM-compatible wrapper types for pixel data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageSession } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsImageSession();
//! session.set_on_buffer_changed((_handle, image) => {
//!   ctx.putImageData(new ImageData(new Uint8ClampedArray(image.pixels()), image.width), 0, 0);
//! });
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.rotate_90();
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

pub use session::JsImageSession;
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Core logging goes through `tracing`; nothing is emitted until the host
    // installs a subscriber.
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
