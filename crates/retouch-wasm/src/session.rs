//! Image session WASM bindings.
//!
//! `JsImageSession` wraps the core `ImageSession` so the editor UI can drive
//! it with discrete commands. Errors are thrown as strings; the working buffer
//! is pushed to an optional JavaScript callback after each successful edit.

use retouch_core::{
    BufferObserver, DisplayScale, ImageHandle, ImageSession, PixelBuffer, Point, SessionConfig,
    SessionError,
};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, JsPixelBuffer};

fn to_js_error(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Forwards buffer changes to a JavaScript function `(handle, image) => void`.
struct JsObserver {
    callback: js_sys::Function,
}

impl BufferObserver for JsObserver {
    fn buffer_changed(&mut self, handle: ImageHandle, buffer: &PixelBuffer) {
        let image = JsValue::from(JsPixelBuffer::from_buffer(buffer.clone()));
        let handle = JsValue::from_f64(handle.id() as f64);
        if let Err(err) = self.callback.call2(&JsValue::NULL, &handle, &image) {
            web_sys::console::warn_2(&JsValue::from_str("buffer changed callback failed:"), &err);
        }
    }
}

/// Editing session wrapper for JavaScript
///
/// # Example (TypeScript)
/// ```typescript
/// const session = new JsImageSession();
/// session.set_on_buffer_changed((handle, image) => redraw(image));
/// session.load(new Uint8Array(await file.arrayBuffer()));
/// session.apply_filter(1); // grayscale
/// session.set_brightness(25);
/// const png = session.encode_png();
/// ```
#[wasm_bindgen]
pub struct JsImageSession {
    inner: ImageSession,
}

#[wasm_bindgen]
impl JsImageSession {
    /// Create an empty session with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: ImageSession::default(),
        }
    }

    /// Create an empty session from a configuration object.
    ///
    /// Missing fields take their defaults, e.g.
    /// `{ adjustment_mode: "compounding", resize_filter: "Nearest" }`.
    pub fn with_config(config: JsValue) -> Result<JsImageSession, JsValue> {
        let config: SessionConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: ImageSession::new(config),
        })
    }

    /// Serialize the active configuration
    pub fn config_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Install the callback invoked with `(handle, JsPixelBuffer)` after
    /// every successful edit.
    ///
    /// The callback runs synchronously inside the edit command while this
    /// session is still borrowed. It must draw from the `JsPixelBuffer` it is
    /// given and must not call any method on the session; wasm-bindgen rejects
    /// the nested borrow with a "recursive use of an object" error. Defer
    /// follow-up session calls with `queueMicrotask` or `requestAnimationFrame`.
    pub fn set_on_buffer_changed(&mut self, callback: js_sys::Function) {
        self.inner.set_observer(JsObserver { callback });
    }

    pub fn clear_on_buffer_changed(&mut self) {
        self.inner.clear_observer();
    }

    /// Decode JPEG or PNG bytes and make them the session image.
    ///
    /// # Returns
    /// The new image handle
    pub fn load(&mut self, bytes: &[u8]) -> Result<f64, JsValue> {
        let handle = self.inner.load(bytes).map_err(to_js_error)?;
        Ok(handle.id() as f64)
    }

    /// Load already-decoded pixels, e.g. from a canvas `ImageData`.
    pub fn load_pixels(&mut self, image: &JsPixelBuffer) -> f64 {
        self.inner.load_buffer(image.as_buffer().clone()).id() as f64
    }

    /// Encode the working image as PNG bytes
    pub fn encode_png(&mut self) -> Result<Vec<u8>, JsValue> {
        self.inner.encode_png().map_err(to_js_error)
    }

    /// Apply a named filter (0 = sepia, 1 = grayscale)
    pub fn apply_filter(&mut self, filter: u8) -> Result<(), JsValue> {
        let kind = filter_from_u8(filter)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown filter: {}", filter)))?;
        self.inner.apply_filter(kind).map_err(to_js_error)
    }

    /// Set brightness (-255 to 255)
    pub fn set_brightness(&mut self, level: f32) -> Result<(), JsValue> {
        self.inner.set_brightness(level).map_err(to_js_error)
    }

    /// Set contrast (percent offset from neutral)
    pub fn set_contrast(&mut self, level: f32) -> Result<(), JsValue> {
        self.inner.set_contrast(level).map_err(to_js_error)
    }

    /// Rotate 90 degrees clockwise
    pub fn rotate_90(&mut self) -> Result<(), JsValue> {
        self.inner.rotate_90().map_err(to_js_error)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.resize(width, height).map_err(to_js_error)
    }

    pub fn resize_width(&mut self, width: u32) -> Result<(), JsValue> {
        self.inner.resize_width(width).map_err(to_js_error)
    }

    pub fn resize_height(&mut self, height: u32) -> Result<(), JsValue> {
        self.inner.resize_height(height).map_err(to_js_error)
    }

    /// Discard all edits
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js_error)
    }

    /// Set the displayed-to-bitmap scale on each axis
    pub fn set_display_scale(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        let scale = DisplayScale::new(x, y).map_err(|e| to_js_error(e.into()))?;
        self.inner.set_display_scale(scale);
        Ok(())
    }

    /// Set the display scale for the working image shown aspect-fit inside
    /// a viewport of the given CSS size.
    pub fn fit_to_viewport(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<(), JsValue> {
        let (width, height) = self
            .inner
            .working()
            .map(PixelBuffer::dimensions)
            .ok_or_else(|| to_js_error(SessionError::NoImageLoaded))?;
        let scale = DisplayScale::fit(width, height, viewport_width, viewport_height)
            .map_err(|e| to_js_error(e.into()))?;
        self.inner.set_display_scale(scale);
        Ok(())
    }

    /// Pointer down at display coordinates
    pub fn begin_selection(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.begin_selection(Point::new(x, y)).map_err(to_js_error)
    }

    /// Pointer move; returns `{ x, y, width, height }` in display coordinates
    pub fn update_selection(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let rect = self.inner.update_selection(Point::new(x, y)).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&rect).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Pointer up; crops and returns the bitmap region `{ x, y, width, height }`
    pub fn end_selection(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let region = self.inner.end_selection(Point::new(x, y)).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&region).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn cancel_selection(&mut self) -> bool {
        self.inner.cancel_selection()
    }

    /// Draw text with its baseline at `(x, y)` in bitmap pixels
    pub fn add_text(&mut self, text: &str, font_size: f32, x: i32, y: i32) -> Result<(), JsValue> {
        self.inner.add_text_at(text, font_size, x, y).map_err(to_js_error)
    }

    /// Copy of the working image, if one is loaded
    pub fn working(&self) -> Option<JsPixelBuffer> {
        self.inner.working().cloned().map(JsPixelBuffer::from_buffer)
    }

    /// Lifecycle state: "empty", "loaded", "edited" or "saved"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.handle().is_some()
    }
}

impl Default for JsImageSession {
    fn default() -> Self {
        Self::new()
    }
}
