//! The editing session: one loaded image and the commands that edit it.
//!
//! [`ImageSession`] owns the original and working buffers. Every command
//! validates its input and builds a complete new buffer before swapping it in,
//! so a failed command never leaves the working buffer half-edited. After each
//! successful mutation the installed [`BufferObserver`] is told to redraw.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --load--> Loaded --edit--> Edited --save--> Saved
//!                   ^                |  ^             |
//!                   +-----reset------+  +----edit-----+
//! ```
//!
//! # Brightness and contrast
//!
//! How repeated slider changes combine is set by [`AdjustmentMode`]. In
//! `Snapshot` mode the buffer as it was before the first slider change is kept
//! aside and both levels are re-applied to it on every change. Any other
//! successful edit commits the adjusted pixels and resets both levels to 0.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::session::{ImageSession, SessionConfig};
//! use retouch_core::FilterKind;
//!
//! let mut session = ImageSession::new(SessionConfig::default());
//! session.load(&bytes)?;
//! session.apply_filter(FilterKind::Grayscale)?;
//! session.set_brightness(20.0)?;
//! session.save("out.png")?;
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::color_matrix::{apply_matrix, ColorMatrix, FilterKind};
use crate::decode::{decode_image, DecodeError};
use crate::encode::{encode_png, save_png, EncodeError};
use crate::selection::{DisplayScale, Point, Selection, SelectionError, SelectionRect};
use crate::text::{draw_text, TextError, TextStyle};
use crate::transform::{apply_crop, resize, rotate_90, CropRegion, FilterType, TransformError};

/// Errors returned by session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An edit was attempted before any image was loaded.
    #[error("No image loaded")]
    NoImageLoaded,

    /// A selection was updated or ended without being started.
    #[error("No selection in progress")]
    NoActiveSelection,

    /// Brightness or contrast level is NaN or infinite.
    #[error("Invalid adjustment level: {0}")]
    InvalidLevel(f32),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// Working buffer equals the original.
    Loaded,
    /// At least one edit since load or reset.
    Edited,
    /// Working buffer was written out and not edited since.
    Saved,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Edited => "edited",
            SessionState::Saved => "saved",
        }
    }
}

/// Identifies the image loaded into a session. Changes on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(u64);

impl ImageHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// How repeated brightness/contrast changes combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentMode {
    /// Levels are absolute and re-applied to a pre-adjustment snapshot.
    #[default]
    Snapshot,
    /// Each change is applied on top of the current working buffer.
    Compounding,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub adjustment_mode: AdjustmentMode,
    /// Resampling filter for resize commands
    pub resize_filter: FilterType,
    /// RGBA fill color for text overlays
    pub text_color: [u8; 4],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            adjustment_mode: AdjustmentMode::default(),
            resize_filter: FilterType::default(),
            text_color: TextStyle::default().color,
        }
    }
}

/// Current slider levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Brightness (-255 to 255)
    pub brightness: f32,
    /// Contrast, percent offset from neutral
    pub contrast: f32,
}

impl Adjustments {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Brightness followed by contrast as a single matrix.
    pub fn matrix(&self) -> ColorMatrix {
        ColorMatrix::brightness(self.brightness).then(&ColorMatrix::contrast(self.contrast))
    }
}

/// Pending text overlay parameters, committed by [`ImageSession::add_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub text: String,
    pub font_size: f32,
    /// Baseline origin in bitmap pixels
    pub x: i32,
    pub y: i32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: TextStyle::default().font_size,
            x: 0,
            y: 0,
        }
    }
}

/// Receives the working buffer after every successful mutation.
pub trait BufferObserver {
    fn buffer_changed(&mut self, handle: ImageHandle, buffer: &PixelBuffer);
}

impl<F> BufferObserver for F
where
    F: FnMut(ImageHandle, &PixelBuffer),
{
    fn buffer_changed(&mut self, handle: ImageHandle, buffer: &PixelBuffer) {
        self(handle, buffer)
    }
}

struct LoadedImage {
    handle: ImageHandle,
    original: PixelBuffer,
    working: PixelBuffer,
    /// Working buffer before the current run of slider changes
    snapshot: Option<PixelBuffer>,
}

/// An editing session over a single image.
pub struct ImageSession {
    config: SessionConfig,
    image: Option<LoadedImage>,
    state: SessionState,
    adjustments: Adjustments,
    text_params: TextParams,
    display_scale: DisplayScale,
    selection: Option<Selection>,
    observer: Option<Box<dyn BufferObserver>>,
    next_handle: u64,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl fmt::Debug for ImageSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("handle", &self.handle())
            .field("dimensions", &self.working().map(PixelBuffer::dimensions))
            .field("adjustments", &self.adjustments)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl ImageSession {
    /// Create an empty session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            image: None,
            state: SessionState::Empty,
            adjustments: Adjustments::default(),
            text_params: TextParams::default(),
            display_scale: DisplayScale::default(),
            selection: None,
            observer: None,
            next_handle: 0,
        }
    }

    /// Install the observer notified after each successful mutation,
    /// replacing any previous one.
    pub fn set_observer(&mut self, observer: impl BufferObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------

    /// Decode an encoded image (JPEG or PNG) and make it the session image.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Decode` for empty, unsupported or corrupted
    /// input. The session is left exactly as it was.
    pub fn load(&mut self, bytes: &[u8]) -> Result<ImageHandle, SessionError> {
        let buffer = decode_image(bytes).map_err(|e| rejected("load", e.into()))?;
        Ok(self.load_buffer(buffer))
    }

    /// Make an already-decoded buffer the session image.
    pub fn load_buffer(&mut self, buffer: PixelBuffer) -> ImageHandle {
        self.next_handle += 1;
        let handle = ImageHandle(self.next_handle);
        debug!(
            handle = handle.id(),
            width = buffer.width(),
            height = buffer.height(),
            "image loaded"
        );

        self.image = Some(LoadedImage {
            handle,
            original: buffer.clone(),
            working: buffer,
            snapshot: None,
        });
        self.adjustments = Adjustments::default();
        self.selection = None;
        self.state = SessionState::Loaded;
        self.notify();
        handle
    }

    /// Write the working buffer to `path` as PNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoImageLoaded` when empty and
    /// `SessionError::Encode` if writing fails. The working buffer is never
    /// affected and a failed save does not change the state.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| rejected("save", SessionError::NoImageLoaded))?;
        save_png(&image.working, path).map_err(|e| rejected("save", e.into()))?;

        self.state = SessionState::Saved;
        debug!(path = %path.display(), "image saved");
        Ok(())
    }

    /// Encode the working buffer as PNG bytes, for hosts without a filesystem.
    pub fn encode_png(&mut self) -> Result<Vec<u8>, SessionError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| rejected("encode_png", SessionError::NoImageLoaded))?;
        let bytes = encode_png(&image.working).map_err(|e| rejected("encode_png", e.into()))?;

        self.state = SessionState::Saved;
        debug!(bytes = bytes.len(), "image encoded");
        Ok(bytes)
    }

    // ------------------------------------------------------------------
    // Color
    // ------------------------------------------------------------------

    /// Apply a named color filter to the working buffer.
    pub fn apply_filter(&mut self, kind: FilterKind) -> Result<(), SessionError> {
        self.apply_edit("apply_filter", |buffer| {
            Ok(apply_matrix(buffer, &kind.matrix()))
        })
    }

    /// Set the brightness level (-255 to 255).
    pub fn set_brightness(&mut self, level: f32) -> Result<(), SessionError> {
        let next = Adjustments {
            brightness: level,
            ..self.adjustments
        };
        self.adjust("set_brightness", next, ColorMatrix::brightness(level))
    }

    /// Set the contrast level (percent offset from neutral).
    pub fn set_contrast(&mut self, level: f32) -> Result<(), SessionError> {
        let next = Adjustments {
            contrast: level,
            ..self.adjustments
        };
        self.adjust("set_contrast", next, ColorMatrix::contrast(level))
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Rotate the working buffer 90 degrees clockwise.
    pub fn rotate_90(&mut self) -> Result<(), SessionError> {
        self.apply_edit("rotate_90", |buffer| Ok(rotate_90(buffer)))
    }

    /// Resample the working buffer to `width x height`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        let filter = self.config.resize_filter;
        self.apply_edit("resize", |buffer| {
            Ok(resize(buffer, width, height, filter)?)
        })
    }

    /// Change only the width, keeping the current height.
    pub fn resize_width(&mut self, width: u32) -> Result<(), SessionError> {
        let filter = self.config.resize_filter;
        self.apply_edit("resize_width", |buffer| {
            Ok(resize(buffer, width, buffer.height(), filter)?)
        })
    }

    /// Change only the height, keeping the current width.
    pub fn resize_height(&mut self, height: u32) -> Result<(), SessionError> {
        let filter = self.config.resize_filter;
        self.apply_edit("resize_height", |buffer| {
            Ok(resize(buffer, buffer.width(), height, filter)?)
        })
    }

    /// Crop the working buffer to a bitmap-space region.
    pub fn crop(&mut self, region: CropRegion) -> Result<(), SessionError> {
        self.apply_edit("crop", |buffer| Ok(apply_crop(buffer, region)?))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Set the display-to-bitmap scale used when mapping selections.
    pub fn set_display_scale(&mut self, scale: DisplayScale) {
        self.display_scale = scale;
    }

    pub fn display_scale(&self) -> DisplayScale {
        self.display_scale
    }

    /// Start a drag at `point` (display coordinates). Replaces any active drag.
    pub fn begin_selection(&mut self, point: Point) -> Result<(), SessionError> {
        if self.image.is_none() {
            return Err(rejected("begin_selection", SessionError::NoImageLoaded));
        }
        self.selection = Some(Selection::new(point));
        Ok(())
    }

    /// Move the drag to `point` and return the rectangle to outline.
    pub fn update_selection(&mut self, point: Point) -> Result<SelectionRect, SessionError> {
        let selection = self
            .selection
            .as_mut()
            .ok_or(SessionError::NoActiveSelection)?;
        selection.update(point);
        Ok(selection.rect())
    }

    /// Finish the drag at `point` and crop to the selected region.
    ///
    /// The drag ends whether or not the crop succeeds.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoActiveSelection` if no drag was started
    /// - `SessionError::Selection` if the selection covers no whole pixel
    pub fn end_selection(&mut self, point: Point) -> Result<CropRegion, SessionError> {
        let mut selection = self
            .selection
            .take()
            .ok_or_else(|| rejected("end_selection", SessionError::NoActiveSelection))?;
        selection.update(point);

        let (width, height) = self
            .working()
            .map(PixelBuffer::dimensions)
            .ok_or_else(|| rejected("end_selection", SessionError::NoImageLoaded))?;
        let region = selection
            .to_crop_region(self.display_scale, width, height)
            .map_err(|e| rejected("end_selection", e.into()))?;

        self.crop(region)?;
        Ok(region)
    }

    /// Discard an active drag. Returns whether one was active.
    pub fn cancel_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Replace the pending text parameters used by [`Self::add_text`].
    pub fn set_text_params(&mut self, params: TextParams) {
        self.text_params = params;
    }

    pub fn text_params(&self) -> &TextParams {
        &self.text_params
    }

    /// Draw the pending text onto the working buffer.
    pub fn add_text(&mut self) -> Result<(), SessionError> {
        let params = self.text_params.clone();
        self.overlay_text(&params)
    }

    /// Draw `text` with its baseline at `(x, y)`, ignoring pending parameters.
    pub fn add_text_at(
        &mut self,
        text: &str,
        font_size: f32,
        x: i32,
        y: i32,
    ) -> Result<(), SessionError> {
        self.overlay_text(&TextParams {
            text: text.to_string(),
            font_size,
            x,
            y,
        })
    }

    // ------------------------------------------------------------------
    // Reset and accessors
    // ------------------------------------------------------------------

    /// Discard every edit and return to the original image.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let image = self
            .image
            .as_mut()
            .ok_or_else(|| rejected("reset", SessionError::NoImageLoaded))?;
        image.working = image.original.clone();
        image.snapshot = None;

        self.adjustments = Adjustments::default();
        self.selection = None;
        self.state = SessionState::Loaded;
        debug!(operation = "reset", "edits discarded");
        self.notify();
        Ok(())
    }

    pub fn working(&self) -> Option<&PixelBuffer> {
        self.image.as_ref().map(|i| &i.working)
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.image.as_ref().map(|i| &i.original)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handle(&self) -> Option<ImageHandle> {
        self.image.as_ref().map(|i| i.handle)
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn overlay_text(&mut self, params: &TextParams) -> Result<(), SessionError> {
        let style = TextStyle::new(params.font_size, self.config.text_color);
        self.apply_edit("add_text", |buffer| {
            Ok(draw_text(buffer, &params.text, &style, params.x, params.y)?)
        })
    }

    /// Run an edit against the working buffer and swap in the result.
    ///
    /// Pending slider adjustments are committed: the snapshot is dropped and
    /// both levels return to 0.
    fn apply_edit<F>(&mut self, operation: &'static str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&PixelBuffer) -> Result<PixelBuffer, SessionError>,
    {
        let Some(image) = self.image.as_mut() else {
            return Err(rejected(operation, SessionError::NoImageLoaded));
        };
        let output = edit(&image.working).map_err(|e| rejected(operation, e))?;

        debug!(
            operation,
            width = output.width(),
            height = output.height(),
            "edit applied"
        );
        image.working = output;
        image.snapshot = None;
        self.adjustments = Adjustments::default();
        self.state = SessionState::Edited;
        self.notify();
        Ok(())
    }

    /// Apply new slider levels according to the configured mode.
    ///
    /// `step` is the single-slider matrix used in compounding mode.
    fn adjust(
        &mut self,
        operation: &'static str,
        next: Adjustments,
        step: ColorMatrix,
    ) -> Result<(), SessionError> {
        let mode = self.config.adjustment_mode;
        let Some(image) = self.image.as_mut() else {
            return Err(rejected(operation, SessionError::NoImageLoaded));
        };
        if let Some(level) = [next.brightness, next.contrast]
            .into_iter()
            .find(|l| !l.is_finite())
        {
            return Err(rejected(operation, SessionError::InvalidLevel(level)));
        }

        match mode {
            AdjustmentMode::Snapshot => {
                let base = image.snapshot.as_ref().unwrap_or(&image.working);
                let output = apply_matrix(base, &next.matrix());
                if image.snapshot.is_none() {
                    image.snapshot = Some(std::mem::replace(&mut image.working, output));
                } else {
                    image.working = output;
                }
            }
            AdjustmentMode::Compounding => {
                image.working = apply_matrix(&image.working, &step);
            }
        }

        debug!(
            operation,
            brightness = next.brightness,
            contrast = next.contrast,
            ?mode,
            "adjustment applied"
        );
        self.adjustments = next;
        self.state = SessionState::Edited;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        if let (Some(observer), Some(image)) = (self.observer.as_mut(), self.image.as_ref()) {
            observer.buffer_changed(image.handle, &image.working);
        }
    }
}

fn rejected(operation: &'static str, error: SessionError) -> SessionError {
    warn!(operation, %error, "command rejected");
    error
}


// ============================================================================
// Property-Based Tests
// ============================================================================
