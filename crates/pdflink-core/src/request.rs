//! Link request types
//!
//! A [`LinkRequest`] names the page, the clickable area and the target URI of
//! a single link annotation. Requests serialize to JSON so they can be kept
//! in a file and replayed from the command line.

use crate::error::PdfLinkError;
use serde::{Deserialize, Serialize};

/// Clickable area in PDF user space, origin at the bottom-left corner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds in `/Rect` order: `[left, bottom, right, top]`.
    ///
    /// Coordinates are not checked against the page box, only that every
    /// value stays finite once written. Integral bounds are stored as PDF
    /// integers and read back exactly; fractional bounds are stored as
    /// lopdf reals and so are rounded to `f32` precision, which also puts
    /// anything beyond `f32::MAX` out of range.
    pub fn to_pdf_bounds(&self) -> Result<[f64; 4], PdfLinkError> {
        let bounds = [
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
        ];
        if bounds.iter().all(|v| v.is_finite() && (*v as f32).is_finite()) {
            Ok(bounds)
        } else {
            Err(PdfLinkError::InvalidRect(format!(
                "coordinate not representable as a finite PDF number in {:?}",
                self
            )))
        }
    }
}

/// One link annotation to insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkRequest {
    /// Zero-based page index
    pub page_index: usize,
    pub rect: PdfRect,
    pub uri: String,
}

impl LinkRequest {
    pub fn new(page_index: usize, rect: PdfRect, uri: impl Into<String>) -> Self {
        Self {
            page_index,
            rect,
            uri: uri.into(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PdfLinkError> {
        serde_json::from_str(json).map_err(|e| PdfLinkError::SerializationError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, PdfLinkError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PdfLinkError::SerializationError(e.to_string()))
    }
}
