//! Bounding boxes with viewport clamping.
//!
//! A box is either raw (the element's true layout box, possibly off-screen) or
//! clamped to the viewport. Operations that combine boxes only accept clamped
//! operands; raw boxes exist to measure how much of an element is on screen.

use serde::Serialize;

use crate::document::{Rect, Viewport};
use crate::error::AnalysisError;

/// An axis-aligned box with cached derived measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    width: f64,
    height: f64,
    center_x: f64,
    center_y: f64,
    area: f64,
    clamped: bool,
}

impl BoundingBox {
    /// Box for a layout rectangle as-is.
    pub fn raw(rect: Rect) -> Result<Self, AnalysisError> {
        check_finite(&rect)?;
        Ok(Self::from_edges(rect.left, rect.top, rect.right, rect.bottom, false))
    }

    /// Box for a layout rectangle with every edge bounded to the viewport.
    pub fn clamped(rect: Rect, viewport: Viewport) -> Result<Self, AnalysisError> {
        check_finite(&rect)?;
        Ok(Self::from_edges(
            clamp(rect.left, viewport.width),
            clamp(rect.top, viewport.height),
            clamp(rect.right, viewport.width),
            clamp(rect.bottom, viewport.height),
            true,
        ))
    }

    fn from_edges(left: f64, top: f64, right: f64, bottom: f64, clamped: bool) -> Self {
        let mut bbox = Self {
            left,
            top,
            right,
            bottom,
            width: 0.0,
            height: 0.0,
            center_x: 0.0,
            center_y: 0.0,
            area: 0.0,
            clamped,
        };
        bbox.refresh();
        bbox
    }

    fn refresh(&mut self) {
        self.width = (self.right - self.left).max(0.0);
        self.height = (self.bottom - self.top).max(0.0);
        self.center_x = self.left + self.width / 2.0;
        self.center_y = self.top + self.height / 2.0;
        self.area = self.width * self.height;
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    /// Edges as a plain rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// Edges rounded to whole pixels, as `[left, top, right, bottom]`.
    pub fn rounded(&self) -> [i64; 4] {
        [
            self.left.round() as i64,
            self.top.round() as i64,
            self.right.round() as i64,
            self.bottom.round() as i64,
        ]
    }

    /// Minimal clamped box covering every positive-area input.
    ///
    /// Returns `None` when no input has positive area.
    pub fn aggregate<'a, I>(boxes: I) -> Result<Option<Self>, AnalysisError>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut covered: Option<(f64, f64, f64, f64)> = None;

        for bbox in boxes {
            if !bbox.clamped {
                return Err(AnalysisError::UnclampedBox {
                    operation: "aggregate",
                });
            }
            if bbox.area <= 0.0 {
                continue;
            }
            covered = Some(match covered {
                None => (bbox.left, bbox.top, bbox.right, bbox.bottom),
                Some((left, top, right, bottom)) => (
                    left.min(bbox.left),
                    top.min(bbox.top),
                    right.max(bbox.right),
                    bottom.max(bbox.bottom),
                ),
            });
        }

        Ok(covered.map(|(left, top, right, bottom)| Self::from_edges(left, top, right, bottom, true)))
    }

    /// Intersect in place with `base`. Never grows the box.
    pub fn crop(&mut self, base: &BoundingBox) -> Result<(), AnalysisError> {
        if !self.clamped || !base.clamped {
            return Err(AnalysisError::UnclampedBox { operation: "crop" });
        }
        self.left = self.left.max(base.left);
        self.top = self.top.max(base.top);
        self.right = self.right.min(base.right);
        self.bottom = self.bottom.min(base.bottom);
        self.refresh();
        Ok(())
    }

    /// Manhattan distance between the two centers.
    pub fn center_l1_distance(a: &BoundingBox, b: &BoundingBox) -> Result<f64, AnalysisError> {
        if !a.clamped || !b.clamped {
            return Err(AnalysisError::UnclampedBox {
                operation: "center distance",
            });
        }
        Ok((a.center_x - b.center_x).abs() + (a.center_y - b.center_y).abs())
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    value.max(0.0).min(max)
}

fn check_finite(rect: &Rect) -> Result<(), AnalysisError> {
    if [rect.left, rect.top, rect.right, rect.bottom]
        .iter()
        .all(|v| v.is_finite())
    {
        Ok(())
    } else {
        Err(AnalysisError::InvalidGeometry(format!("{:?}", rect)))
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
