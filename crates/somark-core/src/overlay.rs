//! Set-of-Marks overlay description and the surface abstraction that draws it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::aggregate::ResultNode;
use crate::error::AnalysisError;

/// Labels whose box starts this close to the top would be cut off when
/// placed above the box.
const LABEL_TOP_MARGIN: f64 = 30.0;

/// What a mark's label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// `"<index>: <types>"`.
    IndexAndTypes,
    /// `"<index>"`.
    IndexOnly,
}

impl LabelMode {
    pub fn font_size_px(self) -> u32 {
        match self {
            LabelMode::IndexAndTypes => 12,
            LabelMode::IndexOnly => 17,
        }
    }
}

/// One outlined box with its floating label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayMark {
    pub index: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// CSS hex color shared by the outline and the label background.
    pub color: String,
    pub label: String,
    pub font_size_px: u32,
    /// Label offset from the box's top-left corner.
    pub label_left: f64,
    pub label_top: f64,
}

/// Deterministic, well-spread color for mark `index`.
pub fn mark_color(index: usize) -> String {
    let hash = (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    format!("#{:06x}", (hash >> 40) & 0xFF_FFFF)
}

/// Marks for the selected nodes, indexed in selection order.
pub fn build_marks(nodes: &[&ResultNode], mode: LabelMode) -> Vec<OverlayMark> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let rect = &node.rect;
            let label = match mode {
                LabelMode::IndexAndTypes => format!("{}: {}", index, node.types.names().join(" ")),
                LabelMode::IndexOnly => index.to_string(),
            };
            let (label_left, label_top) = if rect.top() <= LABEL_TOP_MARGIN {
                (rect.width(), rect.height())
            } else {
                (0.0, -LABEL_TOP_MARGIN)
            };
            OverlayMark {
                index,
                left: rect.left(),
                top: rect.top(),
                width: rect.width(),
                height: rect.height(),
                color: mark_color(index),
                label,
                font_size_px: mode.font_size_px(),
                label_left,
                label_top,
            }
        })
        .collect()
}

/// Where marks get drawn: a live page, or memory in tests and offline runs.
///
/// `draw` adds to whatever is on the surface; `clear` removes every mark.
#[async_trait]
pub trait OverlaySurface: Send {
    async fn draw(&mut self, marks: &[OverlayMark]) -> Result<(), AnalysisError>;

    async fn clear(&mut self) -> Result<(), AnalysisError>;
}

/// An overlay surface that keeps marks in memory.
#[derive(Debug, Default)]
pub struct MemoryOverlay {
    marks: Vec<OverlayMark>,
}

impl MemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[OverlayMark] {
        &self.marks
    }
}

#[async_trait]
impl OverlaySurface for MemoryOverlay {
    async fn draw(&mut self, marks: &[OverlayMark]) -> Result<(), AnalysisError> {
        self.marks.extend_from_slice(marks);
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), AnalysisError> {
        self.marks.clear();
        Ok(())
    }
}
