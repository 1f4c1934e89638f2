//! How many captures a document gets, and where each one is taken.

/// Up to this many viewports tall: one capture.
const SINGLE_CAPTURE_RATIO: f64 = 1.25;
/// Up to this many viewports tall: top and bottom.
const DOUBLE_CAPTURE_RATIO: f64 = 2.5;

/// One capture of a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedCapture {
    /// Appended to the document name: `""`, `"_top"`, `"_mid"` or `"_btm"`.
    pub suffix: &'static str,
    /// Vertical offset to scroll to first; `None` captures in place.
    pub scroll_to: Option<f64>,
}

impl PlannedCapture {
    pub fn name(&self, base: &str) -> String {
        format!("{}{}", base, self.suffix)
    }
}

/// Captures for a page `full_height` tall seen through a `view_height` viewport.
pub fn scroll_plan(full_height: f64, view_height: f64) -> Vec<PlannedCapture> {
    let top = PlannedCapture {
        suffix: "_top",
        scroll_to: None,
    };
    let bottom = PlannedCapture {
        suffix: "_btm",
        scroll_to: Some(full_height),
    };

    if full_height <= view_height * SINGLE_CAPTURE_RATIO {
        vec![PlannedCapture {
            suffix: "",
            scroll_to: None,
        }]
    } else if full_height <= view_height * DOUBLE_CAPTURE_RATIO {
        vec![top, bottom]
    } else {
        let middle = PlannedCapture {
            suffix: "_mid",
            scroll_to: Some((full_height - view_height) / 2.0),
        };
        vec![top, middle, bottom]
    }
}

/// Every name a document's captures can be saved under.
pub fn capture_names(base: &str) -> [String; 4] {
    ["", "_top", "_mid", "_btm"].map(|suffix| format!("{}{}", base, suffix))
}
