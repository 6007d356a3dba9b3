//! Panel placement
//!
//! The panel hangs below the trigger in document coordinates, as wide as the
//! trigger. When it would spill past the right edge of the viewport it is
//! pulled back left, keeping a margin. There is no vertical flip.

use snapselect_platform::{Document, NodeId};

/// Gap between the trigger's bottom edge and the panel
pub const PANEL_GAP: f32 = 4.0;

/// Minimum distance kept from the viewport edges after correction
pub const VIEWPORT_MARGIN: f32 = 10.0;

/// Stacking order of the floating panel
pub const PANEL_Z_INDEX: &str = "10000";

/// Where the panel was placed, in document coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

/// Anchor `panel` below `trigger` and apply the horizontal correction
pub fn position_panel(doc: &mut dyn Document, trigger: NodeId, panel: NodeId) -> Placement {
    let anchor = doc.bounding_rect(trigger);
    let viewport = doc.viewport();

    let mut placement = Placement {
        left: anchor.left() + viewport.scroll_x,
        top: anchor.bottom() + viewport.scroll_y + PANEL_GAP,
        width: anchor.width,
    };

    doc.set_style(panel, "position", "absolute");
    doc.set_style(panel, "left", &px(placement.left));
    doc.set_style(panel, "top", &px(placement.top));
    doc.set_style(panel, "width", &px(placement.width));
    doc.set_style(panel, "min-width", &px(placement.width));
    doc.set_style(panel, "box-sizing", "border-box");
    doc.set_style(panel, "z-index", PANEL_Z_INDEX);

    let rendered = doc.bounding_rect(panel);
    if rendered.right() > viewport.width {
        placement.left = (viewport.width - rendered.width - VIEWPORT_MARGIN).max(VIEWPORT_MARGIN);
        doc.set_style(panel, "left", &px(placement.left));
    }

    tracing::trace!(
        "panel placed at ({}, {}) width {}",
        placement.left,
        placement.top,
        placement.width
    );
    placement
}
