//! Geometry of the floating widget.
//!
//! Everything is anchored to the bottom-right corner of the screen:
//!
//! ```text
//!                               ╭ Chatbot ──────────── × ╮
//!                               │ transcript              │
//!                               │─────────────────────────│
//!                               │ > draft            Send │
//!                               ╰─────────────────────────╯
//! hints
//! ```

use ratatui::layout::{Constraint, Layout, Position, Rect};

/// Widest the panel gets, in columns.
pub const PANEL_MAX_WIDTH: u16 = 60;

/// Tallest the panel gets, in rows.
pub const PANEL_MAX_HEIGHT: u16 = 20;

/// Launcher bubble size.
pub const LAUNCHER_WIDTH: u16 = 6;
pub const LAUNCHER_HEIGHT: u16 = 3;

/// Gap kept between the widget and the right/bottom screen edges.
const MARGIN: u16 = 1;

fn anchor_bottom_right(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width.saturating_sub(MARGIN));
    let height = height.min(screen.height.saturating_sub(MARGIN));
    Rect::new(
        screen.right().saturating_sub(width + MARGIN),
        screen.bottom().saturating_sub(height + MARGIN),
        width,
        height,
    )
}

/// Area of the open panel: `min(80% of width, 60)` by `min(height - 2, 20)`.
pub fn panel_area(screen: Rect) -> Rect {
    let four_fifths = u16::try_from(u32::from(screen.width) * 4 / 5).unwrap_or(u16::MAX);
    let width = four_fifths.min(PANEL_MAX_WIDTH);
    let height = screen.height.saturating_sub(2).min(PANEL_MAX_HEIGHT);
    anchor_bottom_right(screen, width, height)
}

/// Area of the launcher bubble shown while the panel is closed.
pub fn launcher_area(screen: Rect) -> Rect {
    anchor_bottom_right(screen, LAUNCHER_WIDTH, LAUNCHER_HEIGHT)
}

/// The `×` in the panel's title bar.
pub fn close_button_area(panel: Rect) -> Rect {
    Rect::new(panel.right().saturating_sub(4), panel.y, 3, panel.height.min(1))
}

/// Inner regions of a panel: transcript, divider and input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRegions {
    pub transcript: Rect,
    pub divider: Rect,
    pub input: Rect,
}

/// Split the inside of a bordered panel.
pub fn panel_regions(panel: Rect) -> PanelRegions {
    let inner = Rect::new(
        panel.x.saturating_add(1),
        panel.y.saturating_add(1),
        panel.width.saturating_sub(2),
        panel.height.saturating_sub(2),
    );
    let [transcript, divider, input] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    PanelRegions {
        transcript,
        divider,
        input,
    }
}

/// Whether a terminal cell lies inside `area`.
pub fn hit(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}
