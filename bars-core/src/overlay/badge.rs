//! Status badge drawn in the decoration pass.
//!
//! ```text
//!            ┌─padding
//!  ┌────────────────────┐ ─┬─ anchor.y from top
//!  │ ╲╱  EGLL           │  │ 2·padding + height
//!  └────────────────────┘ ─┘
//!    icon  label         ├── anchor.x from right ──┤
//! ```

use crate::client::{ActivityState, ConnectionState};
use crate::geometry::{Color, Point, PointF, Rect};
use crate::settings::MenuAnchor;

/// Label text height in pixels
pub const HEIGHT: i32 = 12;
pub const PADDING: i32 = 2;

/// Label is always exactly this many characters
pub const LABEL_LEN: usize = 4;
pub const DEFAULT_LABEL: &str = "BARS";

/// Anchor offset used while no anchor is stored
const DEFAULT_OFFSET: i32 = 2;

/// Horizontal space kept free left of the badge for a narrow label
const MIN_CLEARANCE_X: i32 = 40;
const MIN_CLEARANCE_Y: i32 = 20;

/// Distance from the drag point to the badge corner while dragging
pub const DRAG_OFFSET: i32 = PADDING + HEIGHT / 2;

pub const COLOR_DISCONNECTED: Color = Color::rgb(0x22, 0x22, 0x22);
pub const COLOR_OBSERVING: Color = Color::rgb(0x1e, 0x40, 0xaf);
pub const COLOR_CONTROLLING: Color = Color::rgb(0x16, 0x65, 0x34);
pub const COLOR_FOREGROUND: Color = Color::rgb(0xcc, 0xcc, 0xcc);
pub const COLOR_MESSAGE: Color = Color::rgb(0xff, 0xff, 0xff);

pub const ICON_DISCONNECTED: [Point; 5] = [
    Point::new(4, 4),
    Point::new(8, 8),
    Point::new(6, 6),
    Point::new(4, 8),
    Point::new(8, 4),
];
pub const ICON_DIRECT: [Point; 5] = [
    Point::new(6, 8),
    Point::new(6, 4),
    Point::new(4, 6),
    Point::new(6, 4),
    Point::new(8, 6),
];
pub const ICON_LOCAL: [Point; 5] = [
    Point::new(4, 4),
    Point::new(4, 4),
    Point::new(4, 4),
    Point::new(4, 8),
    Point::new(8, 8),
];

/// Colors and glyph for the current connection and activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle {
    pub background: Color,
    pub icon: &'static [Point; 5],
}

impl BadgeStyle {
    pub fn new(connection: ConnectionState, activity: ActivityState, has_target: bool) -> Self {
        let icon = match connection {
            ConnectionState::ConnectedDirect | ConnectionState::ConnectedProxy => &ICON_DIRECT,
            ConnectionState::ConnectedLocal => &ICON_LOCAL,
            ConnectionState::Disconnected | ConnectionState::Poisoned => &ICON_DISCONNECTED,
        };

        let background = if connection.is_connected() && has_target {
            match activity {
                ActivityState::Observing => COLOR_OBSERVING,
                ActivityState::Controlling => COLOR_CONTROLLING,
                ActivityState::None => COLOR_DISCONNECTED,
            }
        } else {
            COLOR_DISCONNECTED
        };

        BadgeStyle { background, icon }
    }
}

/// Badge text: the first four characters of the target, written over
/// "BARS". A three-letter target keeps the trailing "S".
pub fn badge_label(aerodrome: Option<&str>) -> String {
    let mut label: Vec<char> = DEFAULT_LABEL.chars().collect();
    if let Some(aerodrome) = aerodrome {
        for (slot, c) in label.iter_mut().zip(aerodrome.chars()) {
            *slot = c;
        }
    }
    label.into_iter().collect()
}

/// Pixel placement of the badge and its parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeLayout {
    pub rect: Rect,
    pub icon_origin: PointF,
    pub label_origin: PointF,
}

impl BadgeLayout {
    /// Place a badge whose label measures `label_width`.
    ///
    /// The anchor is clamped so the badge stays inside `area` as long as the
    /// area is at least `MIN_CLEARANCE_X` by `MIN_CLEARANCE_Y` pixels.
    pub fn new(area: &Rect, anchor: MenuAnchor, label_width: f32) -> Self {
        let width = label_width.max(0.0).ceil() as i32 + 2 * PADDING + HEIGHT;
        let height = 2 * PADDING + HEIGHT;

        let or_default = |offset: i32| if offset != 0 { offset } else { DEFAULT_OFFSET };
        let dx = or_default(anchor.x)
            .min(area.width() - width.max(MIN_CLEARANCE_X))
            .max(0);
        let dy = or_default(anchor.y)
            .min(area.height() - MIN_CLEARANCE_Y)
            .max(0);

        let rect = Rect::from_origin(area.right - dx - width, area.top + dy, width, height);

        BadgeLayout {
            rect,
            icon_origin: PointF::new((rect.left + PADDING) as f32, (rect.top + PADDING) as f32),
            label_origin: PointF::new((rect.left + PADDING + HEIGHT) as f32, rect.top as f32),
        }
    }
}

/// Anchor that puts the badge corner under a drag point
pub fn anchor_from_drag(area: &Rect, point: Point) -> MenuAnchor {
    MenuAnchor {
        x: (area.right - point.x - DRAG_OFFSET).max(1),
        y: (point.y - area.top - DRAG_OFFSET).max(1),
    }
}
