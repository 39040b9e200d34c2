//! Host abstraction for the radar display engine.
//!
//! The host owns the radar canvas, the hit-testing surface, popup widgets and
//! per-surface persistent storage. This module defines the [`Host`] trait the
//! overlay controller talks to, and the small enums that mirror the host's
//! plugin ABI constants.
//!
//! All calls are synchronous and made on the host's UI thread; the host is
//! passed into each controller callback rather than owned by it.

use serde::{Deserialize, Serialize};

use crate::geometry::{GeoPosition, Point, Rect};
use crate::tag_function::TagFunction;

// =============================================================================
// Host ABI constants
// =============================================================================

/// Render pass the host is currently drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshPhase {
    /// Cached background bitmap, redrawn only on request
    BackBitmap,
    /// Before aircraft tags are drawn
    BeforeTags,
    /// After aircraft tags are drawn
    AfterTags,
    /// Topmost pass, after all lists
    AfterLists,
}

impl RefreshPhase {
    pub fn from_host(phase: i32) -> Option<Self> {
        match phase {
            0 => Some(RefreshPhase::BackBitmap),
            1 => Some(RefreshPhase::BeforeTags),
            2 => Some(RefreshPhase::AfterTags),
            3 => Some(RefreshPhase::AfterLists),
            _ => None,
        }
    }
}

/// Kind of hit-test object registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenObject {
    /// Clickable region reported by the lighting client
    ClickRegion,
    /// Status badge
    Menu,
}

impl ScreenObject {
    pub fn id(self) -> i32 {
        match self {
            ScreenObject::ClickRegion => 1,
            ScreenObject::Menu => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(ScreenObject::ClickRegion),
            2 => Some(ScreenObject::Menu),
            _ => None,
        }
    }
}

/// Mouse button of a click event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(i32),
}

impl MouseButton {
    pub fn from_host(button: i32) -> Self {
        match button {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            other => MouseButton::Other(other),
        }
    }
}

/// Checkbox shown next to a popup list element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PopupCheckbox {
    #[default]
    NoCheckbox,
    Unchecked,
    Checked,
}

impl PopupCheckbox {
    pub fn id(self) -> i32 {
        match self {
            PopupCheckbox::NoCheckbox => 0,
            PopupCheckbox::Unchecked => 1,
            PopupCheckbox::Checked => 2,
        }
    }

    pub fn checked_if(checked: bool) -> Self {
        if checked {
            PopupCheckbox::Checked
        } else {
            PopupCheckbox::Unchecked
        }
    }
}

/// One entry of a host popup list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupElement {
    pub label: String,
    pub function: TagFunction,
    pub checkbox: PopupCheckbox,
    pub disabled: bool,
}

impl PopupElement {
    pub fn new(label: impl Into<String>, function: TagFunction) -> Self {
        PopupElement {
            label: label.into(),
            function,
            checkbox: PopupCheckbox::NoCheckbox,
            disabled: false,
        }
    }

    pub fn checkbox(mut self, checkbox: PopupCheckbox) -> Self {
        self.checkbox = checkbox;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

// =============================================================================
// Host Trait
// =============================================================================

/// Services the radar display engine provides to one surface.
pub trait Host {
    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Drawable rectangle of the surface.
    fn radar_area(&self) -> Rect;

    /// Geographic position under a pixel.
    fn pixel_to_position(&self, point: Point) -> GeoPosition;

    /// Pixel of a geographic position.
    fn position_to_pixel(&self, position: GeoPosition) -> Point;

    /// South-west and north-east corner of the visible map.
    fn display_area(&self) -> (GeoPosition, GeoPosition);

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Check if the logged-in user holds a controller role.
    fn is_controller(&self) -> bool;

    // -------------------------------------------------------------------------
    // Popups and hit testing
    // -------------------------------------------------------------------------

    /// Open a popup list anchored on `area`. Elements are added afterwards.
    fn open_popup_list(&mut self, area: Rect, title: &str, columns: i32);

    /// Append an element to the most recently opened popup list.
    fn add_popup_list_element(&mut self, element: PopupElement);

    /// Open a single-line edit popup; `function` is invoked with the text on submit.
    fn open_popup_edit(&mut self, area: Rect, function: TagFunction, initial: &str);

    /// Register a hit-test object for the current frame.
    fn add_screen_object(&mut self, object: ScreenObject, area: Rect, movable: bool);

    /// Ask the host to redraw the background bitmap.
    fn refresh_map_content(&mut self);

    // -------------------------------------------------------------------------
    // Persistent settings
    // -------------------------------------------------------------------------

    /// Read a persisted value for this surface.
    fn load_setting(&self, key: &str) -> Option<String>;

    /// Persist a value for this surface.
    fn save_setting(&mut self, key: &str, description: &str, value: &str);
}
