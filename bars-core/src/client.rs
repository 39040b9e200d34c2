//! Lighting client abstraction.
//!
//! The lighting-control client owns the connection to the lighting server,
//! the aerodrome data and the pixel content of the overlay. The overlay
//! controller consumes it as an opaque per-surface service through the
//! [`LightingClient`] trait.

use serde::{Deserialize, Serialize};

use crate::canvas::SurfaceHandle;
use crate::geometry::{Point, Rect};
use crate::viewport::Viewport;

// =============================================================================
// Connection State
// =============================================================================

/// State of the client's connection to the lighting server
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Connected straight to the lighting server
    ConnectedDirect,
    /// Connected through another client acting as proxy
    ConnectedProxy,
    /// Running against a local server
    ConnectedLocal,
    /// Connection failed and will not recover without a reconnect
    Poisoned,
}

impl ConnectionState {
    /// Check if lighting data is available
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            ConnectionState::ConnectedDirect
                | ConnectionState::ConnectedProxy
                | ConnectionState::ConnectedLocal
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::ConnectedDirect => write!(f, "Connected (direct)"),
            ConnectionState::ConnectedProxy => write!(f, "Connected (proxy)"),
            ConnectionState::ConnectedLocal => write!(f, "Connected (local)"),
            ConnectionState::Poisoned => write!(f, "Poisoned"),
        }
    }
}

/// Controller engagement on the selected aerodrome
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityState {
    /// No aerodrome data
    #[default]
    None,
    /// Read-only
    Observing,
    /// Can modify lighting
    Controlling,
}

impl ActivityState {
    /// Activity after a control toggle
    pub fn toggled(self) -> Self {
        match self {
            ActivityState::Observing => ActivityState::Controlling,
            _ => ActivityState::Observing,
        }
    }
}

/// Kind of click forwarded to the client
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickType {
    Primary,
    Auxiliary,
}

// =============================================================================
// LightingClient Trait
// =============================================================================

/// Per-surface view of the lighting-control client.
///
/// Lists are returned in display order; indices passed to the setters refer
/// to positions in the most recently returned list.
pub trait LightingClient {
    // -------------------------------------------------------------------------
    // Connection and target
    // -------------------------------------------------------------------------

    fn connection_state(&self) -> ConnectionState;

    /// ICAO code of the target aerodrome, if one is set.
    fn aerodrome(&self) -> Option<String>;

    fn set_aerodrome(&mut self, icao: Option<&str>);

    fn activity(&self) -> ActivityState;

    fn set_activity(&mut self, state: ActivityState);

    // -------------------------------------------------------------------------
    // Profiles, presets and views
    // -------------------------------------------------------------------------

    fn profiles(&self) -> Vec<String>;

    fn profile(&self) -> usize;

    fn set_profile(&mut self, index: usize);

    /// Presets of the current profile.
    fn presets(&self) -> Vec<String>;

    fn apply_preset(&mut self, index: usize);

    fn views(&self) -> Vec<String>;

    fn view(&self) -> usize;

    fn set_view(&mut self, index: usize);

    // -------------------------------------------------------------------------
    // Rendering and input
    // -------------------------------------------------------------------------

    fn draw_background(&mut self, surface: SurfaceHandle, viewport: &Viewport);

    fn set_viewport(&mut self, viewport: &Viewport);

    fn draw_foreground(&mut self, surface: SurfaceHandle);

    /// Rectangles that should receive clicks this frame.
    fn click_regions(&self) -> Vec<Rect>;

    /// Check if content changed so the background bitmap must be redrawn.
    fn is_background_refresh_required(&mut self) -> bool;

    fn handle_click(&mut self, point: Point, click: ClickType);
}
