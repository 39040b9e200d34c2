//! Lighting client FFI bindings
//!
//! The lighting client is loaded by the shim and handed over as a function
//! table together with its context. Each host surface gets its own client
//! screen, created in [`FfiClient::new`] and destroyed on drop.

use std::ffi::{c_char, c_void};

use bars_core::{
    ActivityState, ClickType, ConnectionState, LightingClient, Point, Rect, SurfaceHandle,
    Viewport,
};
use log::warn;

use crate::host_ffi::{from_cstr, to_cstring};

// =============================================================================
// Wire types
// =============================================================================

pub const VIEWPORT_GEO: u32 = 0;
pub const VIEWPORT_NON_GEO: u32 = 1;

/// Flat viewport descriptor; `scaling` and `rotation` are zero for planar
/// surfaces.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawViewport {
    pub kind: u32,
    pub origin: [f64; 2],
    pub scaling: [f64; 2],
    pub rotation: f64,
    pub size: [f64; 2],
}

impl From<&Viewport> for RawViewport {
    fn from(viewport: &Viewport) -> Self {
        let size = viewport.size().map(f64::from);
        match viewport {
            Viewport::Geo(v) => RawViewport {
                kind: VIEWPORT_GEO,
                origin: v.origin,
                scaling: v.scaling,
                rotation: v.rotation,
                size,
            },
            Viewport::NonGeo(v) => RawViewport {
                kind: VIEWPORT_NON_GEO,
                origin: v.origin,
                scaling: [0.0, 0.0],
                rotation: 0.0,
                size,
            },
        }
    }
}

/// Connection state from its wire value; unknown values read as disconnected
pub fn connection_from_raw(value: i32) -> ConnectionState {
    match value {
        1 => ConnectionState::ConnectedDirect,
        2 => ConnectionState::ConnectedProxy,
        3 => ConnectionState::ConnectedLocal,
        4 => ConnectionState::Poisoned,
        _ => ConnectionState::Disconnected,
    }
}

pub fn activity_from_raw(value: i32) -> ActivityState {
    match value {
        1 => ActivityState::Observing,
        2 => ActivityState::Controlling,
        _ => ActivityState::None,
    }
}

fn activity_to_raw(state: ActivityState) -> i32 {
    match state {
        ActivityState::None => 0,
        ActivityState::Observing => 1,
        ActivityState::Controlling => 2,
    }
}

fn click_to_raw(click: ClickType) -> i32 {
    match click {
        ClickType::Primary => 0,
        ClickType::Auxiliary => 1,
    }
}

/// Copy a null-terminated array of strings.
///
/// # Safety
/// `list` must be null or point to an array of string pointers ending in a
/// null pointer.
pub unsafe fn string_list(list: *const *const c_char) -> Vec<String> {
    let mut strings = Vec::new();
    if list.is_null() {
        return strings;
    }
    for i in 0.. {
        let item = *list.add(i);
        match from_cstr(item) {
            Some(s) => strings.push(s),
            None => break,
        }
    }
    strings
}

// =============================================================================
// Function table
// =============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ClientApi {
    pub context: *mut c_void,

    pub create_screen: extern "C" fn(context: *mut c_void, geo: bool) -> *mut c_void,
    pub destroy_screen: extern "C" fn(screen: *mut c_void),
    pub connection_state: extern "C" fn(context: *mut c_void) -> i32,

    /// Returns null when no aerodrome is selected
    pub get_aerodrome: extern "C" fn(screen: *mut c_void) -> *const c_char,
    /// Null clears the selection
    pub set_aerodrome: extern "C" fn(screen: *mut c_void, icao: *const c_char),
    pub get_activity: extern "C" fn(screen: *mut c_void) -> i32,
    pub set_activity: extern "C" fn(screen: *mut c_void, state: i32),

    pub get_profiles: extern "C" fn(screen: *mut c_void) -> *const *const c_char,
    pub get_profile: extern "C" fn(screen: *mut c_void) -> usize,
    pub set_profile: extern "C" fn(screen: *mut c_void, index: usize),
    pub get_presets: extern "C" fn(screen: *mut c_void) -> *const *const c_char,
    pub apply_preset: extern "C" fn(screen: *mut c_void, index: usize),
    pub get_views: extern "C" fn(screen: *mut c_void) -> *const *const c_char,
    pub get_view: extern "C" fn(screen: *mut c_void) -> usize,
    pub set_view: extern "C" fn(screen: *mut c_void, index: usize),

    pub draw_background:
        extern "C" fn(screen: *mut c_void, hdc: *mut c_void, viewport: RawViewport),
    pub set_viewport: extern "C" fn(screen: *mut c_void, viewport: RawViewport),
    pub draw_foreground: extern "C" fn(screen: *mut c_void, hdc: *mut c_void),
    pub get_click_regions: extern "C" fn(screen: *mut c_void, len: *mut usize) -> *const Rect,
    pub is_background_refresh_required: extern "C" fn(screen: *mut c_void) -> bool,
    pub handle_click: extern "C" fn(screen: *mut c_void, point: Point, click: i32),
}

// =============================================================================
// Client wrapper
// =============================================================================

/// One client screen, owned by one overlay controller
#[derive(Debug)]
pub struct FfiClient {
    api: ClientApi,
    screen: *mut c_void,
}

impl FfiClient {
    /// Create the client screen; `None` if the client refused
    pub fn new(api: ClientApi, geo: bool) -> Option<Self> {
        let screen = (api.create_screen)(api.context, geo);
        if screen.is_null() {
            warn!("Client refused to create a screen");
            return None;
        }
        Some(FfiClient { api, screen })
    }
}

impl Drop for FfiClient {
    fn drop(&mut self) {
        (self.api.destroy_screen)(self.screen);
    }
}

fn surface_ptr(surface: SurfaceHandle) -> *mut c_void {
    surface.0 as *mut c_void
}

impl LightingClient for FfiClient {
    fn connection_state(&self) -> ConnectionState {
        connection_from_raw((self.api.connection_state)(self.api.context))
    }

    fn aerodrome(&self) -> Option<String> {
        // SAFETY: the client returns null or a null-terminated string
        unsafe { from_cstr((self.api.get_aerodrome)(self.screen)) }
    }

    fn set_aerodrome(&mut self, icao: Option<&str>) {
        match icao.map(to_cstring) {
            Some(Some(icao)) => (self.api.set_aerodrome)(self.screen, icao.as_ptr()),
            Some(None) => {}
            None => (self.api.set_aerodrome)(self.screen, std::ptr::null()),
        }
    }

    fn activity(&self) -> ActivityState {
        activity_from_raw((self.api.get_activity)(self.screen))
    }

    fn set_activity(&mut self, state: ActivityState) {
        (self.api.set_activity)(self.screen, activity_to_raw(state));
    }

    fn profiles(&self) -> Vec<String> {
        // SAFETY: the client returns a null-terminated list
        unsafe { string_list((self.api.get_profiles)(self.screen)) }
    }

    fn profile(&self) -> usize {
        (self.api.get_profile)(self.screen)
    }

    fn set_profile(&mut self, index: usize) {
        (self.api.set_profile)(self.screen, index);
    }

    fn presets(&self) -> Vec<String> {
        // SAFETY: the client returns a null-terminated list
        unsafe { string_list((self.api.get_presets)(self.screen)) }
    }

    fn apply_preset(&mut self, index: usize) {
        (self.api.apply_preset)(self.screen, index);
    }

    fn views(&self) -> Vec<String> {
        // SAFETY: the client returns a null-terminated list
        unsafe { string_list((self.api.get_views)(self.screen)) }
    }

    fn view(&self) -> usize {
        (self.api.get_view)(self.screen)
    }

    fn set_view(&mut self, index: usize) {
        (self.api.set_view)(self.screen, index);
    }

    fn draw_background(&mut self, surface: SurfaceHandle, viewport: &Viewport) {
        (self.api.draw_background)(self.screen, surface_ptr(surface), viewport.into());
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        (self.api.set_viewport)(self.screen, viewport.into());
    }

    fn draw_foreground(&mut self, surface: SurfaceHandle) {
        (self.api.draw_foreground)(self.screen, surface_ptr(surface));
    }

    fn click_regions(&self) -> Vec<Rect> {
        let mut len = 0;
        let regions = (self.api.get_click_regions)(self.screen, &mut len);
        if regions.is_null() || len == 0 {
            return Vec::new();
        }
        // SAFETY: the client returns `len` rectangles valid until its next call
        unsafe { std::slice::from_raw_parts(regions, len) }.to_vec()
    }

    fn is_background_refresh_required(&mut self) -> bool {
        (self.api.is_background_refresh_required)(self.screen)
    }

    fn handle_click(&mut self, point: Point, click: ClickType) {
        (self.api.handle_click)(self.screen, point, click_to_raw(click));
    }
}
