//! Host FFI bindings
//!
//! The host's plugin API is C++, so a thin shim on the host side exposes it
//! as tables of C function pointers. The shim passes the tables to
//! `bars_screen_create`; this module wraps them in safe [`Host`] and
//! [`Canvas`] implementations.
//!
//! Strings passed to the shim are null-terminated and only borrowed for the
//! duration of the call. Strings returned by the shim stay valid until its
//! next call on the same surface.

use std::ffi::{c_char, c_void, CStr, CString};

use bars_core::{
    Canvas, Color, GeoPosition, Host, Point, PointF, PopupElement, Rect, ScreenObject, SizeF,
    SurfaceHandle, TagFunction, TransformState,
};
use log::warn;

// =============================================================================
// Function tables (filled in by the host shim)
// =============================================================================

/// Per-surface host services. `screen` is passed back on every call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HostApi {
    pub screen: *mut c_void,

    pub radar_area: extern "C" fn(screen: *mut c_void) -> Rect,
    pub pixel_to_position: extern "C" fn(screen: *mut c_void, point: Point) -> GeoPosition,
    pub position_to_pixel: extern "C" fn(screen: *mut c_void, position: GeoPosition) -> Point,
    pub display_area:
        extern "C" fn(screen: *mut c_void, min: *mut GeoPosition, max: *mut GeoPosition),
    pub is_controller: extern "C" fn(screen: *mut c_void) -> bool,

    pub open_popup_list:
        extern "C" fn(screen: *mut c_void, area: Rect, title: *const c_char, columns: i32),
    pub add_popup_list_element: extern "C" fn(
        screen: *mut c_void,
        label: *const c_char,
        function: i32,
        checkbox: i32,
        disabled: bool,
    ),
    pub open_popup_edit:
        extern "C" fn(screen: *mut c_void, area: Rect, function: i32, initial: *const c_char),
    pub add_screen_object:
        extern "C" fn(screen: *mut c_void, object: i32, area: Rect, movable: bool),
    pub refresh_map_content: extern "C" fn(screen: *mut c_void),

    /// Returns null when the key is not set
    pub load_setting: extern "C" fn(screen: *mut c_void, key: *const c_char) -> *const c_char,
    pub save_setting: extern "C" fn(
        screen: *mut c_void,
        key: *const c_char,
        description: *const c_char,
        value: *const c_char,
    ),

    pub graphics: GraphicsApi,
}

/// 2D drawing on a device context, valid for one render callback
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GraphicsApi {
    /// Returns null if no graphics context can be created for `hdc`
    pub create: extern "C" fn(hdc: *mut c_void) -> *mut c_void,
    pub release: extern "C" fn(graphics: *mut c_void),
    pub measure_text: extern "C" fn(graphics: *mut c_void, text: *const c_char) -> SizeF,
    pub draw_text:
        extern "C" fn(graphics: *mut c_void, text: *const c_char, origin: PointF, color: Color),
    pub fill_rect: extern "C" fn(graphics: *mut c_void, rect: Rect, color: Color),
    pub draw_lines:
        extern "C" fn(graphics: *mut c_void, points: *const Point, len: usize, color: Color),
    pub save: extern "C" fn(graphics: *mut c_void) -> u32,
    pub translate: extern "C" fn(graphics: *mut c_void, dx: f32, dy: f32),
    pub restore: extern "C" fn(graphics: *mut c_void, state: u32),
}

// =============================================================================
// String helpers
// =============================================================================

/// Convert for the shim; strings with interior nulls are rejected
pub fn to_cstring(s: &str) -> Option<CString> {
    CString::new(s)
        .inspect_err(|_| warn!("Dropping string with interior null: {:?}", s))
        .ok()
}

/// Copy a string owned by the shim
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string.
pub unsafe fn from_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

// =============================================================================
// Host wrapper
// =============================================================================

/// [`Host`] backed by the shim's function table
pub struct FfiHost {
    api: HostApi,
}

impl FfiHost {
    pub fn new(api: HostApi) -> Self {
        FfiHost { api }
    }

    pub fn graphics(&self) -> GraphicsApi {
        self.api.graphics
    }

    fn encode(function: TagFunction) -> Option<i32> {
        function
            .encode()
            .inspect_err(|e| warn!("Cannot encode {:?}: {}", function, e))
            .ok()
    }
}

impl Host for FfiHost {
    fn radar_area(&self) -> Rect {
        (self.api.radar_area)(self.api.screen)
    }

    fn pixel_to_position(&self, point: Point) -> GeoPosition {
        (self.api.pixel_to_position)(self.api.screen, point)
    }

    fn position_to_pixel(&self, position: GeoPosition) -> Point {
        (self.api.position_to_pixel)(self.api.screen, position)
    }

    fn display_area(&self) -> (GeoPosition, GeoPosition) {
        let mut min = GeoPosition::default();
        let mut max = GeoPosition::default();
        (self.api.display_area)(self.api.screen, &mut min, &mut max);
        (min, max)
    }

    fn is_controller(&self) -> bool {
        (self.api.is_controller)(self.api.screen)
    }

    fn open_popup_list(&mut self, area: Rect, title: &str, columns: i32) {
        let Some(title) = to_cstring(title) else {
            return;
        };
        (self.api.open_popup_list)(self.api.screen, area, title.as_ptr(), columns);
    }

    fn add_popup_list_element(&mut self, element: PopupElement) {
        let (Some(label), Some(function)) =
            (to_cstring(&element.label), Self::encode(element.function))
        else {
            return;
        };
        (self.api.add_popup_list_element)(
            self.api.screen,
            label.as_ptr(),
            function,
            element.checkbox.id(),
            element.disabled,
        );
    }

    fn open_popup_edit(&mut self, area: Rect, function: TagFunction, initial: &str) {
        let (Some(initial), Some(function)) = (to_cstring(initial), Self::encode(function)) else {
            return;
        };
        (self.api.open_popup_edit)(self.api.screen, area, function, initial.as_ptr());
    }

    fn add_screen_object(&mut self, object: ScreenObject, area: Rect, movable: bool) {
        (self.api.add_screen_object)(self.api.screen, object.id(), area, movable);
    }

    fn refresh_map_content(&mut self) {
        (self.api.refresh_map_content)(self.api.screen);
    }

    fn load_setting(&self, key: &str) -> Option<String> {
        let key = to_cstring(key)?;
        let value = (self.api.load_setting)(self.api.screen, key.as_ptr());
        // SAFETY: the shim returns null or a null-terminated string
        unsafe { from_cstr(value) }
    }

    fn save_setting(&mut self, key: &str, description: &str, value: &str) {
        let (Some(key), Some(description), Some(value)) =
            (to_cstring(key), to_cstring(description), to_cstring(value))
        else {
            return;
        };
        (self.api.save_setting)(
            self.api.screen,
            key.as_ptr(),
            description.as_ptr(),
            value.as_ptr(),
        );
    }
}

// =============================================================================
// Canvas wrapper
// =============================================================================

/// [`Canvas`] over a shim graphics context, released on drop
pub struct FfiCanvas {
    api: GraphicsApi,
    hdc: *mut c_void,
    graphics: *mut c_void,
}

impl FfiCanvas {
    pub fn new(api: GraphicsApi, hdc: *mut c_void) -> Option<Self> {
        if hdc.is_null() {
            return None;
        }
        let graphics = (api.create)(hdc);
        if graphics.is_null() {
            warn!("No graphics context for device context {:p}", hdc);
            return None;
        }
        Some(FfiCanvas { api, hdc, graphics })
    }
}

impl Drop for FfiCanvas {
    fn drop(&mut self) {
        (self.api.release)(self.graphics);
    }
}

impl Canvas for FfiCanvas {
    fn surface(&self) -> SurfaceHandle {
        SurfaceHandle(self.hdc as usize)
    }

    fn measure_text(&mut self, text: &str) -> SizeF {
        match to_cstring(text) {
            Some(text) => (self.api.measure_text)(self.graphics, text.as_ptr()),
            None => SizeF::default(),
        }
    }

    fn draw_text(&mut self, text: &str, origin: PointF, color: Color) {
        if let Some(text) = to_cstring(text) {
            (self.api.draw_text)(self.graphics, text.as_ptr(), origin, color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        (self.api.fill_rect)(self.graphics, rect, color);
    }

    fn draw_lines(&mut self, points: &[Point], color: Color) {
        (self.api.draw_lines)(self.graphics, points.as_ptr(), points.len(), color);
    }

    fn save(&mut self) -> TransformState {
        TransformState((self.api.save)(self.graphics))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        (self.api.translate)(self.graphics, dx, dy);
    }

    fn restore(&mut self, state: TransformState) {
        (self.api.restore)(self.graphics, state.0);
    }
}
