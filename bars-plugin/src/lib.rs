//! BARS Radar Screen Plugin
//!
//! C ABI entry points for the host shim. The shim creates one [`Screen`]
//! per radar surface and forwards the host's render and input callbacks to
//! it; all logic lives in `bars-core`.
//!
//! ```text
//!  host shim                      bars-plugin                bars-core
//!  ─────────                      ───────────                ─────────
//!  bars_screen_create ──────────► Screen { FfiHost, overlay } ─► OverlayController
//!  OnRefresh          ──────────► bars_screen_refresh ─────────► on_refresh
//!  OnClickScreenObject ─────────► bars_screen_click ───────────► on_click_screen_object
//!  OnMoveScreenObject ──────────► bars_screen_move ────────────► on_move_screen_object
//!  OnFunctionCall     ──────────► bars_screen_function_call ──► on_function_call
//!  OnAsrContentLoaded ──────────► bars_screen_content_loaded ─► on_content_loaded
//! ```
//!
//! All entry points are called on the host's UI thread.

pub mod client_ffi;
pub mod config;
pub mod host_ffi;
pub mod logging;

use std::ffi::{c_char, c_void, CStr};

use bars_core::{MouseButton, OverlayController, Point, Rect, RefreshPhase, ScreenObject};
use log::{debug, error, info};

use client_ffi::{ClientApi, FfiClient};
use config::PluginConfig;
use host_ffi::{FfiCanvas, FfiHost, HostApi};

// =============================================================================
// Plugin Constants
// =============================================================================

pub const PLUGIN_NAME: &str = "BARS";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Return codes of `bars_plugin_init`
pub const INIT_OK: i32 = 0;
pub const INIT_BAD_CONFIG: i32 = -1;
pub const INIT_LOGGING_FAILED: i32 = -2;

// =============================================================================
// Plugin Lifecycle
// =============================================================================

/// Report an init failure. The host has no console, so stderr only reaches a
/// developer running it attached; the logger of an earlier init gets it too.
fn init_failed(code: i32, message: std::fmt::Arguments<'_>) -> i32 {
    eprintln!("{}: {}", PLUGIN_NAME, message);
    error!("{}", message);
    code
}

fn init(config: &[u8]) -> Result<(), i32> {
    let config = PluginConfig::parse(config).map_err(|e| {
        init_failed(INIT_BAD_CONFIG, format_args!("bad configuration: {}", e))
    })?;

    if let Some(dir) = &config.log_dir {
        logging::init(dir, config.level()).map_err(|e| {
            init_failed(INIT_LOGGING_FAILED, format_args!("logging setup failed: {:#}", e))
        })?;
    }

    info!("{} {} started", PLUGIN_NAME, PLUGIN_VERSION);
    Ok(())
}

/// Configure the plugin with a JSON document.
///
/// Returns 0 on success, negative on error. Failures before the log file
/// exists are only reported through the return code.
///
/// # Safety
/// `config_ptr` must be null or point to `config_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn bars_plugin_init(config_ptr: *const u8, config_len: usize) -> i32 {
    let config = if config_ptr.is_null() {
        &[][..]
    } else {
        std::slice::from_raw_parts(config_ptr, config_len)
    };

    match init(config) {
        Ok(()) => INIT_OK,
        Err(code) => code,
    }
}

#[no_mangle]
pub extern "C" fn bars_plugin_exit() {
    info!("{} stopped", PLUGIN_NAME);
    log::logger().flush();
}

// =============================================================================
// Screen
// =============================================================================

/// One radar surface: the host wrapper and its overlay controller
pub struct Screen {
    host: FfiHost,
    overlay: OverlayController<FfiClient>,
}

impl Screen {
    pub fn new(host: HostApi, client: ClientApi, geo: bool) -> Option<Self> {
        let client = FfiClient::new(client, geo)?;
        Some(Screen {
            host: FfiHost::new(host),
            overlay: OverlayController::new(client, geo),
        })
    }

    pub fn refresh(&mut self, hdc: *mut c_void, phase: i32) {
        let Some(phase) = RefreshPhase::from_host(phase) else {
            debug!("Ignoring refresh phase {}", phase);
            return;
        };
        if phase == RefreshPhase::AfterTags {
            return;
        }
        let Some(mut canvas) = FfiCanvas::new(self.host.graphics(), hdc) else {
            return;
        };
        self.overlay.on_refresh(&mut self.host, &mut canvas, phase);
    }

    pub fn click(&mut self, kind: i32, point: Point, area: Rect, button: i32) {
        let Some(object) = ScreenObject::from_id(kind) else {
            debug!("Ignoring click on object kind {}", kind);
            return;
        };
        self.overlay.on_click_screen_object(
            &mut self.host,
            object,
            point,
            area,
            MouseButton::from_host(button),
        );
    }

    pub fn move_object(&mut self, kind: i32, point: Point, released: bool) {
        let Some(object) = ScreenObject::from_id(kind) else {
            debug!("Ignoring move of object kind {}", kind);
            return;
        };
        self.overlay
            .on_move_screen_object(&mut self.host, object, point, released);
    }

    pub fn function_call(&mut self, id: i32, text: &str, area: Rect) {
        self.overlay.on_function_call(&mut self.host, id, text, area);
    }

    pub fn content_loaded(&mut self, loaded: bool) {
        self.overlay.on_content_loaded(&self.host, loaded);
    }
}

// =============================================================================
// Screen Exports
// =============================================================================

/// Create the controller for one surface. Returns null on failure.
///
/// # Safety
/// Both tables must be null or valid; they are copied.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_create(
    host_api: *const HostApi,
    client_api: *const ClientApi,
    geo: bool,
) -> *mut Screen {
    let (Some(host), Some(client)) = (host_api.as_ref(), client_api.as_ref()) else {
        error!("bars_screen_create called without function tables");
        return std::ptr::null_mut();
    };

    match Screen::new(*host, *client, geo) {
        Some(screen) => {
            debug!("Created {} screen", if geo { "geographic" } else { "planar" });
            Box::into_raw(Box::new(screen))
        }
        None => std::ptr::null_mut(),
    }
}

/// # Safety
/// `screen` must be null or a pointer from `bars_screen_create` not yet
/// destroyed.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_destroy(screen: *mut Screen) {
    if !screen.is_null() {
        drop(Box::from_raw(screen));
        debug!("Destroyed screen");
    }
}

/// # Safety
/// `screen` must be null or live; `hdc` must be valid for this call.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_refresh(screen: *mut Screen, hdc: *mut c_void, phase: i32) {
    if let Some(screen) = screen.as_mut() {
        screen.refresh(hdc, phase);
    }
}

/// # Safety
/// `screen` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_click(
    screen: *mut Screen,
    kind: i32,
    point: Point,
    area: Rect,
    button: i32,
) {
    if let Some(screen) = screen.as_mut() {
        screen.click(kind, point, area, button);
    }
}

/// # Safety
/// `screen` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_move(
    screen: *mut Screen,
    kind: i32,
    point: Point,
    _area: Rect,
    released: bool,
) {
    if let Some(screen) = screen.as_mut() {
        screen.move_object(kind, point, released);
    }
}

/// # Safety
/// `screen` must be null or live; `text` must be null or a null-terminated
/// string.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_function_call(
    screen: *mut Screen,
    id: i32,
    text: *const c_char,
    _point: Point,
    area: Rect,
) {
    let Some(screen) = screen.as_mut() else {
        return;
    };
    let text = if text.is_null() {
        String::new()
    } else {
        CStr::from_ptr(text).to_string_lossy().into_owned()
    };
    screen.function_call(id, &text, area);
}

/// # Safety
/// `screen` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn bars_screen_content_loaded(screen: *mut Screen, loaded: bool) {
    if let Some(screen) = screen.as_mut() {
        screen.content_loaded(loaded);
    }
}
