//! # BARS Core
//!
//! Platform-independent overlay controller for the BARS lighting plugin.
//!
//! This crate contains the per-surface state machine that sits between a
//! radar display engine (the host) and the lighting-control client, with
//! **zero I/O and no FFI**. Everything the controller needs from the outside
//! world is reached through traits, so the full render/input cycle runs in
//! unit tests against recording fakes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  host (radar display engine, C ABI)                         │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │  refresh / click / move / function call
//! ┌───────────────▼─────────────────────────────────────────────┐
//! │  bars-plugin   (FfiHost, FfiCanvas, FfiClient)              │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │  Host + Canvas + LightingClient traits
//! ┌───────────────▼─────────────────────────────────────────────┐
//! │  bars-core                                                  │
//! │  ├── overlay/      (controller, badge, menus, input)        │
//! │  ├── tag_function  (popup function id codec)                │
//! │  ├── viewport      (screen → client geometry)               │
//! │  └── settings      (per-surface persisted values)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Modules
//!
//! - [`overlay`] - [`OverlayController`], one per host surface
//! - [`tag_function`] - Encoding of menu actions into host function ids
//! - [`viewport`] - Viewport descriptor handed to the lighting client
//! - [`host`] - [`Host`] trait and host ABI constants
//! - [`client`] - [`LightingClient`] trait and connection/activity states
//! - [`canvas`] - [`Canvas`] trait for the overlay's own drawing
//!
//! ## Example: Function Ids
//!
//! ```rust
//! use bars_core::{SubmenuStep, TagFunction};
//!
//! let id = TagFunction::SubmitSelectView(3).encode().unwrap();
//! assert_eq!(id, 10 | (3 << 8));
//! assert_eq!(TagFunction::decode(id).unwrap(), TagFunction::SubmitSelectView(3));
//!
//! // Submenu requests are replayed in their open form
//! let request = TagFunction::OpenSelectProfile(SubmenuStep::Request);
//! assert_eq!(
//!     request.deferred(),
//!     Some(TagFunction::OpenSelectProfile(SubmenuStep::Open))
//! );
//! ```

pub mod canvas;
pub mod client;
pub mod error;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod settings;
pub mod tag_function;
pub mod viewport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use canvas::{Canvas, SavedTransform, SurfaceHandle, TransformState};
pub use client::{ActivityState, ClickType, ConnectionState, LightingClient};
pub use error::{SettingsError, TagFunctionError};
pub use geometry::{Color, GeoPosition, Point, PointF, Rect, SizeF};
pub use host::{Host, MouseButton, PopupCheckbox, PopupElement, RefreshPhase, ScreenObject};
pub use overlay::{DeferredSlot, OverlayController};
pub use settings::{MenuAnchor, ScreenSettings};
pub use tag_function::{SubmenuStep, TagFunction, TagFunctionKind};
pub use viewport::{Viewport, ViewportGeo, ViewportNonGeo};
