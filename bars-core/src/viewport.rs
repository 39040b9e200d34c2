//! Viewport Transform
//!
//! Maps the host's screen geometry into the viewport descriptor the lighting
//! client renders against. Geographic surfaces get an origin, per-axis
//! scaling and a rotation; planar surfaces only get a size.
//!
//! # Geographic sampling
//!
//! The host can only convert single points between pixels and positions, so
//! the transform is recovered from three samples taken on the visible
//! bounding box:
//!
//! ```text
//!   north (max lat, min lon)
//!     ●
//!     │  |north - min| / Δlat  → scaling[0]
//!     │
//!     ●───────────●  east (min lat, max lon)
//!    min            |east - min| / Δlon  → scaling[1]
//! ```
//!
//! Using pixel distances rather than pixel deltas along one axis keeps the
//! scaling independent of map rotation; the rotation itself comes from the
//! direction of the east vector.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geometry::{GeoPosition, Point, Rect};
use crate::host::Host;

/// Viewport of a geographically referenced surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeo {
    /// Latitude, longitude at pixel (0, 0)
    pub origin: [f64; 2],
    /// Pixels per degree of latitude, longitude
    pub scaling: [f64; 2],
    /// Radians
    pub rotation: f64,
    /// Width, height in pixels
    pub size: [i32; 2],
}

/// Viewport of a surface without geographic reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportNonGeo {
    /// Always (0, 0)
    pub origin: [f64; 2],
    /// Width, height in pixels
    pub size: [i32; 2],
}

/// Viewport descriptor consumed by the lighting client
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Viewport {
    Geo(ViewportGeo),
    NonGeo(ViewportNonGeo),
}

/// Pixel/position samples a geographic transform is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSamples {
    /// Position under pixel (0, 0)
    pub origin: GeoPosition,
    /// South-west corner of the visible bounding box
    pub min: GeoPosition,
    /// North-east corner of the visible bounding box
    pub max: GeoPosition,
    /// Pixel of `min`
    pub pixel_min: Point,
    /// Pixel of (max latitude, min longitude)
    pub pixel_north: Point,
    /// Pixel of (min latitude, max longitude)
    pub pixel_east: Point,
}

impl GeoSamples {
    /// Take the samples from the host's current map projection
    pub fn from_host<H: Host + ?Sized>(host: &H) -> Self {
        let origin = host.pixel_to_position(Point::new(0, 0));
        let (min, max) = host.display_area();

        let north = GeoPosition::new(max.latitude, min.longitude);
        let east = GeoPosition::new(min.latitude, max.longitude);

        GeoSamples {
            origin,
            min,
            max,
            pixel_min: host.position_to_pixel(min),
            pixel_north: host.position_to_pixel(north),
            pixel_east: host.position_to_pixel(east),
        }
    }

    fn offset(&self, pixel: Point) -> Vector2<f64> {
        Vector2::new(
            (pixel.x - self.pixel_min.x) as f64,
            (pixel.y - self.pixel_min.y) as f64,
        )
    }
}

/// Pixel size of the region the client draws into.
///
/// The client draws relative to the surface origin, so the height runs from
/// pixel row 0 to the bottom of the drawable area.
fn surface_size(area: &Rect) -> [i32; 2] {
    [area.width(), area.bottom]
}

impl ViewportGeo {
    /// Derive the geographic transform from host samples.
    ///
    /// A bounding box with zero extent yields non-finite scaling, which
    /// [`Viewport::is_drawable`] reports.
    pub fn from_samples(area: &Rect, samples: &GeoSamples) -> Self {
        let north = samples.offset(samples.pixel_north);
        let east = samples.offset(samples.pixel_east);

        let delta_lat = samples.max.latitude - samples.min.latitude;
        let delta_lon = samples.max.longitude - samples.min.longitude;

        ViewportGeo {
            origin: [samples.origin.latitude, samples.origin.longitude],
            scaling: [north.norm() / delta_lat, east.norm() / delta_lon],
            rotation: east.x.atan2(east.y),
            size: surface_size(area),
        }
    }

    /// Check if the transform can be drawn with
    pub fn is_finite(&self) -> bool {
        self.scaling.iter().all(|s| s.is_finite()) && self.rotation.is_finite()
    }
}

impl Viewport {
    /// Viewport of a planar surface
    pub fn planar(area: &Rect) -> Self {
        Viewport::NonGeo(ViewportNonGeo {
            origin: [0.0, 0.0],
            size: surface_size(area),
        })
    }

    /// Compute the viewport for the host's current display geometry
    pub fn for_surface<H: Host + ?Sized>(host: &H, geo: bool) -> Self {
        let area = host.radar_area();
        if geo {
            Viewport::Geo(ViewportGeo::from_samples(&area, &GeoSamples::from_host(host)))
        } else {
            Viewport::planar(&area)
        }
    }

    /// False for a geographic transform derived from a zero-extent box
    pub fn is_drawable(&self) -> bool {
        match self {
            Viewport::Geo(v) => v.is_finite(),
            Viewport::NonGeo(_) => true,
        }
    }

    pub fn size(&self) -> [i32; 2] {
        match self {
            Viewport::Geo(v) => v.size,
            Viewport::NonGeo(v) => v.size,
        }
    }
}
