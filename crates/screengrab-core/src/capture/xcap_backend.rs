//! Capture through the `xcap` crate
//!
//! `xcap` captures whole monitors into owned RGBA images. Region coordinates
//! are in the virtual-screen space spanning all monitors: the backend
//! captures the monitor containing the region's top-left corner and crops the
//! region out of it, clipped to that monitor. A full-screen grab composites
//! every monitor onto one canvas covering their bounding box; uncovered
//! areas stay black.
//!
//! Monitor geometry is reported in logical units while the captured image has
//! physical pixels. On a scaled monitor the region is scaled by the ratio of
//! image size to logical size before cropping, so the result has the
//! monitor's physical resolution rather than the region's logical size.

use tracing::{debug, error, warn};
use xcap::Monitor;

use super::{
    CaptureBackend, ImageBuffer,
    convert::{SourceFrame, SourceLayout, frame_to_three_channel, to_three_channel},
};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{CaptureArea, ColorOrder, Region},
};

const NAME: &str = "xcap";

/// Backend built on `xcap`
#[derive(Debug, Clone)]
pub struct XcapBackend {
    area:  CaptureArea,
    order: ColorOrder,
}

impl XcapBackend {
    pub fn new(area: CaptureArea, order: ColorOrder) -> Self {
        Self { area, order }
    }
}

impl CaptureBackend for XcapBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn grab(&mut self) -> CaptureResult<ImageBuffer> {
        let monitors = all_monitors()?;

        match self.area {
            CaptureArea::Region(region) => capture_region(&monitors, region, self.order),
            CaptureArea::FullScreen => capture_desktop(&monitors, self.order),
        }
    }
}

/// Position and size of one monitor in virtual-screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    x:      i64,
    y:      i64,
    width:  u32,
    height: u32,
}

impl Geometry {
    fn of(monitor: &Monitor) -> CaptureResult<Self> {
        Ok(Self {
            x:      monitor.x().map_err(failed)? as i64,
            y:      monitor.y().map_err(failed)? as i64,
            width:  monitor.width().map_err(failed)?,
            height: monitor.height().map_err(failed)?,
        })
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i64
            && y < self.y + self.height as i64
    }
}

/// Smallest rectangle covering every monitor
fn bounding_box(geometries: &[Geometry]) -> Option<Geometry> {
    let min_x = geometries.iter().map(|g| g.x).min()?;
    let min_y = geometries.iter().map(|g| g.y).min()?;
    let max_x = geometries.iter().map(|g| g.x + g.width as i64).max()?;
    let max_y = geometries.iter().map(|g| g.y + g.height as i64).max()?;

    Some(Geometry {
        x:      min_x,
        y:      min_y,
        width:  (max_x - min_x) as u32,
        height: (max_y - min_y) as u32,
    })
}

fn failed(e: xcap::XCapError) -> CaptureError {
    error!("xcap capture failed: {}", e);
    CaptureError::capture_failed(NAME, e)
}

fn all_monitors() -> CaptureResult<Vec<(Monitor, Geometry)>> {
    let monitors = Monitor::all().map_err(failed)?;
    if monitors.is_empty() {
        return Err(CaptureError::NoDisplay {
            backend: NAME.to_string(),
        });
    }

    monitors
        .into_iter()
        .map(|monitor| {
            let geometry = Geometry::of(&monitor)?;
            Ok((monitor, geometry))
        })
        .collect()
}

/// Captures one monitor into an owned RGBA buffer
fn capture_monitor(monitor: &Monitor) -> CaptureResult<(Vec<u8>, u32, u32)> {
    let image = monitor.capture_image().map_err(failed)?;
    let (width, height) = (image.width(), image.height());
    Ok((image.into_raw(), width, height))
}

fn capture_region(
    monitors: &[(Monitor, Geometry)],
    region: Region,
    order: ColorOrder,
) -> CaptureResult<ImageBuffer> {
    let (left, top) = (region.left() as i64, region.top() as i64);

    let Some((monitor, geometry)) = monitors.iter().find(|(_, g)| g.contains(left, top)) else {
        let geometries: Vec<Geometry> = monitors.iter().map(|(_, g)| *g).collect();
        let desktop = bounding_box(&geometries);
        return Err(CaptureError::RegionOutOfBounds {
            region,
            surface_width: desktop.map_or(0, |d| d.width),
            surface_height: desktop.map_or(0, |d| d.height),
        });
    };

    debug!("Region {} falls on monitor at ({}, {})", region, geometry.x, geometry.y);

    let (data, width, height) = capture_monitor(monitor)?;
    let source = SourceFrame::packed(&data, width, height, SourceLayout::Rgba)?;

    let out_of_bounds = || CaptureError::RegionOutOfBounds {
        region,
        surface_width: width,
        surface_height: height,
    };
    let scaled = to_image_pixels(region, *geometry, width, height).ok_or_else(out_of_bounds)?;
    let local = scaled.clip_to(0, 0, width, height).ok_or_else(out_of_bounds)?;

    if local != scaled {
        warn!("Region {} clipped to {}x{} on its monitor", region, local.width(), local.height());
    }

    to_three_channel(&source, local, order)
}

/// Maps a virtual-screen region into the pixel space of a monitor's image
fn to_image_pixels(
    region: Region,
    geometry: Geometry,
    image_width: u32,
    image_height: u32,
) -> Option<Region> {
    if geometry.width == 0 || geometry.height == 0 {
        return None;
    }
    let sx = f64::from(image_width) / f64::from(geometry.width);
    let sy = f64::from(image_height) / f64::from(geometry.height);

    let left = ((region.left() as i64 - geometry.x) as f64 * sx).round();
    let top = ((region.top() as i64 - geometry.y) as f64 * sy).round();
    let width = (f64::from(region.width()) * sx).round().max(1.0);
    let height = (f64::from(region.height()) * sy).round().max(1.0);

    let fits = |v: f64| (0.0..=f64::from(u32::MAX)).contains(&v);
    if ![left, top, width, height].into_iter().all(fits) {
        return None;
    }
    Region::from_ltwh(left as u32, top as u32, width as u32, height as u32).ok()
}

fn capture_desktop(
    monitors: &[(Monitor, Geometry)],
    order: ColorOrder,
) -> CaptureResult<ImageBuffer> {
    if let [(monitor, _)] = monitors {
        let (data, width, height) = capture_monitor(monitor)?;
        let source = SourceFrame::packed(&data, width, height, SourceLayout::Rgba)?;
        return frame_to_three_channel(&source, order);
    }

    let geometries: Vec<Geometry> = monitors.iter().map(|(_, g)| *g).collect();
    let desktop = bounding_box(&geometries).ok_or_else(|| CaptureError::NoDisplay {
        backend: NAME.to_string(),
    })?;

    debug!(
        "Compositing {} monitors onto a {}x{} canvas",
        monitors.len(),
        desktop.width,
        desktop.height
    );

    let mut tiles = Vec::with_capacity(monitors.len());
    for (monitor, geometry) in monitors {
        let (data, width, height) = capture_monitor(monitor)?;
        let source = SourceFrame::packed(&data, width, height, SourceLayout::Rgba)?;
        tiles.push((*geometry, frame_to_three_channel(&source, order)?));
    }

    compose(desktop, &tiles, order)
}

/// Copies each tile onto a black canvas covering `desktop`
fn compose(
    desktop: Geometry,
    tiles: &[(Geometry, ImageBuffer)],
    order: ColorOrder,
) -> CaptureResult<ImageBuffer> {
    let canvas_row = desktop.width as usize * 3;
    let mut canvas = vec![0u8; canvas_row * desktop.height as usize];

    for (geometry, tile) in tiles {
        let dx = (geometry.x - desktop.x) as usize;
        let dy = (geometry.y - desktop.y) as usize;
        // Never write past the canvas if the image is larger than the logical size
        let cols = (tile.width() as usize).min(desktop.width as usize - dx);
        let rows = (tile.height() as usize).min(desktop.height as usize - dy);
        let tile_row = tile.width() as usize * 3;

        for row in 0..rows {
            let src = &tile.as_bytes()[row * tile_row..row * tile_row + cols * 3];
            let start = (dy + row) * canvas_row + dx * 3;
            canvas[start..start + cols * 3].copy_from_slice(src);
        }
    }

    ImageBuffer::from_raw(desktop.width, desktop.height, canvas, order)
}

/// Checks that xcap can enumerate at least one monitor
pub(crate) fn probe() -> CaptureResult<()> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MissingDependency {
        backend: NAME.to_string(),
        reason:  e.to_string(),
    })?;

    let primary = monitors
        .iter()
        .filter(|m| m.is_primary().unwrap_or(false))
        .count();
    debug!("xcap sees {} monitor(s), {} primary", monitors.len(), primary);

    if monitors.is_empty() {
        return Err(CaptureError::NoDisplay {
            backend: NAME.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(x: i64, y: i64, width: u32, height: u32) -> Geometry {
        Geometry {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_bounding_box_side_by_side() {
        let desktop = bounding_box(&[geometry(0, 0, 1920, 1080), geometry(1920, 0, 1280, 1024)])
            .unwrap();
        assert_eq!(desktop, geometry(0, 0, 3200, 1080));
    }

    #[test]
    fn test_bounding_box_negative_origin() {
        let desktop =
            bounding_box(&[geometry(0, 0, 100, 100), geometry(-50, -20, 50, 50)]).unwrap();
        assert_eq!(desktop, geometry(-50, -20, 150, 120));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(bounding_box(&[]).is_none());
    }

    #[test]
    fn test_contains_excludes_far_edge() {
        let g = geometry(1920, 0, 1280, 1024);
        assert!(g.contains(1920, 0));
        assert!(!g.contains(3200, 0));
        assert!(!g.contains(1919, 10));
    }

    #[test]
    fn test_image_pixels_unscaled_monitor() {
        let region = Region::from_ltwh(2000, 10, 100, 50).unwrap();
        let local = to_image_pixels(region, geometry(1920, 0, 1280, 1024), 1280, 1024).unwrap();
        assert_eq!(local.as_ltwh(), (80, 10, 100, 50));
    }

    #[test]
    fn test_image_pixels_scaled_monitor() {
        // 1440x900 logical monitor captured at 2x
        let region = Region::from_ltwh(1540, 50, 200, 100).unwrap();
        let local = to_image_pixels(region, geometry(1440, 0, 1440, 900), 2880, 1800).unwrap();
        assert_eq!(local.as_ltwh(), (200, 100, 400, 200));
    }

    #[test]
    fn test_image_pixels_empty_monitor() {
        let region = Region::from_ltwh(0, 0, 10, 10).unwrap();
        assert!(to_image_pixels(region, geometry(0, 0, 0, 0), 10, 10).is_none());
    }

    #[test]
    fn test_compose_leaves_gaps_black() {
        let left = ImageBuffer::from_raw(1, 2, vec![9; 6], ColorOrder::Rgb).unwrap();
        let right = ImageBuffer::from_raw(1, 1, vec![7; 3], ColorOrder::Rgb).unwrap();
        let desktop = geometry(0, 0, 2, 2);

        let out = compose(
            desktop,
            &[(geometry(0, 0, 1, 2), left), (geometry(1, 0, 1, 1), right)],
            ColorOrder::Rgb,
        )
        .unwrap();

        assert_eq!(out.pixel(0, 0), [9, 9, 9]);
        assert_eq!(out.pixel(0, 1), [9, 9, 9]);
        assert_eq!(out.pixel(1, 0), [7, 7, 7]);
        assert_eq!(out.pixel(1, 1), [0, 0, 0]);
    }
}
