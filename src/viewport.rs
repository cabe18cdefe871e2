//! Responsive sizing of the paint target.

use crate::config::ViewportConfig;

/// Size computed for one layout pass. Never cached beyond the frame it was made for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSpec {
    /// CSS width in pixels.
    pub logical_width: f64,
    /// CSS height in pixels.
    pub logical_height: f64,
    pub device_pixel_ratio: f64,
    /// Authored width / height ratio, preserved at every container width.
    pub aspect_ratio: f64,
    /// Backing-store width in device pixels.
    pub backing_width: u32,
    pub backing_height: u32,
}

/// The element being sized, as seen by the viewport manager.
pub trait LayoutTarget {
    /// Width of the element's parent container in CSS pixels.
    fn container_width(&self) -> f64;

    /// The element's current pixel width and height.
    fn authored_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Set CSS size and backing-store size.
    fn apply(&mut self, spec: &ViewportSpec);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportManager {
    floor: f64,
    container_fraction: f64,
    scale_backing_by_dpr: bool,
    aspect_ratio: Option<f64>,
}

impl ViewportManager {
    pub fn new(floor: f64, container_fraction: f64, scale_backing_by_dpr: bool) -> Self {
        Self {
            floor,
            container_fraction,
            scale_backing_by_dpr,
            aspect_ratio: None,
        }
    }

    pub fn from_config(config: &ViewportConfig, floor: f64) -> Self {
        Self::new(
            floor,
            config.container_fraction,
            config.scale_backing_by_dpr,
        )
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Aspect ratio captured at first layout, if any layout happened yet.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// `width = max(floor, fraction * container)`, `height = width / aspect`.
    pub fn compute(&self, container_width: f64, dpr: f64, aspect_ratio: f64) -> ViewportSpec {
        let logical_width = self.floor.max(container_width * self.container_fraction);
        let logical_height = logical_width / aspect_ratio;
        let dpr = sanitize(dpr);
        let scale = if self.scale_backing_by_dpr { dpr } else { 1.0 };
        ViewportSpec {
            logical_width,
            logical_height,
            device_pixel_ratio: dpr,
            aspect_ratio,
            backing_width: to_pixels(logical_width * scale),
            backing_height: to_pixels(logical_height * scale),
        }
    }

    /// Size `target` for its current container and apply the result.
    pub fn resize<T: LayoutTarget + ?Sized>(&mut self, target: &mut T) -> ViewportSpec {
        let aspect = match self.aspect_ratio {
            Some(a) => a,
            None => {
                let (w, h) = target.authored_size();
                let a = sanitize(w / h);
                self.aspect_ratio = Some(a);
                a
            }
        };
        let spec = self.compute(
            target.container_width(),
            target.device_pixel_ratio(),
            aspect,
        );
        target.apply(&spec);
        tracing::debug!(
            width = spec.logical_width,
            height = spec.logical_height,
            dpr = spec.device_pixel_ratio,
            "viewport resized"
        );
        spec
    }
}

fn sanitize(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

// Float-to-int `as` saturates and maps NaN to 0.
fn to_pixels(v: f64) -> u32 {
    v.trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeElement {
        container: f64,
        size: (f64, f64),
        dpr: f64,
        applied: Vec<ViewportSpec>,
    }

    impl FakeElement {
        fn new(container: f64, size: (f64, f64)) -> Self {
            Self {
                container,
                size,
                dpr: 2.0,
                applied: Vec::new(),
            }
        }
    }

    impl LayoutTarget for FakeElement {
        fn container_width(&self) -> f64 {
            self.container
        }

        fn authored_size(&self) -> (f64, f64) {
            self.size
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.dpr
        }

        fn apply(&mut self, spec: &ViewportSpec) {
            self.size = (spec.backing_width as f64, spec.backing_height as f64);
            self.applied.push(*spec);
        }
    }

    #[test]
    fn wide_container_uses_eighty_percent() {
        let vm = ViewportManager::new(600.0, 0.8, false);
        let spec = vm.compute(1000.0, 1.0, 2.0);
        assert_eq!(spec.logical_width, 800.0);
        assert_eq!(spec.logical_height, 400.0);
        assert_eq!((spec.backing_width, spec.backing_height), (800, 400));
    }

    #[test]
    fn narrow_container_hits_floor() {
        let vm = ViewportManager::new(400.0, 0.8, false);
        let spec = vm.compute(300.0, 1.0, 1.0);
        assert_eq!(spec.logical_width, 400.0);
        assert_eq!(spec.logical_height, 400.0);
    }

    #[test]
    fn backing_store_stays_logical_unless_configured() {
        let logical = ViewportManager::new(600.0, 0.8, false).compute(1000.0, 2.0, 2.0);
        assert_eq!(logical.device_pixel_ratio, 2.0);
        assert_eq!(logical.backing_width, 800);

        let scaled = ViewportManager::new(600.0, 0.8, true).compute(1000.0, 2.0, 2.0);
        assert_eq!((scaled.backing_width, scaled.backing_height), (1600, 800));
    }

    #[test]
    fn aspect_ratio_is_captured_once() {
        let mut vm = ViewportManager::new(600.0, 0.8, false);
        let mut el = FakeElement::new(1000.0, (300.0, 150.0));

        let first = vm.resize(&mut el);
        assert_eq!(first.aspect_ratio, 2.0);

        // Truncated backing sizes would drift the ratio if it were re-read.
        el.size = (801.0, 399.0);
        el.container = 1500.0;
        let second = vm.resize(&mut el);
        assert_eq!(second.aspect_ratio, 2.0);
        assert_eq!(second.logical_height, 600.0);
        assert_eq!(el.applied.len(), 2);
    }

    #[test]
    fn degenerate_authored_size_falls_back_to_square() {
        let mut vm = ViewportManager::new(400.0, 0.8, false);
        let mut el = FakeElement::new(100.0, (0.0, 0.0));
        let spec = vm.resize(&mut el);
        assert_eq!(spec.aspect_ratio, 1.0);
        assert_eq!(spec.logical_height, 400.0);
    }
}
