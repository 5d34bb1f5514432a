use crate::angle;
use std::num::NonZeroUsize;

/// Offset that puts item 0 at the top of the wheel at rest.
pub const START_OFFSET: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub size: f64,
    pub icon_size: f64,
}

impl WheelGeometry {
    pub fn new(size: f64, icon_size: f64) -> Self {
        Self { size, icon_size }
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Distance from the wheel center to each icon center.
    pub fn orbit(&self) -> f64 {
        self.radius() - self.icon_size / 2.0
    }
}

/// One icon box, in the wheel's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    /// Screen angle of the icon in degrees, offset included.
    pub angle: f64,
    /// Top-left corner of the icon box.
    pub origin: Point,
}

impl Placement {
    pub fn center(&self, geometry: &WheelGeometry) -> Point {
        let half = geometry.icon_size / 2.0;
        Point::new(self.origin.x + half, self.origin.y + half)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarLayout {
    geometry: WheelGeometry,
    count: NonZeroUsize,
}

impl PolarLayout {
    pub fn new(geometry: WheelGeometry, count: NonZeroUsize) -> Self {
        Self { geometry, count }
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn place(&self, index: usize, live: f64) -> Placement {
        let angle = index as f64 * angle::segment(self.count) + START_OFFSET + live;
        let theta = angle.to_radians();
        // icon boxes are anchored at their top-left corner
        let corner = self.geometry.radius() - self.geometry.icon_size / 2.0;
        let orbit = self.geometry.orbit();

        Placement {
            index,
            angle,
            origin: Point::new(corner + orbit * theta.cos(), corner + orbit * theta.sin()),
        }
    }

    pub fn place_all(&self, live: f64) -> Vec<Placement> {
        (0..self.count.get()).map(|i| self.place(i, live)).collect()
    }
}
