use crate::angle::{self, normalize};
use palette::{Mix, Srgb};
use std::num::NonZeroUsize;

/// Background color as a function of the wheel angle.
///
/// Each item's color sits at its segment boundary and the stop at 360 repeats
/// the first color, so the blend closes the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorInterpolator {
    colors: Vec<Srgb<f64>>,
    segment: f64,
}

impl ColorInterpolator {
    pub fn new(colors: Vec<Srgb<f64>>) -> Option<Self> {
        let count = NonZeroUsize::new(colors.len())?;
        Some(Self {
            colors,
            segment: angle::segment(count),
        })
    }

    /// `(angle, color)` pairs, N + 1 of them.
    pub fn stops(&self) -> impl Iterator<Item = (f64, Srgb<f64>)> + '_ {
        let closing = (angle::FULL_TURN, self.colors[0]);
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| (i as f64 * self.segment, *color))
            .chain(std::iter::once(closing))
    }

    pub fn color_at(&self, angle: f64) -> Srgb<f64> {
        let angle = normalize(angle);
        let count = self.colors.len();
        let lower = ((angle / self.segment).floor() as usize).min(count - 1);
        let factor = (angle - lower as f64 * self.segment) / self.segment;

        let from = self.colors[lower];
        let to = self.colors[(lower + 1) % count];
        if factor <= 0.0 {
            from
        } else if factor >= 1.0 {
            to
        } else {
            from.mix(to, factor)
        }
    }
}
