use crate::angle::{self, normalize};
use std::num::NonZeroUsize;

/// Where a released wheel comes to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Spring destination. Equals 360 when rounding up past the last item so
    /// the wheel keeps turning forward instead of unwinding to 0.
    pub angle: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapResolver {
    count: NonZeroUsize,
}

impl SnapResolver {
    pub fn new(count: NonZeroUsize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn segment(&self) -> f64 {
        angle::segment(self.count)
    }

    /// Rounds `angle` to the nearest segment boundary. A remainder of exactly
    /// half a segment rounds down.
    pub fn resolve(&self, angle: f64) -> SnapTarget {
        let segment = self.segment();
        let angle = normalize(angle);

        // whole segments below `angle`; working in steps keeps re-snapping stable
        let below = (angle / segment).floor();
        let remainder = angle - below * segment;
        let steps = if remainder - segment / 2.0 > 0.0 {
            below + 1.0
        } else {
            below
        };
        let steps = (steps.max(0.0) as usize).min(self.count());

        SnapTarget {
            angle: steps as f64 * segment,
            index: steps % self.count(),
        }
    }
}
