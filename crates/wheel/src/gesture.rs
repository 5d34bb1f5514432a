use crate::angle::normalize;
use crate::animation::{AnimationDriver, SpringConfig, TransitionId};
use crate::snap::{SnapResolver, SnapTarget};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum GesturePhase {
    Began,
    Active,
    Ended,
}

/// One pointer frame of a horizontal drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    /// Horizontal distance from where the gesture began.
    pub translation_x: f64,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation_x: f64) -> Self {
        Self {
            phase,
            translation_x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Angle committed by the last completed snap.
    pub baseline: f64,
    /// Angle currently on screen.
    pub live: f64,
}

/// Turns drag deltas into wheel rotation and reports the snapped item once
/// the wheel settles.
pub struct GestureController {
    resolver: SnapResolver,
    drag_speed: f64,
    spring: SpringConfig,
    baseline: f64,
    driver: AnimationDriver,
    settling: Option<(TransitionId, SnapTarget)>,
    on_action: Box<dyn FnMut(usize)>,
}

impl GestureController {
    pub fn new(
        resolver: SnapResolver,
        drag_speed: f64,
        spring: SpringConfig,
        on_action: impl FnMut(usize) + 'static,
    ) -> Self {
        Self {
            resolver,
            drag_speed,
            spring,
            baseline: 0.0,
            driver: AnimationDriver::new(0.0),
            settling: None,
            on_action: Box::new(on_action),
        }
    }

    pub fn driver_mut(&mut self) -> &mut AnimationDriver {
        &mut self.driver
    }

    pub fn rotation(&self) -> RotationState {
        RotationState {
            baseline: self.baseline,
            live: normalize(self.driver.value()),
        }
    }

    /// Spring destination while the wheel is settling.
    pub fn settling_target(&self) -> Option<SnapTarget> {
        self.settling.map(|(_, target)| target)
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    pub fn handle(&mut self, sample: GestureSample) -> Option<SnapTarget> {
        match sample.phase {
            GesturePhase::Began => {
                self.begin();
                None
            }
            GesturePhase::Active => {
                self.on_drag(sample.translation_x);
                None
            }
            GesturePhase::Ended => Some(self.on_drag_end(sample.translation_x)),
        }
    }

    /// Stops a settling wheel where it is. The baseline stays at the last
    /// committed snap.
    pub fn begin(&mut self) {
        if self.settling.take().is_some() {
            let live = self.driver.value();
            self.driver.set_immediate(live);
        }
    }

    /// Tracks the finger. Nothing is selected until the drag ends.
    pub fn on_drag(&mut self, delta_x: f64) {
        if !delta_x.is_finite() {
            log::warn!("Ignoring drag delta {}", delta_x);
            return;
        }
        self.settling = None;
        let angle = self.angle_for(delta_x);
        self.driver.set_immediate(angle);
    }

    pub fn on_drag_end(&mut self, delta_x: f64) -> SnapTarget {
        let angle = if delta_x.is_finite() {
            self.angle_for(delta_x)
        } else {
            log::warn!("Ignoring release delta {}, snapping in place", delta_x);
            normalize(self.driver.value())
        };
        self.driver.set_immediate(angle);

        let target = self.resolver.resolve(angle);
        let id = self.driver.spring_to(target.angle, &self.spring);
        self.settling = Some((id, target));
        log::debug!(
            "Released at {:.2}, settling on item {} at {:.2}",
            angle,
            target.index,
            target.angle
        );
        target
    }

    /// Advances the settle animation. Returns the selected index on the tick
    /// the wheel comes to rest.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        let done = self.driver.tick(dt)?;
        let (_, target) = self.settling.take_if(|(id, _)| *id == done.id)?;

        self.baseline = normalize(target.angle);
        self.driver.set_immediate(self.baseline);
        log::info!("Selected item {}", target.index);
        (self.on_action)(target.index);
        Some(target.index)
    }

    fn angle_for(&self, delta_x: f64) -> f64 {
        normalize(self.baseline + delta_x * self.drag_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::num::NonZeroUsize;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller(n: usize, drag_speed: f64) -> (GestureController, Rc<RefCell<Vec<usize>>>) {
        let actions = Rc::new(RefCell::new(Vec::new()));
        let sink = actions.clone();
        let resolver = SnapResolver::new(NonZeroUsize::new(n).unwrap());
        let controller = GestureController::new(
            resolver,
            drag_speed,
            SpringConfig::default(),
            move |index| sink.borrow_mut().push(index),
        );
        (controller, actions)
    }

    fn settle(controller: &mut GestureController) -> Option<usize> {
        (0..1000).find_map(|_| controller.tick(FRAME))
    }

    #[test]
    fn test_drag_tracks_finger() {
        let (mut c, actions) = controller(6, 1.0);
        c.handle(GestureSample::new(GesturePhase::Began, 0.0));
        c.handle(GestureSample::new(GesturePhase::Active, 25.0));
        assert_eq!(c.rotation(), RotationState { baseline: 0.0, live: 25.0 });

        c.handle(GestureSample::new(GesturePhase::Active, -30.0));
        assert_eq!(c.rotation().live, 330.0);
        assert!(!c.is_animating());
        assert!(actions.borrow().is_empty());
    }

    #[test]
    fn test_drag_speed_scales_delta() {
        let (mut c, _) = controller(6, 0.5);
        c.on_drag(80.0);
        assert_eq!(c.rotation().live, 40.0);
    }

    #[test]
    fn test_release_snaps_and_commits_once() {
        let (mut c, actions) = controller(6, 1.0);
        c.on_drag(40.0);
        let target = c.on_drag_end(40.0);
        assert_eq!(target, SnapTarget { angle: 60.0, index: 1 });
        assert!(actions.borrow().is_empty());
        assert_eq!(c.rotation().baseline, 0.0);

        assert_eq!(settle(&mut c), Some(1));
        assert_eq!(*actions.borrow(), vec![1]);
        assert_eq!(c.rotation(), RotationState { baseline: 60.0, live: 60.0 });

        assert_eq!(settle(&mut c), None);
        assert_eq!(actions.borrow().len(), 1);
    }

    #[test]
    fn test_next_drag_starts_from_baseline() {
        let (mut c, actions) = controller(6, 1.0);
        c.on_drag_end(40.0);
        settle(&mut c);

        c.on_drag(-5.0);
        assert_eq!(c.rotation().live, 55.0);
        c.on_drag_end(-35.0);
        settle(&mut c);
        assert_eq!(*actions.borrow(), vec![1, 0]);
        assert_eq!(c.rotation().baseline, 0.0);
    }

    #[test]
    fn test_wrapping_release_commits_normalized() {
        let (mut c, actions) = controller(6, 1.0);
        let target = c.on_drag_end(-10.0);
        assert_eq!(target, SnapTarget { angle: 360.0, index: 0 });

        settle(&mut c);
        assert_eq!(*actions.borrow(), vec![0]);
        assert_eq!(c.rotation(), RotationState { baseline: 0.0, live: 0.0 });
    }

    #[test]
    fn test_new_drag_cancels_settle() {
        let (mut c, actions) = controller(6, 1.0);
        c.on_drag_end(40.0);
        c.tick(FRAME);

        c.handle(GestureSample::new(GesturePhase::Began, 0.0));
        c.handle(GestureSample::new(GesturePhase::Active, 10.0));
        assert_eq!(settle(&mut c), None);
        assert!(actions.borrow().is_empty());
        assert_eq!(c.rotation(), RotationState { baseline: 0.0, live: 10.0 });

        c.handle(GestureSample::new(GesturePhase::Ended, 100.0));
        assert_eq!(settle(&mut c), Some(2));
        assert_eq!(*actions.borrow(), vec![2]);
    }

    #[test]
    fn test_release_during_settle_replaces_target() {
        let (mut c, actions) = controller(4, 1.0);
        c.on_drag_end(80.0);
        c.tick(FRAME);
        c.on_drag_end(170.0);

        assert_eq!(settle(&mut c), Some(2));
        assert_eq!(*actions.borrow(), vec![2]);
    }

    #[test]
    fn test_non_finite_delta() {
        let (mut c, actions) = controller(6, 1.0);
        c.on_drag(20.0);
        c.on_drag(f64::NAN);
        assert_eq!(c.rotation().live, 20.0);

        let target = c.on_drag_end(f64::INFINITY);
        assert_eq!(target.index, 0);
        settle(&mut c);
        assert_eq!(*actions.borrow(), vec![0]);
    }

    #[test]
    fn test_single_item_snaps_back() {
        let (mut c, actions) = controller(1, 1.0);
        c.on_drag_end(200.0);
        settle(&mut c);
        c.on_drag_end(90.0);
        settle(&mut c);
        assert_eq!(*actions.borrow(), vec![0, 0]);
        assert_eq!(c.rotation().baseline, 0.0);
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("began".parse::<GesturePhase>().unwrap(), GesturePhase::Began);
        assert_eq!(GesturePhase::Ended.to_string(), "ended");
    }
}
