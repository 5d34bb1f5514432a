use crate::angle::normalize;
use crate::animation::ListenerId;
use crate::color::ColorInterpolator;
use crate::config::{Item, WheelConfig, WheelError};
use crate::gesture::{GestureController, GestureSample, RotationState};
use crate::layout::{Placement, PolarLayout, WheelGeometry};
use crate::snap::{SnapResolver, SnapTarget};
use palette::Srgb;
use std::cell::{Ref, RefCell};
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::time::Duration;

/// Everything a renderer needs to draw the wheel at one angle.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub angle: f64,
    pub placements: Vec<Placement>,
    /// `None` draws the plain background.
    pub background: Option<Srgb<f64>>,
}

/// Derives a [`Frame`] from the live angle.
#[derive(Debug, Clone)]
struct Scene {
    layout: PolarLayout,
    colors: Option<ColorInterpolator>,
}

impl Scene {
    fn new(config: &WheelConfig, count: NonZeroUsize) -> Self {
        let geometry = WheelGeometry::new(config.size, config.icon_size);
        let colors = config.colors().and_then(ColorInterpolator::new);
        if colors.is_none() && config.items.iter().any(|item| item.color.is_some()) {
            log::warn!("Some items have no color, drawing a plain background");
        }

        Self {
            layout: PolarLayout::new(geometry, count),
            colors,
        }
    }

    fn frame(&self, angle: f64) -> Frame {
        let angle = normalize(angle);
        Frame {
            angle,
            placements: self.layout.place_all(angle),
            background: self.colors.as_ref().map(|c| c.color_at(angle)),
        }
    }
}

/// A mounted wheel. Owns its animated angle for its whole lifetime and keeps
/// one listener on it that refreshes the current [`Frame`].
pub struct Wheel {
    config: WheelConfig,
    controller: GestureController,
    frame: Rc<RefCell<Frame>>,
    listener: Option<ListenerId>,
}

impl Wheel {
    pub fn mount(
        config: WheelConfig,
        on_action: impl FnMut(usize) + 'static,
    ) -> Result<Self, WheelError> {
        let count = config.validate()?;

        let scene = Scene::new(&config, count);
        let frame = Rc::new(RefCell::new(scene.frame(0.0)));
        let mut controller = GestureController::new(
            SnapResolver::new(count),
            config.drag_speed,
            config.spring,
            on_action,
        );

        let sink = frame.clone();
        let listener = controller
            .driver_mut()
            .add_listener(move |angle| *sink.borrow_mut() = scene.frame(angle));
        log::debug!("Mounted wheel with {} items", count);

        Ok(Self {
            config,
            controller,
            frame,
            listener: Some(listener),
        })
    }

    /// Tears the wheel down. Dropping it does the same.
    pub fn unmount(mut self) {
        self.detach();
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.config.items
    }

    pub fn frame(&self) -> Ref<'_, Frame> {
        self.frame.borrow()
    }

    pub fn rotation(&self) -> RotationState {
        self.controller.rotation()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    pub fn handle(&mut self, sample: GestureSample) -> Option<SnapTarget> {
        self.controller.handle(sample)
    }

    pub fn on_drag(&mut self, delta_x: f64) {
        self.controller.on_drag(delta_x);
    }

    pub fn on_drag_end(&mut self, delta_x: f64) -> SnapTarget {
        self.controller.on_drag_end(delta_x)
    }

    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        self.controller.tick(dt)
    }

    fn detach(&mut self) {
        if let Some(id) = self.listener.take() {
            self.controller.driver_mut().remove_listener(id);
            log::debug!("Unmounted wheel");
        }
    }
}

impl Drop for Wheel {
    fn drop(&mut self) {
        self.detach();
    }
}
