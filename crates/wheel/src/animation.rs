//! A single animated scalar: set immediately while the finger is down, or
//! eased toward a target with a damped spring after release.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Longest integration step for the spring. Stiff or heavily damped springs
/// step finer, see [`SpringCoefficients::max_step`].
const STEP: Duration = Duration::from_millis(1);
/// Longest stretch of time a single tick will simulate.
const MAX_TICK: Duration = Duration::from_millis(100);
const REST_DISPLACEMENT: f64 = 0.001;
const REST_SPEED: f64 = 0.001;

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Overshoot; 0 settles without bouncing.
    pub bounciness: f64,
    pub speed: f64,
    /// Time before the spring starts moving.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub delay: Duration,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            bounciness: 10.0,
            speed: 12.0,
            delay: Duration::from_millis(8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCoefficients {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringCoefficients {
    /// Largest step, in seconds, that keeps semi-implicit Euler stable:
    /// `h * damping` and `h * sqrt(stiffness)` both stay at or below 1.
    pub fn max_step(&self) -> f64 {
        STEP.as_secs_f64()
            .min(self.damping.abs().recip())
            .min(self.stiffness.abs().sqrt().recip())
    }
}

impl SpringConfig {
    /// Maps bounciness and speed onto a unit-mass spring, using the same
    /// curves as Origami/Rebound so tuned values carry over.
    pub fn coefficients(&self) -> SpringCoefficients {
        fn normalize(value: f64, start: f64, end: f64) -> f64 {
            (value - start) / (end - start)
        }
        fn project(n: f64, start: f64, end: f64) -> f64 {
            start + n * (end - start)
        }
        fn lerp(t: f64, start: f64, end: f64) -> f64 {
            t * end + (1.0 - t) * start
        }
        fn quadratic_out(t: f64, start: f64, end: f64) -> f64 {
            lerp(2.0 * t - t * t, start, end)
        }
        fn no_bounce_friction(tension: f64) -> f64 {
            let t = tension;
            if t <= 18.0 {
                0.0007 * t.powi(3) - 0.031 * t.powi(2) + 0.64 * t + 1.28
            } else if t <= 44.0 {
                0.000044 * t.powi(3) - 0.006 * t.powi(2) + 0.36 * t + 2.0
            } else {
                0.00000045 * t.powi(3) - 0.000332 * t.powi(2) + 0.1078 * t + 5.84
            }
        }

        let b = project(normalize(self.bounciness / 1.7, 0.0, 20.0), 0.0, 0.8);
        let s = normalize(self.speed / 1.7, 0.0, 20.0);
        let tension = project(s, 0.5, 200.0);
        let friction = quadratic_out(b, no_bounce_friction(tension), 0.01);

        SpringCoefficients {
            stiffness: (tension - 30.0) * 3.62 + 194.0,
            damping: (friction - 8.0) * 3.0 + 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct TransitionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct ListenerId(u64);

/// A spring that reached its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completed {
    pub id: TransitionId,
    pub value: f64,
}

#[derive(Debug)]
struct Transition {
    id: TransitionId,
    target: f64,
    velocity: f64,
    delay: Duration,
    spring: SpringCoefficients,
}

impl Transition {
    /// Advances by `dt` and reports whether the spring came to rest.
    fn advance(&mut self, value: &mut f64, mut dt: Duration) -> bool {
        let waited = self.delay.min(dt);
        self.delay -= waited;
        dt -= waited;

        let SpringCoefficients { stiffness, damping } = self.spring;
        let max_step = self.spring.max_step();
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let h = remaining.min(max_step);
            let force = -stiffness * (*value - self.target) - damping * self.velocity;
            self.velocity += force * h;
            *value += self.velocity * h;
            remaining -= h;
        }

        self.delay.is_zero()
            && (self.target - *value).abs() <= REST_DISPLACEMENT
            && self.velocity.abs() <= REST_SPEED
    }
}

type Listener = Box<dyn FnMut(f64)>;

pub struct AnimationDriver {
    value: f64,
    transition: Option<Transition>,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl AnimationDriver {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            transition: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(f64) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push((id, Box::new(listener)));
        log::debug!("Listener {} registered", id);
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        let removed = self.listeners.len() != before;
        if removed {
            log::debug!("Listener {} removed", id);
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Jumps to `value`, dropping any spring in flight.
    pub fn set_immediate(&mut self, value: f64) {
        self.stop();
        self.value = value;
        self.notify();
    }

    /// Starts a spring toward `target`, replacing any spring in flight.
    pub fn spring_to(&mut self, target: f64, config: &SpringConfig) -> TransitionId {
        self.stop();
        let id = TransitionId(self.next_id());
        self.transition = Some(Transition {
            id,
            target,
            velocity: 0.0,
            delay: config.delay,
            spring: config.coefficients(),
        });
        log::debug!("Transition {} started: {:.2} -> {:.2}", id, self.value, target);
        id
    }

    /// Drops the spring in flight, if any. Its completion is never reported.
    pub fn stop(&mut self) {
        if let Some(transition) = self.transition.take() {
            log::debug!("Transition {} canceled", transition.id);
        }
    }

    /// Advances the spring in flight by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<Completed> {
        let transition = self.transition.as_mut()?;
        let at_rest = transition.advance(&mut self.value, dt.min(MAX_TICK));

        let completed = at_rest.then(|| {
            self.value = transition.target;
            Completed {
                id: transition.id,
                value: transition.target,
            }
        });
        if let Some(done) = &completed {
            self.transition = None;
            log::debug!("Transition {} completed at {:.2}", done.id, done.value);
        }

        self.notify();
        completed
    }

    fn notify(&mut self) {
        let value = self.value;
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
