use crate::config::{self, Config};
use crate::events::AppEvent;
use async_channel::Receiver;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use wheel::{ItemName, Wheel, WheelConfig, WheelError};

pub struct AppModel {
    pub wheel: Wheel,
    pub frame_interval: Duration,
    last_frame: Option<Instant>,
}

/// Mounts a wheel that prints the name of each selected item on stdout.
fn mount(config: WheelConfig) -> Result<Wheel, WheelError> {
    let names: Vec<ItemName> = config.items.iter().map(|item| item.name.clone()).collect();
    Wheel::mount(config, move |index| {
        if let Some(name) = names.get(index) {
            println!("{}", name);
        }
    })
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

impl AppModel {
    pub fn new(config: Config) -> Result<Self, WheelError> {
        Ok(Self {
            wheel: mount(config.wheel)?,
            frame_interval: config.daemon.frame_interval(),
            last_frame: None,
        })
    }

    /// Drives the wheel on the current thread until every event sender is gone.
    pub fn run_blocking(self, rx: Receiver<AppEvent>) -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        rt.block_on(self.run(rx));
        Ok(())
    }

    pub async fn run(mut self, rx: Receiver<AppEvent>) {
        let mut frames = ticker(self.frame_interval);

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => self.update(event),
                    Err(_) => break,
                },
                now = frames.tick(), if self.wheel.is_animating() => {
                    self.frame(now);
                }
            }

            if frames.period() != self.frame_interval {
                frames = ticker(self.frame_interval);
            }
        }
    }

    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Gesture(sample) => {
                if let Some(target) = self.wheel.handle(sample) {
                    log::debug!("Settling on item {}", target.index);
                }
                if self.wheel.is_animating() {
                    self.last_frame.get_or_insert_with(Instant::now);
                } else {
                    self.last_frame = None;
                }
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => match mount(new_config.wheel) {
                    Ok(wheel) => {
                        // the old wheel drops here and releases its listener
                        self.wheel = wheel;
                        self.frame_interval = new_config.daemon.frame_interval();
                        self.last_frame = None;
                        log::info!("Configuration reloaded");
                    }
                    Err(e) => log::error!("Keeping current wheel, new config is invalid: {}", e),
                },
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    /// Advances the settle animation to `now`. Returns the selected index on
    /// the frame the wheel comes to rest.
    pub fn frame(&mut self, now: Instant) -> Option<usize> {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(self.frame_interval);

        let selected = self.wheel.tick(dt);
        self.last_frame = self.wheel.is_animating().then_some(now);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel::{GesturePhase, GestureSample};

    fn app() -> AppModel {
        AppModel::new(config::defaults().unwrap()).unwrap()
    }

    fn gesture(phase: GesturePhase, dx: f64) -> AppEvent {
        AppEvent::Gesture(GestureSample::new(phase, dx))
    }

    fn run_frames(app: &mut AppModel) -> Option<usize> {
        let mut now = Instant::now();
        (0..1000).find_map(|_| {
            now += app.frame_interval;
            app.frame(now)
        })
    }

    #[test]
    fn test_rejects_empty_wheel() {
        let mut config = config::defaults().unwrap();
        config.wheel.items.clear();
        assert!(matches!(AppModel::new(config), Err(WheelError::NoItems)));
    }

    #[test]
    fn test_drag_does_not_animate() {
        let mut app = app();
        app.update(gesture(GesturePhase::Began, 0.0));
        app.update(gesture(GesturePhase::Active, 45.0));
        assert!(!app.wheel.is_animating());
        assert_eq!(app.wheel.rotation().live, 45.0);
        assert_eq!(app.last_frame, None);
    }

    #[test]
    fn test_release_settles_over_frames() {
        let mut app = app();
        app.update(gesture(GesturePhase::Active, 100.0));
        app.update(gesture(GesturePhase::Ended, 100.0));
        assert!(app.wheel.is_animating());
        assert!(app.last_frame.is_some());

        assert_eq!(run_frames(&mut app), Some(2));
        assert!(!app.wheel.is_animating());
        assert_eq!(app.last_frame, None);
        assert_eq!(app.wheel.rotation().baseline, 120.0);
    }

    #[test]
    fn test_new_drag_stops_settling() {
        let mut app = app();
        app.update(gesture(GesturePhase::Ended, 100.0));
        app.update(gesture(GesturePhase::Began, 0.0));
        assert!(!app.wheel.is_animating());
        assert_eq!(app.last_frame, None);
        assert_eq!(run_frames(&mut app), None);
    }
}
