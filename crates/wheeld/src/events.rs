use wheel::GestureSample;
use wheel::protocol::Command;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Gesture(GestureSample),
    ConfigReload,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        AppEvent::Gesture(command.into_sample())
    }
}
