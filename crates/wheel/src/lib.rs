pub mod angle;
pub mod animation;
pub mod color;
pub mod config;
pub mod gesture;
pub mod layout;
pub mod protocol;
pub mod snap;
pub mod widget;

pub use config::{Item, ItemColor, ItemName, WheelConfig, WheelError};
pub use gesture::{GesturePhase, GestureSample, RotationState};
pub use widget::{Frame, Wheel};
