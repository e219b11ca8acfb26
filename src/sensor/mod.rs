pub mod receiver;

pub use receiver::{BodyReceiver, FrameGuard, SensorState};
