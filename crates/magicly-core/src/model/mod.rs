// ── Domain model ──

pub mod device;

pub use device::{
    ControlAffordance, ControlKind, DeviceId, DeviceRecord, PresentedDevice, RawProperties,
};
pub use magicly_api::DeviceType;
