// Core utilities shared by every engine subsystem

pub mod math;

pub use math::Rect;
