// Engine modules: entity store, physics, fixed-step driver

pub mod ecs;
pub mod game_loop;
pub mod physics;
