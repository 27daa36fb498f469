pub mod assets;
pub mod cli;
pub mod config;
pub mod ecs;
pub mod events;
pub mod scene;
pub mod spline;
pub mod time;
