mod systems;
mod types;
mod world;

pub use systems::{
    look_along, sys_follow_path, sys_orient_along_path, sys_update_swim_speed, OvershootPolicy,
    TimeDelta, PROGRESS_RATE,
};
pub use types::{
    AnimationClip, AnimationClips, ModelRef, PathFollower, RotationLerp, SwimSpeed, Transform3D,
};
pub use world::{EcsWorld, PatrolInfo};
