use crate::spline::SplinePath;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Component, Clone, Copy)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

#[derive(Component, Clone)]
pub struct ModelRef {
    pub key: String,
}

/// Progress along a shared closed path: interpolating between the samples
/// at `origin` and `target`, `fraction` of the way across.
#[derive(Component, Clone)]
pub struct PathFollower {
    pub path: Arc<SplinePath>,
    pub origin: usize,
    pub target: usize,
    pub fraction: f32,
}

impl PathFollower {
    pub fn new(path: Arc<SplinePath>) -> Self {
        Self::starting_at(path, 0)
    }

    pub fn starting_at(path: Arc<SplinePath>, origin: usize) -> Self {
        let origin = origin.min(path.len().saturating_sub(2));
        let target = path.next_index(origin);
        Self { path, origin, target, fraction: 0.0 }
    }

    /// Move on to the next segment, wrapping before the closing duplicate.
    pub fn advance_segment(&mut self) {
        self.origin = self.target;
        self.target = self.path.next_index(self.target);
    }
}

/// Spherical interpolation state toward the current direction of travel.
/// Advances at the same rate as the path fraction, but independently.
#[derive(Component, Clone, Copy)]
pub struct RotationLerp {
    pub origin_rot: Quat,
    pub target_rot: Quat,
    pub fraction: f32,
}

impl RotationLerp {
    pub fn new(initial: Quat) -> Self {
        Self { origin_rot: initial, target_rot: initial, fraction: 0.0 }
    }
}

#[derive(Component, Clone, Copy)]
pub struct SwimSpeed {
    pub value: f32,
}

impl Default for SwimSpeed {
    fn default() -> Self {
        Self { value: 0.5 }
    }
}

/// Mutable playback state for one named clip of a model.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: Arc<str>,
    pub speed: f32,
    pub weight: f32,
    pub playing: bool,
}

impl AnimationClip {
    pub fn new(name: impl Into<Arc<str>>, speed: f32, weight: f32) -> Self {
        Self { name: name.into(), speed, weight, playing: false }
    }
}

/// The named clips of an entity's model. Clip lookup happens every tick the
/// pace system runs; nothing is cached across ticks.
#[derive(Component, Clone, Default)]
pub struct AnimationClips {
    clips: SmallVec<[AnimationClip; 2]>,
}

impl AnimationClips {
    pub fn add(&mut self, clip: AnimationClip) {
        self.clips.push(clip);
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|clip| clip.name.as_ref() == name)
    }

    pub fn clip_mut(&mut self, name: &str) -> Option<&mut AnimationClip> {
        self.clips.iter_mut().find(|clip| clip.name.as_ref() == name)
    }

    pub fn play(&mut self, name: &str) -> bool {
        match self.clip_mut(name) {
            Some(clip) => {
                clip.playing = true;
                true
            }
            None => false,
        }
    }

    pub fn playing_mut(&mut self) -> impl Iterator<Item = &mut AnimationClip> + '_ {
        self.clips.iter_mut().filter(|clip| clip.playing)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_clamps_start_and_picks_next_target() {
        let path = Arc::new(
            SplinePath::from_samples(vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ])
            .expect("wrap samples"),
        );
        let follower = PathFollower::starting_at(Arc::clone(&path), 99);
        assert_eq!(follower.origin, path.len() - 2);
        assert_eq!(follower.target, 0);

        let mut follower = PathFollower::new(path);
        assert_eq!((follower.origin, follower.target), (0, 1));
        follower.advance_segment();
        assert_eq!((follower.origin, follower.target), (1, 2));
    }

    #[test]
    fn playing_clips_are_looked_up_by_name() {
        let mut clips = AnimationClips::default();
        clips.add(AnimationClip::new("swim", 0.5, 0.5));
        clips.add(AnimationClip::new("bite", 1.0, 1.0));
        assert!(clips.play("swim"));
        assert!(!clips.play("missing"));
        assert_eq!(clips.playing_mut().count(), 1);
        assert!(clips.clip("bite").is_some_and(|clip| !clip.playing));
    }
}
