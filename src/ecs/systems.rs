use super::types::{AnimationClips, PathFollower, RotationLerp, SwimSpeed, Transform3D};
use crate::events::{EventBus, GameEvent};
use bevy_ecs::prelude::{Entity, Query, Res, ResMut, Resource};
use glam::{Mat3, Quat, Vec3};
use serde::Deserialize;

#[derive(Resource, Clone, Copy)]
pub struct TimeDelta(pub f32);

/// Fraction advanced per tick per unit of travel speed.
pub const PROGRESS_RATE: f32 = 0.1;

/// What happens to the fraction left over when a tick crosses a segment
/// boundary. `Discard` throws the excess away, matching the original
/// content; `Carry` folds it into the next segment.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OvershootPolicy {
    #[default]
    Discard,
    Carry,
}

impl OvershootPolicy {
    pub fn label(self) -> &'static str {
        match self {
            OvershootPolicy::Discard => "discard",
            OvershootPolicy::Carry => "carry",
        }
    }
}

/// Derive travel speed from the vertical slope of the current segment and
/// feed the same pace into every playing clip. Runs before the movement
/// passes so both consume this tick's value.
pub fn sys_update_swim_speed(
    dt: Res<TimeDelta>,
    mut swimmers: Query<(&PathFollower, &mut SwimSpeed, Option<&mut AnimationClips>)>,
) {
    if dt.0 <= 0.0 {
        return;
    }
    for (follower, mut speed, clips) in swimmers.iter_mut() {
        let slope = follower.path.rise(follower.origin, follower.target).clamp(-1.0, 1.0);
        let pace = slope + 1.5;
        if let Some(mut clips) = clips {
            for clip in clips.playing_mut() {
                clip.speed = pace;
                clip.weight = pace;
            }
        }
        speed.value = 3.0 - pace;
    }
}

/// Interpolate position across the current segment, then advance the
/// fraction and retarget on overflow.
pub fn sys_follow_path(
    dt: Res<TimeDelta>,
    policy: Res<OvershootPolicy>,
    mut events: ResMut<EventBus>,
    mut movers: Query<(Entity, &mut Transform3D, &mut PathFollower, &SwimSpeed)>,
) {
    if dt.0 <= 0.0 {
        return;
    }
    for (entity, mut transform, mut follower, speed) in movers.iter_mut() {
        let origin = follower.path.point(follower.origin);
        let target = follower.path.point(follower.target);
        transform.translation = origin.lerp(target, follower.fraction);
        follower.fraction += speed.value * PROGRESS_RATE;
        if follower.fraction > 1.0 {
            match *policy {
                OvershootPolicy::Discard => {
                    follower.fraction = 0.0;
                    follower.advance_segment();
                    events.push(GameEvent::SegmentReached {
                        entity,
                        origin: follower.origin,
                        target: follower.target,
                    });
                }
                OvershootPolicy::Carry => {
                    while follower.fraction > 1.0 {
                        follower.fraction -= 1.0;
                        follower.advance_segment();
                        events.push(GameEvent::SegmentReached {
                            entity,
                            origin: follower.origin,
                            target: follower.target,
                        });
                    }
                }
            }
        }
    }
}

/// Advance the rotation fraction at the same rate as the path fraction; on
/// overflow capture the current orientation and aim at the direction of the
/// current segment. The applied rotation is always the slerp of the pair.
pub fn sys_orient_along_path(
    dt: Res<TimeDelta>,
    policy: Res<OvershootPolicy>,
    mut turners: Query<(&mut Transform3D, &mut RotationLerp, &PathFollower, &SwimSpeed)>,
) {
    if dt.0 <= 0.0 {
        return;
    }
    for (mut transform, mut lerp, follower, speed) in turners.iter_mut() {
        lerp.fraction += speed.value * PROGRESS_RATE;
        if lerp.fraction > 1.0 {
            lerp.fraction = match *policy {
                OvershootPolicy::Discard => 0.0,
                OvershootPolicy::Carry => lerp.fraction - 1.0,
            };
            lerp.origin_rot = transform.rotation;
            if let Some(direction) = follower.path.direction(follower.origin, follower.target) {
                lerp.target_rot = look_along(direction);
            }
        }
        transform.rotation = lerp.origin_rot.slerp(lerp.target_rot, lerp.fraction);
    }
}

/// Orientation whose forward (+Z) axis points along `direction`, keeping +Y
/// as up where possible. A degenerate direction yields identity.
pub fn look_along(direction: Vec3) -> Quat {
    let Some(forward) = direction.try_normalize() else {
        return Quat::IDENTITY;
    };
    let up = if forward.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    let right = up.cross(forward).normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).length_squared() <= 1e-10
    }

    #[test]
    fn look_along_forward_is_identity() {
        let q = look_along(Vec3::Z);
        assert!(q.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn look_along_rotates_forward_axis_onto_direction() {
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::new(1.0, 0.5, -2.0)] {
            let q = look_along(direction);
            assert!(approx_vec3(q * Vec3::Z, direction.normalize()), "direction {direction}");
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn look_along_handles_vertical_and_degenerate_directions() {
        let up = look_along(Vec3::Y);
        assert!(approx_vec3(up * Vec3::Z, Vec3::Y));
        assert!(look_along(Vec3::ZERO).abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn overshoot_policy_labels() {
        assert_eq!(OvershootPolicy::Discard.label(), "discard");
        assert_eq!(OvershootPolicy::Carry.label(), "carry");
        assert_eq!(OvershootPolicy::default(), OvershootPolicy::Discard);
    }
}
