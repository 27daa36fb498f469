use super::systems::{
    sys_follow_path, sys_orient_along_path, sys_update_swim_speed, look_along, OvershootPolicy,
    TimeDelta,
};
use super::types::{
    AnimationClip, AnimationClips, ModelRef, PathFollower, RotationLerp, SwimSpeed, Transform3D,
};
use crate::assets::AssetManager;
use crate::events::{CameraMode, EventBus, GameEvent};
use crate::scene::Scene;
use crate::spline::SplinePath;
use anyhow::{bail, Context, Result};
use bevy_ecs::prelude::{Entity, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use glam::{Quat, Vec3};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// Snapshot of one patroller for tools and tests.
#[derive(Debug, Clone, Copy)]
pub struct PatrolInfo {
    pub translation: Vec3,
    pub rotation: Quat,
    pub origin: usize,
    pub target: usize,
    pub fraction: f32,
    pub speed: f32,
}

// ---------- World container ----------
pub struct EcsWorld {
    pub world: World,
    schedule: Schedule,
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl EcsWorld {
    pub fn new() -> Self {
        Self::with_policy(OvershootPolicy::default())
    }

    pub fn with_policy(policy: OvershootPolicy) -> Self {
        let mut world = World::new();
        world.insert_resource(TimeDelta(0.0));
        world.insert_resource(policy);
        world.insert_resource(EventBus::default());

        // Pace first so the movement passes consume this tick's value.
        let mut schedule = Schedule::default();
        schedule
            .add_systems((sys_update_swim_speed, sys_follow_path, sys_orient_along_path).chain());

        Self { world, schedule }
    }

    pub fn update(&mut self, dt: f32) {
        self.world.resource_mut::<TimeDelta>().0 = dt;
        self.schedule.run(&mut self.world);
    }

    pub fn spawn_patroller(
        &mut self,
        path: Arc<SplinePath>,
        transform: Transform3D,
        model: ModelRef,
        clips: AnimationClips,
    ) -> Entity {
        let rotation = RotationLerp::new(transform.rotation);
        self.world
            .spawn((transform, model, clips, PathFollower::new(path), rotation, SwimSpeed::default()))
            .id()
    }

    pub fn spawn_scenery(&mut self, transform: Transform3D, model: ModelRef) -> Entity {
        self.world.spawn((transform, model)).id()
    }

    /// Scatter `count` patrollers across random segments of a shared path,
    /// each facing its initial direction of travel.
    pub fn spawn_school(
        &mut self,
        path: &Arc<SplinePath>,
        model: &ModelRef,
        clip: &str,
        scale: f32,
        count: usize,
    ) -> Vec<Entity> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let origin = rng.gen_range(0..path.sample_count());
                let follower = PathFollower::starting_at(Arc::clone(path), origin);
                let rotation = follower
                    .path
                    .direction(follower.origin, follower.target)
                    .map(look_along)
                    .unwrap_or(Quat::IDENTITY);
                let transform = Transform3D {
                    translation: path.point(origin),
                    rotation,
                    scale: Vec3::splat(scale),
                };
                let mut clips = AnimationClips::default();
                clips.add(AnimationClip::new(clip, 0.5, 0.5));
                clips.play(clip);
                self.world
                    .spawn((
                        transform,
                        model.clone(),
                        clips,
                        follower,
                        RotationLerp::new(rotation),
                        SwimSpeed::default(),
                    ))
                    .id()
            })
            .collect()
    }

    /// Resolve a scene's paths and models, then spawn its entities. The
    /// sampled paths are shared by reference across every entity using them.
    pub fn spawn_scene(&mut self, scene: &Scene, assets: &AssetManager) -> Result<Vec<Entity>> {
        let mut paths: HashMap<&str, Arc<SplinePath>> = HashMap::new();
        for data in &scene.paths {
            let control: Vec<Vec3> = data.control_points.iter().map(|p| p.clone().into()).collect();
            let path = SplinePath::catmull_rom_closed(&control, data.samples)
                .with_context(|| format!("Failed to sample path '{}'", data.key))?;
            paths.insert(data.key.as_str(), Arc::new(path));
        }

        for entity_data in &scene.entities {
            let label = entity_data.name.as_deref().unwrap_or("<unnamed>");
            if let Some(model) = &entity_data.model {
                let Some(asset) = assets.model(&model.key) else {
                    bail!("Scene entity '{label}' references unknown model '{}'", model.key);
                };
                if let Some(animation) = &entity_data.animation {
                    if !asset.clips().is_empty() && !asset.has_clip(&animation.clip) {
                        bail!(
                            "Scene entity '{label}' plays clip '{}' missing from model '{}'",
                            animation.clip,
                            model.key
                        );
                    }
                }
            } else if entity_data.animation.is_some() {
                bail!("Scene entity '{label}' has an animation but no model");
            }
            if let Some(patrol) = &entity_data.patrol {
                if !paths.contains_key(patrol.path.as_str()) {
                    bail!("Scene entity '{label}' references unknown path '{}'", patrol.path);
                }
            }
        }

        let mut spawned = Vec::with_capacity(scene.entities.len());
        for entity_data in &scene.entities {
            let transform = Transform3D::from(&entity_data.transform);
            let mut entity = self.world.spawn(transform);
            if let Some(model) = &entity_data.model {
                entity.insert(ModelRef { key: model.key.clone() });
            }
            if let Some(animation) = &entity_data.animation {
                let mut clips = AnimationClips::default();
                clips.add(AnimationClip::new(
                    animation.clip.as_str(),
                    animation.speed,
                    animation.weight,
                ));
                clips.play(&animation.clip);
                entity.insert(clips);
            }
            if let Some(patrol) = &entity_data.patrol {
                let path = Arc::clone(&paths[patrol.path.as_str()]);
                entity.insert((
                    PathFollower::new(path),
                    RotationLerp::new(transform.rotation),
                    SwimSpeed::default(),
                ));
            }
            spawned.push(entity.id());
        }

        self.world
            .resource_mut::<EventBus>()
            .push(GameEvent::SceneSpawned { entities: spawned.len() });
        Ok(spawned)
    }

    pub fn notify_camera_mode(&mut self, mode: CameraMode) {
        self.world.resource_mut::<EventBus>().push(GameEvent::CameraModeChanged { mode });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<EventBus>().drain()
    }

    pub fn entity_count(&self) -> usize {
        self.world.entities().len() as usize
    }

    pub fn patrol_info(&self, entity: Entity) -> Option<PatrolInfo> {
        let transform = self.world.get::<Transform3D>(entity)?;
        let follower = self.world.get::<PathFollower>(entity)?;
        let speed = self.world.get::<SwimSpeed>(entity)?;
        Some(PatrolInfo {
            translation: transform.translation,
            rotation: transform.rotation,
            origin: follower.origin,
            target: follower.target,
            fraction: follower.fraction,
            speed: speed.value,
        })
    }
}
