use crate::ecs::Transform3D;
use crate::spline::DEFAULT_SAMPLE_COUNT;
use anyhow::{Context, Result};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub metadata: SceneMetadata,
    #[serde(default)]
    pub dependencies: SceneDependencies,
    #[serde(default)]
    pub paths: Vec<ScenePathData>,
    #[serde(default)]
    pub entities: Vec<SceneEntity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDependencies {
    #[serde(default)]
    pub models: Vec<ModelDependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDependency {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl ModelDependency {
    pub fn new(key: String, path: Option<String>) -> Self {
        Self { key, path }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

fn default_path_samples() -> usize {
    DEFAULT_SAMPLE_COUNT
}

/// Control polygon of one closed patrol path, sampled at spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenePathData {
    pub key: String,
    pub control_points: Vec<Vec3Data>,
    #[serde(default = "default_path_samples")]
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub transform: Transform3DData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<PatrolData>,
}

fn default_scale() -> Vec3Data {
    Vec3Data { x: 1.0, y: 1.0, z: 1.0 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform3DData {
    pub translation: Vec3Data,
    #[serde(default)]
    pub rotation: QuatData,
    #[serde(default = "default_scale")]
    pub scale: Vec3Data,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelData {
    pub key: String,
}

const fn default_clip_rate() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationData {
    pub clip: String,
    #[serde(default = "default_clip_rate")]
    pub speed: f32,
    #[serde(default = "default_clip_rate")]
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolData {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuatData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for QuatData {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

impl From<Vec3> for Vec3Data {
    fn from(value: Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

impl From<Vec3Data> for Vec3 {
    fn from(value: Vec3Data) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Quat> for QuatData {
    fn from(value: Quat) -> Self {
        Self { x: value.x, y: value.y, z: value.z, w: value.w }
    }
}

impl From<QuatData> for Quat {
    fn from(value: QuatData) -> Self {
        Quat::from_xyzw(value.x, value.y, value.z, value.w).normalize()
    }
}

impl From<&Transform3DData> for Transform3D {
    fn from(value: &Transform3DData) -> Self {
        Self {
            translation: value.translation.clone().into(),
            rotation: value.rotation.clone().into(),
            scale: value.scale.clone().into(),
        }
    }
}

impl From<&Transform3D> for Transform3DData {
    fn from(value: &Transform3D) -> Self {
        Self {
            translation: value.translation.into(),
            rotation: value.rotation.into(),
            scale: value.scale.into(),
        }
    }
}

impl Scene {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read scene file {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write scene file {}", path.display()))
    }

    /// The built-in underwater patrol: one shark swimming a closed loop over
    /// a static seabed.
    pub fn shark_patrol(samples: usize) -> Self {
        let seabed_rotation = Quat::from_euler(EulerRot::YXZ, 270f32.to_radians(), 0.0, 0.0);
        Self {
            metadata: SceneMetadata { name: Some("shark_patrol".to_string()) },
            dependencies: SceneDependencies {
                models: vec![
                    ModelDependency::new("shark".to_string(), Some("models/shark.gltf".to_string())),
                    ModelDependency::new(
                        "underwater".to_string(),
                        Some("models/underwater.gltf".to_string()),
                    ),
                ],
            },
            paths: vec![ScenePathData {
                key: "patrol".to_string(),
                control_points: vec![
                    Vec3::new(4.0, 2.0, 3.0).into(),
                    Vec3::new(8.0, 5.0, 2.0).into(),
                    Vec3::new(8.0, 6.0, 8.0).into(),
                    Vec3::new(2.0, 2.0, 7.0).into(),
                ],
                samples,
            }],
            entities: vec![
                SceneEntity {
                    name: Some("shark".to_string()),
                    transform: Transform3DData {
                        translation: Vec3::new(1.0, 0.0, 1.0).into(),
                        rotation: QuatData::default(),
                        scale: Vec3::splat(0.5).into(),
                    },
                    model: Some(ModelData { key: "shark".to_string() }),
                    animation: Some(AnimationData {
                        clip: "swim".to_string(),
                        speed: 0.5,
                        weight: 0.5,
                    }),
                    patrol: Some(PatrolData { path: "patrol".to_string() }),
                },
                SceneEntity {
                    name: Some("seabed".to_string()),
                    transform: Transform3DData {
                        translation: Vec3::new(5.0, 0.0, 5.0).into(),
                        rotation: seabed_rotation.into(),
                        scale: Vec3::splat(0.5).into(),
                    },
                    model: Some(ModelData { key: "underwater".to_string() }),
                    animation: None,
                    patrol: None,
                },
            ],
        }
    }
}
