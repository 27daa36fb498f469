use crate::ecs::OvershootPolicy;
use crate::spline::DEFAULT_SAMPLE_COUNT;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    #[serde(default = "SimConfig::default_tick_rate")]
    pub tick_rate: f32,
    #[serde(default = "SimConfig::default_frames")]
    pub frames: u32,
}

impl SimConfig {
    const fn default_tick_rate() -> f32 {
        30.0
    }

    const fn default_frames() -> u32 {
        600
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { tick_rate: Self::default_tick_rate(), frames: Self::default_frames() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatrolConfig {
    #[serde(default = "PatrolConfig::default_sample_count")]
    pub sample_count: usize,
    #[serde(default)]
    pub overshoot: OvershootPolicy,
}

impl PatrolConfig {
    const fn default_sample_count() -> usize {
        DEFAULT_SAMPLE_COUNT
    }
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self { sample_count: Self::default_sample_count(), overshoot: OvershootPolicy::default() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub patrol: PatrolConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub frames: Option<u32>,
    pub tick_rate: Option<f32>,
    pub scene: Option<String>,
    pub overshoot: Option<OvershootPolicy>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(frames) = overrides.frames {
            self.sim.frames = frames;
        }
        if let Some(tick_rate) = overrides.tick_rate {
            self.sim.tick_rate = tick_rate;
        }
        if let Some(scene) = &overrides.scene {
            self.scene.path = Some(scene.clone());
        }
        if let Some(overshoot) = overrides.overshoot {
            self.patrol.overshoot = overshoot;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.frames.is_none()
            && self.tick_rate.is_none()
            && self.scene.is_none()
            && self.overshoot.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.frames.is_some() {
            fields.push("frames");
        }
        if self.tick_rate.is_some() {
            fields.push("tick_rate");
        }
        if self.scene.is_some() {
            fields.push("scene");
        }
        if self.overshoot.is_some() {
            fields.push("overshoot");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg: AppConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(cfg.sim.tick_rate, 30.0);
        assert_eq!(cfg.sim.frames, 600);
        assert_eq!(cfg.patrol.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(cfg.patrol.overshoot, OvershootPolicy::Discard);
        assert!(cfg.scene.path.is_none());
    }

    #[test]
    fn parses_overshoot_policy_names() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"patrol": {"overshoot": "carry"}}"#).expect("carry config");
        assert_eq!(cfg.patrol.overshoot, OvershootPolicy::Carry);
    }

    #[test]
    fn overrides_replace_config_fields() {
        let mut cfg = AppConfig::default();
        let overrides = AppConfigOverrides {
            frames: Some(42),
            tick_rate: None,
            scene: Some("scenes/reef.json".to_string()),
            overshoot: Some(OvershootPolicy::Carry),
        };
        assert_eq!(overrides.applied_fields(), vec!["frames", "scene", "overshoot"]);
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.sim.frames, 42);
        assert_eq!(cfg.sim.tick_rate, 30.0);
        assert_eq!(cfg.scene.path.as_deref(), Some("scenes/reef.json"));
        assert_eq!(cfg.patrol.overshoot, OvershootPolicy::Carry);
    }

    #[test]
    fn load_or_default_survives_bad_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        write!(file, "not json").expect("write temp config");
        let cfg = AppConfig::load_or_default(file.path());
        assert_eq!(cfg.sim.frames, 600);
        assert!(AppConfig::load(file.path()).is_err());
    }
}
