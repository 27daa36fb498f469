use crate::config::AppConfigOverrides;
use crate::ecs::OvershootPolicy;
use anyhow::{anyhow, bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    frames: Option<u32>,
    tick_rate: Option<f32>,
    scene: Option<String>,
    overshoot: Option<OvershootPolicy>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --frames/--tick-rate/--scene/--overshoot with values.");
            }
            let key = &flag[2..];
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "frames" => {
                    overrides.frames =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid frames '{value}'"))?);
                }
                "tick-rate" => {
                    let rate =
                        value.parse::<f32>().with_context(|| format!("Invalid tick-rate '{value}'"))?;
                    if rate <= 0.0 {
                        bail!("Tick rate must be positive, got {rate}");
                    }
                    overrides.tick_rate = Some(rate);
                }
                "scene" => {
                    overrides.scene = Some(value);
                }
                "overshoot" => {
                    overrides.overshoot = Some(parse_overshoot_flag(&value)?);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --frames, --tick-rate, --scene, --overshoot."),
            }
        }
        Ok(overrides)
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides {
            frames: self.frames,
            tick_rate: self.tick_rate,
            scene: self.scene,
            overshoot: self.overshoot,
        }
    }

    #[cfg(test)]
    fn as_tuple(&self) -> (Option<u32>, Option<f32>, Option<&str>, Option<OvershootPolicy>) {
        (self.frames, self.tick_rate, self.scene.as_deref(), self.overshoot)
    }
}

fn parse_overshoot_flag(value: &str) -> Result<OvershootPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "discard" => Ok(OvershootPolicy::Discard),
        "carry" => Ok(OvershootPolicy::Carry),
        other => bail!("Invalid overshoot value '{other}'. Use discard or carry."),
    }
}
