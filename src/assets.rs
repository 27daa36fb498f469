use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Name and length of one animation found in a model source.
#[derive(Debug, Clone)]
pub struct ClipMeta {
    pub name: Arc<str>,
    pub duration: f32,
}

#[derive(Debug, Clone)]
pub struct ModelAsset {
    key: String,
    source: Option<String>,
    mesh_count: usize,
    clips: Vec<ClipMeta>,
}

impl ModelAsset {
    fn placeholder(key: &str) -> Self {
        Self { key: key.to_string(), source: None, mesh_count: 0, clips: Vec::new() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn mesh_count(&self) -> usize {
        self.mesh_count
    }

    pub fn clips(&self) -> &[ClipMeta] {
        &self.clips
    }

    pub fn clip(&self, name: &str) -> Option<&ClipMeta> {
        self.clips.iter().find(|clip| clip.name.as_ref() == name)
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clip(name).is_some()
    }
}

#[derive(Default)]
pub struct AssetManager {
    models: HashMap<String, ModelAsset>,
}

impl AssetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under `key`. With a source path the glTF document is
    /// imported for clip and mesh metadata; a missing file degrades to a
    /// placeholder so headless runs work without model binaries on disk.
    pub fn retain_model(&mut self, key: &str, path: Option<&str>) -> Result<()> {
        let asset = match path {
            Some(source) if Path::new(source).exists() => load_model_from_gltf(key, source)?,
            Some(source) => {
                eprintln!("[assets] Model '{key}' source {source} not found; registering placeholder.");
                ModelAsset::placeholder(key)
            }
            None => ModelAsset::placeholder(key),
        };
        self.models.insert(key.to_string(), asset);
        Ok(())
    }

    /// Register a model with known clips, bypassing import. Used by tools
    /// and tests that do not ship model binaries.
    pub fn register_model(&mut self, key: &str, clips: &[(&str, f32)]) {
        let clips = clips
            .iter()
            .map(|(name, duration)| ClipMeta { name: Arc::from(*name), duration: *duration })
            .collect();
        self.models.insert(
            key.to_string(),
            ModelAsset { key: key.to_string(), source: None, mesh_count: 0, clips },
        );
    }

    pub fn model(&self, key: &str) -> Option<&ModelAsset> {
        self.models.get(key)
    }

    pub fn model_exists(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

pub fn load_model_from_gltf(key: &str, path: impl AsRef<Path>) -> Result<ModelAsset> {
    let path_ref = path.as_ref();
    let (document, buffers, _images) = gltf::import(path_ref)
        .with_context(|| format!("Failed to import glTF model from {}", path_ref.display()))?;

    if document.scenes().count() > 1 {
        eprintln!(
            "[assets] glTF '{}' contains multiple scenes; only the first will be used.",
            path_ref.display()
        );
    }

    let clips = document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip{}", animation.index()));
            let duration = animation
                .channels()
                .filter_map(|channel| {
                    let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
                    reader.read_inputs().map(|times| times.fold(0.0f32, f32::max))
                })
                .fold(0.0f32, f32::max);
            ClipMeta { name: Arc::from(name), duration }
        })
        .collect();

    Ok(ModelAsset {
        key: key.to_string(),
        source: Some(path_ref.display().to_string()),
        mesh_count: document.meshes().count(),
        clips,
    })
}
