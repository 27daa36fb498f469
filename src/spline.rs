use anyhow::{bail, Result};
use glam::Vec3;
use std::sync::Arc;

pub const DEFAULT_SAMPLE_COUNT: usize = 25;

/// Closed path sampled from a Catmull-Rom curve. The sample sequence ends
/// with a duplicate of the first point so the final segment wraps; progress
/// indices never land on that closing duplicate.
#[derive(Debug, Clone)]
pub struct SplinePath {
    points: Arc<[Vec3]>,
    sample_count: usize,
}

impl SplinePath {
    /// Sample a closed Catmull-Rom curve through `control` into
    /// `sample_count` points plus the closing duplicate.
    pub fn catmull_rom_closed(control: &[Vec3], sample_count: usize) -> Result<Self> {
        if control.len() < 2 {
            bail!("A closed path needs at least 2 control points, got {}", control.len());
        }
        if sample_count < control.len() {
            bail!(
                "Sample count {sample_count} is below the control point count {}",
                control.len()
            );
        }
        let n = control.len();
        let mut points = Vec::with_capacity(sample_count + 1);
        for i in 0..sample_count {
            let t = i as f32 / sample_count as f32 * n as f32;
            let segment = (t.floor() as usize) % n;
            let local = t - t.floor();
            let p0 = control[(segment + n - 1) % n];
            let p1 = control[segment];
            let p2 = control[(segment + 1) % n];
            let p3 = control[(segment + 2) % n];
            points.push(catmull_rom(p0, p1, p2, p3, local));
        }
        points.push(points[0]);
        Ok(Self { points: points.into(), sample_count })
    }

    /// Wrap precomputed samples into a closed path. The closing duplicate is
    /// appended here; callers pass only the distinct points.
    pub fn from_samples(samples: Vec<Vec3>) -> Result<Self> {
        if samples.len() < 2 {
            bail!("A closed path needs at least 2 sample points, got {}", samples.len());
        }
        let sample_count = samples.len();
        let mut points = samples;
        points.push(points[0]);
        Ok(Self { points: points.into(), sample_count })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct samples along the loop, excluding the closing duplicate.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Index following `index`, wrapping before the closing duplicate.
    pub fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next >= self.len() - 1 {
            0
        } else {
            next
        }
    }

    /// Vertical rise of the segment scaled by the sample count, so a rise of
    /// one full unit across a single segment reads as `sample_count`.
    pub fn rise(&self, origin: usize, target: usize) -> f32 {
        (self.points[target].y - self.points[origin].y) * self.sample_count as f32
    }

    /// Normalized travel direction of the segment, `None` when degenerate.
    pub fn direction(&self, origin: usize, target: usize) -> Option<Vec3> {
        (self.points[target] - self.points[origin]).try_normalize()
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    a * t3 + b * t2 + c * t + p1
}
