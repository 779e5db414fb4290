//! World sampling service для Patrol
//!
//! В движке это NavMesh.SamplePosition; headless режим использует `DiscSampler`
//! (детерминированный ChaCha8 RNG, опциональные границы арены).

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::states::PointSampler;

/// Сколько раз пробуем попасть в границы арены до отказа
const MAX_SAMPLE_ATTEMPTS: usize = 8;

/// Resource-обёртка над sampler (host подменяет своим NavMesh sampler)
#[derive(Resource)]
pub struct PatrolSampler {
    inner: Box<dyn PointSampler + Send + Sync>,
}

impl PatrolSampler {
    pub fn new(sampler: impl PointSampler + Send + Sync + 'static) -> Self {
        Self {
            inner: Box::new(sampler),
        }
    }

    pub fn disc(seed: u64) -> Self {
        Self::new(DiscSampler::new(seed))
    }

    pub fn sampler_mut(&mut self) -> &mut dyn PointSampler {
        self.inner.as_mut()
    }
}

/// Случайная точка в круге (XZ плоскость) вокруг центра
#[derive(Debug, Clone)]
pub struct DiscSampler {
    rng: ChaCha8Rng,
    /// Walkable область (XZ); точки вне неё отбрасываются
    pub arena: Option<Rect>,
}

impl DiscSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            arena: None,
        }
    }

    pub fn with_arena(mut self, arena: Rect) -> Self {
        self.arena = Some(arena);
        self
    }
}

impl PointSampler for DiscSampler {
    fn sample_point(&mut self, center: Vec3, radius: f32) -> Option<Vec3> {
        if radius <= 0.0 {
            return None;
        }

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
            // sqrt — равномерно по площади круга
            let distance = self.rng.gen::<f32>().sqrt() * radius;
            let point = center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

            match self.arena {
                Some(arena) if !arena.contains(Vec2::new(point.x, point.z)) => continue,
                _ => return Some(point),
            }
        }

        None
    }
}
