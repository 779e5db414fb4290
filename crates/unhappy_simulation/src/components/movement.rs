//! Movement компоненты

use bevy::prelude::*;

/// Скорость движения актора (метры/сек)
///
/// Используется headless навигацией; в движке её читает NavMeshAgent.
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 } // скорость NavMeshAgent по умолчанию
    }
}
