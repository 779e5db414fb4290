//! Маркеры акторов

use bevy::prelude::*;

/// Игрок — цель, которую отслеживают враги (`TrackedTarget`)
///
/// Transform игрока пишет host engine (input + CharacterController).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Player;
