//! AI decision-making module
//!
//! Threshold FSM для врагов (Patrol → Chase → Attack → Patrol) +
//! Utility Calculator (time-of-day weights) как tie-break seam.
//!
//! Движок отвечает за NavMesh pathing; ядро только пишет NavAgent::destination.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod sampling;
pub mod state_machine;
pub mod states;
pub mod systems;
pub mod utility;


// Re-export основных типов
pub use components::*;
pub use events::{AIStateChanged, AttackPerformed};
pub use sampling::{DiscSampler, PatrolSampler};
pub use state_machine::StateMachine;
pub use states::{
    AIState, AgentBehavior, AgentContext, AgentOutbox, AttackState, ChaseState, Locomotion, PatrolState,
    PointSampler, TargetInfo,
};
pub use utility::{UtilityCalculator, UtilityTuning};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. update_utility_scores — scores под текущий период суток
/// 2. run_state_machines — Execute + переходы всех врагов
///
/// Ресурсы (PatrolSampler, UtilityCalculator, GameClock) вставляются
/// SimulationPlugin либо тестом вручную.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AIStateChanged>()
            .add_event::<AttackPerformed>()
            .add_systems(
                FixedUpdate,
                (utility::update_utility_scores, systems::run_state_machines)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Ai),
            );
    }
}

/// Headless навигация вместо NavMeshAgent (тесты, headless run)
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            systems::headless_navigation.in_set(SimulationSet::Locomotion),
        );
    }
}
