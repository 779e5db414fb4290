//! FSM AI components (enemy marker, config, target, locomotion contract).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::state_machine::StateMachine;
use crate::ai::states::Locomotion;
use crate::clock::{PeriodTable, TimeOfDay};
use crate::components::MovementSpeed;

/// Тег состояния FSM (Patrol → Chase → Attack → Patrol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum StateKind {
    Patrol,
    Chase,
    Attack,
}

/// Враг — entity под управлением FSM
///
/// Required Components добавляют всё, что нужно `run_state_machines`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    StateMachine,
    AIConfig,
    NavAgent,
    TrackedTarget,
    UtilityScores,
    MovementSpeed
)]
pub struct Enemy;

/// Параметры AI (радиусы, cooldown, поворот)
///
/// Инвариант (проверяется в SimulationConfig::validate): attack_radius < chase_radius
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Patrol → Chase при distance < chase_radius
    pub chase_radius: f32,
    /// Chase → Attack при distance < attack_radius
    pub attack_radius: f32,
    /// Радиус выбора случайной patrol точки
    pub patrol_radius: f32,
    /// Базовый cooldown между атаками (секунды)
    pub attack_cooldown: f32,
    /// Множитель cooldown по периоду суток (enemy data asset)
    pub cooldown_scale: PeriodTable<f32>,
    /// Скорость доворота к цели (1/сек, экспоненциальное сглаживание)
    pub turn_speed: f32,
    /// Порог "пришли" для patrol точки
    pub arrival_epsilon: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            chase_radius: 10.0,
            attack_radius: 2.0,
            patrol_radius: 15.0,
            attack_cooldown: 1.5,
            cooldown_scale: PeriodTable::uniform(1.0),
            turn_speed: 5.0,
            arrival_epsilon: 0.5,
        }
    }
}

impl AIConfig {
    pub fn effective_cooldown(&self, period: TimeOfDay) -> f32 {
        self.attack_cooldown * self.cooldown_scale.get(period)
    }
}

/// Ссылка на отслеживаемую цель (обычно Player)
///
/// None или despawned entity — валидная ситуация: Patrol продолжается,
/// Chase/Attack откатываются в Patrol.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TrackedTarget(pub Option<Entity>);

/// Контракт с locomotion service (NavMeshAgent в движке)
///
/// AI пишет destination, host пишет remaining_distance / path_pending.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub remaining_distance: f32,
    pub path_pending: bool,
    /// Счётчик SetDestination запросов (debug overlay)
    pub requests: u32,
}

impl Locomotion for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.path_pending = true;
        self.requests = self.requests.wrapping_add(1);
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }
}

/// Utility scores кандидатов (обновляются каждый тик, FSM их не читает)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct UtilityScores {
    pub patrol: f32,
    pub chase: f32,
    pub attack: f32,
}

impl UtilityScores {
    pub fn get(&self, kind: StateKind) -> f32 {
        match kind {
            StateKind::Patrol => self.patrol,
            StateKind::Chase => self.chase,
            StateKind::Attack => self.attack,
        }
    }
}
