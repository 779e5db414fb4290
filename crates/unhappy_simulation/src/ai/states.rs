//! Состояния FSM: Patrol, Chase, Attack
//!
//! Каждое состояние реализует `AgentBehavior` (enter / execute / exit).
//! `execute` не переключает состояние сам — возвращает запрос перехода,
//! `StateMachine` применяет его после возврата (новый execute в этом тике не вызывается).
//!
//! Все сравнения с радиусами строгие (`<`): distance == radius не переключает.

use bevy::prelude::*;

use crate::ai::components::{AIConfig, StateKind};
use crate::ai::events::{AIStateChanged, AttackPerformed};
use crate::clock::TimeOfDay;

/// Locomotion service (движок): SetDestination + состояние пути
pub trait Locomotion {
    fn set_destination(&mut self, point: Vec3);
    fn destination(&self) -> Option<Vec3>;
    fn remaining_distance(&self) -> f32;
    fn path_pending(&self) -> bool;
}

/// World sampling service: случайная достижимая точка в радиусе (или None)
pub trait PointSampler {
    fn sample_point(&mut self, center: Vec3, radius: f32) -> Option<Vec3>;
}

/// Цель, разрешённая на этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub entity: Entity,
    pub position: Vec3,
}

/// Side effects одного тика (пишутся в Bevy events системой)
#[derive(Debug, Default)]
pub struct AgentOutbox {
    pub transitions: Vec<AIStateChanged>,
    pub attacks: Vec<AttackPerformed>,
}

/// Живые данные мира для одного агента на один тик
pub struct AgentContext<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub rotation: &'a mut Quat,
    pub target: Option<TargetInfo>,
    /// Elapsed time часов (секунды, f64 — сессия может идти сутками)
    pub now: f64,
    pub delta: f32,
    pub time_of_day: TimeOfDay,
    pub config: &'a AIConfig,
    pub locomotion: &'a mut dyn Locomotion,
    pub sampler: &'a mut dyn PointSampler,
    pub outbox: &'a mut AgentOutbox,
}

impl AgentContext<'_> {
    pub fn distance_to(&self, target: &TargetInfo) -> f32 {
        self.position.distance(target.position)
    }
}

/// IState: протокол состояния
pub trait AgentBehavior {
    fn enter(&mut self, _ctx: &mut AgentContext) {}

    /// Возвращает следующее состояние, если нужен переход
    fn execute(&mut self, ctx: &mut AgentContext) -> Option<StateKind>;

    fn exit(&mut self, _ctx: &mut AgentContext) {}
}

/// Активное состояние агента вместе с его bookkeeping
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum AIState {
    Patrol(PatrolState),
    Chase(ChaseState),
    Attack(AttackState),
}

impl AIState {
    pub fn from_kind(kind: StateKind) -> Self {
        match kind {
            StateKind::Patrol => AIState::Patrol(PatrolState),
            StateKind::Chase => AIState::Chase(ChaseState),
            StateKind::Attack => AIState::Attack(AttackState::default()),
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            AIState::Patrol(_) => StateKind::Patrol,
            AIState::Chase(_) => StateKind::Chase,
            AIState::Attack(_) => StateKind::Attack,
        }
    }

    fn behavior(&mut self) -> &mut dyn AgentBehavior {
        match self {
            AIState::Patrol(state) => state,
            AIState::Chase(state) => state,
            AIState::Attack(state) => state,
        }
    }

    pub fn enter(&mut self, ctx: &mut AgentContext) {
        self.behavior().enter(ctx);
    }

    pub fn execute(&mut self, ctx: &mut AgentContext) -> Option<StateKind> {
        self.behavior().execute(ctx)
    }

    pub fn exit(&mut self, ctx: &mut AgentContext) {
        self.behavior().exit(ctx);
    }
}

impl Default for AIState {
    fn default() -> Self {
        Self::from_kind(StateKind::Patrol)
    }
}

/// Patrol — случайные точки в patrol_radius, ищем цель
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct PatrolState;

impl PatrolState {
    /// Новая patrol точка; если sampler не нашёл — держим последний destination
    fn pick_destination(ctx: &mut AgentContext) {
        match ctx.sampler.sample_point(ctx.position, ctx.config.patrol_radius) {
            Some(point) => ctx.locomotion.set_destination(point),
            None => {
                if let Some(last) = ctx.locomotion.destination() {
                    ctx.locomotion.set_destination(last);
                }
            }
        }
    }
}

impl AgentBehavior for PatrolState {
    fn enter(&mut self, ctx: &mut AgentContext) {
        Self::pick_destination(ctx);
    }

    fn execute(&mut self, ctx: &mut AgentContext) -> Option<StateKind> {
        let arrived = !ctx.locomotion.path_pending()
            && ctx.locomotion.remaining_distance() < ctx.config.arrival_epsilon;
        if arrived {
            Self::pick_destination(ctx);
        }

        let target = ctx.target?;
        if ctx.distance_to(&target) < ctx.config.chase_radius {
            return Some(StateKind::Chase);
        }
        None
    }
}

/// Chase — преследуем цель (она может двигаться)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct ChaseState;

impl AgentBehavior for ChaseState {
    fn execute(&mut self, ctx: &mut AgentContext) -> Option<StateKind> {
        let Some(target) = ctx.target else {
            return Some(StateKind::Patrol);
        };

        ctx.locomotion.set_destination(target.position);

        let distance = ctx.distance_to(&target);
        if distance < ctx.config.attack_radius {
            Some(StateKind::Attack)
        } else if distance > ctx.config.chase_radius {
            // Та же граница, что и на входе — без гистерезиса
            Some(StateKind::Patrol)
        } else {
            None
        }
    }
}

/// Attack — доворачиваемся к цели, бьём по cooldown
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct AttackState {
    /// Время последней атаки (или входа в состояние)
    pub last_attack_at: f64,
}

impl AgentBehavior for AttackState {
    fn enter(&mut self, ctx: &mut AgentContext) {
        self.last_attack_at = ctx.now;
    }

    fn execute(&mut self, ctx: &mut AgentContext) -> Option<StateKind> {
        let Some(target) = ctx.target else {
            return Some(StateKind::Patrol);
        };

        face_towards(ctx.rotation, ctx.position, target.position, ctx.config.turn_speed, ctx.delta);

        let cooldown = ctx.config.effective_cooldown(ctx.time_of_day);
        if ctx.now - self.last_attack_at >= f64::from(cooldown) {
            ctx.outbox.attacks.push(AttackPerformed {
                attacker: ctx.entity,
                target: target.entity,
            });
            self.last_attack_at = ctx.now;
        }

        let distance = ctx.distance_to(&target);
        if distance >= ctx.config.chase_radius {
            // Минуя Chase — сохранённое поведение
            Some(StateKind::Patrol)
        } else if distance > ctx.config.attack_radius {
            Some(StateKind::Chase)
        } else {
            None
        }
    }
}

/// Yaw-поворот к цели (XZ плоскость), forward = -Z
///
/// Экспоненциальное приближение: t = 1 - exp(-turn_speed * dt).
pub fn face_towards(rotation: &mut Quat, from: Vec3, to: Vec3, turn_speed: f32, delta: f32) {
    let direction = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if direction.length_squared() < 1e-6 {
        return;
    }

    let yaw = (-direction.x).atan2(-direction.z);
    let desired = Quat::from_rotation_y(yaw);
    let t = 1.0 - (-turn_speed.max(0.0) * delta.max(0.0)).exp();
    *rotation = rotation.slerp(desired, t);
}
