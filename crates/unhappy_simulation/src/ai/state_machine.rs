//! StateMachine — per-agent контроллер FSM
//!
//! Инвариант: ровно одно активное состояние; каждый Enter парный с одним Exit
//! перед следующим Enter. Переход атомарный: Exit старого → присвоение → Enter нового.

use bevy::prelude::*;

use crate::ai::components::StateKind;
use crate::ai::events::AIStateChanged;
use crate::ai::states::{AIState, AgentContext};

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct StateMachine {
    state: AIState,
    /// Начальный Enter выполняется на первом тике (нужен живой контекст)
    started: bool,
    enter_count: u32,
    exit_count: u32,
    /// Missing target репортим один раз, пока цель не вернётся
    missing_target_reported: bool,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(StateKind::Patrol)
    }
}

impl StateMachine {
    pub fn new(initial: StateKind) -> Self {
        Self {
            state: AIState::from_kind(initial),
            started: false,
            enter_count: 0,
            exit_count: 0,
            missing_target_reported: false,
        }
    }

    pub fn current(&self) -> StateKind {
        self.state.kind()
    }

    pub fn state(&self) -> &AIState {
        &self.state
    }

    pub fn enter_count(&self) -> u32 {
        self.enter_count
    }

    pub fn exit_count(&self) -> u32 {
        self.exit_count
    }

    /// Exit текущего → новое состояние → Enter
    pub fn change_state(&mut self, next: StateKind, ctx: &mut AgentContext) {
        let from = self.state.kind();

        self.state.exit(ctx);
        self.exit_count += 1;

        self.state = AIState::from_kind(next);
        self.state.enter(ctx);
        self.enter_count += 1;

        ctx.outbox.transitions.push(AIStateChanged {
            entity: ctx.entity,
            from,
            to: next,
        });
        crate::log(&format!("AI: {:?} {:?} → {:?}", ctx.entity, from, next));
    }

    /// Один тик: Execute активного состояния, затем (если запрошен) переход
    pub fn tick(&mut self, ctx: &mut AgentContext) {
        if !self.started {
            self.state.enter(ctx);
            self.enter_count += 1;
            self.started = true;
        }

        self.report_missing_target(ctx);

        if let Some(next) = self.state.execute(ctx) {
            self.change_state(next, ctx);
        }
    }

    fn report_missing_target(&mut self, ctx: &AgentContext) {
        if ctx.target.is_some() {
            self.missing_target_reported = false;
        } else if !self.missing_target_reported {
            self.missing_target_reported = true;
            crate::log_warning(&format!(
                "AI: {:?} has no valid target ({:?}), target-dependent behavior skipped",
                ctx.entity,
                self.state.kind()
            ));
        }
    }
}
