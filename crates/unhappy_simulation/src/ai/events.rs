//! AI Events — side effects FSM для внешних сервисов
//!
//! AttackPerformed → damage/interaction service (здоровье вне ядра)
//! AIStateChanged → debug overlay, звук, анимации

use bevy::prelude::*;

use crate::ai::components::StateKind;

/// Переход FSM (Exit `from` → Enter `to`)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AIStateChanged {
    pub entity: Entity,
    pub from: StateKind,
    pub to: StateKind,
}

/// Attack state выполнил атаку (cooldown готов)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackPerformed {
    pub attacker: Entity,
    pub target: Entity,
}
