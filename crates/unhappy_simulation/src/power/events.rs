//! Power events

use bevy::prelude::*;

use crate::power::components::ChargeResult;
use crate::power::grid::DeviceId;

/// Активный consumer получил меньше, чем просил (резервуар пуст)
///
/// Реакция — на стороне consumer (дверь открывается, CCTV теряет сигнал).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PowerStarved {
    pub entity: Entity,
    pub id: DeviceId,
}

/// Уровень резервуара после grid тика (для HUD)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ReservoirChanged {
    pub current: f32,
    pub max: f32,
}

/// Запрос ручной зарядки rechargeable (кнопка на зарядной станции)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ChargeRequested {
    pub entity: Entity,
}

/// Результат ручной зарядки (для notification UI)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ChargeAttempted {
    pub entity: Entity,
    pub result: ChargeResult,
}
