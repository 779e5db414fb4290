//! Power components: PowerConsumer, Rechargeable, Mounted

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::power::grid::{CentralBattery, ConsumerDemand, DeviceId};

/// Consumer — тратит резервуар, пока `active`
///
/// Регистрация в сети синхронизируется с `active` (sync_consumer_registration):
/// дверь закрылась → зарегистрирована, открылась → снята.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PowerConsumer {
    pub id: DeviceId,
    pub drain_per_second: f32,
    pub active: bool,
}

impl PowerConsumer {
    pub fn new(id: impl Into<DeviceId>, drain_per_second: f32) -> Self {
        Self {
            id: id.into(),
            drain_per_second: drain_per_second.max(0.0),
            active: false,
        }
    }

    pub fn demand(&self) -> ConsumerDemand {
        ConsumerDemand {
            drain_per_second: self.drain_per_second,
            active: self.active,
        }
    }
}

/// Результат попытки зарядки от центральной батареи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ChargeResult {
    Success,
    AlreadyFull,
    CentralBatteryEmpty,
    SystemUnavailable,
}

/// Rechargeable — локальный заряд, пополняется из сети
///
/// Инвариант: 0 ≤ current_amount ≤ max_capacity.
/// Serialize/Deserialize — save system снимает current/max как есть.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Rechargeable {
    pub id: DeviceId,
    pub max_capacity: f32,
    pub current_amount: f32,
    pub recharge_rate_per_second: f32,
}

impl Rechargeable {
    pub fn new(id: impl Into<DeviceId>, max_capacity: f32, recharge_rate_per_second: f32) -> Self {
        let max_capacity = max_capacity.max(0.0);
        Self {
            id: id.into(),
            max_capacity,
            current_amount: max_capacity,
            recharge_rate_per_second: recharge_rate_per_second.max(0.0),
        }
    }

    pub fn with_charge(mut self, amount: f32) -> Self {
        self.current_amount = amount.clamp(0.0, self.max_capacity);
        self
    }

    pub fn is_fully_charged(&self) -> bool {
        self.current_amount >= self.max_capacity
    }

    pub fn needed(&self) -> f32 {
        (self.max_capacity - self.current_amount).max(0.0)
    }

    /// Восстановление из сохранения (clamp к capacity)
    pub fn restore(&mut self, current_amount: f32) {
        self.current_amount = current_amount.clamp(0.0, self.max_capacity);
    }

    /// Тратим локальный заряд; возвращает сколько реально потрачено
    pub fn consume_local(&mut self, amount: f32) -> f32 {
        let spent = amount.max(0.0).min(self.current_amount);
        self.current_amount -= spent;
        spent
    }

    /// Зарядить до полного одним запросом (UI кнопка "зарядить")
    pub fn try_charge_from_central_battery(&mut self, grid: Option<&mut CentralBattery>) -> ChargeResult {
        let needed = self.max_capacity - self.current_amount;
        if needed <= 0.0 {
            return ChargeResult::AlreadyFull;
        }

        let Some(grid) = grid else {
            return ChargeResult::SystemUnavailable;
        };

        let granted = grid.request_power(needed);
        if granted <= 0.0 {
            return ChargeResult::CentralBatteryEmpty;
        }

        self.current_amount = (self.current_amount + granted).min(self.max_capacity);
        ChargeResult::Success
    }

    /// RechargeTick: rate-limited запрос min(rate * dt, needed)
    ///
    /// Возвращает полученную энергию.
    pub fn recharge_step(&mut self, delta: f32, grid: &mut CentralBattery) -> f32 {
        let wanted = (self.recharge_rate_per_second * delta.max(0.0)).min(self.needed());
        if wanted <= 0.0 {
            return 0.0;
        }

        let granted = grid.request_power(wanted);
        self.current_amount = (self.current_amount + granted).min(self.max_capacity);
        granted
    }
}

/// Маркер: устройство установлено в зарядку / экипировано
///
/// Rechargeable зарегистрирован в сети только пока есть Mounted.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Mounted;
