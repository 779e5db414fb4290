//! CentralBattery — общий резервуар энергии
//!
//! Единственный владелец `current_power`. Consumers и rechargeables
//! регистрируются по DeviceId (entity хранится только для lookup),
//! отмена регистрации никогда не удаляет сам объект.
//!
//! Порядок обхода = порядок регистрации (стабильный). Если резервуар
//! кончился посреди тика, поздние consumers получают частичный или нулевой drain.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентичность устройства в сети
#[derive(Debug, Clone, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Запись в registry
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct GridSlot {
    pub id: DeviceId,
    pub entity: Entity,
}

/// Текущий спрос consumer на этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumerDemand {
    pub drain_per_second: f32,
    pub active: bool,
}

/// Итог drain_tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainReport {
    /// Сколько реально списано за тик
    pub drained: f32,
    /// Активные consumers, получившие меньше, чем просили
    pub starved: Vec<GridSlot>,
}

/// Конфиг сети (секция `grid` в SimulationConfig)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub max_power: f32,
    pub initial_power: f32,
    /// Период drain/recharge тика (секунды)
    pub tick_interval_secs: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_power: 1000.0,
            initial_power: 1000.0,
            tick_interval_secs: 1.0,
        }
    }
}

#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct CentralBattery {
    current_power: f32,
    max_power: f32,
    consumers: Vec<GridSlot>,
    rechargeables: Vec<GridSlot>,
}

impl Default for CentralBattery {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl CentralBattery {
    pub fn new(max_power: f32, current_power: f32) -> Self {
        let max_power = max_power.max(0.0);
        Self {
            current_power: current_power.clamp(0.0, max_power),
            max_power,
            consumers: Vec::new(),
            rechargeables: Vec::new(),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.max_power, config.initial_power)
    }

    pub fn current_power(&self) -> f32 {
        self.current_power
    }

    pub fn max_power(&self) -> f32 {
        self.max_power
    }

    pub fn is_depleted(&self) -> bool {
        self.current_power <= 0.0
    }

    // ----- registry -----

    /// false если entity уже зарегистрирован под этим id (no-op)
    pub fn register_consumer(&mut self, id: impl Into<DeviceId>, entity: Entity) -> bool {
        register(&mut self.consumers, id.into(), entity)
    }

    /// Снимает все slots с этим id; false если их не было (no-op, не ошибка)
    pub fn unregister_consumer(&mut self, id: &DeviceId) -> bool {
        unregister(&mut self.consumers, |slot| &slot.id == id)
    }

    pub fn unregister_consumer_entity(&mut self, entity: Entity) -> bool {
        unregister(&mut self.consumers, |slot| slot.entity == entity)
    }

    pub fn is_consumer_registered(&self, id: &DeviceId) -> bool {
        self.consumers.iter().any(|slot| &slot.id == id)
    }

    pub fn consumers(&self) -> &[GridSlot] {
        &self.consumers
    }

    pub fn register_rechargeable(&mut self, id: impl Into<DeviceId>, entity: Entity) -> bool {
        register(&mut self.rechargeables, id.into(), entity)
    }

    pub fn unregister_rechargeable(&mut self, id: &DeviceId) -> bool {
        unregister(&mut self.rechargeables, |slot| &slot.id == id)
    }

    pub fn unregister_rechargeable_entity(&mut self, entity: Entity) -> bool {
        unregister(&mut self.rechargeables, |slot| slot.entity == entity)
    }

    pub fn is_rechargeable_registered(&self, id: &DeviceId) -> bool {
        self.rechargeables.iter().any(|slot| &slot.id == id)
    }

    /// Копия порядка (чтобы можно было мутировать grid во время обхода)
    pub fn rechargeable_entities(&self) -> Vec<Entity> {
        self.rechargeables.iter().map(|slot| slot.entity).collect()
    }

    // ----- power flow -----

    /// DrainTick: списываем drain_per_second * dt с каждого активного consumer
    ///
    /// `demand_of` отдаёт текущий спрос по entity; None (entity пропал) — пропускаем.
    pub fn drain_tick(
        &mut self,
        delta: f32,
        mut demand_of: impl FnMut(Entity) -> Option<ConsumerDemand>,
    ) -> DrainReport {
        let mut report = DrainReport::default();

        for slot in &self.consumers {
            let Some(demand) = demand_of(slot.entity) else {
                continue;
            };
            if !demand.active {
                continue;
            }

            let amount = demand.drain_per_second.max(0.0) * delta.max(0.0);
            let granted = amount.min(self.current_power);
            self.current_power = (self.current_power - granted).max(0.0);
            report.drained += granted;

            if granted < amount {
                report.starved.push(slot.clone());
            }
        }

        report
    }

    /// RequestPower: выдаём min(amount, current) и сразу списываем
    ///
    /// Возвращаемое значение — реально выданная энергия (может быть 0).
    pub fn request_power(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || self.current_power <= 0.0 {
            return 0.0;
        }

        let granted = amount.min(self.current_power);
        self.current_power -= granted;
        granted
    }

    /// Внешняя подзарядка резервуара (генератор, топливо); clamp к max
    pub fn refill(&mut self, amount: f32) -> f32 {
        let before = self.current_power;
        self.current_power = (self.current_power + amount.max(0.0)).min(self.max_power);
        self.current_power - before
    }
}

/// Один slot на entity: повторная регистрация с тем же id — no-op,
/// с новым id — slot переименовывается на месте (порядок обслуживания сохраняется)
fn register(slots: &mut Vec<GridSlot>, id: DeviceId, entity: Entity) -> bool {
    if let Some(slot) = slots.iter_mut().find(|slot| slot.entity == entity) {
        if slot.id == id {
            return false;
        }
        slot.id = id;
        return true;
    }
    slots.push(GridSlot { id, entity });
    true
}

fn unregister(slots: &mut Vec<GridSlot>, matches: impl Fn(&GridSlot) -> bool) -> bool {
    let before = slots.len();
    // retain сохраняет порядок оставшихся
    slots.retain(|slot| !matches(slot));
    slots.len() != before
}
