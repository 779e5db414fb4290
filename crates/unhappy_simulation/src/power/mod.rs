//! Central power grid module
//!
//! Один общий резервуар (CentralBattery), много consumers (двери, CCTV)
//! и rechargeables (фонарики). Все мутации резервуара — только через
//! register / drain_tick / request_power.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod grid;
pub mod systems;


pub use components::{ChargeResult, Mounted, PowerConsumer, Rechargeable};
pub use events::{ChargeAttempted, ChargeRequested, PowerStarved, ReservoirChanged};
pub use grid::{CentralBattery, ConsumerDemand, DeviceId, DrainReport, GridConfig, GridSlot};
pub use systems::GridTimer;

use crate::SimulationSet;

/// Power Grid Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. sync_consumer_registration — active ⇒ registered
/// 2. sync_rechargeable_registration — Mounted ⇒ registered
/// 3. handle_charge_requests — ручная зарядка
/// 4. tick_central_battery — drain + recharge раз в tick_interval
///
/// CentralBattery и GridTimer вставляет SimulationPlugin (из GridConfig).
/// Без CentralBattery системы логируют ошибку один раз и пропускают тик.
pub struct PowerGridPlugin;

impl Plugin for PowerGridPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PowerStarved>()
            .add_event::<ReservoirChanged>()
            .add_event::<ChargeRequested>()
            .add_event::<ChargeAttempted>()
            .init_resource::<GridTimer>()
            .add_systems(
                FixedUpdate,
                (
                    systems::sync_consumer_registration,
                    systems::sync_rechargeable_registration,
                    systems::handle_charge_requests,
                    systems::tick_central_battery,
                )
                    .chain()
                    .in_set(SimulationSet::Power),
            );
    }
}
