//! Power grid systems: registration sync, drain/recharge tick, ручная зарядка

use bevy::prelude::*;

use crate::power::components::{Mounted, PowerConsumer, Rechargeable};
use crate::power::events::{ChargeAttempted, ChargeRequested, PowerStarved, ReservoirChanged};
use crate::power::grid::{CentralBattery, GridConfig};

/// Repeating таймер grid тика (drain + recharge раз в `tick_interval_secs`)
#[derive(Resource, Debug, Clone)]
pub struct GridTimer(pub Timer);

impl GridTimer {
    pub fn from_config(config: &GridConfig) -> Self {
        Self(Timer::from_seconds(
            config.tick_interval_secs.max(f32::EPSILON),
            TimerMode::Repeating,
        ))
    }
}

impl Default for GridTimer {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

fn report_missing_grid(reported: &mut bool, context: &str) {
    if !*reported {
        *reported = true;
        crate::log_error(&format!("Power: CentralBattery resource missing, {} skipped", context));
    }
}

/// Система: регистрация consumers по флагу `active`
///
/// Changed<PowerConsumer> покрывает insert и любые изменения;
/// despawn / remove снимает регистрацию через RemovedComponents.
pub fn sync_consumer_registration(
    grid: Option<ResMut<CentralBattery>>,
    changed: Query<(Entity, &PowerConsumer), Changed<PowerConsumer>>,
    mut removed: RemovedComponents<PowerConsumer>,
    mut reported: Local<bool>,
) {
    let Some(mut grid) = grid else {
        removed.read().for_each(drop);
        if !changed.is_empty() {
            report_missing_grid(&mut reported, "consumer registration");
        }
        return;
    };

    for entity in removed.read() {
        if grid.unregister_consumer_entity(entity) {
            crate::log(&format!("🔌 Power: consumer {:?} removed, unregistered", entity));
        }
    }

    // Slot ищем по entity: id может смениться, а может совпасть у двух устройств
    for (entity, consumer) in changed.iter() {
        if consumer.active {
            if grid.register_consumer(consumer.id.clone(), entity) {
                crate::log(&format!("🔌 Power: consumer '{}' registered", consumer.id));
            }
        } else if grid.unregister_consumer_entity(entity) {
            crate::log(&format!("🔌 Power: consumer '{}' unregistered", consumer.id));
        }
    }
}

/// Система: rechargeable в сети только пока Mounted
pub fn sync_rechargeable_registration(
    grid: Option<ResMut<CentralBattery>>,
    mounted: Query<
        (Entity, &Rechargeable),
        (With<Mounted>, Or<(Added<Mounted>, Added<Rechargeable>)>),
    >,
    mut unmounted: RemovedComponents<Mounted>,
    mut destroyed: RemovedComponents<Rechargeable>,
    mut reported: Local<bool>,
) {
    let Some(mut grid) = grid else {
        unmounted.read().for_each(drop);
        destroyed.read().for_each(drop);
        if !mounted.is_empty() {
            report_missing_grid(&mut reported, "rechargeable registration");
        }
        return;
    };

    for entity in unmounted.read().chain(destroyed.read()) {
        if grid.unregister_rechargeable_entity(entity) {
            crate::log(&format!("🔋 Power: rechargeable {:?} unmounted", entity));
        }
    }

    for (entity, rechargeable) in mounted.iter() {
        if grid.register_rechargeable(rechargeable.id.clone(), entity) {
            crate::log(&format!("🔋 Power: rechargeable '{}' mounted", rechargeable.id));
        }
    }
}

/// Система: grid тик
///
/// На каждый истёкший период таймера: DrainTick(interval), затем
/// RechargeTick всех зарегистрированных rechargeables (в порядке регистрации).
pub fn tick_central_battery(
    grid: Option<ResMut<CentralBattery>>,
    mut timer: ResMut<GridTimer>,
    time: Res<Time<Fixed>>,
    consumers: Query<&PowerConsumer>,
    mut rechargeables: Query<&mut Rechargeable>,
    mut starved_events: EventWriter<PowerStarved>,
    mut reservoir_events: EventWriter<ReservoirChanged>,
    mut reported: Local<bool>,
) {
    let Some(mut grid) = grid else {
        report_missing_grid(&mut reported, "grid tick");
        return;
    };

    timer.0.tick(time.delta());
    let periods = timer.0.times_finished_this_tick();
    if periods == 0 {
        return;
    }
    let interval = timer.0.duration().as_secs_f32();

    for _ in 0..periods {
        let report = grid.drain_tick(interval, |entity| consumers.get(entity).ok().map(PowerConsumer::demand));

        for slot in report.starved {
            crate::log_warning(&format!("⚡ Power: consumer '{}' starved (reservoir empty)", slot.id));
            starved_events.write(PowerStarved {
                entity: slot.entity,
                id: slot.id,
            });
        }

        for entity in grid.rechargeable_entities() {
            if let Ok(mut rechargeable) = rechargeables.get_mut(entity) {
                rechargeable.recharge_step(interval, &mut grid);
            }
        }
    }

    reservoir_events.write(ReservoirChanged {
        current: grid.current_power(),
        max: grid.max_power(),
    });
}

/// Система: ручная зарядка (ChargeRequested → TryChargeFromCentralBattery)
pub fn handle_charge_requests(
    mut grid: Option<ResMut<CentralBattery>>,
    mut requests: EventReader<ChargeRequested>,
    mut rechargeables: Query<&mut Rechargeable>,
    mut results: EventWriter<ChargeAttempted>,
) {
    for request in requests.read() {
        let Ok(mut rechargeable) = rechargeables.get_mut(request.entity) else {
            crate::log_warning(&format!("Power: charge requested for {:?} without Rechargeable", request.entity));
            continue;
        };

        let result = rechargeable.try_charge_from_central_battery(grid.as_deref_mut());
        crate::log_info(&format!("🔋 Power: '{}' charge attempt → {:?}", rechargeable.id, result));
        results.write(ChargeAttempted {
            entity: request.entity,
            result,
        });
    }
}
