//! Devices — consumers и rechargeables игрового мира
//!
//! - Door: consumer пока закрыта, TimedTransition на открытие/закрытие, fail-open
//! - CctvCamera: consumer пока включена, теряет сигнал при голодании
//! - Flashlight: rechargeable, тратит локальный заряд

use bevy::prelude::*;

pub mod cctv;
pub mod door;
pub mod flashlight;
pub mod transition;

pub use cctv::{CctvCamera, SetCctvPower};
pub use door::{Door, DoorError, DoorToggle, DoorToggleRequested};
pub use flashlight::{Flashlight, ToggleFlashlight};
pub use transition::{TimedTransition, TransitionStep};

use crate::power::PowerStarved;
use crate::SimulationSet;

/// Devices Plugin
///
/// Input-реакции и шаги переходов идут до power тика (SimulationSet::Devices),
/// реакции на PowerStarved — после (SimulationSet::PowerReactions).
pub struct DevicesPlugin;

impl Plugin for DevicesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DoorToggleRequested>()
            .add_event::<SetCctvPower>()
            .add_event::<ToggleFlashlight>()
            // add_event идемпотентен — плагин работает и без PowerGridPlugin
            .add_event::<PowerStarved>()
            .add_systems(
                FixedUpdate,
                (
                    door::init_door_consumers,
                    door::handle_door_requests,
                    door::advance_doors,
                    cctv::handle_cctv_power,
                    flashlight::handle_flashlight_toggles,
                    flashlight::drain_flashlights,
                )
                    .chain()
                    .in_set(SimulationSet::Devices),
            )
            .add_systems(
                FixedUpdate,
                (door::doors_fail_open, cctv::cctv_signal_loss)
                    .chain()
                    .in_set(SimulationSet::PowerReactions),
            );
    }
}
