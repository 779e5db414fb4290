//! Фонарик — rechargeable с локальным зарядом
//!
//! Пока включён, тратит свой заряд (не сеть). Заряжается из сети
//! только когда установлен в зарядку (Mounted).
//! Спавнится вместе с `Rechargeable` (без него системы фонарик не видят).

use bevy::prelude::*;

use crate::power::Rechargeable;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Flashlight {
    pub on: bool,
    pub drain_per_second: f32,
}

impl Default for Flashlight {
    fn default() -> Self {
        Self {
            on: false,
            drain_per_second: 1.0,
        }
    }
}

/// Переключить фонарик (input)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ToggleFlashlight {
    pub entity: Entity,
}

/// Система: ToggleFlashlight → on/off (без заряда не включается)
pub fn handle_flashlight_toggles(
    mut requests: EventReader<ToggleFlashlight>,
    mut lights: Query<(&mut Flashlight, &Rechargeable)>,
) {
    for request in requests.read() {
        let Ok((mut light, charge)) = lights.get_mut(request.entity) else {
            continue;
        };

        if !light.on && charge.current_amount <= 0.0 {
            crate::log(&format!("🔦 Flashlight '{}': battery empty, stays off", charge.id));
            continue;
        }

        light.on = !light.on;
    }
}

/// Система: включённый фонарик тратит свой заряд; на нуле гаснет
pub fn drain_flashlights(
    mut lights: Query<(&mut Flashlight, &mut Rechargeable)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut light, mut charge) in lights.iter_mut() {
        if !light.on {
            continue;
        }

        charge.consume_local(light.drain_per_second * delta);
        if charge.current_amount <= 0.0 {
            light.on = false;
            crate::log(&format!("🔦 Flashlight '{}': battery depleted, turned off", charge.id));
        }
    }
}
