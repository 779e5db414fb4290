//! CCTV камера — consumer сети, пока экран включён

use bevy::prelude::*;

use crate::power::{PowerConsumer, PowerStarved};

#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CctvCamera {
    pub active: bool,
    /// Питание пропало — картинки нет, пока игрок не включит заново
    pub signal_lost: bool,
}

/// Включение/выключение камеры (CCTV монитор UI)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SetCctvPower {
    pub camera: Entity,
    pub on: bool,
}

/// Система: SetCctvPower → камера + consumer
pub fn handle_cctv_power(
    mut requests: EventReader<SetCctvPower>,
    mut cameras: Query<(&mut CctvCamera, &mut PowerConsumer)>,
) {
    for request in requests.read() {
        let Ok((mut camera, mut consumer)) = cameras.get_mut(request.camera) else {
            crate::log_warning(&format!("📹 CCTV power for {:?}: not a camera", request.camera));
            continue;
        };

        camera.active = request.on;
        camera.signal_lost = false;
        consumer.active = request.on;
        crate::log(&format!(
            "📹 CCTV '{}': {}",
            consumer.id,
            if request.on { "on" } else { "off" }
        ));
    }
}

/// Система: голодающая камера гаснет
pub fn cctv_signal_loss(
    mut starved: EventReader<PowerStarved>,
    mut cameras: Query<(&mut CctvCamera, &mut PowerConsumer)>,
) {
    for event in starved.read() {
        let Ok((mut camera, mut consumer)) = cameras.get_mut(event.entity) else {
            continue;
        };

        if camera.active {
            camera.active = false;
            camera.signal_lost = true;
            consumer.active = false;
            crate::log_warning(&format!("📹 CCTV '{}': signal lost (no grid power)", event.id));
        }
    }
}
