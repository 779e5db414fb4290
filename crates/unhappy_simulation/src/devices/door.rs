//! Door — consumer сети, пока закрыта
//!
//! Открытие/закрытие — TimedTransition между двумя endpoints.
//! Consumer активен только в полностью закрытом состоянии:
//! - close transition завершился → active = true (регистрация в сети)
//! - open transition начался → active = false (снятие)
//!
//! Повторный toggle во время движения игнорируется.

use bevy::prelude::*;

use crate::devices::transition::TimedTransition;
use crate::power::{PowerConsumer, PowerStarved};

/// Скорость двери по умолчанию (progress/сек → 1 секунда на ход)
pub const DEFAULT_DOOR_SPEED: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoorError {
    #[error("door is missing its {0} endpoint")]
    MissingEndpoint(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorToggle {
    Started { closing: bool },
    /// Уже в движении — запрос проигнорирован
    Ignored,
}

/// Запрос на открытие/закрытие (кнопка, interaction service)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DoorToggleRequested {
    pub door: Entity,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Door {
    pub closed_position: Option<Vec3>,
    pub open_position: Option<Vec3>,
    /// При голодании сети дверь сама открывается
    pub fail_open_on_outage: bool,
    is_closed: bool,
    /// Направление текущего (или последнего) перехода
    closing: bool,
    motion: TimedTransition,
}

impl Door {
    /// Дверь в открытом положении
    pub fn new(closed_position: Vec3, open_position: Vec3) -> Self {
        Self {
            closed_position: Some(closed_position),
            open_position: Some(open_position),
            fail_open_on_outage: true,
            is_closed: false,
            closing: false,
            motion: TimedTransition::new(DEFAULT_DOOR_SPEED),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.motion = TimedTransition::new(speed);
        self
    }

    pub fn starting_closed(mut self) -> Self {
        self.is_closed = true;
        self
    }

    pub fn with_fail_open(mut self, fail_open: bool) -> Self {
        self.fail_open_on_outage = fail_open;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_busy()
    }

    /// Положение покоя для текущего состояния
    pub fn resting_position(&self) -> Option<Vec3> {
        if self.is_closed {
            self.closed_position
        } else {
            self.open_position
        }
    }

    /// Начать открытие/закрытие
    ///
    /// Нужны оба endpoints: отсутствие любого из них (не только обоих сразу) —
    /// `DoorError::MissingEndpoint`, состояние не меняется.
    pub fn toggle(&mut self) -> Result<DoorToggle, DoorError> {
        let closed = self.closed_position.ok_or(DoorError::MissingEndpoint("closed"))?;
        let open = self.open_position.ok_or(DoorError::MissingEndpoint("open"))?;

        if self.motion.is_busy() {
            return Ok(DoorToggle::Ignored);
        }

        let closing = !self.is_closed;
        let (from, to) = if closing { (open, closed) } else { (closed, open) };
        self.motion.start(from, to);
        self.closing = closing;
        // Открывающаяся дверь уже не закрыта; закрывающаяся — ещё не закрыта
        self.is_closed = false;

        Ok(DoorToggle::Started { closing })
    }

    /// Один шаг перехода; Some(position) пока двигаемся
    fn advance(&mut self, delta: f32) -> Option<(Vec3, bool)> {
        let step = self.motion.step(delta)?;
        if step.finished {
            self.is_closed = self.closing;
        }
        Some((step.value, step.finished))
    }
}

/// toggle + синхронизация consumer (общая для запросов и fail-open)
fn toggle_door(entity: Entity, door: &mut Door, consumer: Option<Mut<PowerConsumer>>) -> Option<DoorToggle> {
    match door.toggle() {
        Ok(DoorToggle::Started { closing }) => {
            if !closing {
                if let Some(mut consumer) = consumer {
                    consumer.active = false;
                }
            }
            crate::log(&format!(
                "🚪 Door {:?}: {}",
                entity,
                if closing { "closing" } else { "opening" }
            ));
            Some(DoorToggle::Started { closing })
        }
        Ok(DoorToggle::Ignored) => {
            crate::log(&format!("🚪 Door {:?}: already in motion, request ignored", entity));
            Some(DoorToggle::Ignored)
        }
        Err(err) => {
            crate::log_error(&format!("🚪 Door {:?}: {}", entity, err));
            None
        }
    }
}

/// Система: consumer дверей, заспавненных закрытыми, сразу активен
pub fn init_door_consumers(mut doors: Query<(&Door, &mut PowerConsumer), Added<Door>>) {
    for (door, mut consumer) in doors.iter_mut() {
        if consumer.active != door.is_closed() {
            consumer.active = door.is_closed();
        }
    }
}

/// Система: DoorToggleRequested → toggle
pub fn handle_door_requests(
    mut requests: EventReader<DoorToggleRequested>,
    mut doors: Query<(&mut Door, Option<&mut PowerConsumer>)>,
) {
    for request in requests.read() {
        let Ok((mut door, consumer)) = doors.get_mut(request.door) else {
            crate::log_warning(&format!("🚪 Door toggle for {:?}: entity has no Door", request.door));
            continue;
        };

        toggle_door(request.door, &mut door, consumer);
    }
}

/// Система: шаг всех движущихся дверей
pub fn advance_doors(
    mut doors: Query<(Entity, &mut Door, &mut Transform, Option<&mut PowerConsumer>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut door, mut transform, consumer) in doors.iter_mut() {
        if !door.is_moving() {
            continue;
        }

        let Some((position, finished)) = door.advance(delta) else {
            continue;
        };
        transform.translation = position;

        if finished && door.is_closed() {
            if let Some(mut consumer) = consumer {
                consumer.active = true;
            }
            crate::log(&format!("🚪 Door {:?}: closed", entity));
        }
    }
}

/// Система: закрытая дверь без питания открывается (fail-open)
pub fn doors_fail_open(
    mut starved: EventReader<PowerStarved>,
    mut doors: Query<(&mut Door, Option<&mut PowerConsumer>)>,
) {
    for event in starved.read() {
        let Ok((mut door, consumer)) = doors.get_mut(event.entity) else {
            continue;
        };

        if !door.is_closed() {
            continue;
        }

        if door.fail_open_on_outage {
            crate::log_warning(&format!("🚪 Door '{}': no grid power, failing open", event.id));
            toggle_door(event.entity, &mut door, consumer);
        } else {
            crate::log_warning(&format!("🚪 Door '{}': no grid power, held closed", event.id));
        }
    }
}
