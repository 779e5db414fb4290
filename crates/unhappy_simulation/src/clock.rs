//! Игровые часы: TimeOfDay + elapsed time
//!
//! AI читает период суток (utility weights, attack cooldown scale).
//! Сутки делятся на 4 равных периода начиная с `start_period`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Период суток
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    fn index(self) -> usize {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
            TimeOfDay::Night => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Одно значение на каждый период суток (tuning data)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct PeriodTable<T> {
    pub morning: T,
    pub afternoon: T,
    pub evening: T,
    pub night: T,
}

impl<T: Copy> PeriodTable<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            morning: value,
            afternoon: value,
            evening: value,
            night: value,
        }
    }

    pub fn get(&self, period: TimeOfDay) -> T {
        match period {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
        }
    }
}

/// Конфиг часов (секция `clock` в SimulationConfig)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Длина игровых суток (секунды реального времени)
    pub day_length_secs: f32,
    pub start_period: TimeOfDay,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_length_secs: 600.0, // 10 минут на сутки
            start_period: TimeOfDay::Morning,
        }
    }
}

/// Clock service (read-only для AI)
#[derive(Resource, Debug, Clone)]
pub struct GameClock {
    /// f64: f32 на 1/60 шагах перестаёт двигаться через ~145 часов
    elapsed_secs: f64,
    day_length_secs: f64,
    start_period: TimeOfDay,
    /// Host может зафиксировать период (cutscene, debug) — авто-цикл отключается
    fixed_period: Option<TimeOfDay>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

impl GameClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            elapsed_secs: 0.0,
            day_length_secs: f64::from(config.day_length_secs.max(f32::EPSILON)),
            start_period: config.start_period,
            fixed_period: None,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn advance(&mut self, delta: f64) {
        self.elapsed_secs += delta.max(0.0);
    }

    pub fn set_fixed_period(&mut self, period: Option<TimeOfDay>) {
        self.fixed_period = period;
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        if let Some(period) = self.fixed_period {
            return period;
        }

        let period_length = self.day_length_secs / TimeOfDay::ALL.len() as f64;
        let day_time = self.elapsed_secs.rem_euclid(self.day_length_secs);
        let offset = (day_time / period_length).floor() as usize;
        TimeOfDay::from_index(self.start_period.index() + offset)
    }
}

/// Система: двигаем игровые часы фиксированным шагом
pub fn advance_game_clock(mut clock: ResMut<GameClock>, time: Res<Time<Fixed>>) {
    clock.advance(time.delta_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_cycle_through_day() {
        let mut clock = GameClock::new(&ClockConfig {
            day_length_secs: 40.0,
            start_period: TimeOfDay::Morning,
        });

        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);
        clock.advance(10.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Afternoon);
        clock.advance(10.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Evening);
        clock.advance(10.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Night);
        clock.advance(10.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning); // новые сутки
    }

    #[test]
    fn test_start_period_offset() {
        let mut clock = GameClock::new(&ClockConfig {
            day_length_secs: 40.0,
            start_period: TimeOfDay::Night,
        });

        assert_eq!(clock.time_of_day(), TimeOfDay::Night);
        clock.advance(12.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn test_fixed_period_overrides_cycle() {
        let mut clock = GameClock::default();
        clock.set_fixed_period(Some(TimeOfDay::Afternoon));
        clock.advance(10_000.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Afternoon);

        clock.set_fixed_period(None);
        assert_ne!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_clock_keeps_ticking_after_long_session() {
        let step = 1.0 / 60.0;

        for offset in [300_000.0, 524_288.0] {
            let mut clock = GameClock::default();
            clock.advance(offset);

            for _ in 0..600 {
                clock.advance(step);
            }
            let advanced = clock.elapsed_secs() - offset;
            assert!((advanced - 10.0).abs() < 1e-6, "offset {}: advanced {}", offset, advanced);
        }
    }

    #[test]
    fn test_periods_still_cycle_late_in_session() {
        let mut clock = GameClock::new(&ClockConfig {
            day_length_secs: 40.0,
            start_period: TimeOfDay::Morning,
        });
        // 20 000 суток
        clock.advance(800_000.0);
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);

        // ~11.7s — второй период (по 10s)
        for _ in 0..700 {
            clock.advance(1.0 / 60.0);
        }
        assert_eq!(clock.time_of_day(), TimeOfDay::Afternoon);
    }

    #[test]
    fn test_period_table_is_total() {
        let table = PeriodTable {
            morning: 1,
            afternoon: 2,
            evening: 3,
            night: 4,
        };
        let values: Vec<_> = TimeOfDay::ALL.iter().map(|p| table.get(*p)).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
        assert_eq!(PeriodTable::uniform(7).get(TimeOfDay::Night), 7);
    }
}
