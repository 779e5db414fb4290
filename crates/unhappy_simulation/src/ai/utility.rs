//! Utility Calculator — оценка желательности состояний
//!
//! Чистые функции (state, time-of-day) → [0, 1] поверх tuning data.
//! FSM переходы по-прежнему пороговые: scores пишутся в `UtilityScores`
//! и используются только как tie-break через `preferred`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::components::{Enemy, StateKind, UtilityScores};
use crate::clock::{GameClock, PeriodTable, TimeOfDay};

/// Tuning data для utility (секция `utility` в SimulationConfig)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityTuning {
    pub patrol: PeriodTable<f32>,
    pub chase: PeriodTable<f32>,
    pub attack: f32,
}

impl Default for UtilityTuning {
    fn default() -> Self {
        Self {
            patrol: PeriodTable {
                morning: 0.6,
                afternoon: 0.4,
                evening: 0.3,
                night: 0.2,
            },
            chase: PeriodTable {
                morning: 0.8,
                afternoon: 0.6,
                evening: 0.7,
                night: 0.85,
            },
            attack: 0.9,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct UtilityCalculator {
    tuning: UtilityTuning,
}

impl UtilityCalculator {
    pub fn new(tuning: UtilityTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &UtilityTuning {
        &self.tuning
    }

    pub fn patrol_utility(&self, time_of_day: TimeOfDay) -> f32 {
        self.tuning.patrol.get(time_of_day).clamp(0.0, 1.0)
    }

    pub fn chase_utility(&self, time_of_day: TimeOfDay) -> f32 {
        self.tuning.chase.get(time_of_day).clamp(0.0, 1.0)
    }

    pub fn attack_utility(&self) -> f32 {
        self.tuning.attack.clamp(0.0, 1.0)
    }

    pub fn score(&self, kind: StateKind, time_of_day: TimeOfDay) -> f32 {
        match kind {
            StateKind::Patrol => self.patrol_utility(time_of_day),
            StateKind::Chase => self.chase_utility(time_of_day),
            StateKind::Attack => self.attack_utility(),
        }
    }

    pub fn scores(&self, time_of_day: TimeOfDay) -> UtilityScores {
        UtilityScores {
            patrol: self.patrol_utility(time_of_day),
            chase: self.chase_utility(time_of_day),
            attack: self.attack_utility(),
        }
    }

    /// Лучший из кандидатов; при равенстве — первый в списке
    pub fn preferred(&self, candidates: &[StateKind], time_of_day: TimeOfDay) -> Option<StateKind> {
        let mut best: Option<(StateKind, f32)> = None;
        for &kind in candidates {
            let score = self.score(kind, time_of_day);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((kind, score)),
            }
        }
        best.map(|(kind, _)| kind)
    }
}

/// Система: пересчитать UtilityScores всех врагов под текущий период суток
pub fn update_utility_scores(
    calculator: Res<UtilityCalculator>,
    clock: Res<GameClock>,
    mut query: Query<&mut UtilityScores, With<Enemy>>,
) {
    let scores = calculator.scores(clock.time_of_day());

    for mut current in query.iter_mut() {
        // set_if_neq — не спамим Changed<UtilityScores>
        current.set_if_neq(scores);
    }
}
