//! TimedTransition — resumable step function вместо корутины
//!
//! `(progress, start, end, rate)` + busy флаг. Каждый тик `step(dt)` двигает
//! progress на `dt * rate` и отдаёт управление. Пока busy — новый `start`
//! отклоняется (не перезапуск, не очередь). Внешней отмены нет.

use bevy::prelude::*;

/// Результат одного шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub value: Vec3,
    /// true на том шаге, где progress дошёл до 1
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct TimedTransition {
    progress: f32,
    start: Vec3,
    end: Vec3,
    /// Единиц нормализованного progress в секунду
    rate: f32,
    busy: bool,
}

impl TimedTransition {
    pub fn new(rate: f32) -> Self {
        Self {
            progress: 0.0,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            rate: rate.max(0.0),
            busy: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// false если переход уже идёт (запрос игнорируется)
    pub fn start(&mut self, from: Vec3, to: Vec3) -> bool {
        if self.busy {
            return false;
        }

        self.start = from;
        self.end = to;
        self.progress = 0.0;
        self.busy = true;
        true
    }

    /// None если перехода нет
    pub fn step(&mut self, delta: f32) -> Option<TransitionStep> {
        if !self.busy {
            return None;
        }

        // rate == 0 — мгновенный переход, иначе зависли бы навсегда
        self.progress = if self.rate > 0.0 {
            (self.progress + delta.max(0.0) * self.rate).min(1.0)
        } else {
            1.0
        };

        let finished = self.progress >= 1.0;
        if finished {
            self.busy = false;
        }

        Some(TransitionStep {
            value: self.start.lerp(self.end, self.progress),
            finished,
        })
    }
}
