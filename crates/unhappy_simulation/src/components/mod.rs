//! ECS Components общие для всех доменов
//!
//! Организация по доменам:
//! - actor: маркеры участников (Player — цель для AI)
//! - movement: скорость перемещения (headless навигация)
//!
//! AI, power grid и devices держат свои компоненты в своих модулях.

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
