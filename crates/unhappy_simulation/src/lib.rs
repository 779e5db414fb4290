//! Unhappy Company Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer), движок — внешний tactical layer.
//!
//! Две подсистемы тикают в FixedUpdate:
//! - AI Decision Core: Patrol → Chase → Attack FSM + utility scores
//! - Central Power Grid: общий резервуар, consumers (двери, CCTV), rechargeables (фонарики)
//!
//! Движок пишет сенсорные данные (Transform игрока, NavAgent remaining_distance)
//! и читает intents (NavAgent::destination, AttackPerformed, Door Transform).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod clock;
pub mod components;
pub mod config;
pub mod devices;
pub mod logger;
pub mod power;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, Enemy, HeadlessNavigationPlugin, StateKind, StateMachine};
pub use clock::{GameClock, TimeOfDay};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use devices::DevicesPlugin;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed, LogLevel,
    LogPrinter,
};
pub use power::{CentralBattery, PowerGridPlugin};

/// Фазы fixed тика (порядок задаёт SimulationPlugin)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Игровые часы
    Clock,
    /// Headless навигация (в движке — NavMeshAgent)
    Locomotion,
    /// FSM врагов
    Ai,
    /// Input-реакции устройств и их переходы
    Devices,
    /// Регистрация + drain/recharge
    Power,
    /// Реакции consumers на голодание
    PowerReactions,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        // Seed сэмплера берём из DeterministicRng (если headless app его уже вставил)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }
        let sampler_seed = app.world_mut().resource_mut::<DeterministicRng>().rng.gen::<u64>();

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .insert_resource(clock::GameClock::new(&config.clock))
            .insert_resource(ai::UtilityCalculator::new(config.utility.clone()))
            .insert_resource(ai::PatrolSampler::disc(sampler_seed))
            .insert_resource(power::CentralBattery::from_config(&config.grid))
            .insert_resource(power::GridTimer::from_config(&config.grid))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Clock,
                    SimulationSet::Locomotion,
                    SimulationSet::Ai,
                    SimulationSet::Devices,
                    SimulationSet::Power,
                    SimulationSet::PowerReactions,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, clock::advance_game_clock.in_set(SimulationSet::Clock))
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, PowerGridPlugin, DevicesPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` двигает часы ровно на один fixed шаг,
/// так что прогон не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(60.0);
    let timestep = fixed.timestep();

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(fixed) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep));

    app
}

/// Прогнать ровно `ticks` fixed тиков
///
/// Первый `update()` только инициализирует Time<Real> (нулевая delta),
/// поэтому при первом вызове делаем лишний прогрев.
pub fn step_fixed_ticks(app: &mut App, ticks: usize) {
    if app.world().resource::<Time<Real>>().first_update().is_none() {
        app.update();
    }

    for _ in 0..ticks {
        app.update();
    }
}

/// Snapshot компонента для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
