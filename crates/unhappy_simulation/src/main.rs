//! Headless симуляция Unhappy Company
//!
//! Игрок стоит у двери, два врага патрулируют, сеть питает дверь и CCTV.
//! Первый аргумент — опциональный путь к JSON конфигу.

use bevy::prelude::*;
use unhappy_simulation::devices::{CctvCamera, Door, Flashlight, SetCctvPower, ToggleFlashlight};
use unhappy_simulation::power::{Mounted, PowerConsumer, Rechargeable};
use unhappy_simulation::*;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let seed = config.seed;
    println!("Starting Unhappy Company headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let agent_config = config.agent.clone();
    app.add_plugins((SimulationPlugin::with_config(config), HeadlessNavigationPlugin));

    let world = app.world_mut();
    let player = world.spawn((Player, Transform::from_xyz(0.0, 0.0, 0.0))).id();

    for position in [Vec3::new(25.0, 0.0, 0.0), Vec3::new(-20.0, 0.0, 12.0)] {
        world.spawn((
            Enemy,
            Transform::from_translation(position),
            agent_config.clone(),
            ai::TrackedTarget(Some(player)),
        ));
    }

    world.spawn((
        Door::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 3.0, 0.0)).starting_closed(),
        Transform::from_xyz(2.0, 0.0, 0.0),
        PowerConsumer::new("door_main", 2.0),
    ));
    let camera = world
        .spawn((CctvCamera::default(), PowerConsumer::new("cctv_hall", 1.5)))
        .id();
    let flashlight = world
        .spawn((Flashlight::default(), Rechargeable::new("flashlight", 100.0, 5.0).with_charge(20.0)))
        .id();

    world.send_event(SetCctvPower { camera, on: true });
    world.send_event(ToggleFlashlight { entity: flashlight });

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        step_fixed_ticks(&mut app, 1);

        if tick == 600 {
            // Фонарик в зарядку
            app.world_mut().entity_mut(flashlight).insert(Mounted);
        }

        if tick % 100 == 0 {
            let world = app.world_mut();
            let grid = world.resource::<CentralBattery>();
            println!(
                "Tick {}: grid {:.1}/{:.1}, {} consumers",
                tick,
                grid.current_power(),
                grid.max_power(),
                grid.consumers().len()
            );

            let mut enemies = world.query_filtered::<(Entity, &StateMachine), With<Enemy>>();
            for (entity, machine) in enemies.iter(world) {
                println!("  {:?}: {:?}", entity, machine.current());
            }
        }
    }

    println!("Simulation complete!");
}
