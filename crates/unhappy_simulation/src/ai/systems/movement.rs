//! Headless навигация (замена NavMeshAgent без движка)

use bevy::prelude::*;

use crate::ai::components::NavAgent;
use crate::components::MovementSpeed;

/// Система: двигаем агентов к NavAgent::destination по прямой
///
/// Заполняет remaining_distance и сбрасывает path_pending — то,
/// что в движке делает NavMeshAgent после расчёта пути.
pub fn headless_navigation(
    mut agents: Query<(&mut Transform, &mut NavAgent, &MovementSpeed)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav, speed) in agents.iter_mut() {
        nav.path_pending = false;

        let Some(destination) = nav.destination else {
            nav.remaining_distance = 0.0;
            continue;
        };

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();
        let step = speed.speed * delta;

        if distance <= step {
            transform.translation = destination;
            nav.remaining_distance = 0.0;
        } else {
            transform.translation += to_destination / distance * step;
            nav.remaining_distance = distance - step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn run_once(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_millis(500));
        app.world_mut().run_system_once(headless_navigation).unwrap();
    }

    #[test]
    fn test_moves_toward_destination_and_arrives() {
        let mut app = App::new();
        app.insert_resource(Time::<Fixed>::default());

        let agent = app
            .world_mut()
            .spawn((
                Transform::default(),
                NavAgent {
                    destination: Some(Vec3::new(3.0, 0.0, 0.0)),
                    path_pending: true,
                    ..default()
                },
                MovementSpeed { speed: 4.0 },
            ))
            .id();

        // 0.5s × 4 m/s = 2m
        run_once(&mut app);
        let nav = app.world().get::<NavAgent>(agent).unwrap();
        assert!(!nav.path_pending);
        assert!((nav.remaining_distance - 1.0).abs() < 1e-4);

        run_once(&mut app);
        let transform = app.world().get::<Transform>(agent).unwrap();
        assert_eq!(transform.translation, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(app.world().get::<NavAgent>(agent).unwrap().remaining_distance, 0.0);
    }
}
