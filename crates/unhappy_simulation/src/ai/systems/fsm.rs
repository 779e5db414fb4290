//! FSM system: тик всех StateMachine

use bevy::prelude::*;

use crate::ai::components::{AIConfig, Enemy, NavAgent, TrackedTarget};
use crate::ai::events::{AIStateChanged, AttackPerformed};
use crate::ai::sampling::PatrolSampler;
use crate::ai::state_machine::StateMachine;
use crate::ai::states::{AgentContext, AgentOutbox, TargetInfo};
use crate::clock::GameClock;

/// Система: AI FSM tick
///
/// Агенты обрабатываются по возрастанию Entity index: Execute агента
/// (вместе с переходом) полностью завершается до следующего агента.
/// Цели — только не-Enemy entities (Player), их Transform пишет движок.
pub fn run_state_machines(
    mut agents: Query<
        (
            Entity,
            &mut Transform,
            &mut StateMachine,
            &AIConfig,
            &mut NavAgent,
            &TrackedTarget,
        ),
        With<Enemy>,
    >,
    targets: Query<&Transform, Without<Enemy>>,
    mut sampler: ResMut<PatrolSampler>,
    clock: Res<GameClock>,
    time: Res<Time<Fixed>>,
    mut state_events: EventWriter<AIStateChanged>,
    mut attack_events: EventWriter<AttackPerformed>,
) {
    let delta = time.delta_secs();
    let now = clock.elapsed_secs();
    let time_of_day = clock.time_of_day();

    let mut order: Vec<Entity> = agents.iter().map(|(entity, ..)| entity).collect();
    order.sort_by_key(|entity| entity.index());

    let mut outbox = AgentOutbox::default();

    for entity in order {
        let Ok((entity, mut transform, mut machine, config, mut nav, tracked)) = agents.get_mut(entity) else {
            continue;
        };

        let target = tracked.0.and_then(|target_entity| {
            targets.get(target_entity).ok().map(|target_transform| TargetInfo {
                entity: target_entity,
                position: target_transform.translation,
            })
        });

        let position = transform.translation;
        let mut ctx = AgentContext {
            entity,
            position,
            rotation: &mut transform.rotation,
            target,
            now,
            delta,
            time_of_day,
            config,
            locomotion: &mut *nav,
            sampler: sampler.sampler_mut(),
            outbox: &mut outbox,
        };

        machine.tick(&mut ctx);
    }

    for transition in outbox.transitions {
        state_events.write(transition);
    }
    for attack in outbox.attacks {
        crate::log(&format!("⚔️ AI: {:?} attacks {:?}", attack.attacker, attack.target));
        attack_events.write(attack);
    }
}
