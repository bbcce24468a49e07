#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy behaviour system that steers agents and schedules bursts.

use arena_survival_core::{
    flatten, horizontal_distance, Command, EnemySnapshot, EnemyView, Event, PlayerSnapshot,
    TargetRef, TurretView,
};
use glam::Vec3;

/// Pure system that reacts to time advancement and emits steering commands.
#[derive(Debug, Default)]
pub struct EnemyBehavior;

impl EnemyBehavior {
    /// Creates the behaviour system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable views to emit steering and fire commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        turrets: &TurretView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies.iter() {
            if !enemy.state.is_active() {
                continue;
            }
            let target = target_position(enemy, player, turrets);
            plan_enemy(enemy, target, out);
        }
    }
}

/// Resolves the position an enemy pursues, falling back to the player when
/// its turret target no longer exists.
#[must_use]
pub fn target_position(enemy: &EnemySnapshot, player: &PlayerSnapshot, turrets: &TurretView) -> Vec3 {
    match enemy.target {
        TargetRef::Player => player.position,
        TargetRef::Turret(turret) => turrets
            .get(turret)
            .map_or(player.position, |snapshot| snapshot.position),
    }
}

fn plan_enemy(enemy: &EnemySnapshot, target: Vec3, out: &mut Vec<Command>) {
    let toward = flatten(target - enemy.position).normalize_or_zero();
    let facing = if toward == Vec3::ZERO {
        enemy.facing
    } else {
        toward
    };

    let velocity = if enemy.archetype.is_ranged() {
        let distance = horizontal_distance(enemy.position, target);
        if distance > enemy.attack_range {
            toward * enemy.move_speed
        } else if distance < enemy.retreat_range {
            -toward * enemy.move_speed
        } else {
            Vec3::ZERO
        }
    } else {
        toward * enemy.move_speed
    };

    out.push(Command::SteerEnemy {
        enemy: enemy.id,
        velocity,
        facing,
    });

    if enemy.archetype.is_ranged() && enemy.fire_ready {
        out.push(Command::FireEnemyBurst { enemy: enemy.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_survival_core::{AgentState, Archetype, EnemyId, Tint, TurretId, TurretSnapshot};
    use std::time::Duration;

    fn snapshot(archetype: Archetype, position: Vec3) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            archetype,
            position,
            facing: Vec3::Z,
            move_speed: 3.0,
            attack_range: 12.0,
            retreat_range: 7.0,
            health: 2,
            max_health: 2,
            state: AgentState::Idle,
            target: TargetRef::Player,
            fire_ready: false,
            tint: Tint::WHITE,
            model_scale: 1.0,
        }
    }

    fn player() -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec3::ZERO,
            facing: Vec3::Z,
            move_speed: 8.0,
            health: 3,
            invulnerable: false,
            visible: true,
            shield_blinking: false,
            fire_ready: true,
        }
    }

    fn run(enemy: EnemySnapshot, turrets: TurretView) -> Vec<Command> {
        let enemies = EnemyView::from_snapshots(vec![enemy]);
        let mut out = Vec::new();
        EnemyBehavior::new().handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(20),
                tick: 1,
            }],
            &player(),
            &enemies,
            &turrets,
            &mut out,
        );
        out
    }

    fn steering(commands: &[Command]) -> (Vec3, Vec3) {
        commands
            .iter()
            .find_map(|command| match command {
                Command::SteerEnemy {
                    velocity, facing, ..
                } => Some((*velocity, *facing)),
                _ => None,
            })
            .expect("steering command")
    }

    #[test]
    fn melee_enemies_chase_horizontally() {
        let commands = run(
            snapshot(Archetype::Normal, Vec3::new(10.0, 4.0, 0.0)),
            TurretView::default(),
        );
        let (velocity, facing) = steering(&commands);
        assert_eq!(velocity, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(facing, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn shooters_hold_a_distance_band() {
        let far = run(
            snapshot(Archetype::Shooter, Vec3::new(20.0, 0.0, 0.0)),
            TurretView::default(),
        );
        assert_eq!(steering(&far).0, Vec3::new(-3.0, 0.0, 0.0));

        let near = run(
            snapshot(Archetype::Shooter, Vec3::new(5.0, 0.0, 0.0)),
            TurretView::default(),
        );
        assert_eq!(steering(&near).0, Vec3::new(3.0, 0.0, 0.0));

        let held = run(
            snapshot(Archetype::Shooter, Vec3::new(9.0, 0.0, 0.0)),
            TurretView::default(),
        );
        let (velocity, facing) = steering(&held);
        assert_eq!(velocity, Vec3::ZERO);
        assert_eq!(facing, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn ready_shooters_fire_a_burst() {
        let mut shooter = snapshot(Archetype::Shooter, Vec3::new(9.0, 0.0, 0.0));
        shooter.fire_ready = true;
        let commands = run(shooter, TurretView::default());
        assert!(commands.contains(&Command::FireEnemyBurst {
            enemy: EnemyId::new(0)
        }));

        let mut brute = snapshot(Archetype::Boss, Vec3::new(9.0, 0.0, 0.0));
        brute.fire_ready = true;
        let commands = run(brute, TurretView::default());
        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::FireEnemyBurst { .. })));
    }

    #[test]
    fn missing_turret_target_falls_back_to_player() {
        let mut chaser = snapshot(Archetype::Normal, Vec3::new(0.0, 0.0, 10.0));
        chaser.target = TargetRef::Turret(TurretId::new(9));
        assert_eq!(
            target_position(&chaser, &player(), &TurretView::default()),
            Vec3::ZERO
        );

        let turrets = TurretView::from_snapshots(vec![TurretSnapshot {
            id: TurretId::new(9),
            position: Vec3::new(0.0, 0.0, 20.0),
            health: 50,
            max_health: 50,
            target: None,
            fire_ready: true,
            tint: Tint::WHITE,
        }]);
        let (velocity, _) = steering(&run(chaser, turrets));
        assert_eq!(velocity, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn inactive_enemies_are_left_alone() {
        let mut frozen = snapshot(Archetype::Normal, Vec3::new(10.0, 0.0, 0.0));
        frozen.state = AgentState::Frozen;
        assert!(run(frozen, TurretView::default()).is_empty());
    }
}
