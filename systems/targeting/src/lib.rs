#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic enemy and turret targets from world snapshots.
//!
//! Enemies re-evaluate their target every [`TARGET_REFRESH_TICKS`] fixed steps
//! (and once right after spawning), choosing the nearest of the player and the
//! live turrets. Turrets re-evaluate every [`TURRET_RETARGET_INTERVAL`],
//! choosing the nearest enemy within [`TURRET_RANGE`]. Candidates are
//! enumerated in identifier order and only a strictly closer candidate
//! replaces the current best, so ties resolve to the first candidate found.

use std::time::Duration;

use arena_survival_core::{
    horizontal_distance, Command, EnemyId, EnemySnapshot, EnemyView, Event, PlayerSnapshot,
    TargetRef, TurretSnapshot, TurretView, TARGET_REFRESH_TICKS, TURRET_RANGE,
    TURRET_RETARGET_INTERVAL,
};

/// Targeting system tracking the cadence of enemy and turret re-evaluation.
#[derive(Debug, Default)]
pub struct Targeting {
    since_turret_retarget: Duration,
    spawned: Vec<EnemyId>,
}

impl Targeting {
    /// Creates a targeting system with a fresh cadence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits target assignment commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        turrets: &TurretView,
        out: &mut Vec<Command>,
    ) {
        let mut refresh_enemies = false;
        let mut refresh_turrets = false;
        self.spawned.clear();

        for event in events {
            match event {
                Event::GameReset => self.since_turret_retarget = Duration::ZERO,
                Event::TimeAdvanced { dt, tick } => {
                    if tick % TARGET_REFRESH_TICKS == 0 {
                        refresh_enemies = true;
                    }
                    self.since_turret_retarget += *dt;
                    if self.since_turret_retarget >= TURRET_RETARGET_INTERVAL {
                        self.since_turret_retarget = Duration::ZERO;
                        refresh_turrets = true;
                    }
                }
                Event::EnemySpawned { enemy, .. } => self.spawned.push(*enemy),
                Event::TurretDeployed { .. } => refresh_turrets = true,
                _ => {}
            }
        }

        if refresh_enemies {
            for enemy in enemies.iter() {
                assign_enemy_target(enemy, player, turrets, out);
            }
        } else {
            for enemy in self.spawned.iter().filter_map(|id| enemies.get(*id)) {
                assign_enemy_target(enemy, player, turrets, out);
            }
        }

        if refresh_turrets {
            for turret in turrets.iter() {
                let target = nearest_enemy(turret, enemies);
                if target != turret.target {
                    out.push(Command::SetTurretTarget {
                        turret: turret.id,
                        target,
                    });
                }
            }
        }
    }
}

/// Selects the nearest of the player and the live turrets for `enemy`.
#[must_use]
pub fn nearest_enemy_target(
    enemy: &EnemySnapshot,
    player: &PlayerSnapshot,
    turrets: &TurretView,
) -> TargetRef {
    let mut best = TargetRef::Player;
    let mut best_distance = horizontal_distance(enemy.position, player.position);
    for turret in turrets.iter() {
        let distance = horizontal_distance(enemy.position, turret.position);
        if distance < best_distance {
            best = TargetRef::Turret(turret.id);
            best_distance = distance;
        }
    }
    best
}

/// Selects the nearest enemy within turret range, if any.
#[must_use]
pub fn nearest_enemy(turret: &TurretSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
    let mut best: Option<(EnemyId, f32)> = None;
    for enemy in enemies.iter() {
        let distance = horizontal_distance(turret.position, enemy.position);
        if distance > TURRET_RANGE {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((enemy.id, distance)),
        }
    }
    best.map(|(enemy, _)| enemy)
}

fn assign_enemy_target(
    enemy: &EnemySnapshot,
    player: &PlayerSnapshot,
    turrets: &TurretView,
    out: &mut Vec<Command>,
) {
    if !enemy.state.is_active() {
        return;
    }
    let target = nearest_enemy_target(enemy, player, turrets);
    if target != enemy.target {
        out.push(Command::SetEnemyTarget {
            enemy: enemy.id,
            target,
        });
    }
}
