//! Scripted player used by headless sessions.

use arena_survival_core::{
    flatten, horizontal_distance, Command, EnemySnapshot, GamePhase, InventorySnapshot,
    PlayerSnapshot, PowerUpSnapshot, FIXED_STEP,
};
use arena_survival_world::{query, World};
use glam::Vec3;

/// Distance from the origin the autopilot is allowed to wander.
const HOME_RADIUS: f32 = 12.0;
/// Enemies closer than this make the autopilot back away.
const DANGER_RADIUS: f32 = 6.0;
/// Power-ups closer than this are collected when no enemy is in danger range.
const PICKUP_RADIUS: f32 = 10.0;
/// Enemies closer than this trigger a stored bomb.
const BOMB_TRIGGER_RADIUS: f32 = 5.0;
/// Number of enemies in danger range that triggers a stored time-stop.
const TIME_STOP_CROWD: usize = 3;

/// Stateless policy that turns world snapshots into player commands.
#[derive(Debug, Default)]
pub(crate) struct Autopilot;

impl Autopilot {
    /// Emits the commands for the coming fixed step.
    pub(crate) fn plan(&self, world: &World, out: &mut Vec<Command>) {
        if query::phase(world) != GamePhase::Playing {
            return;
        }

        let player = query::player(world);
        let enemies = query::enemy_view(world).into_vec();
        let inventory = query::inventory(world);
        let power_ups = query::power_ups(world);

        let nearest = nearest_enemy(&player, &enemies);
        let position = next_position(&player, nearest, &power_ups);
        let facing = nearest.map_or(player.facing, |enemy| enemy.position - position);

        out.push(Command::SetPlayerPose { position, facing });
        if nearest.is_some() {
            out.push(Command::FirePlayerWeapon);
        }
        spend_abilities(&player, &enemies, &inventory, out);
    }
}

fn nearest_enemy<'a>(
    player: &PlayerSnapshot,
    enemies: &'a [EnemySnapshot],
) -> Option<&'a EnemySnapshot> {
    enemies.iter().min_by(|a, b| {
        horizontal_distance(a.position, player.position)
            .total_cmp(&horizontal_distance(b.position, player.position))
    })
}

fn next_position(
    player: &PlayerSnapshot,
    nearest: Option<&EnemySnapshot>,
    power_ups: &[PowerUpSnapshot],
) -> Vec3 {
    let threat = nearest
        .filter(|enemy| horizontal_distance(enemy.position, player.position) < DANGER_RADIUS);

    let heading = if let Some(enemy) = threat {
        flatten(player.position - enemy.position)
    } else if let Some(drop) = power_ups
        .iter()
        .find(|drop| horizontal_distance(drop.position, player.position) < PICKUP_RADIUS)
    {
        flatten(drop.position - player.position)
    } else if flatten(player.position).length() > HOME_RADIUS {
        -flatten(player.position)
    } else {
        Vec3::ZERO
    };

    let step = player.move_speed * FIXED_STEP.as_secs_f32();
    let next = player.position + heading.normalize_or_zero() * step;
    let clamped = flatten(next).clamp_length_max(HOME_RADIUS * 2.0);
    Vec3::new(clamped.x, player.position.y, clamped.z)
}

fn spend_abilities(
    player: &PlayerSnapshot,
    enemies: &[EnemySnapshot],
    inventory: &InventorySnapshot,
    out: &mut Vec<Command>,
) {
    if inventory.turrets > 0 {
        out.push(Command::DeployTurret);
    }

    let close = |radius: f32| {
        enemies
            .iter()
            .filter(|enemy| horizontal_distance(enemy.position, player.position) < radius)
            .count()
    };
    let boss_near = enemies.iter().any(|enemy| {
        enemy.is_boss() && horizontal_distance(enemy.position, player.position) < DANGER_RADIUS * 2.0
    });

    if inventory.bombs > 0 && (close(BOMB_TRIGGER_RADIUS) > 0 || boss_near) {
        out.push(Command::ActivateBomb);
    } else if inventory.time_stops > 0 && close(DANGER_RADIUS) >= TIME_STOP_CROWD {
        out.push(Command::ActivateTimeStop);
    }
}
