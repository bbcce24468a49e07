#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the arena survival engine.
//!
//! The world owns every mutable piece of a game: the round counters, the
//! player's vitals and inventory, live enemies, turrets, projectiles and
//! power-ups, and the timers that replace engine coroutines. It changes only
//! through [`apply`] and reports every observable outcome as an [`Event`].

mod combat;
mod enemy;
mod inventory;
mod round;
mod scheduler;
mod turrets;

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use arena_survival_core::{
    bomb_radius, burst_size, flatten, horizontal_distance, truncate_player_name, Command, EnemyId,
    Event, GameConfig, GamePhase, PlacementError, PowerUpId, PowerUpKind, ProjectileId,
    ProjectileOwner, TargetRef, TurretId, WavePlan, BOMB_DURATION, BOSS_CONTACT_DAMAGE, CONTACT_DAMAGE,
    INTER_ROUND_DELAY, TIME_STOP_DURATION,
};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    combat::{PlayerHit, PlayerVitals, StructureHit},
    enemy::EnemyAgent,
    inventory::Inventory,
    round::{IntroStep, RoundState},
    scheduler::{Clock, Scheduler, TimerAction, TimerOwner},
    turrets::TurretRegistry,
};

const SPAWN_HALF_EXTENT: i32 = 40;
const SPAWN_MIN_DISTANCE: f32 = 15.0;
const BOSS_SPAWN_MIN_DISTANCE: f32 = 40.0;
const SPAWN_ATTEMPTS: u32 = 20;

const BOSS_SPAWN_DELAY: Duration = Duration::from_millis(1_500);
const SHOOTER_SPAWN_DELAY: Duration = Duration::from_millis(500);
const SPAWN_DELAY: Duration = Duration::from_secs(1);

const AMMO_DROP_ROUNDS: [u32; 2] = [7, 14];
const AMMO_DROP_HALF_EXTENT: i32 = 30;
const AMMO_DROP_MIN_DISTANCE: f32 = 10.0;

const INTRO_LEAD_IN: Duration = Duration::from_secs(3);
const INTRO_STEP: Duration = Duration::from_secs(1);

const PLAYER_BASE_SPEED: f32 = 8.0;
const SPEED_UPGRADE_STEP: f32 = 1.5;
const PLAYER_FIRE_INTERVAL: Duration = Duration::from_micros(234_375);
const MIN_PLAYER_FIRE_INTERVAL: Duration = Duration::from_millis(50);
const PLAYER_PROJECTILE_BASE_SPEED: f32 = 20.0;
const PLAYER_PROJECTILE_DAMAGE: u32 = 1;

const TURRET_PROJECTILE_SPEED: f32 = 40.0;
const TURRET_PROJECTILE_DAMAGE: u32 = 1;
const TURRET_CONTACT_DAMAGE: u32 = 1;
const TURRET_PLACEMENT_EXTENT: f32 = 45.0;
const TURRET_DEPLOY_OFFSET: f32 = 2.0;

const BURST_SPACING: Duration = Duration::from_millis(200);
const PROJECTILE_LIFETIME: Duration = Duration::from_secs(2);
const MUZZLE_OFFSET: f32 = 1.0;

const CONTACT_RADIUS: f32 = 1.2;
const PROJECTILE_HIT_RADIUS: f32 = 0.8;
const PICKUP_RADIUS: f32 = 1.5;
const POWER_UP_HEIGHT: f32 = 1.0;

/// Represents the authoritative arena survival world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    rng: ChaCha8Rng,
    games_started: u64,
    round: RoundState,
    player: Player,
    inventory: Inventory,
    enemies: BTreeMap<EnemyId, EnemyAgent>,
    next_enemy_id: u32,
    turrets: TurretRegistry,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: u32,
    power_ups: BTreeMap<PowerUpId, PowerUp>,
    next_power_up_id: u32,
    scheduler: Scheduler,
    real_time: Duration,
    game_time: Duration,
    tick_index: u64,
    time_stop_active: bool,
    bomb_started_at: Option<Duration>,
    contacts: BTreeSet<(EnemyId, TargetRef)>,
    boss_active: bool,
}

impl World {
    /// Creates a world sitting in the title menu.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let inventory = Inventory::new(config.caps);
        Self {
            config,
            rng,
            games_started: 0,
            round: RoundState::new(),
            player: Player::new(),
            inventory,
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            turrets: TurretRegistry::new(),
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            power_ups: BTreeMap::new(),
            next_power_up_id: 0,
            scheduler: Scheduler::new(),
            real_time: Duration::ZERO,
            game_time: Duration::ZERO,
            tick_index: 0,
            time_stop_active: false,
            bomb_started_at: None,
            contacts: BTreeSet::new(),
            boss_active: false,
        }
    }

    fn is_playing(&self) -> bool {
        self.round.phase == GamePhase::Playing
    }

    fn is_time_frozen(&self) -> bool {
        self.time_stop_active || self.bomb_started_at.is_some()
    }

    fn player_speed(&self) -> f32 {
        PLAYER_BASE_SPEED + self.inventory.speed_upgrades() as f32 * SPEED_UPGRADE_STEP
    }

    fn player_fire_interval(&self) -> Duration {
        if self.inventory.has_ammo_boost() {
            (PLAYER_FIRE_INTERVAL / 2).max(MIN_PLAYER_FIRE_INTERVAL)
        } else {
            PLAYER_FIRE_INTERVAL
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.round.reset();
        self.player = Player::new();
        self.inventory = Inventory::new(self.config.caps);
        self.enemies.clear();
        self.next_enemy_id = 0;
        self.turrets.clear();
        self.projectiles.clear();
        self.next_projectile_id = 0;
        self.power_ups.clear();
        self.next_power_up_id = 0;
        self.scheduler.clear();
        self.real_time = Duration::ZERO;
        self.game_time = Duration::ZERO;
        self.tick_index = 0;
        self.time_stop_active = false;
        self.bomb_started_at = None;
        self.contacts.clear();
        self.boss_active = false;
        out_events.push(Event::GameReset);
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        self.round.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn start_game(&mut self, out_events: &mut Vec<Event>) {
        if matches!(self.round.phase, GamePhase::Playing | GamePhase::Paused) {
            return;
        }
        self.reset(out_events);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(self.games_started));
        self.games_started = self.games_started.wrapping_add(1);
        self.set_phase(GamePhase::Playing, out_events);

        self.round.intro_active = true;
        let pre_delay = self.config.start_delay().saturating_sub(INTRO_LEAD_IN);
        self.scheduler.schedule(
            Clock::Game,
            self.game_time + pre_delay,
            TimerOwner::Round,
            TimerAction::IntroStep,
        );
        info!(game = self.games_started, "game started");
    }

    fn submit_score(&mut self, out_events: &mut Vec<Event>) {
        if self.round.score_submitted {
            return;
        }
        self.round.score_submitted = true;
        out_events.push(Event::ScoreSubmitted {
            name: truncate_player_name(&self.config.player_name),
            score: self.round.score,
        });
    }

    fn end_game(&mut self, out_events: &mut Vec<Event>) {
        if !matches!(self.round.phase, GamePhase::Playing | GamePhase::Paused) {
            return;
        }
        self.set_phase(GamePhase::GameOver, out_events);
        self.submit_score(out_events);
        info!(
            round = self.round.round,
            score = self.round.score,
            "game over"
        );
    }

    fn go_to_menu(&mut self, out_events: &mut Vec<Event>) {
        match self.round.phase {
            GamePhase::Menu => return,
            GamePhase::Playing | GamePhase::Paused => self.submit_score(out_events),
            GamePhase::GameOver => {}
        }
        self.reset(out_events);
        self.set_phase(GamePhase::Menu, out_events);
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.is_playing() {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            dt,
            tick: self.tick_index,
        });

        let game_dt = if self.is_time_frozen() {
            Duration::ZERO
        } else {
            dt
        };
        self.real_time = self.real_time.saturating_add(dt);
        self.game_time = self.game_time.saturating_add(game_dt);

        self.run_timers(out_events);
        self.integrate(dt, game_dt);
        self.cull_out_of_bounds(out_events);
        self.resolve_projectiles(out_events);
        if !self.is_playing() {
            return;
        }
        self.resolve_contacts(out_events);
        if !self.is_playing() {
            return;
        }
        self.collect_power_ups(out_events);
        self.sweep_bomb(out_events);
        self.check_round_clear(out_events);
    }

    fn run_timers(&mut self, out_events: &mut Vec<Event>) {
        while let Some(action) = self.scheduler.pop_due(Clock::Real, self.real_time) {
            self.run_timer(action, out_events);
        }
        while let Some(action) = self.scheduler.pop_due(Clock::Game, self.game_time) {
            self.run_timer(action, out_events);
        }
    }

    fn run_timer(&mut self, action: TimerAction, out_events: &mut Vec<Event>) {
        match action {
            TimerAction::IntroStep => self.intro_step(out_events),
            TimerAction::RequestWave => self.request_wave(out_events),
            TimerAction::SpawnNext => self.spawn_next(out_events),
            TimerAction::EnemyBurstShot(enemy) => self.fire_enemy_shot(enemy, out_events),
            TimerAction::TimeStopExpired => self.end_time_stop(out_events),
        }
    }

    fn intro_step(&mut self, out_events: &mut Vec<Event>) {
        match self.round.advance_countdown() {
            IntroStep::Show(value) => {
                out_events.push(Event::IntroCountdown { value });
                self.scheduler.schedule(
                    Clock::Game,
                    self.game_time + INTRO_STEP,
                    TimerOwner::Round,
                    TimerAction::IntroStep,
                );
            }
            IntroStep::Finished => {
                out_events.push(Event::IntroFinished);
                self.request_wave(out_events);
            }
        }
    }

    fn request_wave(&mut self, out_events: &mut Vec<Event>) {
        self.round.waiting_for_wave = false;
        self.round.awaiting_plan = true;
        let round = self.round.next_round();
        debug!(round, "wave requested");
        out_events.push(Event::WaveRequested { round });
    }

    fn begin_round(&mut self, round: u32, plan: WavePlan, out_events: &mut Vec<Event>) {
        if !matches!(self.round.phase, GamePhase::Playing | GamePhase::Paused) {
            return;
        }
        if !self.round.install_plan(round, plan) {
            debug!(round, "ignoring plan for a round that was not requested");
            return;
        }
        debug!(round, total = self.round.total_enemies, "round started");
        out_events.push(Event::RoundStarted {
            round,
            total_enemies: self.round.total_enemies,
        });
        if AMMO_DROP_ROUNDS.contains(&round) {
            self.drop_ammo(out_events);
        }
        self.spawn_next(out_events);
    }

    fn spawn_next(&mut self, out_events: &mut Vec<Event>) {
        let Some(profile) = self.round.pending_spawns.pop_front() else {
            return;
        };

        let min_distance = if profile.is_boss() {
            BOSS_SPAWN_MIN_DISTANCE
        } else {
            SPAWN_MIN_DISTANCE
        };
        let position = self.spawn_position(min_distance);
        let delay = if profile.is_boss() {
            BOSS_SPAWN_DELAY
        } else if profile.archetype.is_ranged() {
            SHOOTER_SPAWN_DELAY
        } else {
            SPAWN_DELAY
        };

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let archetype = profile.archetype;
        let mut agent = EnemyAgent::spawn(
            id,
            profile,
            self.round.round,
            position,
            self.player_speed(),
            self.game_time,
        );
        if self.time_stop_active {
            agent.freeze();
        }
        let _ = self.enemies.insert(id, agent);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            archetype,
            position,
        });
        self.refresh_boss_presence(out_events);

        if !self.round.pending_spawns.is_empty() {
            self.scheduler.schedule(
                Clock::Game,
                self.game_time + delay,
                TimerOwner::Round,
                TimerAction::SpawnNext,
            );
        }
    }

    fn spawn_position(&mut self, min_distance: f32) -> Vec3 {
        let player = self.player.position;
        let mut candidate = Vec3::ZERO;
        for _ in 0..SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
            let z = self.rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
            candidate = Vec3::new(x as f32, 0.0, z as f32);
            if horizontal_distance(candidate, player) > min_distance {
                break;
            }
        }
        candidate
    }

    fn drop_ammo(&mut self, out_events: &mut Vec<Event>) {
        let x = self.rng.gen_range(-AMMO_DROP_HALF_EXTENT..AMMO_DROP_HALF_EXTENT);
        let z = self.rng.gen_range(-AMMO_DROP_HALF_EXTENT..AMMO_DROP_HALF_EXTENT);
        let mut position = Vec3::new(x as f32, 0.0, z as f32);
        if horizontal_distance(position, self.player.position) < AMMO_DROP_MIN_DISTANCE {
            position.z += AMMO_DROP_MIN_DISTANCE;
        }
        self.spawn_power_up(PowerUpKind::Ammo, position, out_events);
    }

    fn integrate(&mut self, dt: Duration, game_dt: Duration) {
        for enemy in self.enemies.values_mut() {
            enemy.integrate(game_dt);
        }
        for projectile in self.projectiles.values_mut() {
            let step = match projectile.owner {
                ProjectileOwner::Enemy => game_dt,
                ProjectileOwner::Player | ProjectileOwner::Turret => dt,
            };
            projectile.position += projectile.direction * projectile.speed * step.as_secs_f32();
            projectile.age = projectile.age.saturating_add(step);
        }
        self.projectiles
            .retain(|_, projectile| projectile.age < PROJECTILE_LIFETIME);
    }

    fn cull_out_of_bounds(&mut self, out_events: &mut Vec<Event>) {
        let escaped: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|enemy| enemy.is_out_of_bounds())
            .map(|enemy| enemy.id)
            .collect();
        if escaped.is_empty() {
            return;
        }
        for enemy in escaped {
            if self.remove_enemy(enemy).is_some() {
                debug!(enemy = enemy.get(), "culled enemy outside the arena");
                out_events.push(Event::EnemyCulled { enemy });
            }
        }
        self.refresh_boss_presence(out_events);
    }

    fn resolve_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();
        for id in ids {
            let Some(projectile) = self.projectiles.get(&id) else {
                continue;
            };
            let (owner, position, damage) = (projectile.owner, projectile.position, projectile.damage);

            match owner {
                ProjectileOwner::Player | ProjectileOwner::Turret => {
                    let hit = self
                        .enemies
                        .values()
                        .find(|enemy| {
                            horizontal_distance(enemy.position, position) <= PROJECTILE_HIT_RADIUS
                        })
                        .map(|enemy| enemy.id);
                    if let Some(enemy) = hit {
                        let _ = self.projectiles.remove(&id);
                        self.damage_enemy(enemy, damage, out_events);
                    }
                }
                ProjectileOwner::Enemy => {
                    let touches_player = horizontal_distance(self.player.position, position)
                        <= PROJECTILE_HIT_RADIUS;
                    if touches_player && !self.player.vitals.is_invulnerable(self.real_time) {
                        let _ = self.projectiles.remove(&id);
                        self.hit_player(damage, out_events);
                        if !self.is_playing() {
                            return;
                        }
                        continue;
                    }
                    let hit = self
                        .turrets
                        .iter()
                        .find(|turret| {
                            horizontal_distance(turret.position, position) <= PROJECTILE_HIT_RADIUS
                        })
                        .map(|turret| turret.id);
                    if let Some(turret) = hit {
                        let _ = self.projectiles.remove(&id);
                        self.damage_turret(turret, damage, out_events);
                    }
                }
            }
        }
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let mut current = BTreeSet::new();
        for enemy in self.enemies.values() {
            if horizontal_distance(enemy.position, self.player.position) <= CONTACT_RADIUS {
                let _ = current.insert((enemy.id, TargetRef::Player));
            }
            for turret in self.turrets.iter() {
                if horizontal_distance(enemy.position, turret.position) <= CONTACT_RADIUS {
                    let _ = current.insert((enemy.id, TargetRef::Turret(turret.id)));
                }
            }
        }

        let entered: Vec<(EnemyId, TargetRef)> =
            current.difference(&self.contacts).copied().collect();
        self.contacts = current;

        for (enemy_id, target) in entered {
            let Some(enemy) = self.enemies.get_mut(&enemy_id) else {
                continue;
            };
            match target {
                TargetRef::Player => {
                    enemy.halt();
                    let damage = if enemy.is_boss() {
                        BOSS_CONTACT_DAMAGE
                    } else {
                        CONTACT_DAMAGE
                    };
                    self.hit_player(damage, out_events);
                    if !self.is_playing() {
                        return;
                    }
                }
                TargetRef::Turret(turret) => {
                    self.damage_turret(turret, TURRET_CONTACT_DAMAGE, out_events);
                }
            }
        }
    }

    fn collect_power_ups(&mut self, out_events: &mut Vec<Event>) {
        let player = self.player.position;
        let reached: Vec<PowerUpId> = self
            .power_ups
            .values()
            .filter(|power_up| horizontal_distance(power_up.position, player) <= PICKUP_RADIUS)
            .map(|power_up| power_up.id)
            .collect();
        for id in reached {
            let Some(power_up) = self.power_ups.remove(&id) else {
                continue;
            };
            match power_up.kind {
                PowerUpKind::Health => self.player.vitals.heal(),
                kind => {
                    let _ = self.inventory.collect(kind);
                }
            }
            out_events.push(Event::PowerUpCollected {
                power_up: id,
                kind: power_up.kind,
            });
        }
    }

    fn sweep_bomb(&mut self, out_events: &mut Vec<Event>) {
        let Some(started_at) = self.bomb_started_at else {
            return;
        };
        let elapsed = self.real_time.saturating_sub(started_at);
        let radius = bomb_radius(elapsed);
        let center = self.player.position;
        let doomed: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|enemy| horizontal_distance(enemy.position, center) <= radius)
            .map(|enemy| enemy.id)
            .collect();
        for enemy in doomed {
            self.kill_enemy(enemy, out_events);
        }
        if elapsed >= BOMB_DURATION {
            self.bomb_started_at = None;
            out_events.push(Event::BombEnded);
        }
    }

    fn check_round_clear(&mut self, out_events: &mut Vec<Event>) {
        if !self.round.is_cleared(self.enemies.len()) {
            return;
        }
        self.round.waiting_for_wave = true;
        self.scheduler.schedule(
            Clock::Game,
            self.game_time + INTER_ROUND_DELAY,
            TimerOwner::Round,
            TimerAction::RequestWave,
        );
        debug!(round = self.round.round, "round cleared");
        out_events.push(Event::RoundCleared {
            round: self.round.round,
        });
    }

    fn remove_enemy(&mut self, enemy: EnemyId) -> Option<EnemyAgent> {
        let removed = self.enemies.remove(&enemy)?;
        self.scheduler.cancel_owner(TimerOwner::Enemy(enemy));
        self.turrets.forget_enemy(enemy);
        self.contacts.retain(|(contact, _)| *contact != enemy);
        Some(removed)
    }

    fn damage_enemy(&mut self, enemy: EnemyId, amount: u32, out_events: &mut Vec<Event>) {
        let now = self.real_time;
        let Some(agent) = self.enemies.get_mut(&enemy) else {
            return;
        };
        match agent.take_damage(amount, now) {
            StructureHit::Ignored => {}
            StructureHit::Damaged { health } => {
                out_events.push(Event::EnemyDamaged { enemy, health });
            }
            StructureHit::Destroyed => self.kill_enemy(enemy, out_events),
        }
    }

    fn kill_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(agent) = self.remove_enemy(enemy) else {
            return;
        };
        let score = self.round.record_kill();
        out_events.push(Event::EnemyKilled {
            enemy,
            position: agent.position,
            boss: agent.is_boss(),
            score,
        });
        self.refresh_boss_presence(out_events);
    }

    fn refresh_boss_presence(&mut self, out_events: &mut Vec<Event>) {
        let active = self.enemies.values().any(EnemyAgent::is_boss);
        if active != self.boss_active {
            self.boss_active = active;
            out_events.push(Event::BossPresenceChanged { active });
        }
    }

    fn hit_player(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let outcome = self.player.vitals.receive_hit(
            amount,
            self.inventory.shield_charges_mut(),
            self.real_time,
        );
        match outcome {
            PlayerHit::Ignored => {}
            PlayerHit::Absorbed { remaining } => {
                out_events.push(Event::ShieldAbsorbed { remaining });
            }
            PlayerHit::Damaged { health } => {
                out_events.push(Event::PlayerDamaged { health });
            }
            PlayerHit::Killed => {
                out_events.push(Event::PlayerDamaged { health: 0 });
                out_events.push(Event::PlayerDied);
                self.end_game(out_events);
            }
        }
    }

    fn damage_turret(&mut self, turret: TurretId, amount: u32, out_events: &mut Vec<Event>) {
        let now = self.real_time;
        let Some(state) = self.turrets.get_mut(turret) else {
            return;
        };
        match state.take_damage(amount, now) {
            StructureHit::Ignored => {}
            StructureHit::Damaged { health } => {
                out_events.push(Event::TurretDamaged { turret, health });
            }
            StructureHit::Destroyed => {
                let _ = self.turrets.remove(turret);
                for enemy in self.enemies.values_mut() {
                    if enemy.target == TargetRef::Turret(turret) {
                        enemy.target = TargetRef::Player;
                    }
                }
                out_events.push(Event::TurretDestroyed { turret });
            }
        }
    }

    fn spawn_projectile(
        &mut self,
        owner: ProjectileOwner,
        position: Vec3,
        direction: Vec3,
        speed: f32,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        let projectile = Projectile {
            id,
            owner,
            position,
            direction,
            speed,
            damage,
            age: Duration::ZERO,
        };
        let _ = self.projectiles.insert(id, projectile);
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            owner,
            position,
            direction,
        });
    }

    fn spawn_power_up(&mut self, kind: PowerUpKind, position: Vec3, out_events: &mut Vec<Event>) {
        let id = PowerUpId::new(self.next_power_up_id);
        self.next_power_up_id = self.next_power_up_id.wrapping_add(1);
        let position = Vec3::new(position.x, POWER_UP_HEIGHT, position.z);
        let _ = self.power_ups.insert(id, PowerUp { id, kind, position });
        out_events.push(Event::PowerUpSpawned {
            power_up: id,
            kind,
            position,
        });
    }

    fn fire_player_weapon(&mut self, out_events: &mut Vec<Event>) {
        if self.real_time < self.player.next_fire_at {
            return;
        }
        self.player.next_fire_at = self.real_time + self.player_fire_interval();
        let direction = self.player.facing;
        let origin = self.player.position + direction * MUZZLE_OFFSET;
        let speed = PLAYER_PROJECTILE_BASE_SPEED + self.player_speed();
        self.spawn_projectile(
            ProjectileOwner::Player,
            origin,
            direction,
            speed,
            PLAYER_PROJECTILE_DAMAGE,
            out_events,
        );
    }

    fn begin_enemy_burst(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if self.is_time_frozen() {
            return;
        }
        let shots = burst_size(self.round.round);
        let now = self.game_time;
        let Some(agent) = self.enemies.get_mut(&enemy) else {
            return;
        };
        if agent.begin_burst(shots, now) {
            self.fire_enemy_shot(enemy, out_events);
        }
    }

    fn fire_enemy_shot(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(agent) = self.enemies.get_mut(&enemy) else {
            return;
        };
        let remaining = agent.consume_shot();
        let direction = agent.facing();
        let origin = agent.position + direction * MUZZLE_OFFSET;
        let projectile = agent.profile().projectile;
        if remaining > 0 {
            self.scheduler.schedule(
                Clock::Game,
                self.game_time + BURST_SPACING,
                TimerOwner::Enemy(enemy),
                TimerAction::EnemyBurstShot(enemy),
            );
        }
        self.spawn_projectile(
            ProjectileOwner::Enemy,
            origin,
            direction,
            projectile.speed,
            projectile.damage,
            out_events,
        );
    }

    fn activate_time_stop(&mut self, out_events: &mut Vec<Event>) {
        if self.is_time_frozen() || !self.inventory.take_time_stop() {
            return;
        }
        self.time_stop_active = true;
        for enemy in self.enemies.values_mut() {
            enemy.freeze();
        }
        self.scheduler.schedule(
            Clock::Real,
            self.real_time + TIME_STOP_DURATION,
            TimerOwner::Ability,
            TimerAction::TimeStopExpired,
        );
        debug!("time stop started");
        out_events.push(Event::TimeStopStarted);
    }

    fn end_time_stop(&mut self, out_events: &mut Vec<Event>) {
        if !self.time_stop_active {
            return;
        }
        self.time_stop_active = false;
        for enemy in self.enemies.values_mut() {
            enemy.thaw();
        }
        debug!("time stop ended");
        out_events.push(Event::TimeStopEnded);
    }

    fn activate_bomb(&mut self, out_events: &mut Vec<Event>) {
        if self.bomb_started_at.is_some() || !self.inventory.take_bomb() {
            return;
        }
        self.bomb_started_at = Some(self.real_time);
        debug!("bomb started");
        out_events.push(Event::BombStarted {
            center: self.player.position,
        });
    }

    fn deploy_turret(&mut self, out_events: &mut Vec<Event>) {
        let facing = self.player.facing;
        let right = Vec3::new(facing.z, 0.0, -facing.x);
        let position = self.player.position + right * TURRET_DEPLOY_OFFSET;

        let rejection = if self.inventory.turrets() == 0 {
            Some(PlacementError::NoneStored)
        } else if position.x.abs() > TURRET_PLACEMENT_EXTENT
            || position.z.abs() > TURRET_PLACEMENT_EXTENT
        {
            Some(PlacementError::OutOfBounds)
        } else {
            None
        };
        if let Some(reason) = rejection {
            out_events.push(Event::TurretPlacementRejected { position, reason });
            return;
        }

        if !self.inventory.take_turret() {
            return;
        }
        let turret = self.turrets.deploy(position, self.real_time);
        out_events.push(Event::TurretDeployed { turret, position });
    }

    fn fire_turret(&mut self, turret: TurretId, out_events: &mut Vec<Event>) {
        let now = self.real_time;
        let Some(state) = self.turrets.get(turret) else {
            return;
        };
        let Some(target) = state.target else {
            return;
        };
        if !state.is_ready(now) {
            return;
        }
        let origin = state.position;
        let Some(enemy) = self.enemies.get(&target) else {
            if let Some(state) = self.turrets.get_mut(turret) {
                state.target = None;
            }
            return;
        };
        let mut direction = flatten(enemy.position - origin).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = Vec3::Z;
        }
        if let Some(state) = self.turrets.get_mut(turret) {
            state.mark_fired(now);
        }
        self.spawn_projectile(
            ProjectileOwner::Turret,
            origin,
            direction,
            TURRET_PROJECTILE_SPEED,
            TURRET_PROJECTILE_DAMAGE,
            out_events,
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => world.start_game(out_events),
        Command::TogglePause => match world.round.phase {
            GamePhase::Playing => world.set_phase(GamePhase::Paused, out_events),
            GamePhase::Paused => world.set_phase(GamePhase::Playing, out_events),
            GamePhase::Menu | GamePhase::GameOver => {}
        },
        Command::GameOver => world.end_game(out_events),
        Command::GoToMenu => world.go_to_menu(out_events),
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::BeginRound { round, plan } => world.begin_round(round, plan, out_events),
        command if !world.is_playing() => {
            debug!(?command, "ignoring command outside of play");
        }
        Command::SetPlayerPose { position, facing } => {
            world.player.position = position;
            let facing = flatten(facing).normalize_or_zero();
            if facing != Vec3::ZERO {
                world.player.facing = facing;
            }
        }
        Command::FirePlayerWeapon => world.fire_player_weapon(out_events),
        Command::ActivateTimeStop => world.activate_time_stop(out_events),
        Command::ActivateBomb => world.activate_bomb(out_events),
        Command::DeployTurret => world.deploy_turret(out_events),
        Command::SetEnemyTarget { enemy, target } => {
            if let TargetRef::Turret(turret) = target {
                if !world.turrets.contains(turret) {
                    return;
                }
            }
            if let Some(agent) = world.enemies.get_mut(&enemy) {
                if agent.state().is_active() {
                    agent.target = target;
                }
            }
        }
        Command::SteerEnemy {
            enemy,
            velocity,
            facing,
        } => {
            if let Some(agent) = world.enemies.get_mut(&enemy) {
                agent.steer(velocity, facing);
            }
        }
        Command::FireEnemyBurst { enemy } => world.begin_enemy_burst(enemy, out_events),
        Command::SetTurretTarget { turret, target } => {
            if target.is_some_and(|enemy| !world.enemies.contains_key(&enemy)) {
                return;
            }
            if let Some(state) = world.turrets.get_mut(turret) {
                state.target = target;
            }
        }
        Command::FireTurret { turret } => world.fire_turret(turret, out_events),
        Command::SpawnPowerUp { kind, position } => {
            world.spawn_power_up(kind, position, out_events);
        }
        Command::GrantBomb => {
            if let Some(stored) = world.inventory.grant_bomb() {
                out_events.push(Event::BombGranted { stored });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arena_survival_core::{
        EnemyView, GameConfig, GamePhase, InventorySnapshot, PlayerSnapshot, PowerUpSnapshot,
        ProjectileSnapshot, RoundSnapshot, TurretView,
    };

    use super::World;

    /// Active phase of the game state machine.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.round.phase
    }

    /// Round counters and global flags consumed by the HUD.
    #[must_use]
    pub fn round(world: &World) -> RoundSnapshot {
        let round = &world.round;
        RoundSnapshot {
            phase: round.phase,
            round: round.round,
            score: round.score,
            total_enemies: round.total_enemies,
            enemies_killed: round.enemies_killed,
            live_enemies: u32::try_from(world.enemies.len()).unwrap_or(u32::MAX),
            pending_spawns: u32::try_from(round.pending_spawns.len()).unwrap_or(u32::MAX),
            time_frozen: world.is_time_frozen(),
            intro_active: round.intro_active,
            countdown: round.countdown,
            waiting_for_wave: round.waiting_for_wave,
            boss_active: world.boss_active,
            game_time: world.game_time,
        }
    }

    /// Captures the player avatar.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let now = world.real_time;
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            facing: player.facing,
            move_speed: world.player_speed(),
            health: player.vitals.health(),
            invulnerable: player.vitals.is_invulnerable(now),
            visible: player.vitals.is_visible(now),
            shield_blinking: player.vitals.is_shield_blinking(now),
            fire_ready: now >= player.next_fire_at,
        }
    }

    /// Per-slot inventory counts and caps.
    #[must_use]
    pub fn inventory(world: &World) -> InventorySnapshot {
        world.inventory.snapshot()
    }

    /// Captures every live enemy in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .values()
                .map(|enemy| enemy.snapshot(world.game_time, world.real_time))
                .collect(),
        )
    }

    /// Captures every deployed turret in deployment order.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        TurretView::from_snapshots(
            world
                .turrets
                .iter()
                .map(|turret| turret.snapshot(world.real_time))
                .collect(),
        )
    }

    /// Captures every in-flight projectile.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .values()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                owner: projectile.owner,
                position: projectile.position,
                direction: projectile.direction,
                speed: projectile.speed,
            })
            .collect()
    }

    /// Captures every power-up lying in the arena.
    #[must_use]
    pub fn power_ups(world: &World) -> Vec<PowerUpSnapshot> {
        world
            .power_ups
            .values()
            .map(|power_up| PowerUpSnapshot {
                id: power_up.id,
                kind: power_up.kind,
                position: power_up.position,
            })
            .collect()
    }

    /// Reports whether the game clock is frozen.
    #[must_use]
    pub fn is_time_frozen(world: &World) -> bool {
        world.is_time_frozen()
    }

    /// Reports whether at least one boss is alive.
    #[must_use]
    pub fn boss_active(world: &World) -> bool {
        world.boss_active
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of timed continuations waiting to run.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.scheduler.len()
    }

    /// Number of ticks processed in the current game.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: Vec3,
    facing: Vec3,
    vitals: PlayerVitals,
    next_fire_at: Duration,
}

impl Player {
    const fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Vec3::Z,
            vitals: PlayerVitals::new(),
            next_fire_at: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    owner: ProjectileOwner,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    damage: u32,
    age: Duration,
}

#[derive(Clone, Copy, Debug)]
struct PowerUp {
    id: PowerUpId,
    kind: PowerUpKind,
    position: Vec3,
}
