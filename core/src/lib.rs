#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

mod config;
mod high_scores;
mod profile;

use std::{sync::Arc, time::Duration};

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use config::{
    DropConfig, GameConfig, InventoryCaps, RosterConfig, SpecialRound, WaveComponent, WaveConfig,
};
pub use high_scores::{
    truncate_player_name, HighScoreEntry, HighScoreTable, HIGH_SCORE_SLOTS, MAX_PLAYER_NAME_CHARS,
};
pub use profile::{Archetype, EnemyProfile, ProjectileProfile, SHOOTER_BAND_WIDTH};

/// Duration of a single fixed simulation step.
pub const FIXED_STEP: Duration = Duration::from_millis(20);

/// Number of fixed steps between enemy target re-evaluations.
pub const TARGET_REFRESH_TICKS: u64 = 30;

/// Grace period between a cleared round and the next wave request.
pub const INTER_ROUND_DELAY: Duration = Duration::from_secs(3);

/// Length of the global freeze started by a time-stop charge.
pub const TIME_STOP_DURATION: Duration = Duration::from_secs(10);

/// Length of the expanding bomb sweep.
pub const BOMB_DURATION: Duration = Duration::from_secs(2);

/// Radius of the bomb sweep when it starts.
pub const BOMB_START_RADIUS: f32 = 1.0;

/// Radius of the bomb sweep when it ends.
pub const BOMB_END_RADIUS: f32 = 40.0;

/// Window after a health loss during which the player ignores damage.
pub const INVULNERABILITY_WINDOW: Duration = Duration::from_secs(2);

/// Damage dealt by a non-boss enemy touching its target.
pub const CONTACT_DAMAGE: u32 = 1;

/// Damage dealt by a boss touching its target.
pub const BOSS_CONTACT_DAMAGE: u32 = 100;

/// Horizontal extent beyond which enemies are culled without reward.
pub const ARENA_CULL_EXTENT: f32 = 60.0;

/// Height below which enemies are culled without reward.
pub const ARENA_FLOOR: f32 = -10.0;

/// Maximum distance at which turrets acquire enemies.
pub const TURRET_RANGE: f32 = 20.0;

/// Interval between turret target re-evaluations.
pub const TURRET_RETARGET_INTERVAL: Duration = Duration::from_millis(500);

/// Radius of the expanding bomb sweep after `elapsed` time.
///
/// The radius grows linearly from [`BOMB_START_RADIUS`] to
/// [`BOMB_END_RADIUS`] across [`BOMB_DURATION`] and holds its final value
/// afterwards.
#[must_use]
pub fn bomb_radius(elapsed: Duration) -> f32 {
    let progress = (elapsed.as_secs_f32() / BOMB_DURATION.as_secs_f32()).clamp(0.0, 1.0);
    BOMB_START_RADIUS + (BOMB_END_RADIUS - BOMB_START_RADIUS) * progress
}

/// Number of projectiles a ranged enemy fires per burst during `round`.
#[must_use]
pub const fn burst_size(round: u32) -> u32 {
    if round >= 14 {
        3
    } else {
        1
    }
}

/// Projects a vector onto the horizontal plane.
#[must_use]
pub fn flatten(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Euclidean distance between two points measured on the horizontal plane.
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Describes the active phase of the top-level game state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu; no simulation runs.
    #[default]
    Menu,
    /// Active play; ticks advance the simulation.
    Playing,
    /// Play suspended by the player; ticks are ignored.
    Paused,
    /// Play ended; ticks are ignored until the game returns to the menu.
    GameOver,
}

/// Collectible power-up kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Restores player health.
    Health,
    /// Permanently increases player movement speed.
    Speed,
    /// Stores a global time-stop charge.
    TimeStop,
    /// Refills shield charges.
    Shield,
    /// Stores a bomb charge.
    Bomb,
    /// Halves the player's fire interval for the rest of the game.
    Ammo,
    /// Stores a deployable turret.
    Turret,
}

/// Identifies who launched a projectile, which decides what it may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Fired by the player; damages enemies only.
    Player,
    /// Fired by a player turret; damages enemies only.
    Turret,
    /// Fired by an enemy; damages the player and turrets.
    Enemy,
}

/// Lookup-only reference to the entity an enemy is pursuing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetRef {
    /// The player avatar.
    #[default]
    Player,
    /// A deployed turret.
    Turret(TurretId),
}

/// Behaviour state of a single enemy agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Spawned but not yet steered toward a target.
    Idle,
    /// Running straight at the target.
    Chasing,
    /// Holding a distance band around the target.
    Kiting,
    /// Emitting the remaining shots of a burst.
    Attacking,
    /// Held in place by a global time-stop.
    Frozen,
    /// Removed from play; terminal.
    Dead,
}

impl AgentState {
    /// Reports whether the agent may still move, target, and attack.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Frozen | Self::Dead)
    }
}

/// Reasons a turret deployment request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The player has no stored turrets.
    NoneStored,
    /// The deploy position lies outside the placement bounds.
    OutOfBounds,
}

/// Linear RGB colour hint forwarded to presentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    /// Red channel in the unit interval.
    pub red: f32,
    /// Green channel in the unit interval.
    pub green: f32,
    /// Blue channel in the unit interval.
    pub blue: f32,
}

impl Tint {
    /// Neutral base tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Base tint of ranged enemies.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Full-damage tint and boss base tint.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);

    /// Creates a tint from its channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Interpolates toward `other` by `t`, clamped to the unit interval.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
        }
    }
}

/// Ordered spawn list produced for a single round.
pub type WavePlan = Vec<Arc<EnemyProfile>>;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets every counter and entity, enters play, and starts the intro.
    StartGame,
    /// Toggles between playing and paused.
    TogglePause,
    /// Ends the current game and submits its score.
    GameOver,
    /// Returns to the title menu, submitting the score of an unfinished game.
    GoToMenu,
    /// Advances the simulation clocks by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player avatar; the host owns player locomotion.
    SetPlayerPose {
        /// New player position.
        position: Vec3,
        /// New horizontal facing direction.
        facing: Vec3,
    },
    /// Fires the player's weapon along its facing when the cooldown allows.
    FirePlayerWeapon,
    /// Spends a stored time-stop charge.
    ActivateTimeStop,
    /// Spends a stored bomb charge.
    ActivateBomb,
    /// Deploys a stored turret beside the player.
    DeployTurret,
    /// Installs the spawn plan for a requested round.
    BeginRound {
        /// Round the plan was composed for.
        round: u32,
        /// Enemies to spawn, in order.
        plan: WavePlan,
    },
    /// Points an enemy at a new target.
    SetEnemyTarget {
        /// Enemy being retargeted.
        enemy: EnemyId,
        /// Entity the enemy should pursue.
        target: TargetRef,
    },
    /// Sets an enemy's horizontal velocity and facing for the coming steps.
    SteerEnemy {
        /// Enemy being steered.
        enemy: EnemyId,
        /// Desired velocity in world units per second.
        velocity: Vec3,
        /// Desired facing direction.
        facing: Vec3,
    },
    /// Starts a projectile burst from a ranged enemy.
    FireEnemyBurst {
        /// Enemy that should fire.
        enemy: EnemyId,
    },
    /// Points a turret at an enemy or clears its target.
    SetTurretTarget {
        /// Turret being retargeted.
        turret: TurretId,
        /// Enemy the turret should track, if any.
        target: Option<EnemyId>,
    },
    /// Fires a turret at its current target when the cooldown allows.
    FireTurret {
        /// Turret that should fire.
        turret: TurretId,
    },
    /// Materializes a power-up in the world.
    SpawnPowerUp {
        /// Kind of power-up to create.
        kind: PowerUpKind,
        /// Ground position of the drop.
        position: Vec3,
    },
    /// Adds a bomb charge without a pickup, respecting the cap.
    GrantBomb,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the game entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Confirms that every counter, entity and timer was cleared.
    GameReset,
    /// Indicates that the simulation clocks advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Monotonic index of the tick within the current game.
        tick: u64,
    },
    /// Reports the next value of the pre-round countdown.
    IntroCountdown {
        /// Value shown to the player.
        value: u32,
    },
    /// Signals that the intro countdown completed.
    IntroFinished,
    /// Asks the wave composer for the plan of the given round.
    WaveRequested {
        /// Round that should start next.
        round: u32,
    },
    /// Confirms that a round started spawning.
    RoundStarted {
        /// Round that started.
        round: u32,
        /// Number of enemies planned for the round.
        total_enemies: u32,
    },
    /// Reports that every enemy of the round is gone.
    RoundCleared {
        /// Round that was cleared.
        round: u32,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Behaviour policy of the enemy.
        archetype: Archetype,
        /// Spawn position.
        position: Vec3,
    },
    /// Reports that an enemy lost health without dying.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Remaining health.
        health: u32,
    },
    /// Reports that an enemy died and was scored.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Position at the time of death.
        position: Vec3,
        /// Whether the enemy was a boss.
        boss: bool,
        /// Running score after the kill was counted.
        score: u32,
    },
    /// Reports that an enemy left the arena and was removed without reward.
    EnemyCulled {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Reports that the "any boss alive" predicate changed.
    BossPresenceChanged {
        /// Whether at least one boss is alive.
        active: bool,
    },
    /// Confirms that a projectile was launched.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Owner deciding what the projectile may hit.
        owner: ProjectileOwner,
        /// Launch position.
        position: Vec3,
        /// Normalized travel direction.
        direction: Vec3,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Remaining health.
        health: u32,
    },
    /// Reports that a shield charge absorbed a hit.
    ShieldAbsorbed {
        /// Shield charges left.
        remaining: u32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Confirms that a power-up was materialized.
    PowerUpSpawned {
        /// Identifier assigned to the power-up.
        power_up: PowerUpId,
        /// Kind of power-up.
        kind: PowerUpKind,
        /// Position of the drop.
        position: Vec3,
    },
    /// Confirms that the player collected a power-up.
    PowerUpCollected {
        /// Power-up that was collected.
        power_up: PowerUpId,
        /// Kind of power-up.
        kind: PowerUpKind,
    },
    /// Confirms that a turret was deployed.
    TurretDeployed {
        /// Identifier assigned to the turret.
        turret: TurretId,
        /// Turret position.
        position: Vec3,
    },
    /// Reports that a turret deployment was refused.
    TurretPlacementRejected {
        /// Requested deploy position.
        position: Vec3,
        /// Reason for the refusal.
        reason: PlacementError,
    },
    /// Reports that a turret lost health without being destroyed.
    TurretDamaged {
        /// Turret that was hit.
        turret: TurretId,
        /// Remaining health.
        health: u32,
    },
    /// Reports that a turret was destroyed.
    TurretDestroyed {
        /// Turret that was destroyed.
        turret: TurretId,
    },
    /// Signals the start of a global time-stop.
    TimeStopStarted,
    /// Signals the end of a global time-stop.
    TimeStopEnded,
    /// Signals the start of a bomb sweep.
    BombStarted {
        /// Centre of the sweep.
        center: Vec3,
    },
    /// Signals the end of a bomb sweep.
    BombEnded,
    /// Reports that a bomb charge was granted without a pickup.
    BombGranted {
        /// Bomb charges now stored.
        stored: u32,
    },
    /// Reports that the final score of a game was submitted.
    ScoreSubmitted {
        /// Name the score was recorded under.
        name: String,
        /// Submitted score.
        score: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a deployed turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a power-up lying in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Behaviour policy of the enemy.
    pub archetype: Archetype,
    /// Current position.
    pub position: Vec3,
    /// Current facing direction.
    pub facing: Vec3,
    /// Movement speed after round scaling and capping.
    pub move_speed: f32,
    /// Outer edge of the held distance band.
    pub attack_range: f32,
    /// Inner edge of the held distance band.
    pub retreat_range: f32,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Behaviour state.
    pub state: AgentState,
    /// Entity currently pursued.
    pub target: TargetRef,
    /// Whether the burst cooldown elapsed and no burst is in flight.
    pub fire_ready: bool,
    /// Presentation tint after hit-flash and damage shading.
    pub tint: Tint,
    /// Uniform scale hint forwarded from the profile.
    pub model_scale: f32,
}

impl EnemySnapshot {
    /// Reports whether the enemy is a boss.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.archetype == Archetype::Boss
    }

    /// Fraction of health lost, in the unit interval.
    #[must_use]
    pub fn damage_fraction(&self) -> f32 {
        damage_fraction(self.health, self.max_health)
    }
}

/// Read-only view of all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret by the world.
    pub id: TurretId,
    /// Turret position.
    pub position: Vec3,
    /// Remaining health.
    pub health: u32,
    /// Health at deployment.
    pub max_health: u32,
    /// Enemy the turret is tracking, if any.
    pub target: Option<EnemyId>,
    /// Whether the fire cooldown elapsed.
    pub fire_ready: bool,
    /// Presentation tint after hit-flash and damage shading.
    pub tint: Tint,
}

impl TurretSnapshot {
    /// Fraction of health lost, in the unit interval.
    #[must_use]
    pub fn damage_fraction(&self) -> f32 {
        damage_fraction(self.health, self.max_health)
    }
}

/// Read-only view of all deployed turrets.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in deployment order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific turret.
    #[must_use]
    pub fn get(&self, id: TurretId) -> Option<&TurretSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: Vec3,
    /// Current horizontal facing direction.
    pub facing: Vec3,
    /// Movement speed including speed upgrades.
    pub move_speed: f32,
    /// Remaining health.
    pub health: u32,
    /// Whether damage is currently ignored.
    pub invulnerable: bool,
    /// Whether the avatar is drawn during invulnerability blinking.
    pub visible: bool,
    /// Whether the shield absorption feedback is playing.
    pub shield_blinking: bool,
    /// Whether the weapon cooldown elapsed.
    pub fire_ready: bool,
}

/// Per-slot inventory counts together with their caps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Speed upgrades collected.
    pub speed_upgrades: u32,
    /// Shield charges held.
    pub shield_charges: u32,
    /// Time-stop charges stored.
    pub time_stops: u32,
    /// Turrets stored.
    pub turrets: u32,
    /// Bomb charges stored.
    pub bombs: u32,
    /// Whether the ammo boost is active.
    pub ammo_boost: bool,
    /// Caps applied to the counted slots.
    pub caps: InventoryCaps,
}

impl InventorySnapshot {
    /// Reports whether collecting `kind` would change the inventory.
    ///
    /// Health and ammo are not inventory slots and are always accepted.
    #[must_use]
    pub const fn accepts(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Speed => self.speed_upgrades < self.caps.speed_upgrades,
            PowerUpKind::Shield => self.shield_charges < self.caps.shield_charges,
            PowerUpKind::TimeStop => self.time_stops < self.caps.time_stops,
            PowerUpKind::Turret => self.turrets < self.caps.turrets,
            PowerUpKind::Bomb => self.bombs < self.caps.bombs,
            PowerUpKind::Health | PowerUpKind::Ammo => true,
        }
    }
}

/// Round progression counters and global flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundSnapshot {
    /// Active game phase.
    pub phase: GamePhase,
    /// Current round; zero before the first wave.
    pub round: u32,
    /// Running score.
    pub score: u32,
    /// Enemies planned for the current round.
    pub total_enemies: u32,
    /// Enemies killed during the current round.
    pub enemies_killed: u32,
    /// Enemies currently alive.
    pub live_enemies: u32,
    /// Enemies of the current plan still waiting to spawn.
    pub pending_spawns: u32,
    /// Whether the game clock is frozen by a time-stop or bomb.
    pub time_frozen: bool,
    /// Whether the intro sequence is running.
    pub intro_active: bool,
    /// Countdown value shown during the intro, if any.
    pub countdown: Option<u32>,
    /// Whether the round-clear grace period is running.
    pub waiting_for_wave: bool,
    /// Whether at least one boss is alive.
    pub boss_active: bool,
    /// Game clock reading.
    pub game_time: Duration,
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Owner deciding what the projectile may hit.
    pub owner: ProjectileOwner,
    /// Current position.
    pub position: Vec3,
    /// Normalized travel direction.
    pub direction: Vec3,
    /// Travel speed in world units per second.
    pub speed: f32,
}

/// Immutable representation of a power-up lying in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    /// Identifier allocated to the power-up by the world.
    pub id: PowerUpId,
    /// Kind of power-up.
    pub kind: PowerUpKind,
    /// Position of the drop.
    pub position: Vec3,
}

fn damage_fraction(health: u32, max_health: u32) -> f32 {
    if max_health == 0 {
        return 0.0;
    }
    let remaining = health.min(max_health) as f32 / max_health as f32;
    1.0 - remaining
}
