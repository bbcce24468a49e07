#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave composition system.
//!
//! Answers every [`Event::WaveRequested`] with a [`Command::BeginRound`]
//! carrying the ordered spawn plan for the requested round. Plans come either
//! from a hand-authored special round or from the procedural formula, and are
//! a pure function of the round number, the configuration and the seed.

use std::sync::Arc;

use arena_survival_core::{
    Command, EnemyProfile, Event, GameConfig, RosterConfig, WaveConfig, WavePlan,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// First round in which shooter squads may replace a slot.
pub const SHOOTER_SQUAD_MIN_ROUND: u32 = 5;

/// Probability that a procedural slot becomes a shooter squad.
pub const SHOOTER_SQUAD_CHANCE: f64 = 0.2;

/// Probability that a procedural slot rolls the melee variant.
pub const MELEE_VARIANT_CHANCE: f64 = 0.3;

/// Rounds before the first boss appears.
const BOSS_FREE_ROUNDS: u32 = 9;

const RNG_STREAM_WAVE: &str = "wave-composition";

/// Number of shooters emitted by a single squad during `round`.
#[must_use]
pub const fn squad_size(round: u32) -> u32 {
    if round < 10 {
        1
    } else if round < 15 {
        2
    } else {
        4
    }
}

/// Resolved enemy profiles shared by every spawned agent.
#[derive(Clone, Debug)]
pub struct EnemyRoster {
    normal: Arc<EnemyProfile>,
    shooter: Option<Arc<EnemyProfile>>,
    boss: Arc<EnemyProfile>,
}

impl EnemyRoster {
    /// Resolves configured profiles, falling back to built-in defaults.
    ///
    /// A missing shooter profile is never replaced; shooter squads are
    /// skipped instead.
    #[must_use]
    pub fn from_config(config: &RosterConfig) -> Self {
        let normal = config.normal.clone().unwrap_or_else(|| {
            warn!("normal enemy profile missing, using built-in default");
            EnemyProfile::normal()
        });
        let boss = config.boss.clone().unwrap_or_else(|| {
            warn!("boss profile missing, using built-in default");
            EnemyProfile::boss()
        });
        if config.shooter.is_none() {
            warn!("shooter profile missing, shooter squads disabled");
        }
        Self {
            normal: Arc::new(normal),
            shooter: config.shooter.clone().map(Arc::new),
            boss: Arc::new(boss),
        }
    }

    /// Profile used for normal slots.
    #[must_use]
    pub fn normal(&self) -> &Arc<EnemyProfile> {
        &self.normal
    }

    /// Profile used for the melee branch of a procedural slot.
    ///
    /// The melee branch currently shares the normal profile.
    #[must_use]
    pub fn melee_variant(&self) -> &Arc<EnemyProfile> {
        &self.normal
    }

    /// Profile used for shooter squads, when configured.
    #[must_use]
    pub fn shooter(&self) -> Option<&Arc<EnemyProfile>> {
        self.shooter.as_ref()
    }

    /// Profile used for boss slots.
    #[must_use]
    pub fn boss(&self) -> &Arc<EnemyProfile> {
        &self.boss
    }
}

/// Pure system that turns wave requests into spawn plans.
#[derive(Debug)]
pub struct WaveComposer {
    roster: EnemyRoster,
    waves: WaveConfig,
    seed: u64,
}

impl WaveComposer {
    /// Creates a composer for the provided game configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            roster: EnemyRoster::from_config(&config.roster),
            waves: config.wave.clone(),
            seed: config.seed,
        }
    }

    /// Profiles the composer draws from.
    #[must_use]
    pub fn roster(&self) -> &EnemyRoster {
        &self.roster
    }

    /// Consumes wave requests and emits the matching `BeginRound` commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::WaveRequested { round } = event {
                let plan = self.compose(*round);
                debug!(round, enemies = plan.len(), "composed wave");
                out.push(Command::BeginRound {
                    round: *round,
                    plan,
                });
            }
        }
    }

    /// Produces the ordered spawn plan for `round`.
    #[must_use]
    pub fn compose(&self, round: u32) -> WavePlan {
        if let Some(special) = self.waves.special_round(round) {
            return special
                .waves
                .iter()
                .flat_map(|component| {
                    let profile = Arc::new(component.profile.clone());
                    (0..component.count).map(move |_| Arc::clone(&profile))
                })
                .collect();
        }
        self.compose_procedural(round)
    }

    fn compose_procedural(&self, round: u32) -> WavePlan {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.seed, round));
        let base_count = self
            .waves
            .enemies_per_wave
            .saturating_add(round.saturating_mul(self.waves.additional_enemies_per_wave));
        let bosses = round.saturating_sub(BOSS_FREE_ROUNDS);

        let mut plan: WavePlan = (0..bosses)
            .map(|_| Arc::clone(self.roster.boss()))
            .collect();

        for _ in 0..base_count {
            if round >= SHOOTER_SQUAD_MIN_ROUND {
                if let Some(shooter) = self.roster.shooter() {
                    if rng.gen_bool(SHOOTER_SQUAD_CHANCE) {
                        plan.extend((0..squad_size(round)).map(|_| Arc::clone(shooter)));
                        continue;
                    }
                }
            }

            let profile = if rng.gen_bool(MELEE_VARIANT_CHANCE) {
                self.roster.melee_variant()
            } else {
                self.roster.normal()
            };
            plan.push(Arc::clone(profile));
        }

        plan
    }
}

fn derive_wave_seed(global_seed: u64, round: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(round.to_le_bytes());
    hasher.update(RNG_STREAM_WAVE.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
