//! Enemy archetype templates and their per-round growth curves.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width of the band a ranged enemy holds between retreating and advancing.
pub const SHOOTER_BAND_WIDTH: f32 = 5.0;

const MAX_FIRE_INTERVAL_SECS: f32 = 3_600.0;

/// Behavioural category that selects an enemy's movement and attack policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    /// Default chaser that runs straight at its target.
    Normal,
    /// Chaser variant sharing the normal movement policy.
    Melee,
    /// Ranged enemy that holds a distance band and fires bursts.
    Shooter,
    /// Heavy chaser whose contact damage is lethal.
    Boss,
}

impl Archetype {
    /// Reports whether the archetype keeps its distance and fires projectiles.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, Self::Shooter)
    }
}

/// Projectile launched by ranged archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileProfile {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Damage dealt on impact.
    pub damage: u32,
}

impl Default for ProjectileProfile {
    fn default() -> Self {
        Self {
            speed: 15.0,
            damage: 1,
        }
    }
}

/// Immutable template describing an enemy archetype's base stats.
///
/// Profiles are shared read-only between every agent spawned from them; the
/// world scales health and speed for the active round at spawn time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    /// Display name used by logs and presentation.
    pub name: String,
    /// Behaviour policy applied to agents spawned from the profile.
    pub archetype: Archetype,
    /// Health granted before round scaling.
    pub base_health: u32,
    /// Movement speed in world units per second before round scaling.
    pub base_speed: f32,
    /// Fractional speed increase applied for every round after the first.
    pub speed_growth_per_round: f32,
    /// Flat health added for every five completed rounds.
    pub health_bonus_per_5_rounds: u32,
    /// Outer edge of the distance band held by ranged archetypes.
    pub attack_range: f32,
    /// Seconds between bursts fired by ranged archetypes.
    pub fire_interval_secs: f32,
    /// Projectile launched by ranged archetypes.
    pub projectile: ProjectileProfile,
    /// Uniform scale hint forwarded to presentation.
    pub model_scale: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self::normal()
    }
}

impl EnemyProfile {
    /// Built-in chaser profile used when no normal profile is configured.
    #[must_use]
    pub fn normal() -> Self {
        Self {
            name: String::from("Tiger"),
            archetype: Archetype::Normal,
            base_health: 1,
            base_speed: 3.0,
            speed_growth_per_round: 0.1,
            health_bonus_per_5_rounds: 1,
            attack_range: 12.0,
            fire_interval_secs: 2.0,
            projectile: ProjectileProfile::default(),
            model_scale: 1.6,
        }
    }

    /// Built-in ranged profile.
    #[must_use]
    pub fn shooter() -> Self {
        Self {
            name: String::from("Fire Tiger"),
            archetype: Archetype::Shooter,
            base_health: 2,
            base_speed: 2.5,
            model_scale: 3.0,
            ..Self::normal()
        }
    }

    /// Built-in boss profile used when no boss profile is configured.
    #[must_use]
    pub fn boss() -> Self {
        Self {
            name: String::from("Boss"),
            archetype: Archetype::Boss,
            base_health: 10,
            base_speed: 3.5,
            health_bonus_per_5_rounds: 2,
            ..Self::normal()
        }
    }

    /// Reports whether agents spawned from this profile are bosses.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.archetype == Archetype::Boss
    }

    /// Health granted to an agent spawned during `round`.
    #[must_use]
    pub fn health_for_round(&self, round: u32) -> u32 {
        let bonus = (round / 5).saturating_mul(self.health_bonus_per_5_rounds);
        self.base_health.saturating_add(bonus).max(1)
    }

    /// Uncapped movement speed of an agent spawned during `round`.
    #[must_use]
    pub fn speed_for_round(&self, round: u32) -> f32 {
        let grown_rounds = round.saturating_sub(1) as f32;
        self.base_speed * (1.0 + grown_rounds * self.speed_growth_per_round)
    }

    /// Cooldown between bursts.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        if self.fire_interval_secs.is_nan() {
            return Duration::ZERO;
        }
        let secs = self.fire_interval_secs.clamp(0.0, MAX_FIRE_INTERVAL_SECS);
        Duration::from_secs_f32(secs)
    }

    /// Inner edge of the distance band; ranged agents back away when closer.
    #[must_use]
    pub fn retreat_range(&self) -> f32 {
        (self.attack_range - SHOOTER_BAND_WIDTH).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_gains_bonus_every_five_rounds() {
        let profile = EnemyProfile::normal();
        assert_eq!(profile.health_for_round(1), 1);
        assert_eq!(profile.health_for_round(4), 1);
        assert_eq!(profile.health_for_round(5), 2);
        assert_eq!(profile.health_for_round(12), 3);
    }

    #[test]
    fn speed_grows_after_first_round() {
        let profile = EnemyProfile::normal();
        assert!((profile.speed_for_round(1) - 3.0).abs() < 1e-5);
        assert!((profile.speed_for_round(11) - 6.0).abs() < 1e-5);
        assert!((profile.speed_for_round(0) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn shooter_band_matches_default_range() {
        let profile = EnemyProfile::shooter();
        assert!((profile.attack_range - 12.0).abs() < f32::EPSILON);
        assert!((profile.retreat_range() - 7.0).abs() < f32::EPSILON);
        assert_eq!(profile.fire_interval(), Duration::from_secs(2));
    }

    #[test]
    fn negative_fire_interval_clamps_to_zero() {
        let profile = EnemyProfile {
            fire_interval_secs: -4.0,
            ..EnemyProfile::shooter()
        };
        assert_eq!(profile.fire_interval(), Duration::ZERO);
    }
}
