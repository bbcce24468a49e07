//! Tunable game configuration loaded by hosts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EnemyProfile;

const MAX_START_DELAY_SECS: f32 = 600.0;

/// Complete configuration for a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Wave sizing and hand-authored rounds.
    pub wave: WaveConfig,
    /// Kill-score thresholds for power-up drops.
    pub drops: DropConfig,
    /// Inventory caps.
    pub caps: InventoryCaps,
    /// Enemy profiles used by procedural waves.
    pub roster: RosterConfig,
    /// Seconds between starting a game and the first wave request.
    pub start_delay_secs: f32,
    /// Name recorded with high scores.
    pub player_name: String,
    /// Seed for every random stream of the session.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wave: WaveConfig::default(),
            drops: DropConfig::default(),
            caps: InventoryCaps::default(),
            roster: RosterConfig::default(),
            start_delay_secs: 7.0,
            player_name: String::from("Player"),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Delay between starting a game and the first wave request.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        if self.start_delay_secs.is_nan() {
            return Duration::ZERO;
        }
        Duration::from_secs_f32(self.start_delay_secs.clamp(0.0, MAX_START_DELAY_SECS))
    }
}

/// Procedural wave sizing plus per-round overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies in every procedural wave before round scaling.
    pub enemies_per_wave: u32,
    /// Enemies added per round number.
    pub additional_enemies_per_wave: u32,
    /// Hand-authored rounds replacing procedural generation.
    pub special_rounds: Vec<SpecialRound>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enemies_per_wave: 5,
            additional_enemies_per_wave: 5,
            special_rounds: Vec::new(),
        }
    }
}

impl WaveConfig {
    /// Finds the hand-authored configuration for `round`, if any.
    #[must_use]
    pub fn special_round(&self, round: u32) -> Option<&SpecialRound> {
        self.special_rounds.iter().find(|special| special.round == round)
    }
}

/// Explicit spawn list for a single round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialRound {
    /// Round the list applies to.
    pub round: u32,
    /// Profile and count pairs in authored order.
    #[serde(default)]
    pub waves: Vec<WaveComponent>,
}

/// A profile repeated `count` times within a special round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveComponent {
    /// Profile to spawn.
    #[serde(default)]
    pub profile: EnemyProfile,
    /// Number of copies to spawn.
    #[serde(default)]
    pub count: u32,
}

/// Score divisors that make a power-up eligible on a kill.
///
/// A divisor of zero disables the corresponding drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Divisor for health drops.
    pub health_every: u32,
    /// Divisor for speed drops.
    pub speed_every: u32,
    /// Divisor for shield drops.
    pub shield_every: u32,
    /// Divisor for time-stop drops.
    pub time_stop_every: u32,
    /// Divisor for turret drops.
    pub turret_every: u32,
    /// Divisor for automatic bomb grants.
    pub bomb_every: u32,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            health_every: 20,
            speed_every: 30,
            shield_every: 45,
            time_stop_every: 60,
            turret_every: 75,
            bomb_every: 100,
        }
    }
}

/// Upper bounds on countable inventory slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryCaps {
    /// Maximum speed upgrades.
    pub speed_upgrades: u32,
    /// Maximum shield charges.
    pub shield_charges: u32,
    /// Maximum stored time-stops.
    pub time_stops: u32,
    /// Maximum stored turrets.
    pub turrets: u32,
    /// Maximum stored bombs.
    pub bombs: u32,
}

impl Default for InventoryCaps {
    fn default() -> Self {
        Self {
            speed_upgrades: 10,
            shield_charges: 5,
            time_stops: 5,
            turrets: 5,
            bombs: 5,
        }
    }
}

/// Enemy profiles used by procedural waves.
///
/// A missing normal or boss profile falls back to the built-in default. A
/// missing shooter profile disables shooter squads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Profile used for normal and melee slots.
    pub normal: Option<EnemyProfile>,
    /// Profile used for shooter squads.
    pub shooter: Option<EnemyProfile>,
    /// Profile used for boss slots.
    pub boss: Option<EnemyProfile>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            normal: Some(EnemyProfile::normal()),
            shooter: Some(EnemyProfile::shooter()),
            boss: Some(EnemyProfile::boss()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Archetype;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.wave.enemies_per_wave, 5);
        assert_eq!(config.wave.additional_enemies_per_wave, 5);
        assert_eq!(config.drops.bomb_every, 100);
        assert_eq!(config.caps.speed_upgrades, 10);
        assert_eq!(config.start_delay(), Duration::from_secs(7));
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let json = r#"{ "wave": { "enemies_per_wave": 2 }, "seed": 9 }"#;
        let config: GameConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.wave.enemies_per_wave, 2);
        assert_eq!(config.wave.additional_enemies_per_wave, 5);
        assert_eq!(config.seed, 9);
        assert_eq!(config.roster, RosterConfig::default());
    }

    #[test]
    fn special_round_lookup_matches_round_number() {
        let mut wave = WaveConfig::default();
        wave.special_rounds.push(SpecialRound {
            round: 3,
            waves: vec![WaveComponent {
                profile: EnemyProfile::shooter(),
                count: 2,
            }],
        });
        let special = wave.special_round(3).expect("special round");
        assert_eq!(special.waves[0].profile.archetype, Archetype::Shooter);
        assert!(wave.special_round(4).is_none());
    }

    #[test]
    fn negative_start_delay_clamps_to_zero() {
        let config = GameConfig {
            start_delay_secs: -1.0,
            ..GameConfig::default()
        };
        assert_eq!(config.start_delay(), Duration::ZERO);
    }
}
