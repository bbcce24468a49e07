//! Damage rules shared by the player, enemies and turrets.

use std::time::Duration;

use arena_survival_core::{Tint, INVULNERABILITY_WINDOW};

/// Health the player starts with and is restored to by a health pickup when below it.
pub(crate) const PLAYER_BASE_HEALTH: u32 = 3;

/// Upper bound for player health.
pub(crate) const PLAYER_MAX_HEALTH: u32 = 20;

/// Length of the full-intensity flash after a structure is hit.
pub(crate) const HIT_FLASH: Duration = Duration::from_millis(100);

/// Length of the blink feedback after a shield absorbs a hit.
pub(crate) const SHIELD_BLINK: Duration = Duration::from_millis(500);

const BLINK_INTERVAL_MILLIS: u128 = 100;

/// Result of delivering a hit to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerHit {
    /// The invulnerability window swallowed the hit.
    Ignored,
    /// A shield charge absorbed the hit.
    Absorbed {
        /// Shield charges left.
        remaining: u32,
    },
    /// Health was lost and the invulnerability window started.
    Damaged {
        /// Remaining health.
        health: u32,
    },
    /// Health reached zero.
    Killed,
}

/// Health, invulnerability and shield feedback of the player avatar.
#[derive(Clone, Debug)]
pub(crate) struct PlayerVitals {
    health: u32,
    invulnerable_until: Option<Duration>,
    shield_blink_until: Option<Duration>,
}

impl PlayerVitals {
    pub(crate) const fn new() -> Self {
        Self {
            health: PLAYER_BASE_HEALTH,
            invulnerable_until: None,
            shield_blink_until: None,
        }
    }

    pub(crate) const fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn is_invulnerable(&self, now: Duration) -> bool {
        self.invulnerable_until.is_some_and(|until| now < until)
    }

    pub(crate) fn is_shield_blinking(&self, now: Duration) -> bool {
        self.shield_blink_until.is_some_and(|until| now < until)
    }

    /// Whether the avatar is drawn; it blinks while invulnerable.
    pub(crate) fn is_visible(&self, now: Duration) -> bool {
        match self.invulnerable_until {
            Some(until) if now < until => {
                let remaining = (until - now).as_millis();
                (remaining / BLINK_INTERVAL_MILLIS) % 2 == 0
            }
            _ => true,
        }
    }

    /// Applies a hit: invulnerability first, then shields, then health.
    pub(crate) fn receive_hit(
        &mut self,
        amount: u32,
        shield_charges: &mut u32,
        now: Duration,
    ) -> PlayerHit {
        if self.health == 0 || self.is_invulnerable(now) {
            return PlayerHit::Ignored;
        }

        if *shield_charges > 0 {
            *shield_charges -= 1;
            self.shield_blink_until = Some(now + SHIELD_BLINK);
            return PlayerHit::Absorbed {
                remaining: *shield_charges,
            };
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.invulnerable_until = None;
            return PlayerHit::Killed;
        }

        self.invulnerable_until = Some(now + INVULNERABILITY_WINDOW);
        PlayerHit::Damaged {
            health: self.health,
        }
    }

    /// Restores base health when below it, otherwise adds one up to the maximum.
    pub(crate) fn heal(&mut self) {
        self.health = if self.health < PLAYER_BASE_HEALTH {
            PLAYER_BASE_HEALTH
        } else {
            (self.health + 1).min(PLAYER_MAX_HEALTH)
        };
    }
}

/// Result of damaging an enemy or turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StructureHit {
    /// The structure was already destroyed.
    Ignored,
    /// Health was lost.
    Damaged {
        /// Remaining health.
        health: u32,
    },
    /// Health reached zero on this hit.
    Destroyed,
}

/// Flat-decrement health with hit-flash and damage shading.
#[derive(Clone, Debug)]
pub(crate) struct StructureHealth {
    health: u32,
    max_health: u32,
    base_tint: Tint,
    flash_until: Option<Duration>,
}

impl StructureHealth {
    pub(crate) fn new(max_health: u32, base_tint: Tint) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            base_tint,
            flash_until: None,
        }
    }

    pub(crate) const fn health(&self) -> u32 {
        self.health
    }

    pub(crate) const fn max_health(&self) -> u32 {
        self.max_health
    }

    pub(crate) const fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Decrements health; reports destruction exactly once.
    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> StructureHit {
        if self.is_destroyed() {
            return StructureHit::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        self.flash_until = Some(now + HIT_FLASH);
        if self.is_destroyed() {
            StructureHit::Destroyed
        } else {
            StructureHit::Damaged {
                health: self.health,
            }
        }
    }

    /// Pure red during the flash, then the base tint shaded toward red by damage taken.
    pub(crate) fn tint(&self, now: Duration) -> Tint {
        if self.flash_until.is_some_and(|until| now < until) {
            return Tint::RED;
        }
        let lost = self.max_health - self.health;
        let fraction = lost as f32 / self.max_health as f32;
        self.base_tint.lerp(Tint::RED, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_absorbs_before_health() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 2;
        let outcome = vitals.receive_hit(1, &mut shields, Duration::ZERO);
        assert_eq!(outcome, PlayerHit::Absorbed { remaining: 1 });
        assert_eq!(vitals.health(), PLAYER_BASE_HEALTH);
        assert!(vitals.is_shield_blinking(Duration::from_millis(100)));
        assert!(!vitals.is_invulnerable(Duration::from_millis(100)));
    }

    #[test]
    fn invulnerability_window_ignores_follow_up_hits() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 0;
        assert_eq!(
            vitals.receive_hit(1, &mut shields, Duration::ZERO),
            PlayerHit::Damaged { health: 2 }
        );
        assert_eq!(
            vitals.receive_hit(1, &mut shields, Duration::from_millis(500)),
            PlayerHit::Ignored
        );
        assert_eq!(vitals.health(), 2);
        assert_eq!(
            vitals.receive_hit(1, &mut shields, INVULNERABILITY_WINDOW),
            PlayerHit::Damaged { health: 1 }
        );
    }

    #[test]
    fn invulnerability_protects_shield_charges() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 0;
        let _ = vitals.receive_hit(1, &mut shields, Duration::ZERO);
        shields = 3;
        assert_eq!(
            vitals.receive_hit(1, &mut shields, Duration::from_secs(1)),
            PlayerHit::Ignored
        );
        assert_eq!(shields, 3);
    }

    #[test]
    fn lethal_hit_kills() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 0;
        assert_eq!(
            vitals.receive_hit(100, &mut shields, Duration::ZERO),
            PlayerHit::Killed
        );
        assert_eq!(vitals.health(), 0);
        assert_eq!(
            vitals.receive_hit(1, &mut shields, Duration::from_secs(10)),
            PlayerHit::Ignored
        );
    }

    #[test]
    fn heal_restores_base_then_increments_to_cap() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 0;
        let _ = vitals.receive_hit(2, &mut shields, Duration::ZERO);
        vitals.heal();
        assert_eq!(vitals.health(), PLAYER_BASE_HEALTH);
        for _ in 0..40 {
            vitals.heal();
        }
        assert_eq!(vitals.health(), PLAYER_MAX_HEALTH);
    }

    #[test]
    fn avatar_blinks_while_invulnerable() {
        let mut vitals = PlayerVitals::new();
        let mut shields = 0;
        let _ = vitals.receive_hit(1, &mut shields, Duration::ZERO);
        let visible: Vec<bool> = [0, 50, 150]
            .into_iter()
            .map(|millis| vitals.is_visible(Duration::from_millis(millis)))
            .collect();
        assert_eq!(visible, vec![true, false, true]);
        assert!(vitals.is_visible(INVULNERABILITY_WINDOW));
    }

    #[test]
    fn structure_flashes_then_shades_by_damage() {
        let mut structure = StructureHealth::new(4, Tint::WHITE);
        assert_eq!(
            structure.take_damage(2, Duration::ZERO),
            StructureHit::Damaged { health: 2 }
        );
        assert_eq!(structure.tint(Duration::from_millis(50)), Tint::RED);
        let shaded = structure.tint(HIT_FLASH);
        assert!((shaded.red - 1.0).abs() < f32::EPSILON);
        assert!((shaded.green - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn structure_reports_destruction_once() {
        let mut structure = StructureHealth::new(1, Tint::BLACK);
        assert_eq!(
            structure.take_damage(1, Duration::ZERO),
            StructureHit::Destroyed
        );
        assert_eq!(
            structure.take_damage(1, Duration::ZERO),
            StructureHit::Ignored
        );
        assert_eq!(structure.max_health(), 1);
    }
}
