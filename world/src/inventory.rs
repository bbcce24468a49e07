//! Player-owned power-up stock with per-slot caps.

use arena_survival_core::{InventoryCaps, InventorySnapshot, PowerUpKind};

#[derive(Clone, Debug)]
pub(crate) struct Inventory {
    speed_upgrades: u32,
    shield_charges: u32,
    time_stops: u32,
    turrets: u32,
    bombs: u32,
    ammo_boost: bool,
    caps: InventoryCaps,
}

impl Inventory {
    pub(crate) const fn new(caps: InventoryCaps) -> Self {
        Self {
            speed_upgrades: 0,
            shield_charges: 0,
            time_stops: 0,
            turrets: 0,
            bombs: 0,
            ammo_boost: false,
            caps,
        }
    }

    pub(crate) const fn speed_upgrades(&self) -> u32 {
        self.speed_upgrades
    }

    pub(crate) const fn has_ammo_boost(&self) -> bool {
        self.ammo_boost
    }

    /// Shield charges are consumed by hit resolution in place.
    pub(crate) fn shield_charges_mut(&mut self) -> &mut u32 {
        &mut self.shield_charges
    }

    /// Stores a collected power-up; returns whether anything changed.
    ///
    /// Health is not an inventory slot and is never stored.
    pub(crate) fn collect(&mut self, kind: PowerUpKind) -> bool {
        let caps = self.caps;
        match kind {
            PowerUpKind::Speed => increment_capped(&mut self.speed_upgrades, caps.speed_upgrades),
            PowerUpKind::Shield => {
                let refilled = self.shield_charges < caps.shield_charges;
                self.shield_charges = self.shield_charges.max(caps.shield_charges);
                refilled
            }
            PowerUpKind::TimeStop => increment_capped(&mut self.time_stops, caps.time_stops),
            PowerUpKind::Turret => increment_capped(&mut self.turrets, caps.turrets),
            PowerUpKind::Bomb => increment_capped(&mut self.bombs, caps.bombs),
            PowerUpKind::Ammo => {
                let changed = !self.ammo_boost;
                self.ammo_boost = true;
                changed
            }
            PowerUpKind::Health => false,
        }
    }

    pub(crate) fn take_time_stop(&mut self) -> bool {
        take_one(&mut self.time_stops)
    }

    pub(crate) fn take_bomb(&mut self) -> bool {
        take_one(&mut self.bombs)
    }

    pub(crate) fn take_turret(&mut self) -> bool {
        take_one(&mut self.turrets)
    }

    pub(crate) const fn turrets(&self) -> u32 {
        self.turrets
    }

    /// Grants a bomb outside the pickup path; returns the new count unless capped.
    pub(crate) fn grant_bomb(&mut self) -> Option<u32> {
        increment_capped(&mut self.bombs, self.caps.bombs).then_some(self.bombs)
    }

    pub(crate) const fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            speed_upgrades: self.speed_upgrades,
            shield_charges: self.shield_charges,
            time_stops: self.time_stops,
            turrets: self.turrets,
            bombs: self.bombs,
            ammo_boost: self.ammo_boost,
            caps: self.caps,
        }
    }
}

fn increment_capped(count: &mut u32, cap: u32) -> bool {
    if *count < cap {
        *count += 1;
        true
    } else {
        false
    }
}

fn take_one(count: &mut u32) -> bool {
    if *count > 0 {
        *count -= 1;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickups_never_exceed_caps() {
        let mut inventory = Inventory::new(InventoryCaps::default());
        for _ in 0..50 {
            for kind in [
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::TimeStop,
                PowerUpKind::Turret,
                PowerUpKind::Bomb,
            ] {
                let _ = inventory.collect(kind);
            }
        }
        let snapshot = inventory.snapshot();
        assert_eq!(snapshot.speed_upgrades, 10);
        assert_eq!(snapshot.shield_charges, 5);
        assert_eq!(snapshot.time_stops, 5);
        assert_eq!(snapshot.turrets, 5);
        assert_eq!(snapshot.bombs, 5);
    }

    #[test]
    fn shield_pickup_refills_to_cap() {
        let mut inventory = Inventory::new(InventoryCaps::default());
        assert!(inventory.collect(PowerUpKind::Shield));
        assert_eq!(inventory.snapshot().shield_charges, 5);
        *inventory.shield_charges_mut() -= 2;
        assert!(inventory.collect(PowerUpKind::Shield));
        assert_eq!(inventory.snapshot().shield_charges, 5);
        assert!(!inventory.collect(PowerUpKind::Shield));
    }

    #[test]
    fn ammo_boost_does_not_stack() {
        let mut inventory = Inventory::new(InventoryCaps::default());
        assert!(inventory.collect(PowerUpKind::Ammo));
        assert!(!inventory.collect(PowerUpKind::Ammo));
        assert!(inventory.has_ammo_boost());
    }

    #[test]
    fn consumables_are_spent_one_at_a_time() {
        let mut inventory = Inventory::new(InventoryCaps::default());
        assert!(!inventory.take_time_stop());
        assert!(inventory.collect(PowerUpKind::TimeStop));
        assert!(inventory.take_time_stop());
        assert!(!inventory.take_time_stop());
        assert_eq!(inventory.grant_bomb(), Some(1));
        assert!(inventory.take_bomb());
        assert!(!inventory.take_turret());
    }

    #[test]
    fn bomb_grants_stop_at_cap() {
        let caps = InventoryCaps {
            bombs: 1,
            ..InventoryCaps::default()
        };
        let mut inventory = Inventory::new(caps);
        assert_eq!(inventory.grant_bomb(), Some(1));
        assert_eq!(inventory.grant_bomb(), None);
    }
}
