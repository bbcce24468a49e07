//! Authoritative turret state management utilities.

use std::{collections::BTreeMap, time::Duration};

use arena_survival_core::{EnemyId, Tint, TurretId, TurretSnapshot};
use glam::Vec3;

use crate::combat::{StructureHealth, StructureHit};

/// Health of a freshly deployed turret.
pub(crate) const TURRET_HEALTH: u32 = 50;

/// Time between turret shots.
pub(crate) const TURRET_FIRE_INTERVAL: Duration = Duration::from_millis(200);

/// State of a turret stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TurretState {
    /// Identifier allocated by the world for the turret.
    pub(crate) id: TurretId,
    /// Ground position of the turret.
    pub(crate) position: Vec3,
    /// Enemy currently tracked.
    pub(crate) target: Option<EnemyId>,
    health: StructureHealth,
    next_fire_at: Duration,
}

impl TurretState {
    pub(crate) fn is_ready(&self, now: Duration) -> bool {
        now >= self.next_fire_at
    }

    pub(crate) fn mark_fired(&mut self, now: Duration) {
        self.next_fire_at = now + TURRET_FIRE_INTERVAL;
    }

    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> StructureHit {
        self.health.take_damage(amount, now)
    }

    pub(crate) fn snapshot(&self, now: Duration) -> TurretSnapshot {
        TurretSnapshot {
            id: self.id,
            position: self.position,
            health: self.health.health(),
            max_health: self.health.max_health(),
            target: self.target,
            fire_ready: self.is_ready(now),
            tint: self.health.tint(now),
        }
    }
}

/// Registry that stores turrets and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TurretRegistry {
    entries: BTreeMap<TurretId, TurretState>,
    next_turret_id: TurretId,
}

impl TurretRegistry {
    /// Creates an empty turret registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_turret_id: TurretId::new(0),
        }
    }

    /// Stores a new turret ready to fire immediately.
    pub(crate) fn deploy(&mut self, position: Vec3, now: Duration) -> TurretId {
        let id = self.next_turret_id;
        self.next_turret_id = TurretId::new(id.get().wrapping_add(1));
        let state = TurretState {
            id,
            position,
            target: None,
            health: StructureHealth::new(TURRET_HEALTH, Tint::WHITE),
            next_fire_at: now,
        };
        let _ = self.entries.insert(id, state);
        id
    }

    pub(crate) fn get(&self, id: TurretId) -> Option<&TurretState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TurretId) -> Option<&mut TurretState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TurretId) -> Option<TurretState> {
        self.entries.remove(&id)
    }

    pub(crate) fn contains(&self, id: TurretId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Turrets in deployment order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TurretState> {
        self.entries.values()
    }

    /// Drops any target references to `enemy`.
    pub(crate) fn forget_enemy(&mut self, enemy: EnemyId) {
        for turret in self.entries.values_mut() {
            if turret.target == Some(enemy) {
                turret.target = None;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_turret_id = TurretId::new(0);
    }
}
