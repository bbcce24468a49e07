#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Kill-driven power-up economy.
//!
//! Every kill checks the new score against the configured divisors. Eligible
//! drop kinds are appended to a persistent queue and at most one queued kind
//! is materialized per kill, re-checked against the inventory caps at that
//! moment. Bomb grants run on their own divisor outside the queue.

use std::collections::VecDeque;

use arena_survival_core::{Command, DropConfig, Event, InventorySnapshot, PowerUpKind};
use glam::Vec3;
use tracing::debug;

/// Pure system that converts kills into power-up spawns and bomb grants.
#[derive(Debug)]
pub struct DropEconomy {
    config: DropConfig,
    queue: VecDeque<PowerUpKind>,
}

impl DropEconomy {
    /// Creates an economy with an empty queue.
    #[must_use]
    pub fn new(config: DropConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
        }
    }

    /// Drop kinds waiting to materialize, oldest first.
    #[must_use]
    pub fn pending(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.queue.iter().copied()
    }

    /// Consumes kill events and emits `SpawnPowerUp` and `GrantBomb` commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        inventory: &InventorySnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::GameReset => self.queue.clear(),
                Event::EnemyKilled {
                    position, score, ..
                } => self.on_kill(*score, *position, inventory, out),
                _ => {}
            }
        }
    }

    /// Processes a single kill that brought the score to `score`.
    pub fn on_kill(
        &mut self,
        score: u32,
        position: Vec3,
        inventory: &InventorySnapshot,
        out: &mut Vec<Command>,
    ) {
        let thresholds = [
            (PowerUpKind::Health, self.config.health_every),
            (PowerUpKind::Speed, self.config.speed_every),
            (PowerUpKind::Shield, self.config.shield_every),
            (PowerUpKind::TimeStop, self.config.time_stop_every),
            (PowerUpKind::Turret, self.config.turret_every),
        ];
        for (kind, every) in thresholds {
            if reached(score, every) && inventory.accepts(kind) {
                self.queue.push_back(kind);
            }
        }

        if let Some(kind) = self.queue.pop_front() {
            if inventory.accepts(kind) {
                out.push(Command::SpawnPowerUp { kind, position });
            } else {
                debug!(?kind, "dropping queued power-up at cap");
            }
        }

        if reached(score, self.config.bomb_every) {
            out.push(Command::GrantBomb);
        }
    }
}

fn reached(score: u32, every: u32) -> bool {
    every != 0 && score % every == 0
}
