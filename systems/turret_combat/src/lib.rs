#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits turret firing commands from targeting data.

use arena_survival_core::{Command, EnemyView, GamePhase, TurretView};

/// Turret combat system that queues firing commands for ready turrets.
#[derive(Debug, Default)]
pub struct TurretCombat {
    scratch: Vec<Command>,
}

impl TurretCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTurret` entries for turrets ready to fire at a live target.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        turrets: &TurretView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Playing || enemies.is_empty() {
            return;
        }

        self.scratch.clear();

        for turret in turrets.iter() {
            let Some(target) = turret.target else {
                continue;
            };
            if turret.fire_ready && enemies.get(target).is_some() {
                self.scratch.push(Command::FireTurret { turret: turret.id });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
