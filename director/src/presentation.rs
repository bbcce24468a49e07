//! Presentation seam between the simulation and an engine front-end.

use arena_survival_core::{Archetype, PowerUpKind, ProjectileOwner};
use glam::Vec3;

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player or turret weapon discharge.
    Shoot,
    /// Bomb detonation.
    Bomb,
    /// Player lost health.
    PlayerDamage,
    /// Player died.
    PlayerDeath,
    /// Enemy lost health without dying.
    EnemyDamage,
    /// Enemy died.
    EnemyDeath,
    /// Turret destroyed.
    TurretDeath,
    /// Power-up collected.
    Pickup(PowerUpKind),
    /// Turret deployed.
    TurretPlace,
    /// Time-stop charge spent.
    TimeStopUse,
    /// Round started spawning.
    RoundStart,
}

/// Background music and ambience transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MusicCue {
    /// Start the gameplay track from the beginning.
    Play,
    /// Suspend the gameplay track.
    Pause,
    /// Continue a suspended track.
    Resume,
    /// Stop the gameplay track.
    Stop,
    /// Start the boss ambience loop.
    StartBossRoars,
    /// Stop the boss ambience loop.
    StopBossRoars,
}

/// Transient particle or flash effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualEffect {
    /// Death burst of a regular enemy.
    EnemyDeath,
    /// Death burst of a boss.
    BossDeath,
    /// Expanding bomb shockwave.
    BombBlast,
}

/// Scene entities created in response to world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Enemy model for the given archetype.
    Enemy(Archetype),
    /// Projectile model for the given owner.
    Projectile(ProjectileOwner),
    /// Power-up pickup model.
    PowerUp(PowerUpKind),
    /// Deployed turret model.
    Turret,
}

/// Fire-and-forget presentation hooks invoked by the director.
pub trait Presentation {
    /// Plays a one-shot sound.
    fn play_sound(&mut self, cue: SoundCue);

    /// Applies a music transition.
    fn play_music(&mut self, cue: MusicCue);

    /// Spawns a transient effect at `position`.
    fn spawn_effect(&mut self, effect: VisualEffect, position: Vec3);

    /// Creates the scene representation of a new entity.
    fn instantiate(&mut self, kind: EntityKind, position: Vec3);
}

/// Presentation that discards every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn play_sound(&mut self, _cue: SoundCue) {}

    fn play_music(&mut self, _cue: MusicCue) {}

    fn spawn_effect(&mut self, _effect: VisualEffect, _position: Vec3) {}

    fn instantiate(&mut self, _kind: EntityKind, _position: Vec3) {}
}

/// Single call captured by [`RecordingPresentation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresentationCall {
    /// A [`Presentation::play_sound`] call.
    Sound(SoundCue),
    /// A [`Presentation::play_music`] call.
    Music(MusicCue),
    /// A [`Presentation::spawn_effect`] call.
    Effect(VisualEffect, Vec3),
    /// A [`Presentation::instantiate`] call.
    Instantiate(EntityKind, Vec3),
}

/// Presentation that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[PresentationCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take(&mut self) -> Vec<PresentationCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Presentation for RecordingPresentation {
    fn play_sound(&mut self, cue: SoundCue) {
        self.calls.push(PresentationCall::Sound(cue));
    }

    fn play_music(&mut self, cue: MusicCue) {
        self.calls.push(PresentationCall::Music(cue));
    }

    fn spawn_effect(&mut self, effect: VisualEffect, position: Vec3) {
        self.calls.push(PresentationCall::Effect(effect, position));
    }

    fn instantiate(&mut self, kind: EntityKind, position: Vec3) {
        self.calls.push(PresentationCall::Instantiate(kind, position));
    }
}
