#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session driver that wires the world, the pure systems and the host
//! collaborators together.
//!
//! The [`Director`] owns the authoritative [`World`], every system, a
//! [`Presentation`] implementation and a [`ScoreStore`]. Each submitted
//! command is applied to the world and the resulting events are pumped
//! through the systems until no further commands are produced. Variable
//! frame time is converted into fixed simulation steps.

mod presentation;

use std::time::Duration;

use arena_survival_core::{
    Command, Event, GameConfig, GamePhase, HighScoreTable, ProjectileOwner, FIXED_STEP,
};
use arena_survival_storage::ScoreStore;
use arena_survival_system_drop_economy::DropEconomy;
use arena_survival_system_enemy_behavior::EnemyBehavior;
use arena_survival_system_targeting::Targeting;
use arena_survival_system_turret_combat::TurretCombat;
use arena_survival_system_wave_composer::WaveComposer;
use arena_survival_world::{self as world, query, World};
use tracing::{error, info, warn};

pub use presentation::{
    EntityKind, MusicCue, NullPresentation, Presentation, PresentationCall,
    RecordingPresentation, SoundCue, VisualEffect,
};

/// Longest frame accepted by [`Director::advance`]; longer frames are clamped.
pub const MAX_FRAME: Duration = Duration::from_millis(250);

/// Top-level game driver.
#[derive(Debug)]
pub struct Director<P, S> {
    world: World,
    composer: WaveComposer,
    targeting: Targeting,
    behavior: EnemyBehavior,
    turret_combat: TurretCombat,
    drops: DropEconomy,
    presentation: P,
    store: S,
    high_scores: HighScoreTable,
    phase: GamePhase,
    accumulator: Duration,
}

impl<P, S> Director<P, S>
where
    P: Presentation,
    S: ScoreStore,
{
    /// Creates a director in the menu phase and loads the persisted leaderboard.
    ///
    /// A store that fails to load leaves the session with an empty table.
    pub fn new(config: GameConfig, presentation: P, mut store: S) -> Self {
        let high_scores = store.load().unwrap_or_else(|error| {
            warn!(%error, "starting with an empty high-score table");
            HighScoreTable::new()
        });

        Self {
            composer: WaveComposer::new(&config),
            targeting: Targeting::new(),
            behavior: EnemyBehavior::new(),
            turret_combat: TurretCombat::new(),
            drops: DropEconomy::new(config.drops),
            world: World::new(config),
            presentation,
            store,
            high_scores,
            phase: GamePhase::Menu,
            accumulator: Duration::ZERO,
        }
    }

    /// Applies `command` and pumps the resulting events through every system.
    ///
    /// Returns every event emitted while the command settled, in order.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            self.present(&events);
            let commands = self.react(&events);
            log.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log
    }

    /// Accumulates `frame` and runs as many fixed steps as it covers.
    pub fn advance(&mut self, frame: Duration) -> Vec<Event> {
        self.accumulator += frame.min(MAX_FRAME);
        let mut log = Vec::new();
        while self.accumulator >= FIXED_STEP {
            self.accumulator -= FIXED_STEP;
            log.extend(self.submit(Command::Tick { dt: FIXED_STEP }));
        }
        log
    }

    /// Authoritative world, for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Leaderboard including every score submitted this session.
    #[must_use]
    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    /// Presentation collaborator.
    #[must_use]
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Mutable access to the presentation collaborator.
    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Score store collaborator.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        let mut commands = Vec::new();
        self.composer.handle(events, &mut commands);

        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        let turrets = query::turret_view(&self.world);
        self.targeting
            .handle(events, &player, &enemies, &turrets, &mut commands);
        self.behavior
            .handle(events, &player, &enemies, &turrets, &mut commands);
        self.drops
            .handle(events, &query::inventory(&self.world), &mut commands);

        if events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            self.turret_combat.handle(
                query::phase(&self.world),
                &turrets,
                &enemies,
                &mut commands,
            );
        }

        commands
    }

    fn present(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PhaseChanged { phase } => self.change_phase(*phase),
                Event::RoundStarted { .. } => self.presentation.play_sound(SoundCue::RoundStart),
                Event::EnemySpawned {
                    archetype,
                    position,
                    ..
                } => self
                    .presentation
                    .instantiate(EntityKind::Enemy(*archetype), *position),
                Event::EnemyDamaged { .. } => self.presentation.play_sound(SoundCue::EnemyDamage),
                Event::EnemyKilled { position, boss, .. } => {
                    self.presentation.play_sound(SoundCue::EnemyDeath);
                    let effect = if *boss {
                        VisualEffect::BossDeath
                    } else {
                        VisualEffect::EnemyDeath
                    };
                    self.presentation.spawn_effect(effect, *position);
                }
                Event::BossPresenceChanged { active } => {
                    self.presentation.play_music(if *active {
                        MusicCue::StartBossRoars
                    } else {
                        MusicCue::StopBossRoars
                    });
                }
                Event::ProjectileSpawned {
                    owner, position, ..
                } => {
                    if *owner != ProjectileOwner::Enemy {
                        self.presentation.play_sound(SoundCue::Shoot);
                    }
                    self.presentation
                        .instantiate(EntityKind::Projectile(*owner), *position);
                }
                Event::PlayerDamaged { .. } => self.presentation.play_sound(SoundCue::PlayerDamage),
                Event::PlayerDied => self.presentation.play_sound(SoundCue::PlayerDeath),
                Event::PowerUpSpawned { kind, position, .. } => self
                    .presentation
                    .instantiate(EntityKind::PowerUp(*kind), *position),
                Event::PowerUpCollected { kind, .. } => {
                    self.presentation.play_sound(SoundCue::Pickup(*kind));
                }
                Event::TurretDeployed { position, .. } => {
                    self.presentation.play_sound(SoundCue::TurretPlace);
                    self.presentation.instantiate(EntityKind::Turret, *position);
                }
                Event::TurretDestroyed { .. } => self.presentation.play_sound(SoundCue::TurretDeath),
                Event::TimeStopStarted => {
                    self.presentation.play_sound(SoundCue::TimeStopUse);
                    self.presentation.play_music(MusicCue::Pause);
                }
                Event::TimeStopEnded => self.presentation.play_music(MusicCue::Resume),
                Event::BombStarted { center } => {
                    self.presentation.play_sound(SoundCue::Bomb);
                    self.presentation.play_music(MusicCue::Pause);
                    self.presentation
                        .spawn_effect(VisualEffect::BombBlast, *center);
                }
                Event::BombEnded => self.presentation.play_music(MusicCue::Resume),
                Event::ScoreSubmitted { name, score } => self.record_score(name, *score),
                _ => {}
            }
        }
    }

    fn change_phase(&mut self, phase: GamePhase) {
        let previous = std::mem::replace(&mut self.phase, phase);
        match (previous, phase) {
            (GamePhase::Paused, GamePhase::Playing) => {
                self.presentation.play_music(MusicCue::Resume);
            }
            (_, GamePhase::Playing) => {
                self.accumulator = Duration::ZERO;
                self.presentation.play_music(MusicCue::Play);
            }
            (_, GamePhase::Paused) => self.presentation.play_music(MusicCue::Pause),
            (GamePhase::Playing | GamePhase::Paused, GamePhase::GameOver | GamePhase::Menu) => {
                self.presentation.play_music(MusicCue::StopBossRoars);
                self.presentation.play_music(MusicCue::Stop);
            }
            _ => {}
        }
    }

    fn record_score(&mut self, name: &str, score: u32) {
        self.high_scores.submit(name, score);
        match self.store.save(&self.high_scores) {
            Ok(()) => info!(name, score, "recorded high score"),
            Err(error) => error!(%error, name, score, "failed to persist high scores"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_survival_storage::MemoryStore;

    fn director() -> Director<RecordingPresentation, MemoryStore> {
        Director::new(
            GameConfig::default(),
            RecordingPresentation::new(),
            MemoryStore::new(),
        )
    }

    #[test]
    fn frames_are_split_into_fixed_steps() {
        let mut director = director();
        let _ = director.submit(Command::StartGame);

        let events = director.advance(Duration::from_millis(50));
        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        assert_eq!(ticks, 2);
        assert_eq!(query::tick_index(director.world()), 2);

        let _ = director.advance(Duration::from_millis(10));
        assert_eq!(query::tick_index(director.world()), 3);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut director = director();
        let _ = director.submit(Command::StartGame);
        let _ = director.advance(Duration::from_secs(5));
        assert_eq!(query::tick_index(director.world()), 12);
    }

    #[test]
    fn pause_and_resume_drive_music() {
        let mut director = director();
        let _ = director.submit(Command::StartGame);
        let _ = director.submit(Command::TogglePause);
        let _ = director.submit(Command::TogglePause);

        let music: Vec<MusicCue> = director
            .presentation()
            .calls()
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Music(cue) => Some(*cue),
                _ => None,
            })
            .collect();
        assert_eq!(music, vec![MusicCue::Play, MusicCue::Pause, MusicCue::Resume]);
    }

    #[test]
    fn bomb_pauses_music_until_the_sweep_ends() {
        let mut director = director();
        let _ = director.submit(Command::StartGame);
        let _ = director.submit(Command::GrantBomb);
        let _ = director.presentation_mut().take();

        let events = director.submit(Command::ActivateBomb);
        assert!(matches!(events.as_slice(), [Event::BombStarted { .. }]));
        assert_eq!(
            director.presentation_mut().take(),
            vec![
                PresentationCall::Sound(SoundCue::Bomb),
                PresentationCall::Music(MusicCue::Pause),
                PresentationCall::Effect(VisualEffect::BombBlast, glam::Vec3::ZERO),
            ]
        );

        let mut ended = false;
        for _ in 0..110 {
            let events = director.advance(FIXED_STEP);
            if events.contains(&Event::BombEnded) {
                ended = true;
                break;
            }
        }
        assert!(ended, "bomb sweep should finish");
        let music: Vec<MusicCue> = director
            .presentation_mut()
            .take()
            .into_iter()
            .filter_map(|call| match call {
                PresentationCall::Music(cue) => Some(cue),
                _ => None,
            })
            .collect();
        assert_eq!(music, vec![MusicCue::Resume]);
    }
}
