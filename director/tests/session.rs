use std::time::Duration;

use arena_survival_core::{
    Archetype, Command, Event, GameConfig, GamePhase, HighScoreTable, FIXED_STEP,
};
use arena_survival_director::{
    Director, EntityKind, MusicCue, PresentationCall, RecordingPresentation, SoundCue,
    VisualEffect,
};
use arena_survival_storage::{MemoryStore, ScoreStore, StoreError};
use arena_survival_world::query;
use glam::Vec3;

fn director(config: GameConfig) -> Director<RecordingPresentation, MemoryStore> {
    Director::new(config, RecordingPresentation::new(), MemoryStore::new())
}

fn run_until<P, S>(
    director: &mut Director<P, S>,
    limit: Duration,
    mut done: impl FnMut(&Event) -> bool,
) -> Vec<Event>
where
    P: arena_survival_director::Presentation,
    S: ScoreStore,
{
    let mut log = Vec::new();
    let steps = limit.as_millis() / FIXED_STEP.as_millis();
    for _ in 0..steps {
        let events = director.advance(FIXED_STEP);
        let finished = events.iter().any(&mut done);
        log.extend(events);
        if finished {
            break;
        }
    }
    log
}

#[test]
fn first_round_spawns_enemies_after_the_intro() {
    let mut director = director(GameConfig::default());
    let _ = director.submit(Command::StartGame);

    let log = run_until(&mut director, Duration::from_secs(10), |event| {
        matches!(event, Event::EnemySpawned { .. })
    });

    let countdown: Vec<u32> = log
        .iter()
        .filter_map(|event| match event {
            Event::IntroCountdown { value } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(countdown, vec![3, 2, 1]);
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::RoundStarted { round: 1, .. })));

    let calls = director.presentation().calls();
    assert!(calls.contains(&PresentationCall::Music(MusicCue::Play)));
    assert!(calls.contains(&PresentationCall::Sound(SoundCue::RoundStart)));
    assert!(calls.iter().any(|call| matches!(
        call,
        PresentationCall::Instantiate(EntityKind::Enemy(Archetype::Normal), _)
    )));
}

#[test]
fn aimed_fire_kills_enemies_and_plays_effects() {
    let mut director = director(GameConfig::default());
    let _ = director.submit(Command::StartGame);
    let _ = run_until(&mut director, Duration::from_secs(10), |event| {
        matches!(event, Event::EnemySpawned { .. })
    });

    let mut killed = false;
    for _ in 0..1_500 {
        let player = query::player(director.world()).position;
        let nearest = query::enemy_view(director.world())
            .iter()
            .map(|enemy| enemy.position)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));
        if let Some(enemy) = nearest {
            let _ = director.submit(Command::SetPlayerPose {
                position: player,
                facing: enemy - player,
            });
            let _ = director.submit(Command::FirePlayerWeapon);
        }
        let events = director.advance(FIXED_STEP);
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. }))
        {
            killed = true;
            break;
        }
    }

    assert!(killed, "aimed fire should kill an enemy");
    let calls = director.presentation().calls();
    assert!(calls.contains(&PresentationCall::Sound(SoundCue::Shoot)));
    assert!(calls.contains(&PresentationCall::Sound(SoundCue::EnemyDeath)));
    assert!(calls
        .iter()
        .any(|call| matches!(call, PresentationCall::Effect(VisualEffect::EnemyDeath, _))));
    assert_eq!(query::round(director.world()).score, 1);
}

#[test]
fn game_over_persists_the_score_once() {
    let config = GameConfig {
        player_name: String::from("  a very long player name  "),
        ..GameConfig::default()
    };
    let mut director = director(config);
    let _ = director.submit(Command::StartGame);
    let _ = director.advance(Duration::from_millis(100));

    let events = director.submit(Command::GameOver);
    assert!(events.contains(&Event::PhaseChanged {
        phase: GamePhase::GameOver
    }));
    assert!(events.contains(&Event::ScoreSubmitted {
        name: String::from("a very long pla"),
        score: 0,
    }));
    assert_eq!(director.store().saves(), 1);
    assert_eq!(director.high_scores().entries().len(), 1);
    assert!(director
        .presentation()
        .calls()
        .contains(&PresentationCall::Music(MusicCue::Stop)));

    let events = director.submit(Command::GoToMenu);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ScoreSubmitted { .. })));
    assert_eq!(director.store().saves(), 1);
    assert_eq!(query::phase(director.world()), GamePhase::Menu);
}

#[test]
fn abandoning_a_game_submits_its_score() {
    let mut director = director(GameConfig::default());
    let _ = director.submit(Command::StartGame);
    let _ = director.submit(Command::TogglePause);
    let events = director.submit(Command::GoToMenu);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ScoreSubmitted { .. })));
    assert_eq!(director.store().table().entries().len(), 1);
}

#[test]
fn persisted_table_is_loaded_at_construction() {
    let mut table = HighScoreTable::new();
    table.submit("veteran", 250);
    let mut director = Director::new(
        GameConfig::default(),
        RecordingPresentation::new(),
        MemoryStore::with_table(table),
    );
    let _ = director.submit(Command::StartGame);
    let _ = director.submit(Command::GameOver);

    let names: Vec<&str> = director
        .high_scores()
        .entries()
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, vec!["veteran", "Player"]);
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn load(&mut self) -> Result<HighScoreTable, StoreError> {
        Err(StoreError::Read {
            path: "settings.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn save(&mut self, _table: &HighScoreTable) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: "settings.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

#[test]
fn storage_failures_do_not_interrupt_play() {
    let mut director = Director::new(
        GameConfig::default(),
        RecordingPresentation::new(),
        BrokenStore,
    );
    assert!(director.high_scores().is_empty());

    let _ = director.submit(Command::StartGame);
    let _ = director.submit(Command::GameOver);
    assert_eq!(director.high_scores().entries().len(), 1);

    let events = director.submit(Command::StartGame);
    assert!(events.contains(&Event::PhaseChanged {
        phase: GamePhase::Playing
    }));
}

#[test]
fn bomb_plays_blast_at_the_player() {
    let mut director = director(GameConfig::default());
    let _ = director.submit(Command::StartGame);
    let position = Vec3::new(3.0, 0.0, -4.0);
    let _ = director.submit(Command::SetPlayerPose {
        position,
        facing: Vec3::Z,
    });
    let _ = director.submit(Command::GrantBomb);
    let _ = director.submit(Command::ActivateBomb);

    assert!(director
        .presentation()
        .calls()
        .contains(&PresentationCall::Effect(VisualEffect::BombBlast, position)));
    assert!(query::is_time_frozen(director.world()));
}
