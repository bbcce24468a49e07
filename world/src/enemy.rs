//! Runtime state of a single spawned enemy.

use std::{sync::Arc, time::Duration};

use arena_survival_core::{
    flatten, AgentState, Archetype, EnemyId, EnemyProfile, EnemySnapshot, TargetRef, Tint,
    ARENA_CULL_EXTENT, ARENA_FLOOR,
};
use glam::Vec3;

use crate::combat::{StructureHealth, StructureHit};

/// Floor applied to the non-boss speed cap.
const MIN_SPEED_CAP: f32 = 5.0;

/// Fraction of the player's speed non-boss enemies may reach.
const PLAYER_SPEED_RATIO: f32 = 0.95;

/// Enemy agent owning its health and behaviour state; the profile is shared.
#[derive(Clone, Debug)]
pub(crate) struct EnemyAgent {
    pub(crate) id: EnemyId,
    profile: Arc<EnemyProfile>,
    pub(crate) position: Vec3,
    velocity: Vec3,
    facing: Vec3,
    move_speed: f32,
    health: StructureHealth,
    state: AgentState,
    resume_state: AgentState,
    pub(crate) target: TargetRef,
    next_fire_at: Duration,
    burst_remaining: u32,
}

impl EnemyAgent {
    /// Creates an agent scaled for `round`, capping non-boss speed relative to the player.
    pub(crate) fn spawn(
        id: EnemyId,
        profile: Arc<EnemyProfile>,
        round: u32,
        position: Vec3,
        player_speed: f32,
        now: Duration,
    ) -> Self {
        let mut move_speed = profile.speed_for_round(round);
        if !profile.is_boss() {
            move_speed = move_speed.min((player_speed * PLAYER_SPEED_RATIO).max(MIN_SPEED_CAP));
        }
        let base_tint = match profile.archetype {
            Archetype::Shooter => Tint::BLACK,
            Archetype::Boss => Tint::RED,
            Archetype::Normal | Archetype::Melee => Tint::WHITE,
        };
        let health = StructureHealth::new(profile.health_for_round(round), base_tint);
        Self {
            id,
            profile,
            position,
            velocity: Vec3::ZERO,
            facing: Vec3::Z,
            move_speed,
            health,
            state: AgentState::Idle,
            resume_state: AgentState::Idle,
            target: TargetRef::Player,
            next_fire_at: now,
            burst_remaining: 0,
        }
    }

    pub(crate) fn profile(&self) -> &EnemyProfile {
        &self.profile
    }

    pub(crate) fn is_boss(&self) -> bool {
        self.profile.is_boss()
    }

    pub(crate) const fn state(&self) -> AgentState {
        self.state
    }

    pub(crate) const fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Stops the agent in place, remembering the state to resume.
    pub(crate) fn freeze(&mut self) {
        if self.state.is_active() {
            self.resume_state = self.state;
            self.state = AgentState::Frozen;
            self.velocity = Vec3::ZERO;
        }
    }

    pub(crate) fn thaw(&mut self) {
        if self.state == AgentState::Frozen {
            self.state = self.resume_state;
        }
    }

    /// Applies a horizontal velocity clamped to the agent's move speed.
    pub(crate) fn steer(&mut self, velocity: Vec3, facing: Vec3) {
        if !self.state.is_active() {
            return;
        }
        self.velocity = flatten(velocity).clamp_length_max(self.move_speed);
        let facing = flatten(facing).normalize_or_zero();
        if facing != Vec3::ZERO {
            self.facing = facing;
        }
        if self.state != AgentState::Attacking {
            self.state = self.movement_state();
        }
    }

    /// Zeroes horizontal velocity after touching the player.
    pub(crate) fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    pub(crate) fn integrate(&mut self, dt: Duration) {
        if self.state.is_active() {
            self.position += self.velocity * dt.as_secs_f32();
        }
    }

    /// Reports whether the agent drifted outside the arena.
    pub(crate) fn is_out_of_bounds(&self) -> bool {
        self.position.y < ARENA_FLOOR
            || self.position.x.abs() > ARENA_CULL_EXTENT
            || self.position.z.abs() > ARENA_CULL_EXTENT
    }

    /// Applies damage and enters `Dead` exactly once.
    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> StructureHit {
        let hit = self.health.take_damage(amount, now);
        if hit == StructureHit::Destroyed {
            self.state = AgentState::Dead;
            self.velocity = Vec3::ZERO;
            self.burst_remaining = 0;
        }
        hit
    }

    /// Starts a burst of `shots` if the cooldown elapsed; returns whether it started.
    pub(crate) fn begin_burst(&mut self, shots: u32, now: Duration) -> bool {
        if !self.state.is_active()
            || !self.profile.archetype.is_ranged()
            || self.burst_remaining > 0
            || now < self.next_fire_at
        {
            return false;
        }
        self.next_fire_at = now + self.profile.fire_interval();
        self.burst_remaining = shots.max(1);
        true
    }

    /// Consumes one shot of the active burst; returns the shots still owed.
    pub(crate) fn consume_shot(&mut self) -> u32 {
        self.burst_remaining = self.burst_remaining.saturating_sub(1);
        if self.state.is_active() {
            self.state = if self.burst_remaining > 0 {
                AgentState::Attacking
            } else {
                self.movement_state()
            };
        } else if self.state == AgentState::Frozen {
            self.resume_state = if self.burst_remaining > 0 {
                AgentState::Attacking
            } else {
                self.movement_state()
            };
        }
        self.burst_remaining
    }

    pub(crate) fn snapshot(&self, game_time: Duration, real_time: Duration) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            archetype: self.profile.archetype,
            position: self.position,
            facing: self.facing,
            move_speed: self.move_speed,
            attack_range: self.profile.attack_range,
            retreat_range: self.profile.retreat_range(),
            health: self.health.health(),
            max_health: self.health.max_health(),
            state: self.state,
            target: self.target,
            fire_ready: self.state.is_active()
                && self.burst_remaining == 0
                && game_time >= self.next_fire_at,
            tint: self.health.tint(real_time),
            model_scale: self.profile.model_scale,
        }
    }

    fn movement_state(&self) -> AgentState {
        if self.profile.archetype.is_ranged() {
            AgentState::Kiting
        } else {
            AgentState::Chasing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(profile: EnemyProfile, round: u32) -> EnemyAgent {
        EnemyAgent::spawn(
            EnemyId::new(0),
            Arc::new(profile),
            round,
            Vec3::ZERO,
            8.0,
            Duration::ZERO,
        )
    }

    #[test]
    fn non_boss_speed_is_capped_relative_to_player() {
        let fast = EnemyProfile {
            base_speed: 50.0,
            ..EnemyProfile::normal()
        };
        let capped = agent(fast.clone(), 1);
        assert!((capped.move_speed - 7.6).abs() < 1e-5);

        let boss = EnemyProfile {
            archetype: Archetype::Boss,
            ..fast
        };
        let uncapped = agent(boss, 1);
        assert!((uncapped.move_speed - 50.0).abs() < 1e-5);
    }

    #[test]
    fn steering_selects_state_by_archetype() {
        let mut chaser = agent(EnemyProfile::normal(), 1);
        assert_eq!(chaser.state(), AgentState::Idle);
        chaser.steer(Vec3::new(0.0, 5.0, 100.0), Vec3::Z);
        assert_eq!(chaser.state(), AgentState::Chasing);
        assert!((chaser.velocity.length() - chaser.move_speed).abs() < 1e-4);
        assert!(chaser.velocity.y.abs() < f32::EPSILON);

        let mut shooter = agent(EnemyProfile::shooter(), 1);
        shooter.steer(Vec3::ZERO, Vec3::X);
        assert_eq!(shooter.state(), AgentState::Kiting);
        assert_eq!(shooter.facing(), Vec3::X);
    }

    #[test]
    fn frozen_agents_ignore_steering_and_resume() {
        let mut chaser = agent(EnemyProfile::normal(), 1);
        chaser.steer(Vec3::Z, Vec3::Z);
        chaser.freeze();
        chaser.steer(Vec3::X * 3.0, Vec3::X);
        chaser.integrate(Duration::from_secs(1));
        assert_eq!(chaser.position, Vec3::ZERO);
        assert_eq!(chaser.state(), AgentState::Frozen);
        chaser.thaw();
        assert_eq!(chaser.state(), AgentState::Chasing);
    }

    #[test]
    fn death_happens_once() {
        let mut chaser = agent(EnemyProfile::normal(), 1);
        assert_eq!(
            chaser.take_damage(1, Duration::ZERO),
            StructureHit::Destroyed
        );
        assert_eq!(chaser.state(), AgentState::Dead);
        assert_eq!(chaser.take_damage(1, Duration::ZERO), StructureHit::Ignored);
    }

    #[test]
    fn burst_respects_cooldown() {
        let mut shooter = agent(EnemyProfile::shooter(), 14);
        shooter.steer(Vec3::ZERO, Vec3::Z);
        assert!(shooter.begin_burst(3, Duration::ZERO));
        assert_eq!(shooter.consume_shot(), 2);
        assert_eq!(shooter.state(), AgentState::Attacking);
        assert!(!shooter.begin_burst(3, Duration::from_secs(3)));
        assert_eq!(shooter.consume_shot(), 1);
        assert_eq!(shooter.consume_shot(), 0);
        assert_eq!(shooter.state(), AgentState::Kiting);
        assert!(!shooter.begin_burst(3, Duration::from_secs(1)));
        assert!(shooter.begin_burst(3, Duration::from_secs(2)));
    }

    #[test]
    fn leaving_the_arena_is_detected() {
        let mut chaser = agent(EnemyProfile::normal(), 1);
        chaser.position = Vec3::new(0.0, 0.0, 60.5);
        assert!(chaser.is_out_of_bounds());
        chaser.position = Vec3::new(0.0, -11.0, 0.0);
        assert!(chaser.is_out_of_bounds());
        chaser.position = Vec3::new(59.0, 0.0, -59.0);
        assert!(!chaser.is_out_of_bounds());
    }
}
