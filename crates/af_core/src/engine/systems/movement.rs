//! Player movement and per-player timers.
//!
//! Velocity = normalized intent × rating top speed × speed modifiers ×
//! behavior multiplier. Positions integrate at constant velocity; there is
//! no collision response.

use crate::config::{ActionConfig, MovementConfig};
use crate::engine::components::{BehaviorState, MovementTuning, PlayerAttributes, SpeedModifiers};
use crate::engine::state::PlayState;
use crate::engine::systems::TickContext;
use crate::engine::types::Vec2;
use crate::engine::world::World;

/// Top speed (units/s) before modifiers.
pub fn top_speed(attributes: &PlayerAttributes, tuning: &MovementTuning, cfg: &MovementConfig) -> f32 {
    (cfg.base_speed + cfg.speed_per_rating * attributes.max_speed as f32) * tuning.speed_scale
}

/// Interrupt states pin a player; a block slows them.
pub fn behavior_multiplier(state: BehaviorState, cfg: &ActionConfig) -> f32 {
    match state {
        BehaviorState::Engaged => cfg.engaged_speed_multiplier,
        BehaviorState::Tackling | BehaviorState::Grappling | BehaviorState::Diving => 0.0,
        BehaviorState::Idle | BehaviorState::Running | BehaviorState::Scrambling => 1.0,
    }
}

pub fn run(world: &mut World, play: &mut PlayState, ctx: &TickContext) {
    let dt = ctx.dt;
    let live = ctx.gates.live && play.is_live();
    if live {
        play.elapsed_seconds += dt;
    }

    for id in world.player_ids() {
        if let (Some(stack), Some(behavior)) = (world.interrupts.get_mut(id), world.behaviors.get_mut(id)) {
            stack.tick(dt, behavior);
        }

        let velocity = if live {
            let direction = world.intents.get(id).map_or(Vec2::ZERO, |i| i.direction.normalized());
            let attributes = world.attributes.get(id).copied().unwrap_or_default();
            let tuning = world.movement.get(id).copied().unwrap_or_default();
            let modifiers = world.speed_mods.get(id).map_or(1.0, SpeedModifiers::multiplier);
            let state = world.behaviors.get(id).map_or(BehaviorState::Idle, |b| b.state);
            direction
                * (top_speed(&attributes, &tuning, &ctx.config.movement)
                    * modifiers
                    * behavior_multiplier(state, &ctx.config.actions))
        } else {
            Vec2::ZERO
        };

        world.velocities.insert(id, velocity);
        if let Some(position) = world.positions.get_mut(id) {
            *position += velocity * dt;
        }

        let idle_stack = world.interrupts.get(id).is_some_and(|s| s.is_empty());
        if let Some(behavior) = world.behaviors.get_mut(id) {
            if idle_stack && matches!(behavior.state, BehaviorState::Idle | BehaviorState::Running) {
                behavior.state = if velocity.length_sq() > 0.0 {
                    BehaviorState::Running
                } else {
                    BehaviorState::Idle
                };
            }
        }

        if let Some(mods) = world.speed_mods.get_mut(id) {
            mods.tick(dt);
        }
    }
}
