//! Arena-indexed component storage.
//!
//! One dense array per component type, indexed by [`EntityId`]. Lookups are
//! typed capability queries returning `Option`; a despawned entity simply has
//! no components, so stale handles degrade to "not found".

use serde::{Deserialize, Serialize};

use crate::engine::components::{
    Ball, Behavior, BehaviorState, CommandSlot, MovementIntent, MovementTuning, PlayerAttributes,
    Role, SpeedModifiers, Team,
};
use crate::engine::interrupt::{InterruptKind, InterruptStack};
use crate::engine::types::{EntityId, TeamSide, Vec2};
use crate::error::InterruptError;

// ============================================================================
// ComponentStore
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStore<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> ComponentStore<T> {
    pub fn insert(&mut self, id: EntityId, value: T) {
        let idx = id.index();
        if self.slots.len() <= idx {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(value);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Present components in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (EntityId(i as u32), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (EntityId(i as u32), v)))
    }
}

// ============================================================================
// World
// ============================================================================

/// Spawn description for a player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSpawn {
    pub side: TeamSide,
    pub role: Role,
    pub position: Vec2,
    pub attributes: PlayerAttributes,
}

#[derive(Debug, Clone, Default)]
pub struct World {
    next_id: u32,
    ball_id: Option<EntityId>,

    pub positions: ComponentStore<Vec2>,
    pub velocities: ComponentStore<Vec2>,
    pub teams: ComponentStore<Team>,
    pub roles: ComponentStore<Role>,
    pub attributes: ComponentStore<PlayerAttributes>,
    pub behaviors: ComponentStore<Behavior>,
    pub interrupts: ComponentStore<InterruptStack>,
    pub intents: ComponentStore<MovementIntent>,
    pub movement: ComponentStore<MovementTuning>,
    pub speed_mods: ComponentStore<SpeedModifiers>,
    pub commands: ComponentStore<CommandSlot>,
    /// Per-player ball-possession flag
    pub has_ball: ComponentStore<bool>,
    pub ball: ComponentStore<Ball>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_player(&mut self, spawn: PlayerSpawn) -> EntityId {
        let id = self.allocate();
        self.positions.insert(id, spawn.position);
        self.velocities.insert(id, Vec2::ZERO);
        self.teams.insert(id, Team { side: spawn.side, on_offense: false });
        self.roles.insert(id, spawn.role);
        self.attributes.insert(id, spawn.attributes);
        self.behaviors.insert(id, Behavior::default());
        self.interrupts.insert(id, InterruptStack::new());
        self.intents.insert(id, MovementIntent::default());
        self.movement.insert(id, MovementTuning::default());
        self.speed_mods.insert(id, SpeedModifiers::default());
        self.commands.insert(id, CommandSlot::default());
        self.has_ball.insert(id, false);
        id
    }

    /// Spawn the ball; there is exactly one, so later calls return it.
    pub fn spawn_ball(&mut self, position: Vec2) -> EntityId {
        if let Some(id) = self.ball_id {
            return id;
        }
        let id = self.allocate();
        self.positions.insert(id, position);
        self.velocities.insert(id, Vec2::ZERO);
        self.ball.insert(id, Ball::default());
        self.ball_id = Some(id);
        id
    }

    /// Remove every component of a player. The ball cannot be despawned.
    pub fn despawn(&mut self, id: EntityId) {
        if Some(id) == self.ball_id {
            return;
        }
        self.positions.remove(id);
        self.velocities.remove(id);
        self.teams.remove(id);
        self.roles.remove(id);
        self.attributes.remove(id);
        self.behaviors.remove(id);
        self.interrupts.remove(id);
        self.intents.remove(id);
        self.movement.remove(id);
        self.speed_mods.remove(id);
        self.commands.remove(id);
        self.has_ball.remove(id);
    }

    pub fn ball_id(&self) -> Option<EntityId> {
        self.ball_id
    }

    pub fn ball_position(&self) -> Option<Vec2> {
        self.ball_id.and_then(|id| self.positions.get(id).copied())
    }

    /// Player ids (entities with a team) in ascending order.
    pub fn player_ids(&self) -> Vec<EntityId> {
        self.teams.iter().map(|(id, _)| id).collect()
    }

    pub fn is_player(&self, id: EntityId) -> bool {
        self.teams.contains(id)
    }

    pub fn team_of(&self, id: EntityId) -> Option<TeamSide> {
        self.teams.get(id).map(|t| t.side)
    }

    pub fn on_offense(&self, id: EntityId) -> bool {
        self.teams.get(id).is_some_and(|t| t.on_offense)
    }

    /// Push an interrupt unless one of the same kind is already driving.
    ///
    /// Returns `Ok(false)` for a missing entity or a duplicate.
    pub fn push_interrupt(
        &mut self,
        id: EntityId,
        kind: InterruptKind,
        duration: f32,
        state: BehaviorState,
    ) -> Result<bool, InterruptError> {
        let (Some(stack), Some(behavior)) = (self.interrupts.get_mut(id), self.behaviors.get_mut(id))
        else {
            return Ok(false);
        };
        if stack.has_active(kind) {
            return Ok(false);
        }
        stack.push(kind, duration, state, behavior)?;
        Ok(true)
    }

    /// Pop the active interrupt of `kind`, if any.
    pub fn clear_interrupt(&mut self, id: EntityId, kind: InterruptKind) -> bool {
        match (self.interrupts.get_mut(id), self.behaviors.get_mut(id)) {
            (Some(stack), Some(behavior)) => stack.clear_kind(kind, behavior),
            _ => false,
        }
    }

    /// Set the possession flag on exactly `owner` (or nobody).
    pub fn set_possession(&mut self, owner: Option<EntityId>) {
        for (id, flag) in self.has_ball.iter_mut() {
            *flag = Some(id) == owner;
        }
    }

    /// Set every player's offense flag from the team holding the ball.
    pub fn set_offense(&mut self, offense: TeamSide) {
        for (_, team) in self.teams.iter_mut() {
            team.on_offense = team.side == offense;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, side: TeamSide) -> EntityId {
        world.spawn_player(PlayerSpawn {
            side,
            role: Role::Linebacker,
            position: Vec2::new(10.0, 10.0),
            attributes: PlayerAttributes::default(),
        })
    }

    #[test]
    fn test_spawn_and_query() {
        let mut world = World::new();
        let a = spawn(&mut world, TeamSide::Home);
        let ball = world.spawn_ball(Vec2::new(1.0, 2.0));
        let b = spawn(&mut world, TeamSide::Away);

        assert_eq!(world.player_ids(), vec![a, b]);
        assert_eq!(world.spawn_ball(Vec2::ZERO), ball);
        assert_eq!(world.ball_position(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(world.team_of(b), Some(TeamSide::Away));
        assert!(!world.is_player(ball));
    }

    #[test]
    fn test_despawn_degrades_lookups() {
        let mut world = World::new();
        let a = spawn(&mut world, TeamSide::Home);
        world.despawn(a);
        assert_eq!(world.team_of(a), None);
        assert!(world.positions.get(a).is_none());
        assert!(world.player_ids().is_empty());
        // Out-of-range handle
        assert!(world.positions.get(EntityId(999)).is_none());
    }

    #[test]
    fn test_push_interrupt_dedupes() {
        let mut world = World::new();
        let a = spawn(&mut world, TeamSide::Home);
        assert_eq!(world.push_interrupt(a, InterruptKind::Tackle, 0.3, BehaviorState::Tackling), Ok(true));
        assert_eq!(world.push_interrupt(a, InterruptKind::Tackle, 0.3, BehaviorState::Tackling), Ok(false));
        assert_eq!(world.interrupts.get(a).map(InterruptStack::len), Some(1));
        assert!(world.push_interrupt(a, InterruptKind::Engagement, 0.0, BehaviorState::Engaged).is_err());
        assert_eq!(world.push_interrupt(EntityId(50), InterruptKind::Tackle, 0.3, BehaviorState::Tackling), Ok(false));
        assert!(world.clear_interrupt(a, InterruptKind::Tackle));
        assert_eq!(world.behaviors.get(a).map(|b| b.state), Some(BehaviorState::Idle));
    }

    #[test]
    fn test_possession_and_offense_flags() {
        let mut world = World::new();
        let a = spawn(&mut world, TeamSide::Home);
        let b = spawn(&mut world, TeamSide::Away);
        world.set_possession(Some(b));
        assert_eq!(world.has_ball.get(a), Some(&false));
        assert_eq!(world.has_ball.get(b), Some(&true));
        world.set_offense(TeamSide::Away);
        assert!(world.on_offense(b));
        assert!(!world.on_offense(a));
    }
}
