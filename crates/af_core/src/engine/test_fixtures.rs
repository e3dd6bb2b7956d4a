//! Shared test builders: single-system fixtures and full 11-vs-11 sims.

use crate::config::EngineConfig;
use crate::engine::components::{MovementIntent, PendingCommand, PlayerAttributes, Role};
use crate::engine::events::EventBus;
use crate::engine::field::{absolute_from_own, distance_from_own_goal, Field};
use crate::engine::loops::Gates;
use crate::engine::simulation::Simulation;
use crate::engine::state::{BallState, MatchState, PlayKind, PlayPhase, PlayState};
use crate::engine::systems::TickContext;
use crate::engine::types::{EntityId, TeamSide, Vec2};
use crate::engine::world::{PlayerSpawn, World};

pub const PRE_SNAP: Gates = Gates { pre_snap: true, live: false, dead_ball: false };
pub const LIVE: Gates = Gates { pre_snap: false, live: true, dead_ball: false };
pub const DEAD_BALL: Gates = Gates { pre_snap: false, live: false, dead_ball: true };

pub fn ctx<'a>(config: &'a EngineConfig, field: &'a Field, gates: Gates) -> TickContext<'a> {
    TickContext { config, field, gates, dt: 1.0 / config.tuning.ticks_per_second as f32 }
}

/// 1st & 10 for `possession` at absolute `spot`, first half, no kickoff due.
pub fn scrimmage_state(possession: TeamSide, spot: f32) -> MatchState {
    let mut state = MatchState::opening(possession.opponent(), 35.0, 300);
    state.possession = possession;
    state.offense_direction = possession.attack_direction();
    state.ball_spot = spot;
    state.pending_kickoff = None;
    state
}

pub fn player(side: TeamSide, role: Role, position: Vec2) -> PlayerSpawn {
    PlayerSpawn { side, role, position, attributes: PlayerAttributes::default() }
}

// ============================================================================
// Single-system fixture
// ============================================================================

/// World plus singletons, driven system by system.
pub struct Fixture {
    pub config: EngineConfig,
    pub field: Field,
    pub world: World,
    pub bus: EventBus,
    pub play: PlayState,
    pub match_state: MatchState,
}

impl Fixture {
    fn build(match_state: MatchState, kind: PlayKind) -> Self {
        let config = EngineConfig::default();
        let field = Field::from_config(&config.field);
        let mut world = World::new();
        world.spawn_ball(field.spot(match_state.ball_spot));
        let play = PlayState::new(1, kind, match_state.ball_spot);
        Self { config, field, world, bus: EventBus::new(), play, match_state }
    }

    /// Home ball, 1st & 10 at the home 30, before the snap.
    pub fn pre_snap() -> Self {
        Self::build(scrimmage_state(TeamSide::Home, 30.0), PlayKind::Scrimmage)
    }

    /// Same as [`Fixture::pre_snap`] with the play live.
    pub fn live() -> Self {
        let mut f = Self::pre_snap();
        f.play.phase = PlayPhase::InPlay;
        f
    }

    /// `kicking` about to kick off from its own `kick_line`.
    pub fn kickoff(kicking: TeamSide, kick_line: f32) -> Self {
        let mut state = MatchState::opening(kicking, kick_line, 300);
        state.pending_kickoff = None;
        Self::build(state, PlayKind::Kickoff)
    }

    pub fn spawn(&mut self, side: TeamSide, role: Role, position: Vec2) -> EntityId {
        self.spawn_rated(side, role, position, PlayerAttributes::default())
    }

    pub fn spawn_rated(&mut self, side: TeamSide, role: Role, position: Vec2, attributes: PlayerAttributes) -> EntityId {
        let id = self.world.spawn_player(PlayerSpawn { side, role, position, attributes });
        if let Some(team) = self.world.teams.get_mut(id) {
            team.on_offense = side == self.match_state.possession;
        }
        id
    }

    pub fn command(&mut self, id: EntityId, command: PendingCommand) {
        if let Some(slot) = self.world.commands.get_mut(id) {
            slot.pending = command;
        }
    }

    pub fn give_ball(&mut self, id: EntityId) {
        self.play.ball_state = BallState::Held;
        self.play.ball_owner = Some(id);
        self.world.set_possession(Some(id));
    }

    pub fn intent(&mut self, id: EntityId, direction: Vec2) {
        self.world.intents.insert(id, MovementIntent { direction });
    }
}

// ============================================================================
// Full simulation
// ============================================================================

/// Ids of one 11-vs-11 lineup.
#[derive(Debug, Clone)]
pub struct Roster {
    pub center: EntityId,
    pub quarterback: EntityId,
    pub running_back: EntityId,
    pub receivers: Vec<EntityId>,
    pub linemen: Vec<EntityId>,
    pub defense: Vec<EntityId>,
}

/// Standard pro-set offense for `offense` and a 4-3 defense, lined up on
/// absolute yard `line`.
pub fn eleven_on_eleven(sim: &mut Simulation, offense: TeamSide, line: f32) -> Roster {
    let field = *sim.field();
    let dir = offense.attack_direction();
    let sign = dir.sign();
    let own = distance_from_own_goal(line, dir);
    let at = |yards_back: f32, y: f32| Vec2::new(field.yard_to_x(absolute_from_own(own - yards_back, dir)), y);
    let mid = field.center_y();
    let defense = offense.opponent();

    let center = sim.spawn_player(player(offense, Role::OffensiveLine, at(0.5, mid)));
    let mut linemen = vec![center];
    for dy in [-20.0, -10.0, 10.0, 20.0] {
        linemen.push(sim.spawn_player(player(offense, Role::OffensiveLine, at(0.5, mid + dy))));
    }
    let quarterback = sim.spawn_player(player(offense, Role::Quarterback, at(5.0, mid)));
    let running_back = sim.spawn_player(player(offense, Role::RunningBack, at(7.0, mid)));
    let receivers = vec![
        sim.spawn_player(player(offense, Role::WideReceiver, at(1.0, mid - 180.0))),
        sim.spawn_player(player(offense, Role::WideReceiver, at(1.0, mid + 180.0))),
        sim.spawn_player(player(offense, Role::WideReceiver, at(2.0, mid + 120.0))),
        sim.spawn_player(player(offense, Role::TightEnd, at(1.0, mid + 30.0))),
    ];

    let ahead = |yards: f32, y: f32| Vec2::new(field.yard_to_x(line) + sign * field.yard_to_x(yards), y);
    let mut defenders = Vec::new();
    for dy in [-15.0, -5.0, 5.0, 15.0] {
        defenders.push(sim.spawn_player(player(defense, Role::DefensiveLine, ahead(1.0, mid + dy))));
    }
    for dy in [-40.0, 0.0, 40.0] {
        defenders.push(sim.spawn_player(player(defense, Role::Linebacker, ahead(5.0, mid + dy))));
    }
    for dy in [-180.0, 180.0] {
        defenders.push(sim.spawn_player(player(defense, Role::Cornerback, ahead(7.0, mid + dy))));
    }
    for dy in [-80.0, 80.0] {
        defenders.push(sim.spawn_player(player(defense, Role::Safety, ahead(15.0, mid + dy))));
    }

    Roster { center, quarterback, running_back, receivers, linemen, defense: defenders }
}

/// Home ball at its own 30 with full lineups, before the snap.
pub fn scrimmage_sim() -> (Simulation, Roster) {
    let state = scrimmage_state(TeamSide::Home, 30.0);
    let mut sim = Simulation::with_match_state(EngineConfig::default(), state).expect("default config");
    let roster = eleven_on_eleven(&mut sim, TeamSide::Home, 30.0);
    (sim, roster)
}
