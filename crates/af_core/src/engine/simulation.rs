//! Simulation Driver
//!
//! Owns the world, the event bus, the match/play singletons, the loop
//! machines and every stateful system, and runs one fixed-order pass per
//! tick.
//!
//! ## Tick order
//! ```text
//!  1 begin_tick            8 loose-ball pickup      15 play-end arbitration
//!  2 action commands       9 boundary whistles      16 down & distance
//!  3 pass start           10 contact detection      17 kickoff after score
//!  4 movement + timers    11 block engagement       18 next-play reset
//!  5 ball flight / loose  12 tackle resolution      19 game clock
//!  6 ball sync            13 fumble check           20 loop machines
//!  7 pass/kick completion 14 fumble resolution      21 telemetry capture
//! ```
//!
//! Gates are read from the on-field machine once, before step 2, and hold
//! for the whole tick.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::components::{FlightKind, MovementIntent, PendingCommand};
use crate::engine::events::{EventBus, PassRequestedEvent};
use crate::engine::field::Field;
use crate::engine::loops::LoopMachines;
use crate::engine::state::{MatchState, PlayKind, PlayState};
use crate::engine::systems::clock::{self, GameClock};
use crate::engine::systems::kickoff::KickoffScheduler;
use crate::engine::systems::play_end::PlayEndArbiter;
use crate::engine::systems::rules::{DownDistance, RulesVariant, StandardRules};
use crate::engine::systems::tackle::TackleBook;
use crate::engine::systems::{
    actions, ball, boundary, contact, engagement, loop_driver, loose_ball, movement, pass, reset, tackle,
    TickContext,
};
use crate::engine::telemetry::{self, SimSnapshot, TelemetryRecord};
use crate::engine::types::{EntityId, Vec2};
use crate::engine::world::{PlayerSpawn, World};
use crate::error::Result;

pub struct Simulation {
    config: EngineConfig,
    field: Field,
    rules: Box<dyn RulesVariant>,
    world: World,
    bus: EventBus,
    match_state: MatchState,
    play: PlayState,
    loops: LoopMachines,
    tackle_book: TackleBook,
    pass_inbox: Vec<PassRequestedEvent>,
    arbiter: PlayEndArbiter,
    down_distance: DownDistance,
    kickoff: KickoffScheduler,
    clock: GameClock,
    telemetry: Vec<TelemetryRecord>,
    tick: u64,
}

impl Simulation {
    /// New match at the opening kickoff.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let tuning = &config.tuning;
        let opening =
            MatchState::opening(tuning.opening_kickoff_team, tuning.kickoff_yard_line, tuning.quarter_seconds);
        Self::with_match_state(config, opening)
    }

    /// Start from an arbitrary match state. A pending kickoff makes the
    /// first play a kickoff.
    pub fn with_match_state(config: EngineConfig, mut match_state: MatchState) -> Result<Self> {
        config.validate()?;
        let loops = LoopMachines::new(config.game_loop.clone(), config.phase_loop.clone())?;
        let field = Field::from_config(&config.field);

        let kind = match match_state.pending_kickoff.take() {
            Some(_) => PlayKind::Kickoff,
            None => PlayKind::Scrimmage,
        };
        let play = PlayState::new(1, kind, match_state.ball_spot);
        let mut world = World::new();
        world.spawn_ball(field.spot(match_state.ball_spot));

        info!(?kind, possession = ?match_state.possession, spot = match_state.ball_spot, "simulation created");
        Ok(Self {
            config,
            field,
            rules: Box::new(StandardRules),
            world,
            bus: EventBus::new(),
            match_state,
            play,
            loops,
            tackle_book: TackleBook::default(),
            pass_inbox: Vec::new(),
            arbiter: PlayEndArbiter::new(),
            down_distance: DownDistance::new(),
            kickoff: KickoffScheduler::new(),
            clock: GameClock::new(),
            telemetry: Vec::new(),
            tick: 0,
        })
    }

    /// Swap the rule set.
    pub fn with_rules(mut self, rules: Box<dyn RulesVariant>) -> Self {
        self.rules = rules;
        self
    }

    // ========================================================================
    // Host input
    // ========================================================================

    pub fn spawn_player(&mut self, spawn: PlayerSpawn) -> EntityId {
        let side = spawn.side;
        let id = self.world.spawn_player(spawn);
        if let Some(team) = self.world.teams.get_mut(id) {
            team.on_offense = side == self.match_state.possession;
        }
        id
    }

    pub fn despawn(&mut self, id: EntityId) {
        self.world.despawn(id);
    }

    /// Desired movement direction; normalized on use.
    pub fn set_intent(&mut self, id: EntityId, direction: Vec2) -> bool {
        match self.world.intents.get_mut(id) {
            Some(intent) => {
                *intent = MovementIntent { direction };
                true
            }
            None => false,
        }
    }

    /// Queue an action command for the next tick.
    pub fn set_command(&mut self, id: EntityId, command: PendingCommand) -> bool {
        match self.world.commands.get_mut(id) {
            Some(slot) => {
                slot.pending = command;
                true
            }
            None => false,
        }
    }

    /// Queue a pass with explicit fallback receivers.
    pub fn request_pass(
        &mut self,
        passer: EntityId,
        target: Option<EntityId>,
        fallbacks: Vec<EntityId>,
        kind: FlightKind,
    ) {
        self.pass_inbox.push(PassRequestedEvent { passer, target, fallbacks, kind });
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    pub fn step(&mut self) -> Result<()> {
        self.bus.begin_tick();
        let gates = self.loops.gates(&self.config.gates);
        let ctx = TickContext {
            config: &self.config,
            field: &self.field,
            gates,
            dt: 1.0 / self.config.tuning.ticks_per_second as f32,
        };

        actions::run(
            &mut self.world,
            &mut self.bus,
            &mut self.play,
            &self.match_state,
            &mut self.pass_inbox,
            &ctx,
        )?;
        pass::start_passes(&mut self.world, &mut self.bus, &mut self.play, &self.match_state, &ctx);
        movement::run(&mut self.world, &mut self.play, &ctx);
        ball::advance(&mut self.world, &self.play, &ctx);
        ball::sync(&mut self.world, &mut self.play);
        pass::resolve_completions(&mut self.world, &mut self.bus, &mut self.play, &self.match_state, &ctx);
        loose_ball::pickup(&mut self.world, &mut self.bus, &mut self.play, &ctx);
        boundary::run(&self.world, &mut self.bus, &mut self.play, &self.match_state, &ctx);
        contact::run(&self.world, &mut self.bus, &self.play, &ctx);
        engagement::run(&mut self.world, &mut self.bus, &ctx)?;
        tackle::run(
            &mut self.world,
            &mut self.bus,
            &mut self.play,
            &self.match_state,
            &mut self.tackle_book,
            &ctx,
        )?;
        loose_ball::check_fumbles(&self.world, &mut self.bus, &mut self.play, &ctx);
        loose_ball::resolve_fumbles(&mut self.world, &self.bus, &mut self.play, &ctx);
        self.arbiter.run(&mut self.world, &mut self.bus, &mut self.play, &self.match_state);
        self.down_distance.run(&self.bus, &mut self.match_state, self.rules.as_ref(), &self.config.tuning);
        self.kickoff.run(&mut self.bus, &mut self.match_state, self.rules.as_ref(), &self.config.tuning);
        reset::run(
            &mut self.world,
            &mut self.bus,
            &mut self.play,
            &mut self.match_state,
            &mut self.tackle_book,
            &ctx,
        );
        let running = clock::is_running(Some(&gates), &self.play);
        self.clock.run(&mut self.bus, &mut self.match_state, &self.config.tuning, running);
        loop_driver::run(&self.bus, &mut self.loops)?;
        telemetry::capture(&self.bus, self.tick, &mut self.telemetry);

        self.tick += 1;
        Ok(())
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        debug!(tick = self.tick, play_id = self.play.play_id, "ran ticks");
        Ok(())
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn play_state(&self) -> &PlayState {
        &self.play
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events published during the last tick.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn game_state_id(&self) -> &str {
        self.loops.game.current()
    }

    pub fn phase_state_id(&self) -> &str {
        self.loops.phase.current()
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot::capture(
            self.tick,
            &self.world,
            &self.match_state,
            &self.play,
            self.game_state_id(),
            self.phase_state_id(),
        )
    }

    /// Telemetry collected since the last drain, oldest first.
    pub fn drain_telemetry(&mut self) -> Vec<TelemetryRecord> {
        std::mem::take(&mut self.telemetry)
    }
}
