//! Feeds this tick's engine events to both loop machines, then applies any
//! unconditional `next` edges.

use crate::engine::events::{
    BallKickedEvent, EventBus, GameEndedEvent, HalftimeEvent, PlayEndedEvent, PlayResetEvent, SnapEvent,
};
use crate::engine::loops::{loop_event, LoopMachines};
use crate::error::Result;

/// Loop events implied by the bus, in raise order.
pub fn pending_loop_events(bus: &EventBus) -> Vec<&'static str> {
    let mut events = Vec::new();
    if !bus.read::<SnapEvent>().is_empty() || !bus.read::<BallKickedEvent>().is_empty() {
        events.push(loop_event::SNAP);
    }
    if !bus.read::<PlayEndedEvent>().is_empty() {
        events.push(loop_event::WHISTLE);
    }
    if !bus.read::<PlayResetEvent>().is_empty() {
        events.push(loop_event::RESET);
    }
    if !bus.read::<HalftimeEvent>().is_empty() {
        events.push(loop_event::HALFTIME);
    }
    if !bus.read::<GameEndedEvent>().is_empty() {
        events.push(loop_event::GAME_ENDED);
    }
    events
}

pub fn run(bus: &EventBus, loops: &mut LoopMachines) -> Result<()> {
    for event in pending_loop_events(bus) {
        loops.game.raise_event(event)?;
        loops.phase.raise_event(event)?;
    }
    loops.tick()
}
