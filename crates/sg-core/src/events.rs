//! Door entry notifications
//!
//! Gameplay code reports a player crossing a door threshold through
//! [`StageGrid::signal_entry`](crate::StageGrid::signal_entry). The grid
//! decides whether the crossing means anything and forwards it to a sink
//! supplied by the caller, so the core keeps no global listeners.

use std::sync::mpsc::Sender;

use crate::direction::{Direction, GridPos};

/// Notification for the collaborator that moves the player and camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEvent {
    /// The player went through an open, connected door
    Entered {
        /// Room the player is arriving in
        room: GridPos,
        /// Door of that room the player arrives through
        entry_door: Direction,
    },
    /// The player bumped into a locked door
    Blocked { room: GridPos, door: Direction },
}

/// What happened to an entry signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Entered,
    Blocked,
    Ignored,
}

/// Receiver of door notifications
pub trait DoorEventSink {
    fn on_door_event(&mut self, event: DoorEvent);
}

impl DoorEventSink for Vec<DoorEvent> {
    fn on_door_event(&mut self, event: DoorEvent) {
        self.push(event);
    }
}

impl DoorEventSink for Sender<DoorEvent> {
    fn on_door_event(&mut self, event: DoorEvent) {
        // A dropped receiver just means nobody is listening any more
        if self.send(event).is_err() {
            log::debug!("door event dropped, receiver gone: {event:?}");
        }
    }
}
