//! Door instances and their state machine
//!
//! Door states:
//! - Hidden: freshly created, not yet resolved by `connect_all_rooms`
//! - Closed / Open / Locked: connected to a partner door
//! - Wall: terminal, no partner exists and none ever will
//!
//! A door refers to its partner by (room position, door direction) instead of
//! holding a reference, so two rooms never own each other. Transitions that
//! must reach the partner (open, close, lock) are driven through
//! [`StageGrid`](crate::StageGrid); the methods here only move one side.

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, GridPos};

/// Door state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoorState {
    #[default]
    Hidden,
    Closed,
    Open,
    Locked,
    Wall,
}

impl DoorState {
    /// Check if a door in this state has (or must have) a partner
    pub const fn is_connected_state(self) -> bool {
        matches!(self, DoorState::Closed | DoorState::Open | DoorState::Locked)
    }

    /// Wall is the only state with no way out
    pub const fn is_terminal(self) -> bool {
        matches!(self, DoorState::Wall)
    }
}

/// Non-owning link to the partner door in an adjacent room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorLink {
    /// Grid position of the partner room
    pub room: GridPos,
    /// Direction of the partner door inside that room
    pub door: Direction,
}

/// A door of one room instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    direction: Direction,
    state: DoorState,
    link: Option<DoorLink>,
}

impl Door {
    /// Create an unresolved door
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: DoorState::Hidden,
            link: None,
        }
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn state(&self) -> DoorState {
        self.state
    }

    pub const fn link(&self) -> Option<DoorLink> {
        self.link
    }

    pub const fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Resolve this side as connected to `link`
    ///
    /// Re-asserts `Closed` on an already connected door. A `Wall` door is
    /// left untouched.
    ///
    /// # Panics
    /// Panics if the partner door does not face back at this one.
    pub(crate) fn connect(&mut self, link: DoorLink) {
        assert_eq!(
            link.door,
            self.direction.opposite(),
            "door link direction mismatch"
        );
        if self.state.is_terminal() {
            return;
        }
        self.state = DoorState::Closed;
        self.link = Some(link);
    }

    /// Resolve this side as a permanent wall
    pub(crate) fn seal(&mut self) {
        self.state = DoorState::Wall;
        self.link = None;
    }

    /// Closed -> Open on this side only
    ///
    /// Returns true if the door is open afterwards.
    pub(crate) fn open(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Open if self.link.is_some() => {
                self.state = DoorState::Open;
                true
            }
            _ => false,
        }
    }

    /// {Closed, Open, Locked} -> Closed on this side only
    pub(crate) fn close(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Open | DoorState::Locked => {
                self.state = DoorState::Closed;
                true
            }
            _ => false,
        }
    }

    /// {Closed, Open} -> Locked
    pub(crate) fn lock(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Open => {
                self.state = DoorState::Locked;
                true
            }
            DoorState::Locked => true,
            _ => false,
        }
    }

    /// Locked -> Closed
    pub(crate) fn unlock(&mut self) -> bool {
        match self.state {
            DoorState::Locked => {
                self.state = DoorState::Closed;
                true
            }
            _ => false,
        }
    }
}
