//! Room instances
//!
//! A room instance is one placed copy of a template: a fixed grid position,
//! one door per template socket and a cleared flag owned by gameplay code.

use std::sync::Arc;

use crate::direction::{Direction, GridPos};
use crate::door::{Door, DoorState};
use crate::template::{RoomCategory, RoomTemplate};

/// Gameplay notifications that may clear a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomEvent {
    /// The player walked in
    Visited,
    /// Every regular enemy in the room died
    EnemiesDefeated,
    /// The boss died
    BossDefeated,
}

/// A placed room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInstance {
    template: Arc<RoomTemplate>,
    position: GridPos,
    /// One entry per template socket, in socket order
    doors: Vec<Door>,
    /// Written by gameplay code only
    pub cleared: bool,
}

impl RoomInstance {
    /// Instantiate a template at `position` with every door hidden
    pub fn new(template: Arc<RoomTemplate>, position: GridPos) -> Self {
        let doors = template.socket_directions().map(Door::new).collect();
        Self {
            template,
            position,
            doors,
            cleared: false,
        }
    }

    pub fn template(&self) -> &Arc<RoomTemplate> {
        &self.template
    }

    pub fn category(&self) -> RoomCategory {
        self.template.category
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn door(&self, dir: Direction) -> Option<&Door> {
        self.doors.iter().find(|d| d.direction() == dir)
    }

    /// Single-side access; gameplay transitions go through the grid
    pub(crate) fn door_mut(&mut self, dir: Direction) -> Option<&mut Door> {
        self.doors.iter_mut().find(|d| d.direction() == dir)
    }

    pub fn has_door(&self, dir: Direction) -> bool {
        self.door(dir).is_some()
    }

    pub fn door_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.doors.iter().map(Door::direction)
    }

    pub fn door_state(&self, dir: Direction) -> Option<DoorState> {
        self.door(dir).map(Door::state)
    }

    /// Apply a gameplay event, returning true if it cleared the room
    pub fn apply_event(&mut self, event: RoomEvent) -> bool {
        let clears = match self.category() {
            RoomCategory::Normal => event == RoomEvent::EnemiesDefeated,
            RoomCategory::Boss => event == RoomEvent::BossDefeated,
            RoomCategory::Start | RoomCategory::Treasure | RoomCategory::Shop => {
                event == RoomEvent::Visited
            }
        };
        if clears && !self.cleared {
            self.cleared = true;
            return true;
        }
        false
    }

    /// Check if entering this room should seal it until cleared
    pub fn should_lock_on_entry(&self) -> bool {
        self.category().has_encounter() && !self.cleared
    }
}
