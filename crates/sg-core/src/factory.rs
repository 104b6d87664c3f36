//! Room instantiation and door resolution
//!
//! `create_room` turns a template into a room instance but never touches the
//! grid. `connect_all_rooms` runs once placement is over and resolves every
//! door to either a connection or a wall.

use std::sync::Arc;

use crate::direction::{Direction, GridPos};
use crate::door::{DoorLink, DoorState};
use crate::grid::StageGrid;
use crate::rng::StageRng;
use crate::room::RoomInstance;
use crate::template::{RoomCategory, RoomTemplate, TemplatePool};

/// Outcome of one placement attempt
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    pub placed_room: Option<RoomInstance>,
    /// Socket directions of the placed room minus the one it was entered by
    pub available_outgoing: Vec<Direction>,
}

impl PlacementResult {
    pub fn failed() -> Self {
        Self {
            placed_room: None,
            available_outgoing: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.placed_room.is_some()
    }
}

/// Counts from one door resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionSummary {
    /// Doors resolved to a connection (two per connected pair)
    pub connected: usize,
    pub walls: usize,
}

/// Builds room instances from a template pool
#[derive(Debug, Clone)]
pub struct RoomFactory {
    pool: TemplatePool,
}

impl RoomFactory {
    pub fn new(pool: TemplatePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &TemplatePool {
        &self.pool
    }

    /// Instantiate a room of `category` at `position`
    ///
    /// `required_incoming` is the socket direction on the new room through
    /// which it is entered. Without an explicit `template`, the pool's
    /// templates for `category` having that socket are shuffled and the first
    /// is taken. The placement fails when no template qualifies.
    pub fn create_room(
        &self,
        category: RoomCategory,
        position: GridPos,
        template: Option<Arc<RoomTemplate>>,
        required_incoming: Option<Direction>,
        rng: &mut StageRng,
    ) -> PlacementResult {
        let template = match template {
            Some(t) if required_incoming.is_none_or(|dir| t.has_socket(dir)) => Some(t),
            Some(t) => {
                log::debug!(
                    "template '{}' lacks required {:?} socket",
                    t.name,
                    required_incoming
                );
                None
            }
            None => {
                let mut candidates = self.pool.candidates(category, required_incoming);
                rng.shuffle(&mut candidates);
                candidates.into_iter().next()
            }
        };

        let Some(template) = template else {
            log::debug!(
                "no {category} template fits {position} (entry {:?})",
                required_incoming
            );
            return PlacementResult::failed();
        };

        let available_outgoing = template
            .socket_directions()
            .filter(|&dir| Some(dir) != required_incoming)
            .collect();
        let room = RoomInstance::new(template, position);

        PlacementResult {
            placed_room: Some(room),
            available_outgoing,
        }
    }
}

/// Resolve every door on the grid
///
/// A door whose neighbour cell is empty, or whose neighbour has no door
/// facing back, becomes a wall. Otherwise both doors are connected and set
/// to closed. Running it again re-asserts the same result; a wall stays a
/// wall and takes its would-be partner with it.
pub fn connect_all_rooms(grid: &mut StageGrid) -> ConnectionSummary {
    let mut plan: Vec<(GridPos, Direction, Option<DoorLink>)> = Vec::new();

    for room in grid.rooms() {
        let pos = room.position();
        for door in room.doors() {
            let dir = door.direction();
            let back = dir.opposite();
            let neighbor = pos.step(dir);
            let partner_state = grid.door_state(neighbor, back);

            let link = match partner_state {
                Some(state) if state != DoorState::Wall && door.state() != DoorState::Wall => {
                    Some(DoorLink {
                        room: neighbor,
                        door: back,
                    })
                }
                _ => None,
            };
            plan.push((pos, dir, link));
        }
    }

    let mut summary = ConnectionSummary::default();
    for (pos, dir, link) in plan {
        let Some(door) = grid.get_room_mut(pos).and_then(|r| r.door_mut(dir)) else {
            continue;
        };
        match link {
            Some(link) => {
                door.connect(link);
                summary.connected += 1;
            }
            None => {
                door.seal();
                summary.walls += 1;
            }
        }
    }

    log::debug!(
        "resolved doors: {} connected, {} walls",
        summary.connected,
        summary.walls
    );
    summary
}
