//! Stage grid: sparse storage of placed rooms
//!
//! The grid only stores and looks up rooms. Placement decisions live in the
//! generator; an insert the grid cannot honour is silently ignored.

use hashbrown::HashMap;

use crate::direction::{Direction, GridPos, direction_from_to};
use crate::door::{Door, DoorState};
use crate::events::{DoorEvent, DoorEventSink, EntryOutcome};
use crate::room::RoomInstance;
use crate::template::RoomCategory;

/// Rooms of one stage keyed by grid position
#[derive(Debug, Clone, PartialEq)]
pub struct StageGrid {
    width: i32,
    height: i32,
    cells: HashMap<GridPos, RoomInstance>,
    /// Positions in placement order
    order: Vec<GridPos>,
    start: Option<GridPos>,
    boss: Option<GridPos>,
}

impl StageGrid {
    /// Create an empty grid
    ///
    /// Dimensions beyond `i32::MAX` are clamped to it.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
            cells: HashMap::new(),
            order: Vec::new(),
            start: None,
            boss: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Center cell, where the start room goes
    pub fn center(&self) -> GridPos {
        GridPos::new(self.width / 2, self.height / 2)
    }

    /// Bounds check only
    pub fn is_valid_position(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn has_room(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// In bounds and unoccupied
    pub fn is_free(&self, pos: GridPos) -> bool {
        self.is_valid_position(pos) && !self.has_room(pos)
    }

    pub fn get_room(&self, pos: GridPos) -> Option<&RoomInstance> {
        self.cells.get(&pos)
    }

    pub fn get_room_mut(&mut self, pos: GridPos) -> Option<&mut RoomInstance> {
        self.cells.get_mut(&pos)
    }

    /// Insert a room at `pos`
    ///
    /// Ignored if `pos` is occupied or out of bounds. The room's own
    /// position must equal `pos`.
    pub fn add_room(&mut self, pos: GridPos, room: RoomInstance) {
        if !self.is_free(pos) {
            log::debug!("ignoring {} room at {pos}: cell unavailable", room.category());
            return;
        }
        assert_eq!(room.position(), pos, "room stored under a foreign key");

        match room.category() {
            RoomCategory::Start => self.start = Some(pos),
            RoomCategory::Boss => self.boss = Some(pos),
            _ => {}
        }
        self.cells.insert(pos, room);
        self.order.push(pos);
    }

    pub fn start_position(&self) -> Option<GridPos> {
        self.start
    }

    pub fn boss_position(&self) -> Option<GridPos> {
        self.boss
    }

    pub fn room_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Positions in placement order
    pub fn positions(&self) -> &[GridPos] {
        &self.order
    }

    /// Rooms in placement order
    pub fn rooms(&self) -> impl Iterator<Item = &RoomInstance> + '_ {
        self.order.iter().filter_map(|pos| self.cells.get(pos))
    }

    pub fn rooms_of(&self, category: RoomCategory) -> impl Iterator<Item = &RoomInstance> + '_ {
        self.rooms().filter(move |r| r.category() == category)
    }

    /// Room adjacent to `pos` in `dir`
    pub fn neighbor(&self, pos: GridPos, dir: Direction) -> Option<&RoomInstance> {
        self.get_room(pos.step(dir))
    }

    pub fn door(&self, pos: GridPos, dir: Direction) -> Option<&Door> {
        self.get_room(pos).and_then(|r| r.door(dir))
    }

    pub fn door_state(&self, pos: GridPos, dir: Direction) -> Option<DoorState> {
        self.door(pos, dir).map(Door::state)
    }

    /// The door of the room at `from` that faces `to`
    pub fn door_towards(&self, from: GridPos, to: GridPos) -> Option<&Door> {
        self.door(from, direction_from_to(from, to))
    }

    /// Check that no door is left unresolved
    pub fn is_fully_resolved(&self) -> bool {
        self.cells
            .values()
            .flat_map(RoomInstance::doors)
            .all(|d| d.state() != DoorState::Hidden)
    }

    fn door_mut(&mut self, pos: GridPos, dir: Direction) -> Option<&mut Door> {
        self.cells.get_mut(&pos).and_then(|r| r.door_mut(dir))
    }

    /// Open a connected door together with its partner
    ///
    /// Refused if either side is locked, so a connection is never half open.
    pub fn open_door(&mut self, pos: GridPos, dir: Direction) -> bool {
        let Some(door) = self.door(pos, dir) else {
            return false;
        };
        let Some(link) = door.link() else {
            return false;
        };
        if !matches!(door.state(), DoorState::Closed | DoorState::Open) {
            return false;
        }
        if self.door_state(link.room, link.door) == Some(DoorState::Locked) {
            return false;
        }

        let opened = self.door_mut(pos, dir).is_some_and(Door::open);
        if opened && let Some(partner) = self.door_mut(link.room, link.door) {
            partner.open();
        }
        opened
    }

    /// Close a door; an open partner closes with it
    pub fn close_door(&mut self, pos: GridPos, dir: Direction) -> bool {
        let Some(door) = self.door_mut(pos, dir) else {
            return false;
        };
        let link = door.link();
        if !door.close() {
            return false;
        }
        if let Some(link) = link
            && let Some(partner) = self.door_mut(link.room, link.door)
            && partner.state() == DoorState::Open
        {
            partner.close();
        }
        true
    }

    /// Lock one side of a connection
    ///
    /// An open partner is closed, so a locked connection is never half open.
    /// The partner itself stays unlocked.
    pub fn lock_door(&mut self, pos: GridPos, dir: Direction) -> bool {
        let Some(door) = self.door_mut(pos, dir) else {
            return false;
        };
        let link = door.link();
        if !door.lock() {
            return false;
        }
        if let Some(link) = link
            && let Some(partner) = self.door_mut(link.room, link.door)
            && partner.state() == DoorState::Open
        {
            partner.close();
        }
        true
    }

    /// Unlock one side of a connection, leaving it closed
    pub fn unlock_door(&mut self, pos: GridPos, dir: Direction) -> bool {
        self.door_mut(pos, dir).is_some_and(Door::unlock)
    }

    /// Lock every door of a room, returning how many are locked
    pub fn lock_room(&mut self, pos: GridPos) -> usize {
        self.room_doors(pos)
            .into_iter()
            .map(|dir| self.lock_door(pos, dir))
            .filter(|&locked| locked)
            .count()
    }

    /// Unlock every locked door of a room, returning how many changed
    pub fn unlock_room(&mut self, pos: GridPos) -> usize {
        self.room_doors(pos)
            .into_iter()
            .map(|dir| self.unlock_door(pos, dir))
            .filter(|&unlocked| unlocked)
            .count()
    }

    fn room_doors(&self, pos: GridPos) -> Vec<Direction> {
        self.get_room(pos)
            .map(|room| room.door_directions().collect())
            .unwrap_or_default()
    }

    /// Player crossed the threshold of the door at (`pos`, `dir`)
    ///
    /// Only an open, connected door forwards the crossing: the sink learns
    /// which room is entered and through which of its doors. A locked door
    /// reports a blocked attempt. Anything else is swallowed.
    pub fn signal_entry(
        &self,
        pos: GridPos,
        dir: Direction,
        sink: &mut impl DoorEventSink,
    ) -> EntryOutcome {
        let Some(door) = self.door(pos, dir) else {
            return EntryOutcome::Ignored;
        };
        match (door.state(), door.link()) {
            (DoorState::Open, Some(link)) => {
                sink.on_door_event(DoorEvent::Entered {
                    room: link.room,
                    entry_door: link.door,
                });
                EntryOutcome::Entered
            }
            (DoorState::Locked, _) => {
                sink.on_door_event(DoorEvent::Blocked { room: pos, door: dir });
                EntryOutcome::Blocked
            }
            _ => EntryOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::template::RoomTemplate;

    fn room(category: RoomCategory, pos: GridPos, dirs: &[Direction]) -> RoomInstance {
        RoomInstance::new(Arc::new(RoomTemplate::new("t", category, dirs)), pos)
    }

    #[test]
    fn test_bounds() {
        let grid = StageGrid::new(8, 6);
        assert!(grid.is_valid_position(GridPos::new(0, 0)));
        assert!(grid.is_valid_position(GridPos::new(7, 5)));
        assert!(!grid.is_valid_position(GridPos::new(8, 0)));
        assert!(!grid.is_valid_position(GridPos::new(0, 6)));
        assert!(!grid.is_valid_position(GridPos::new(-1, 2)));
        assert_eq!(grid.center(), GridPos::new(4, 3));
    }

    #[test]
    fn test_oversized_dimensions_clamp() {
        let grid = StageGrid::new(u32::MAX, 4);
        assert_eq!(grid.width(), i32::MAX as u32);
        assert_eq!(grid.height(), 4);
        assert!(grid.is_valid_position(GridPos::new(i32::MAX - 1, 3)));
        assert!(!grid.is_valid_position(GridPos::new(-1, 0)));
    }

    #[test]
    fn test_add_room_tracks_start_and_boss() {
        let mut grid = StageGrid::new(8, 8);
        let s = GridPos::new(4, 4);
        let b = GridPos::new(4, 5);
        grid.add_room(s, room(RoomCategory::Start, s, &[Direction::North]));
        grid.add_room(b, room(RoomCategory::Boss, b, &[Direction::South]));
        assert_eq!(grid.start_position(), Some(s));
        assert_eq!(grid.boss_position(), Some(b));
        assert_eq!(grid.room_count(), 2);
        assert_eq!(grid.positions(), &[s, b]);
        assert_eq!(grid.neighbor(s, Direction::North).map(|r| r.position()), Some(b));
        assert!(grid.neighbor(s, Direction::East).is_none());
    }

    #[test]
    fn test_add_room_ignores_occupied_and_out_of_bounds() {
        let mut grid = StageGrid::new(4, 4);
        let p = GridPos::new(1, 1);
        grid.add_room(p, room(RoomCategory::Normal, p, &[Direction::East]));
        grid.add_room(p, room(RoomCategory::Boss, p, &[Direction::West]));
        assert_eq!(grid.room_count(), 1);
        assert_eq!(grid.get_room(p).map(|r| r.category()), Some(RoomCategory::Normal));
        assert_eq!(grid.boss_position(), None);

        let out = GridPos::new(4, 1);
        grid.add_room(out, room(RoomCategory::Normal, out, &[Direction::East]));
        assert!(!grid.has_room(out));
        assert_eq!(grid.room_count(), 1);
    }

    #[test]
    fn test_rooms_of_category() {
        let mut grid = StageGrid::new(4, 4);
        for x in 0..3 {
            let p = GridPos::new(x, 0);
            grid.add_room(p, room(RoomCategory::Normal, p, &[Direction::North]));
        }
        let p = GridPos::new(0, 1);
        grid.add_room(p, room(RoomCategory::Shop, p, &[Direction::South]));
        assert_eq!(grid.rooms_of(RoomCategory::Normal).count(), 3);
        assert_eq!(grid.rooms_of(RoomCategory::Shop).count(), 1);
        assert!(!grid.is_fully_resolved());
    }
}
