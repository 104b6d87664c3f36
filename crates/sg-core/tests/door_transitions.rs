use std::sync::mpsc;

use sg_core::{
    Direction, DoorEvent, DoorState, EntryOutcome, GeneratorConfig, GridPos, RoomCategory,
    RoomFactory, RoomTemplate, StageGenerator, StageGrid, StageRng, TemplatePool,
    connect_all_rooms,
};

const WEST_ROOM: GridPos = GridPos::new(1, 1);
const EAST_ROOM: GridPos = GridPos::new(2, 1);

/// Two rooms joined east-west; the west room also has a dead-end north door
fn two_rooms() -> StageGrid {
    let mut pool = TemplatePool::new();
    pool.add(RoomTemplate::new(
        "start",
        RoomCategory::Start,
        &[Direction::East, Direction::North],
    ));
    pool.add(RoomTemplate::new("hall", RoomCategory::Normal, &[Direction::West]));
    let factory = RoomFactory::new(pool);
    let mut rng = StageRng::new(0);
    let mut grid = StageGrid::new(4, 4);

    for (category, pos, entry) in [
        (RoomCategory::Start, WEST_ROOM, None),
        (RoomCategory::Normal, EAST_ROOM, Some(Direction::West)),
    ] {
        let room = factory
            .create_room(category, pos, None, entry, &mut rng)
            .placed_room
            .unwrap();
        grid.add_room(pos, room);
    }
    connect_all_rooms(&mut grid);
    grid
}

fn pair_states(grid: &StageGrid) -> (Option<DoorState>, Option<DoorState>) {
    (
        grid.door_state(WEST_ROOM, Direction::East),
        grid.door_state(EAST_ROOM, Direction::West),
    )
}

#[test]
fn test_open_propagates_to_partner() {
    let mut grid = two_rooms();
    assert!(grid.open_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Open), Some(DoorState::Open)));
}

#[test]
fn test_close_propagates_to_open_partner() {
    let mut grid = two_rooms();
    grid.open_door(EAST_ROOM, Direction::West);
    assert!(grid.close_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Closed), Some(DoorState::Closed)));
}

#[test]
fn test_locked_partner_refuses_open() {
    let mut grid = two_rooms();
    assert!(grid.lock_door(EAST_ROOM, Direction::West));
    assert!(!grid.open_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Closed), Some(DoorState::Locked)));

    assert!(grid.unlock_door(EAST_ROOM, Direction::West));
    assert!(grid.open_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Open), Some(DoorState::Open)));
}

#[test]
fn test_locking_closes_open_partner() {
    let mut grid = two_rooms();
    assert!(grid.open_door(WEST_ROOM, Direction::East));

    assert_eq!(grid.lock_room(EAST_ROOM), 1);
    assert_eq!(pair_states(&grid), (Some(DoorState::Closed), Some(DoorState::Locked)));

    // The closed side swallows the crossing; the locked room stays sealed
    let mut events: Vec<DoorEvent> = Vec::new();
    assert_eq!(
        grid.signal_entry(WEST_ROOM, Direction::East, &mut events),
        EntryOutcome::Ignored
    );
    assert!(events.is_empty());
    assert!(!grid.open_door(WEST_ROOM, Direction::East));

    assert_eq!(grid.unlock_room(EAST_ROOM), 1);
    assert_eq!(pair_states(&grid), (Some(DoorState::Closed), Some(DoorState::Closed)));
    assert!(grid.open_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Open), Some(DoorState::Open)));
}

#[test]
fn test_lock_door_closes_open_partner() {
    let mut grid = two_rooms();
    grid.open_door(EAST_ROOM, Direction::West);
    assert!(grid.lock_door(WEST_ROOM, Direction::East));
    assert_eq!(pair_states(&grid), (Some(DoorState::Locked), Some(DoorState::Closed)));
}

#[test]
fn test_lock_and_unlock_room() {
    let mut grid = two_rooms();
    grid.open_door(WEST_ROOM, Direction::East);
    // Only the connected door locks; the north door is a wall
    assert_eq!(grid.lock_room(WEST_ROOM), 1);
    assert_eq!(grid.door_state(WEST_ROOM, Direction::East), Some(DoorState::Locked));
    assert_eq!(grid.door_state(WEST_ROOM, Direction::North), Some(DoorState::Wall));
    assert_eq!(grid.door_state(EAST_ROOM, Direction::West), Some(DoorState::Closed));
    assert_eq!(grid.unlock_room(WEST_ROOM), 1);
    assert_eq!(grid.door_state(WEST_ROOM, Direction::East), Some(DoorState::Closed));
    assert_eq!(grid.unlock_room(WEST_ROOM), 0);
    assert_eq!(grid.lock_room(GridPos::new(3, 3)), 0);
}

#[test]
fn test_wall_survives_every_transition() {
    let mut grid = two_rooms();
    let pos = WEST_ROOM;
    let dir = Direction::North;
    assert_eq!(grid.door_state(pos, dir), Some(DoorState::Wall));

    assert!(!grid.open_door(pos, dir));
    assert!(!grid.close_door(pos, dir));
    assert!(!grid.lock_door(pos, dir));
    assert!(!grid.unlock_door(pos, dir));
    grid.lock_room(pos);
    grid.unlock_room(pos);
    connect_all_rooms(&mut grid);
    assert_eq!(grid.door_state(pos, dir), Some(DoorState::Wall));
}

#[test]
fn test_walls_in_generated_stage_are_final() {
    let mut generator =
        StageGenerator::new(GeneratorConfig::default().with_seed(3), TemplatePool::standard())
            .unwrap();
    let mut grid = generator.generate_stage();
    let walls: Vec<(GridPos, Direction)> = grid
        .rooms()
        .flat_map(|room| {
            room.doors()
                .iter()
                .filter(|d| d.state() == DoorState::Wall)
                .map(move |d| (room.position(), d.direction()))
        })
        .collect();
    assert!(!walls.is_empty());

    for &(pos, dir) in &walls {
        grid.open_door(pos, dir);
        grid.lock_door(pos, dir);
        grid.unlock_door(pos, dir);
        grid.close_door(pos, dir);
    }
    let positions = grid.positions().to_vec();
    for pos in positions {
        grid.lock_room(pos);
        grid.unlock_room(pos);
    }
    for (pos, dir) in walls {
        assert_eq!(grid.door_state(pos, dir), Some(DoorState::Wall));
    }
}

#[test]
fn test_entry_forwarded_only_through_open_door() {
    let mut grid = two_rooms();
    let mut events: Vec<DoorEvent> = Vec::new();

    // Closed: swallowed
    assert_eq!(
        grid.signal_entry(WEST_ROOM, Direction::East, &mut events),
        EntryOutcome::Ignored
    );
    // Wall: swallowed
    assert_eq!(
        grid.signal_entry(WEST_ROOM, Direction::North, &mut events),
        EntryOutcome::Ignored
    );
    assert!(events.is_empty());

    grid.open_door(WEST_ROOM, Direction::East);
    assert_eq!(
        grid.signal_entry(WEST_ROOM, Direction::East, &mut events),
        EntryOutcome::Entered
    );
    assert_eq!(
        events,
        vec![DoorEvent::Entered {
            room: EAST_ROOM,
            entry_door: Direction::West,
        }]
    );
}

#[test]
fn test_locked_entry_reports_blocked() {
    let mut grid = two_rooms();
    grid.lock_door(WEST_ROOM, Direction::East);
    let mut events: Vec<DoorEvent> = Vec::new();
    assert_eq!(
        grid.signal_entry(WEST_ROOM, Direction::East, &mut events),
        EntryOutcome::Blocked
    );
    assert_eq!(
        events,
        vec![DoorEvent::Blocked {
            room: WEST_ROOM,
            door: Direction::East,
        }]
    );
}

#[test]
fn test_entry_events_over_channel() {
    let mut grid = two_rooms();
    grid.open_door(EAST_ROOM, Direction::West);
    let (mut tx, rx) = mpsc::channel::<DoorEvent>();

    assert_eq!(
        grid.signal_entry(EAST_ROOM, Direction::West, &mut tx),
        EntryOutcome::Entered
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        DoorEvent::Entered {
            room: WEST_ROOM,
            entry_door: Direction::East,
        }
    );

    // Nobody listening: the signal still resolves
    drop(rx);
    assert_eq!(
        grid.signal_entry(EAST_ROOM, Direction::West, &mut tx),
        EntryOutcome::Entered
    );
}

#[test]
fn test_door_towards_neighbour() {
    let grid = two_rooms();
    let door = grid.door_towards(WEST_ROOM, EAST_ROOM).unwrap();
    assert_eq!(door.direction(), Direction::East);
    assert_eq!(door.link().map(|l| l.room), Some(EAST_ROOM));
    assert!(grid.door_towards(EAST_ROOM, GridPos::new(2, 3)).is_none());
}
