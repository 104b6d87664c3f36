//! ASCII dump of a stage
//!
//! One character per room, `-` and `|` between rooms whose doors are
//! connected. The highest row is printed first so North points up.

use sg_core::{Direction, GridPos, StageGrid};

pub fn render_stage(grid: &StageGrid) -> String {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut out = String::new();

    for y in (0..height).rev() {
        for x in 0..width {
            let pos = GridPos::new(x, y);
            out.push(grid.get_room(pos).map_or('.', |r| r.category().symbol()));
            if x + 1 < width {
                out.push(if connected(grid, pos, Direction::East) { '-' } else { ' ' });
            }
        }
        out.push('\n');

        if y > 0 {
            for x in 0..width {
                let pos = GridPos::new(x, y);
                out.push(if connected(grid, pos, Direction::South) { '|' } else { ' ' });
                if x + 1 < width {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
    }

    out
}

fn connected(grid: &StageGrid, pos: GridPos, dir: Direction) -> bool {
    grid.door(pos, dir).is_some_and(|d| d.is_connected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::{RoomCategory, RoomFactory, RoomTemplate, StageRng, TemplatePool};

    #[test]
    fn test_render_two_rooms() {
        let mut pool = TemplatePool::new();
        pool.add(RoomTemplate::new(
            "start",
            RoomCategory::Start,
            &[Direction::East, Direction::North],
        ));
        pool.add(RoomTemplate::new("lair", RoomCategory::Boss, &[Direction::West]));
        let factory = RoomFactory::new(pool);
        let mut rng = StageRng::new(0);
        let mut grid = StageGrid::new(3, 2);

        for (category, pos, entry) in [
            (RoomCategory::Start, GridPos::new(0, 0), None),
            (RoomCategory::Boss, GridPos::new(1, 0), Some(Direction::West)),
        ] {
            let room = factory
                .create_room(category, pos, None, entry, &mut rng)
                .placed_room
                .unwrap();
            grid.add_room(pos, room);
        }
        sg_core::connect_all_rooms(&mut grid);

        assert_eq!(render_stage(&grid), ". . .\n     \nS-B .\n");
    }
}
