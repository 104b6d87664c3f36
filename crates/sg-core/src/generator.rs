//! Stage generation
//!
//! Builds a stage in five phases:
//! 1. Start room at the grid center
//! 2. Main path of normal rooms growing away from it
//! 3. Boss room off the end of the main path
//! 4. Side branches off main-path rooms
//! 5. Treasure and shop rooms hanging off normal rooms
//!
//! and then resolves every door once. Only a missing start room aborts a run;
//! every other placement failure makes the stage smaller.

use hashbrown::HashSet;

use crate::config::GeneratorConfig;
use crate::direction::{Direction, GridPos};
use crate::error::ConfigError;
use crate::factory::{RoomFactory, connect_all_rooms};
use crate::grid::StageGrid;
use crate::rng::StageRng;
use crate::template::{RoomCategory, TemplatePool};

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub seed: u64,
    /// Start room could not be placed; the grid is empty
    pub aborted: bool,
    /// Main-path length drawn for the run
    pub planned_main_path: u32,
    /// Normal rooms actually placed on the main path
    pub main_path_placed: u32,
    pub boss_placed: bool,
    /// Branches that placed at least one room
    pub branches_grown: u32,
    pub branch_rooms: u32,
    pub treasure_requested: u32,
    pub treasure_placed: u32,
    pub shop_requested: u32,
    pub shop_placed: u32,
    pub connected_doors: usize,
    pub walls: usize,
}

/// Growth point: a placed room and the sockets it still offers
#[derive(Debug, Clone)]
struct Frontier {
    pos: GridPos,
    outgoing: Vec<Direction>,
}

/// Stage generator
///
/// Owns the configuration, the room factory and the single random source of
/// the run. Consecutive calls to [`generate_stage`](Self::generate_stage)
/// keep drawing from the same source.
#[derive(Debug, Clone)]
pub struct StageGenerator {
    config: GeneratorConfig,
    factory: RoomFactory,
    rng: StageRng,
    report: Option<GenerationReport>,
}

impl StageGenerator {
    /// Create a generator, seeding from the configuration or from entropy
    pub fn new(config: GeneratorConfig, pool: TemplatePool) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StageRng::new(seed),
            None => StageRng::from_entropy(),
        };
        Ok(Self {
            config,
            factory: RoomFactory::new(pool),
            rng,
            report: None,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Report of the most recent run
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.report.as_ref()
    }

    /// Generate one stage
    ///
    /// Random draws happen in this order:
    /// 1. main-path length
    /// 2. start template
    /// 3. each main-path step: direction shuffle, then template
    /// 4. boss: direction shuffle, then template
    /// 5. each main-path room but the last: branch chance, then branch
    ///    length and steps as in (3) when the branch is taken
    /// 6. treasure, then shop: each attempt picks a candidate, then a template
    pub fn generate_stage(&mut self) -> StageGrid {
        let mut grid = StageGrid::new(self.config.grid_width, self.config.grid_height);
        let mut report = GenerationReport {
            seed: self.rng.seed(),
            treasure_requested: self.config.treasure_count(),
            shop_requested: self.config.shop_count(),
            ..Default::default()
        };
        log::info!(
            "generating {}x{} stage with seed {}",
            self.config.grid_width,
            self.config.grid_height,
            report.seed
        );

        report.planned_main_path = self
            .rng
            .range_inclusive(self.config.min_main_path_length, self.config.max_main_path_length);

        let start_pos = grid.center();
        let start = self
            .factory
            .create_room(RoomCategory::Start, start_pos, None, None, &mut self.rng);
        let Some(room) = start.placed_room else {
            log::error!("no start template available, aborting stage generation");
            report.aborted = true;
            self.report = Some(report);
            return grid;
        };
        grid.add_room(start_pos, room);

        // Main path
        let frontier = Frontier {
            pos: start_pos,
            outgoing: start.available_outgoing,
        };
        let (path, last) = self.grow_chain(&mut grid, frontier, report.planned_main_path);
        report.main_path_placed = path.len() as u32;
        if report.main_path_placed < report.planned_main_path {
            log::warn!(
                "main path stopped early: {}/{} rooms",
                report.main_path_placed,
                report.planned_main_path
            );
        }

        report.boss_placed = self.place_boss(&mut grid, &last);

        // Branches grow off the start room and every main-path room but the last
        let mut main_path = Vec::with_capacity(path.len() + 1);
        main_path.push(start_pos);
        main_path.extend(path);
        for &pos in &main_path[..main_path.len() - 1] {
            let placed = self.grow_branch(&mut grid, pos);
            if placed > 0 {
                report.branches_grown += 1;
                report.branch_rooms += placed;
            }
        }

        report.treasure_placed =
            self.place_special_rooms(&mut grid, RoomCategory::Treasure, report.treasure_requested);
        report.shop_placed =
            self.place_special_rooms(&mut grid, RoomCategory::Shop, report.shop_requested);

        let summary = connect_all_rooms(&mut grid);
        report.connected_doors = summary.connected;
        report.walls = summary.walls;

        log::info!(
            "stage ready: {} rooms, main path {}/{}, boss {}, {} branches, {} treasure, {} shop",
            grid.room_count(),
            report.main_path_placed,
            report.planned_main_path,
            if report.boss_placed { "placed" } else { "missing" },
            report.branches_grown,
            report.treasure_placed,
            report.shop_placed
        );
        self.report = Some(report);
        grid
    }

    /// First shuffled outgoing direction leading to a free, unvisited cell
    fn pick_direction(
        &mut self,
        grid: &StageGrid,
        frontier: &Frontier,
        visited: &HashSet<GridPos>,
    ) -> Option<Direction> {
        let mut dirs = frontier.outgoing.clone();
        self.rng.shuffle(&mut dirs);
        dirs.into_iter().find(|&dir| {
            let target = frontier.pos.step(dir);
            grid.is_free(target) && !visited.contains(&target)
        })
    }

    /// Grow up to `length` normal rooms from `frontier`
    ///
    /// Returns the placed positions and the last growth point.
    fn grow_chain(
        &mut self,
        grid: &mut StageGrid,
        frontier: Frontier,
        length: u32,
    ) -> (Vec<GridPos>, Frontier) {
        let mut visited = HashSet::new();
        visited.insert(frontier.pos);
        let mut placed = Vec::new();
        let mut current = frontier;

        for _ in 0..length {
            let Some(dir) = self.pick_direction(grid, &current, &visited) else {
                log::debug!("no free direction from {}", current.pos);
                break;
            };
            let target = current.pos.step(dir);
            let result = self.factory.create_room(
                RoomCategory::Normal,
                target,
                None,
                Some(dir.opposite()),
                &mut self.rng,
            );
            let Some(room) = result.placed_room else {
                break;
            };

            log::debug!("placed normal room '{}' at {target}", room.template().name);
            grid.add_room(target, room);
            visited.insert(target);
            placed.push(target);
            current = Frontier {
                pos: target,
                outgoing: result.available_outgoing,
            };
        }

        (placed, current)
    }

    fn place_boss(&mut self, grid: &mut StageGrid, last: &Frontier) -> bool {
        let Some(dir) = self.pick_direction(grid, last, &HashSet::new()) else {
            log::warn!("no free cell next to {} for the boss room", last.pos);
            return false;
        };
        let target = last.pos.step(dir);
        let result = self.factory.create_room(
            RoomCategory::Boss,
            target,
            None,
            Some(dir.opposite()),
            &mut self.rng,
        );
        match result.placed_room {
            Some(room) => {
                log::debug!("placed boss room '{}' at {target}", room.template().name);
                grid.add_room(target, room);
                true
            }
            None => {
                log::warn!("no boss template opens {} at {target}", dir.opposite());
                false
            }
        }
    }

    /// Maybe grow a side branch from the room at `pos`, returning rooms placed
    fn grow_branch(&mut self, grid: &mut StageGrid, pos: GridPos) -> u32 {
        if !self.rng.chance(self.config.branch_probability) {
            return 0;
        }
        let length = 1 + self.rng.below(self.config.max_main_path_length / 3);
        let Some(room) = grid.get_room(pos) else {
            return 0;
        };
        let frontier = Frontier {
            pos,
            outgoing: room.door_directions().collect(),
        };
        let (placed, _) = self.grow_chain(grid, frontier, length);
        log::debug!("branch from {pos}: {}/{length} rooms", placed.len());
        placed.len() as u32
    }

    /// Normal-room doors whose neighbour cell is free and fits `category`
    fn special_candidates(
        &self,
        grid: &StageGrid,
        category: RoomCategory,
    ) -> Vec<(GridPos, Direction)> {
        let pool = self.factory.pool();
        grid.rooms_of(RoomCategory::Normal)
            .flat_map(|room| {
                let pos = room.position();
                room.door_directions().map(move |dir| (pos, dir))
            })
            .filter(|&(pos, dir)| {
                grid.is_free(pos.step(dir)) && pool.has_socket(category, dir.opposite())
            })
            .collect()
    }

    fn place_special_rooms(
        &mut self,
        grid: &mut StageGrid,
        category: RoomCategory,
        wanted: u32,
    ) -> u32 {
        let mut placed = 0;
        let mut attempts = 0;

        while placed < wanted && attempts < self.config.special_room_attempts {
            attempts += 1;
            let candidates = self.special_candidates(grid, category);
            let Some(&(anchor, dir)) = self.rng.choose(&candidates) else {
                log::debug!("no candidate cell left for {category}");
                break;
            };
            let target = anchor.step(dir);
            let result = self.factory.create_room(
                category,
                target,
                None,
                Some(dir.opposite()),
                &mut self.rng,
            );
            if let Some(room) = result.placed_room {
                log::debug!("placed {category} room '{}' at {target}", room.template().name);
                grid.add_room(target, room);
                placed += 1;
            }
        }

        if placed < wanted {
            log::warn!("placed {placed}/{wanted} {category} rooms");
        }
        placed
    }
}
