//! sg-core: Room-graph generation for dungeon stages
//!
//! Decides how many rooms a stage has, where each one sits on an integer
//! grid, which rooms are special (start, boss, treasure, shop) and how the
//! doors between neighbouring rooms resolve to connections or walls.
//!
//! What a room looks like or contains is left to other crates: the output is
//! a finalized [`StageGrid`] plus door state transitions for gameplay code.
//!
//! ```
//! use sg_core::{GeneratorConfig, StageGenerator, TemplatePool};
//!
//! let config = GeneratorConfig::default().with_seed(42);
//! let mut generator = StageGenerator::new(config, TemplatePool::standard()).unwrap();
//! let stage = generator.generate_stage();
//! assert!(stage.start_position().is_some());
//! assert!(stage.is_fully_resolved());
//! ```

pub mod config;
pub mod direction;
pub mod door;
pub mod error;
pub mod events;
pub mod factory;
pub mod generator;
pub mod grid;
pub mod rng;
pub mod room;
pub mod template;

pub use config::GeneratorConfig;
pub use direction::{Direction, GridPos, direction_from_to};
pub use door::{Door, DoorLink, DoorState};
pub use error::{ConfigError, TemplateError};
pub use events::{DoorEvent, DoorEventSink, EntryOutcome};
pub use factory::{ConnectionSummary, PlacementResult, RoomFactory, connect_all_rooms};
pub use generator::{GenerationReport, StageGenerator};
pub use grid::StageGrid;
pub use rng::StageRng;
pub use room::{RoomEvent, RoomInstance};
pub use template::{
    ContentDescriptor, DoorSocket, RoomCategory, RoomTemplate, SpawnPoint, TemplatePool,
};
