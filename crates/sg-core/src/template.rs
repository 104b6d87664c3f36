//! Room templates and template pools
//!
//! A template is authored data: a category, a fixed set of door sockets and
//! an opaque content descriptor that the generator never looks inside.

use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::direction::Direction;
use crate::error::TemplateError;

/// Room category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum RoomCategory {
    /// Entry room, placed once at the grid center
    Start,
    /// Ordinary combat room on the main path or a branch
    #[default]
    Normal,
    /// Final room at the end of the main path
    Boss,
    /// Treasure room hanging off a normal room
    Treasure,
    /// Shop hanging off a normal room
    Shop,
}

impl RoomCategory {
    /// Special rooms are placed after the main path and branches
    pub const SPECIAL: [RoomCategory; 2] = [RoomCategory::Treasure, RoomCategory::Shop];

    /// Check if rooms of this category hold enemies that must be cleared
    pub const fn has_encounter(self) -> bool {
        matches!(self, RoomCategory::Normal | RoomCategory::Boss)
    }

    /// Check if this is a treasure or shop room
    pub const fn is_special(self) -> bool {
        matches!(self, RoomCategory::Treasure | RoomCategory::Shop)
    }

    /// Single character used in map dumps
    pub const fn symbol(self) -> char {
        match self {
            RoomCategory::Start => 'S',
            RoomCategory::Normal => 'N',
            RoomCategory::Boss => 'B',
            RoomCategory::Treasure => 'T',
            RoomCategory::Shop => '$',
        }
    }
}

/// A place on a template where a door can exist
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorSocket {
    pub direction: Direction,
    /// Local anchor for the placement collaborator
    #[serde(default)]
    pub anchor: (f32, f32),
}

impl DoorSocket {
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            anchor: (0.0, 0.0),
        }
    }

    pub const fn with_anchor(direction: Direction, anchor: (f32, f32)) -> Self {
        Self { direction, anchor }
    }
}

/// Spawn location consumed by content population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub tag: String,
    pub local: (f32, f32),
}

/// Opaque content data attached to a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
}

/// Authored room description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    pub category: RoomCategory,
    sockets: Vec<DoorSocket>,
    #[serde(default)]
    pub content: ContentDescriptor,
}

impl RoomTemplate {
    /// Create a template with one anchorless socket per direction
    ///
    /// # Panics
    /// Panics if `directions` repeats a direction.
    pub fn new(name: impl Into<String>, category: RoomCategory, directions: &[Direction]) -> Self {
        let sockets = directions.iter().map(|&d| DoorSocket::new(d)).collect();
        Self::with_sockets(name, category, sockets)
    }

    /// Create a template from explicit sockets
    ///
    /// # Panics
    /// Panics if two sockets share a direction.
    pub fn with_sockets(
        name: impl Into<String>,
        category: RoomCategory,
        sockets: Vec<DoorSocket>,
    ) -> Self {
        let template = Self {
            name: name.into(),
            category,
            sockets,
            content: ContentDescriptor::default(),
        };
        if let Err(err) = template.validate() {
            panic!("malformed room template: {err}");
        }
        template
    }

    /// Attach a content descriptor
    pub fn with_content(mut self, content: ContentDescriptor) -> Self {
        self.content = content;
        self
    }

    /// Check that no direction carries two sockets
    pub fn validate(&self) -> Result<(), TemplateError> {
        for (i, socket) in self.sockets.iter().enumerate() {
            if self.sockets[..i]
                .iter()
                .any(|s| s.direction == socket.direction)
            {
                return Err(TemplateError::DuplicateSocket {
                    template: self.name.clone(),
                    direction: socket.direction,
                });
            }
        }
        Ok(())
    }

    pub fn sockets(&self) -> &[DoorSocket] {
        &self.sockets
    }

    /// Socket directions in authoring order
    pub fn socket_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.sockets.iter().map(|s| s.direction)
    }

    pub fn has_socket(&self, dir: Direction) -> bool {
        self.sockets.iter().any(|s| s.direction == dir)
    }

    pub fn socket(&self, dir: Direction) -> Option<&DoorSocket> {
        self.sockets.iter().find(|s| s.direction == dir)
    }
}

/// Templates grouped by category
#[derive(Debug, Clone, Default)]
pub struct TemplatePool {
    by_category: HashMap<RoomCategory, Vec<Arc<RoomTemplate>>>,
}

impl TemplatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool, rejecting malformed templates
    pub fn from_templates(
        templates: impl IntoIterator<Item = RoomTemplate>,
    ) -> Result<Self, TemplateError> {
        let mut pool = Self::new();
        for template in templates {
            template.validate()?;
            pool.add(template);
        }
        Ok(pool)
    }

    /// Load a JSON array of templates
    ///
    /// A pool read from data must contain at least one Start template.
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let templates: Vec<RoomTemplate> = serde_json::from_str(json)?;
        let pool = Self::from_templates(templates)?;
        if pool.templates(RoomCategory::Start).is_empty() {
            return Err(TemplateError::EmptyPool {
                category: RoomCategory::Start,
            });
        }
        Ok(pool)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn add(&mut self, template: RoomTemplate) {
        self.by_category
            .entry(template.category)
            .or_default()
            .push(Arc::new(template));
    }

    /// Templates of a category in insertion order
    pub fn templates(&self, category: RoomCategory) -> &[Arc<RoomTemplate>] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Templates of a category that have a socket facing `required`
    pub fn candidates(
        &self,
        category: RoomCategory,
        required: Option<Direction>,
    ) -> Vec<Arc<RoomTemplate>> {
        self.templates(category)
            .iter()
            .filter(|t| required.is_none_or(|dir| t.has_socket(dir)))
            .cloned()
            .collect()
    }

    /// Check if any template of a category has a socket facing `dir`
    pub fn has_socket(&self, category: RoomCategory, dir: Direction) -> bool {
        self.templates(category).iter().any(|t| t.has_socket(dir))
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Built-in pool covering every socket layout
    ///
    /// Start is a four-way room, Normal rooms exist for every non-empty
    /// socket subset, and Boss/Treasure/Shop rooms are single-door dead ends.
    pub fn standard() -> Self {
        let mut pool = Self::new();

        pool.add(
            RoomTemplate::new("start", RoomCategory::Start, &Direction::ALL).with_content(
                ContentDescriptor {
                    spawn_points: vec![SpawnPoint {
                        tag: "player".into(),
                        local: (0.0, 0.0),
                    }],
                },
            ),
        );

        for mask in 1u8..16 {
            let dirs: Vec<Direction> = Direction::ALL
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &d)| d)
                .collect();
            let name = format!("normal_{}", socket_code(&dirs));
            pool.add(
                RoomTemplate::new(name, RoomCategory::Normal, &dirs).with_content(
                    ContentDescriptor {
                        spawn_points: vec![
                            SpawnPoint {
                                tag: "enemy".into(),
                                local: (-2.0, 1.0),
                            },
                            SpawnPoint {
                                tag: "enemy".into(),
                                local: (2.0, -1.0),
                            },
                        ],
                    },
                ),
            );
        }

        for category in [RoomCategory::Boss, RoomCategory::Treasure, RoomCategory::Shop] {
            for dir in Direction::ALL {
                let name = format!(
                    "{}_{}",
                    category.to_string().to_lowercase(),
                    socket_code(&[dir])
                );
                pool.add(RoomTemplate::new(name, category, &[dir]));
            }
        }

        pool
    }
}

/// Compact socket code such as "NES"
fn socket_code(dirs: &[Direction]) -> String {
    dirs.iter()
        .map(|d| match d {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        })
        .collect()
}
