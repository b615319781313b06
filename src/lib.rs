//! Seeded procedural dungeon generation.
//!
//! A [`DungeonConfig`] picks a grid size, a placement algorithm and a room
//! target. [`DungeonGenerator`] carves rooms into a [`TileGrid`], joins them
//! with corridors, embeds any caller-supplied quest rooms and returns a
//! [`Dungeon`] in which every room is reachable from every other. The same
//! config and seed always produce the same dungeon.
//!
//! ```no_run
//! use grid_dungeon::{generate_dungeon_with_quests, DungeonConfig, RoomTemplate};
//!
//! let config = DungeonConfig::medium(Some(42));
//! let quests = [RoomTemplate::<()>::quest(5, 5).with_id("throne")];
//! let dungeon = generate_dungeon_with_quests(&config, &quests)?;
//! println!("{}", dungeon.grid.render_ascii());
//! # Ok::<(), grid_dungeon::DungeonError>(())
//! ```

pub mod config;
pub mod constants;
pub mod corridors;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod pathfinding;
pub mod placement;
pub mod quest;
pub mod room;
pub mod serialization;
pub mod tile;

pub use config::{DungeonConfig, GenerationAlgorithm};
pub use corridors::CorridorConnector;
pub use error::{ConfigError, DungeonError, OutOfBounds};
pub use events::{EventLog, GenerationEvent, GenerationObserver, NoopObserver};
pub use generator::{generate_dungeon, generate_dungeon_with_quests, Dungeon, DungeonGenerator, GenerationState};
pub use grid::TileGrid;
pub use quest::QuestRoomPlacer;
pub use room::{Rect, Room, RoomTemplate};
pub use tile::{Tile, TileFlags, TileType};
