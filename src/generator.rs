//! The generation pipeline: configure, place rooms, connect, place quest rooms.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::corridors::CorridorConnector;
use crate::error::DungeonError;
use crate::events::{GenerationObserver, NoopObserver};
use crate::grid::TileGrid;
use crate::placement;
use crate::quest::QuestRoomPlacer;
use crate::room::{Room, RoomTemplate};
use crate::tile::{Tile, TileType};

/// Lifecycle of one generation run.
///
/// Stages advance strictly in order. `Failed` can be entered from any stage
/// that has not finished yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationState {
    #[default]
    Configured,
    Placing,
    Connecting,
    PlacingQuestRooms,
    Complete,
    Failed,
}

impl GenerationState {
    /// The stage that follows this one on a successful run
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Configured => Some(Self::Placing),
            Self::Placing => Some(Self::Connecting),
            Self::Connecting => Some(Self::PlacingQuestRooms),
            Self::PlacingQuestRooms => Some(Self::Complete),
            Self::Complete | Self::Failed => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        if target == Self::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(target)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "Configured"),
            Self::Placing => write!(f, "Placing"),
            Self::Connecting => write!(f, "Connecting"),
            Self::PlacingQuestRooms => write!(f, "PlacingQuestRooms"),
            Self::Complete => write!(f, "Complete"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A finished dungeon. Every room center is reachable from every other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Dungeon<T = ()> {
    pub grid: TileGrid,
    /// Generated rooms in placement order, followed by quest rooms in template order
    pub rooms: Vec<Room<T>>,
    /// Doorways marked on corridor mouths (rectangular layouts only)
    pub doors: Vec<(i32, i32)>,
    /// Seed that reproduces this dungeon
    pub seed: u64,
}

impl<T> Dungeon<T> {
    pub fn into_parts(self) -> (TileGrid, Vec<Room<T>>) {
        (self.grid, self.rooms)
    }

    pub fn find_room(&self, room_id: &str) -> Option<&Room<T>> {
        self.rooms.iter().find(|room| room.room_id == room_id)
    }

    pub fn rooms_of_type<'a>(&'a self, room_type: &'a str) -> impl Iterator<Item = &'a Room<T>> + 'a {
        self.rooms.iter().filter(move |room| room.room_type == room_type)
    }

    /// Rooms whose whole rectangle is walkable. Cave rooms usually are not,
    /// since their rectangle is only a bounding box.
    pub fn accessible_rooms(&self) -> Vec<&Room<T>> {
        self.rooms
            .iter()
            .filter(|room| {
                let r = room.rect;
                self.grid.is_region_walkable(r.x, r.y, r.width, r.height)
            })
            .collect()
    }
}

/// Runs generation and reports progress to an observer.
///
/// One generator can be reused; each [`generate`](Self::generate) call starts
/// from `Configured` with a fresh grid and RNG.
#[derive(Debug, Default)]
pub struct DungeonGenerator<O = NoopObserver> {
    observer: O,
    state: GenerationState,
}

impl DungeonGenerator<NoopObserver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O> DungeonGenerator<O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            observer,
            state: GenerationState::Configured,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    fn advance(&mut self, next: GenerationState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "generation stage");
        self.state = next;
    }

    /// Generate a dungeon and embed `quest_rooms` into it, in order.
    ///
    /// On error the generator ends in [`GenerationState::Failed`] and nothing
    /// partial is returned.
    pub fn generate<T>(
        &mut self,
        config: &DungeonConfig,
        quest_rooms: &[RoomTemplate<T>],
    ) -> Result<Dungeon<T>, DungeonError>
    where
        T: Clone + Default,
        O: GenerationObserver<T>,
    {
        self.state = GenerationState::Configured;
        let result = self.run(config, quest_rooms);
        if let Err(err) = &result {
            tracing::warn!(name = %config.name, error = %err, stage = %self.state, "generation failed");
            self.advance(GenerationState::Failed);
        }
        result
    }

    fn run<T>(
        &mut self,
        config: &DungeonConfig,
        quest_rooms: &[RoomTemplate<T>],
    ) -> Result<Dungeon<T>, DungeonError>
    where
        T: Clone + Default,
        O: GenerationObserver<T>,
    {
        puffin::profile_function!();

        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let span = tracing::info_span!(
            "generate",
            name = %config.name,
            algorithm = %config.algorithm,
            seed
        );
        let _enter = span.enter();
        tracing::info!(
            width = config.width,
            height = config.height,
            target_rooms = config.target_room_count,
            quest_rooms = quest_rooms.len(),
            "generation started"
        );
        GenerationObserver::<T>::generation_started(&mut self.observer, config);

        // -- Rooms ------------------------------------------------------------
        self.advance(GenerationState::Placing);
        let mut grid = TileGrid::new(config.width, config.height, Tile::wall())?;
        let rects = {
            puffin::profile_scope!("place_rooms");
            placement::place_rooms(config, &mut grid, &mut rng)?
        };
        let room_type = placement::room_type(config.algorithm);
        let mut rooms: Vec<Room<T>> = Vec::with_capacity(rects.len() + quest_rooms.len());
        for rect in &rects {
            let room = Room::new(*rect, room_type);
            self.observer.room_placed(&room);
            rooms.push(room);
        }

        // -- Corridors --------------------------------------------------------
        self.advance(GenerationState::Connecting);
        CorridorConnector::connect(&mut grid, &rects, &mut rng)?;
        let mut doors = if config.algorithm.is_rectangular() {
            CorridorConnector::place_doors(&mut grid, &rects)?
        } else {
            Vec::new()
        };
        CorridorConnector::verify_connectivity(&grid, &rooms)?;

        // -- Quest rooms ------------------------------------------------------
        self.advance(GenerationState::PlacingQuestRooms);
        for template in quest_rooms {
            let room = QuestRoomPlacer::place(&mut grid, &rooms, template, &mut rng)?;
            self.observer.quest_room_placed(&room);
            rooms.push(room);
        }
        if !quest_rooms.is_empty() {
            // A quest room may have been stamped over a doorway
            doors.retain(|&(x, y)| grid.get(x, y).map(|t| t.is(TileType::Door)).unwrap_or(false));
            CorridorConnector::verify_connectivity(&grid, &rooms)?;
        }

        self.advance(GenerationState::Complete);
        self.observer.generation_complete(&grid, &rooms);
        tracing::info!(rooms = rooms.len(), doors = doors.len(), "generation complete");

        Ok(Dungeon {
            grid,
            rooms,
            doors,
            seed,
        })
    }
}

/// Generate without an observer or quest rooms.
pub fn generate_dungeon(config: &DungeonConfig) -> Result<Dungeon, DungeonError> {
    DungeonGenerator::new().generate::<()>(config, &[])
}

/// Generate without an observer, embedding `quest_rooms` in order.
pub fn generate_dungeon_with_quests<T: Clone + Default>(
    config: &DungeonConfig,
    quest_rooms: &[RoomTemplate<T>],
) -> Result<Dungeon<T>, DungeonError> {
    DungeonGenerator::new().generate(config, quest_rooms)
}
