//! Generation notifications.
//!
//! The generator reports progress through a [`GenerationObserver`]. Observers
//! only ever see shared references, so they can watch a run but never steer it.
//! [`EventLog`] records owned snapshots for callers that want the full trace.

use crate::config::DungeonConfig;
use crate::grid::TileGrid;
use crate::room::Room;

/// Receives generation progress in a fixed order: one `generation_started`, then
/// `room_placed` per room, `quest_room_placed` per quest room, and finally one
/// `generation_complete`. A failed run stops wherever it failed.
pub trait GenerationObserver<T> {
    fn generation_started(&mut self, _config: &DungeonConfig) {}

    fn room_placed(&mut self, _room: &Room<T>) {}

    fn quest_room_placed(&mut self, _room: &Room<T>) {}

    fn generation_complete(&mut self, _grid: &TileGrid, _rooms: &[Room<T>]) {}
}

/// Ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<T> GenerationObserver<T> for NoopObserver {}

impl<T, O> GenerationObserver<T> for &mut O
where
    O: GenerationObserver<T> + ?Sized,
{
    fn generation_started(&mut self, config: &DungeonConfig) {
        (**self).generation_started(config);
    }

    fn room_placed(&mut self, room: &Room<T>) {
        (**self).room_placed(room);
    }

    fn quest_room_placed(&mut self, room: &Room<T>) {
        (**self).quest_room_placed(room);
    }

    fn generation_complete(&mut self, grid: &TileGrid, rooms: &[Room<T>]) {
        (**self).generation_complete(grid, rooms);
    }
}

/// Owned snapshot of one notification
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent<T> {
    Started { config: DungeonConfig },
    RoomPlaced { room: Room<T> },
    QuestRoomPlaced { room: Room<T> },
    Complete { grid: TileGrid, rooms: Vec<Room<T>> },
}

impl<T> GenerationEvent<T> {
    /// Short name, handy for asserting on event order
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::RoomPlaced { .. } => "room_placed",
            Self::QuestRoomPlaced { .. } => "quest_room_placed",
            Self::Complete { .. } => "complete",
        }
    }
}

/// Records every notification in arrival order
#[derive(Debug, Clone)]
pub struct EventLog<T> {
    events: Vec<GenerationEvent<T>>,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventLog<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GenerationEvent<T>) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GenerationEvent<T>> + '_ {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[GenerationEvent<T>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T: Clone> GenerationObserver<T> for EventLog<T> {
    fn generation_started(&mut self, config: &DungeonConfig) {
        self.push(GenerationEvent::Started {
            config: config.clone(),
        });
    }

    fn room_placed(&mut self, room: &Room<T>) {
        self.push(GenerationEvent::RoomPlaced { room: room.clone() });
    }

    fn quest_room_placed(&mut self, room: &Room<T>) {
        self.push(GenerationEvent::QuestRoomPlaced { room: room.clone() });
    }

    fn generation_complete(&mut self, grid: &TileGrid, rooms: &[Room<T>]) {
        self.push(GenerationEvent::Complete {
            grid: grid.clone(),
            rooms: rooms.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{Rect, ROOM_TYPE_NORMAL};
    use crate::tile::Tile;

    fn room() -> Room {
        Room::new(Rect::new(1, 1, 3, 3), ROOM_TYPE_NORMAL)
    }

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::<()>::new();
        let grid = TileGrid::new(5, 5, Tile::wall()).unwrap();
        log.generation_started(&DungeonConfig::default());
        log.room_placed(&room());
        log.quest_room_placed(&room());
        log.generation_complete(&grid, &[room()]);

        let kinds: Vec<_> = log.events().iter().map(GenerationEvent::kind).collect();
        assert_eq!(kinds, ["started", "room_placed", "quest_room_placed", "complete"]);
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::<()>::new();
        log.room_placed(&room());
        assert_eq!(log.len(), 1);
        let drained: Vec<_> = log.drain().collect();
        assert_eq!(drained, vec![GenerationEvent::RoomPlaced { room: room() }]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_mut_ref_forwards_to_observer() {
        let mut log = EventLog::<()>::new();
        {
            let mut by_ref = &mut log;
            GenerationObserver::<()>::room_placed(&mut by_ref, &room());
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_noop_observer_accepts_everything() {
        let mut noop = NoopObserver;
        GenerationObserver::<()>::generation_started(&mut noop, &DungeonConfig::default());
        GenerationObserver::<()>::room_placed(&mut noop, &room());
    }
}
