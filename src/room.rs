use serde::{Deserialize, Serialize};

/// Tag for rooms carved by the rectangular strategies
pub const ROOM_TYPE_NORMAL: &str = "normal";
/// Tag for rooms synthesized from cellular-automata caves
pub const ROOM_TYPE_CAVE: &str = "cave";
/// Default tag for caller-supplied quest rooms
pub const ROOM_TYPE_QUEST: &str = "quest";

/// A rectangle representing a room or region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Check if the rectangles share a tile once `self` is grown by `margin` on every side.
    /// With a margin of 1, rectangles that merely touch count as intersecting.
    pub fn intersects(&self, other: &Rect, margin: i32) -> bool {
        self.x - margin < other.x + other.width
            && other.x < self.x + self.width + margin
            && self.y - margin < other.y + other.height
            && other.y < self.y + self.height + margin
    }

    /// Check that the rectangle is non-empty and lies inside a `width` x `height` grid
    pub fn fits_within(&self, width: i32, height: i32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 0
            && self.y >= 0
            && self.x + self.width <= width
            && self.y + self.height <= height
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// A placed room. `T` is an arbitrary caller payload carried through generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room<T = ()> {
    #[serde(flatten)]
    pub rect: Rect,
    pub room_id: String,
    pub room_type: String,
    #[serde(default)]
    pub data: T,
}

impl<T: Default> Room<T> {
    /// Create a room with an id derived from its position, e.g. `room_3_7`
    pub fn new(rect: Rect, room_type: &str) -> Self {
        Self {
            rect,
            room_id: format!("room_{}_{}", rect.x, rect.y),
            room_type: room_type.to_string(),
            data: T::default(),
        }
    }
}

impl<T> Room<T> {
    pub fn center(&self) -> (i32, i32) {
        self.rect.center()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    pub fn overlaps(&self, other: &Rect, margin: i32) -> bool {
        self.rect.intersects(other, margin)
    }
}

/// A fixed-shape room waiting to be placed, e.g. a quest or boss room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate<T = ()> {
    pub width: i32,
    pub height: i32,
    pub room_id: String,
    pub room_type: String,
    #[serde(default)]
    pub data: T,
}

impl<T: Default> RoomTemplate<T> {
    /// A quest-tagged template. The id defaults to `quest_<w>x<h>`; use
    /// [`RoomTemplate::with_id`] to give it a stable name. If another room already
    /// holds the id, the placed room is named `room_<x>_<y>` after its position.
    pub fn quest(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            room_id: format!("quest_{}x{}", width, height),
            room_type: ROOM_TYPE_QUEST.to_string(),
            data: T::default(),
        }
    }
}

impl<T> RoomTemplate<T> {
    pub fn with_id(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = data;
        self
    }

    /// The template's footprint if its top-left corner sat at (x, y)
    pub fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }
}

impl<T: Clone> RoomTemplate<T> {
    /// Materialize the template as a room at (x, y)
    pub fn place_at(&self, x: i32, y: i32) -> Room<T> {
        Room {
            rect: self.rect_at(x, y),
            room_id: self.room_id.clone(),
            room_type: self.room_type.clone(),
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(rect.center(), (5, 5));

        let rect2 = Rect::new(5, 5, 4, 6);
        assert_eq!(rect2.center(), (7, 8));
    }

    #[test]
    fn test_rect_intersects_strict() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.intersects(&Rect::new(3, 3, 2, 2), 0));
        // Touching edges share no tile
        assert!(!a.intersects(&Rect::new(4, 0, 2, 2), 0));
    }

    #[test]
    fn test_rect_intersects_with_margin() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.intersects(&Rect::new(4, 0, 2, 2), 1));
        assert!(!a.intersects(&Rect::new(5, 0, 2, 2), 1));
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!Rect::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!Rect::new(-1, 0, 2, 2).fits_within(10, 10));
        assert!(!Rect::new(0, 0, 0, 2).fits_within(10, 10));
    }

    #[test]
    fn test_room_default_id_from_position() {
        let room: Room = Room::new(Rect::new(3, 7, 4, 4), ROOM_TYPE_NORMAL);
        assert_eq!(room.room_id, "room_3_7");
        assert_eq!(room.room_type, "normal");
        assert_eq!(room.center(), (5, 9));
    }

    #[test]
    fn test_template_place_at_keeps_identity() {
        let template = RoomTemplate::<u32>::quest(5, 3).with_id("boss").with_data(99);
        let room = template.place_at(2, 4);
        assert_eq!(room.rect, Rect::new(2, 4, 5, 3));
        assert_eq!(room.room_id, "boss");
        assert_eq!(room.room_type, ROOM_TYPE_QUEST);
        assert_eq!(room.data, 99);
    }
}
