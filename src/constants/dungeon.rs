//! Room and partition sizing constants.

/// Default dungeon width
pub const DUNGEON_DEFAULT_WIDTH: i32 = 30;
/// Default dungeon height
pub const DUNGEON_DEFAULT_HEIGHT: i32 = 30;
/// Default number of rooms to aim for
pub const DUNGEON_DEFAULT_ROOM_COUNT: u32 = 15;
/// Minimum room size
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 4;
/// Maximum room size
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 12;
/// Solid ring kept around the edge of the map
pub const DUNGEON_BORDER: i32 = 1;
/// Gap kept between rooms, and between a room and its BSP leaf edge
pub const DUNGEON_ROOM_MARGIN: i32 = 1;

/// Minimum size of a BSP partition
pub const BSP_MIN_PARTITION_SIZE: i32 = 8;
/// Deepest level the BSP tree may reach
pub const BSP_MAX_DEPTH: u32 = 6;
/// Split point range as a fraction of the partition
pub const BSP_SPLIT_RATIO_MIN: f64 = 0.4;
pub const BSP_SPLIT_RATIO_MAX: f64 = 0.6;
