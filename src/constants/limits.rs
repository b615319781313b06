//! Retry budgets. Every placement loop is bounded by one of these.

/// Consecutive rejected samples before random placement gives up on the next room
pub const RANDOM_ROOMS_ATTEMPTS_PER_ROOM: u32 = 50;
/// Total samples random placement may draw in one run
pub const RANDOM_ROOMS_ATTEMPT_BUDGET: u32 = 1000;
/// Positions tried for each quest room
pub const QUEST_ROOM_MAX_ATTEMPTS: u32 = 100;
/// Border kept between a quest room and the edge of the map
pub const QUEST_ROOM_MARGIN: i32 = 1;
