use crate::grid::TileGrid;
use crate::tile::TileFlags;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Neighbor expansion order shared by every search: north, east, south, west.
/// Keeping it fixed makes tie-breaks between equal-length paths reproducible.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Node {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredNode {
    node: Node,
    f_score: i32, // g_score + heuristic
    order: u32,   // push sequence, breaks f_score ties first-in-first-out
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Breadth-first expansion from `start` over 4-connected tiles that carry every flag in `flags`.
/// Returns an empty set if `start` itself is out of bounds or does not match.
pub fn flood_fill(grid: &TileGrid, start: (i32, i32), flags: TileFlags) -> HashSet<(i32, i32)> {
    puffin::profile_function!();

    let matches = |x: i32, y: i32| grid.get(x, y).map(|t| t.has_flags(flags)).unwrap_or(false);

    let mut reached = HashSet::new();
    if !matches(start.0, start.1) {
        return reached;
    }

    let mut frontier = VecDeque::new();
    reached.insert(start);
    frontier.push_back(start);

    while let Some((x, y)) = frontier.pop_front() {
        for (dx, dy) in DIRECTIONS {
            let next = (x + dx, y + dy);
            if !reached.contains(&next) && matches(next.0, next.1) {
                reached.insert(next);
                frontier.push_back(next);
            }
        }
    }

    reached
}

/// Find a path from start to goal using A* over walkable tiles.
/// Returns the path as a vector of (x, y) positions, including both endpoints.
/// Returns None if no path exists or either endpoint is blocked or outside the grid.
pub fn find_path(grid: &TileGrid, start: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
    puffin::profile_function!();

    if !grid.is_walkable(start.0, start.1) || !grid.is_walkable(goal.0, goal.1) {
        return None;
    }

    let start_node = Node { x: start.0, y: start.1 };
    let goal_node = Node { x: goal.0, y: goal.1 };

    let mut open_set = BinaryHeap::new();
    let mut closed: HashSet<Node> = HashSet::new();
    let mut came_from: HashMap<Node, Node> = HashMap::new();
    let mut g_score: HashMap<Node, i32> = HashMap::new();
    let mut order = 0u32;

    g_score.insert(start_node, 0);
    open_set.push(ScoredNode {
        node: start_node,
        f_score: manhattan(start, goal),
        order,
    });

    // Each tile is expanded at most once, so the grid area bounds the search
    let max_expansions = grid.width() as usize * grid.height() as usize;

    while let Some(current) = open_set.pop() {
        if current.node == goal_node {
            return Some(reconstruct_path(&came_from, current.node));
        }
        if !closed.insert(current.node) {
            continue;
        }
        if closed.len() > max_expansions {
            break;
        }

        let current_g = *g_score.get(&current.node).unwrap_or(&i32::MAX);

        for (dx, dy) in DIRECTIONS {
            let nx = current.node.x + dx;
            let ny = current.node.y + dy;
            let neighbor = Node { x: nx, y: ny };

            if closed.contains(&neighbor) || !grid.is_walkable(nx, ny) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = *g_score.get(&neighbor).unwrap_or(&i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.node);
                g_score.insert(neighbor, tentative_g);
                order += 1;
                open_set.push(ScoredNode {
                    node: neighbor,
                    f_score: tentative_g + manhattan((nx, ny), goal),
                    order,
                });
            }
        }
    }

    None // No path found
}

/// Manhattan distance, the step metric of 4-directional movement
pub fn manhattan(from: (i32, i32), to: (i32, i32)) -> i32 {
    (from.0 - to.0).abs() + (from.1 - to.1).abs()
}

/// Reconstruct the path from came_from map
fn reconstruct_path(came_from: &HashMap<Node, Node>, mut current: Node) -> Vec<(i32, i32)> {
    let mut path = vec![(current.x, current.y)];

    while let Some(&prev) = came_from.get(&current) {
        path.push((prev.x, prev.y));
        current = prev;
    }

    path.reverse();
    path
}
