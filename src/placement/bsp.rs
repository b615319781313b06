use std::collections::VecDeque;

use rand::Rng;

use super::RoomPlacer;
use crate::config::DungeonConfig;
use crate::constants::*;
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::room::{Rect, ROOM_TYPE_NORMAL};
use crate::tile::Tile;

/// A node in the BSP tree. Either a leaf (gets a room) or an internal node (has two children).
struct BspNode {
    /// The region this node covers
    region: Rect,
    depth: u32,
    /// Indices of the left/top and right/bottom halves after a split
    children: Option<(usize, usize)>,
}

impl BspNode {
    fn new(region: Rect, depth: u32) -> Self {
        Self {
            region,
            depth,
            children: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Recursive rectangular subdivision with one room per leaf.
///
/// Splitting runs breadth-first so the tree stays balanced when the leaf count
/// is capped by the room target. Leaves are reported left to right, so rooms
/// that are siblings in the tree sit next to each other in the output too.
#[derive(Debug, Clone)]
pub struct BinarySpacePartition {
    pub min_partition_size: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub target_room_count: u32,
}

impl BinarySpacePartition {
    pub fn from_config(config: &DungeonConfig) -> Self {
        Self {
            min_partition_size: config.min_partition_size,
            min_room_size: config.min_room_size,
            max_room_size: config.max_room_size,
            target_room_count: config.target_room_count,
        }
    }

    /// Split a region in two, or return `None` if it is a final leaf.
    ///
    /// The axis alternates with depth: top/bottom on even levels, left/right on odd
    /// ones. When the preferred axis is too short the other one is used instead.
    fn split<R: Rng>(&self, region: &Rect, depth: u32, rng: &mut R) -> Option<(Rect, Rect)> {
        if depth >= BSP_MAX_DEPTH {
            return None;
        }

        let min = self.min_partition_size;
        let can_split_horizontal = region.height >= min.saturating_mul(2);
        let can_split_vertical = region.width >= min.saturating_mul(2);

        let split_horizontal = match (can_split_horizontal, can_split_vertical) {
            (false, false) => return None,
            (true, false) => true,
            (false, true) => false,
            (true, true) => depth % 2 == 0,
        };

        let size = if split_horizontal { region.height } else { region.width };
        let ratio = rng.gen_range(BSP_SPLIT_RATIO_MIN..=BSP_SPLIT_RATIO_MAX);
        // Both halves keep at least the minimum partition size
        let split = ((f64::from(size) * ratio).round() as i32).clamp(min, size - min);

        if split_horizontal {
            let top = Rect::new(region.x, region.y, region.width, split);
            let bottom = Rect::new(region.x, region.y + split, region.width, region.height - split);
            Some((top, bottom))
        } else {
            let left = Rect::new(region.x, region.y, split, region.height);
            let right = Rect::new(region.x + split, region.y, region.width - split, region.height);
            Some((left, right))
        }
    }

    /// Build the tree, stopping early once there are as many leaves as rooms wanted.
    fn build_tree<R: Rng>(&self, root: Rect, rng: &mut R) -> Vec<BspNode> {
        let mut nodes = vec![BspNode::new(root, 0)];
        let mut queue = VecDeque::from([0usize]);
        let mut leaves = 1usize;

        while let Some(idx) = queue.pop_front() {
            if leaves >= self.target_room_count as usize {
                break;
            }
            let (region, depth) = (nodes[idx].region, nodes[idx].depth);
            let Some((first, second)) = self.split(&region, depth, rng) else {
                continue;
            };

            let first_idx = nodes.len();
            nodes.push(BspNode::new(first, depth + 1));
            nodes.push(BspNode::new(second, depth + 1));
            nodes[idx].children = Some((first_idx, first_idx + 1));
            queue.push_back(first_idx);
            queue.push_back(first_idx + 1);
            leaves += 1;
        }

        nodes
    }

    /// Leaf regions in left-to-right (depth-first) order.
    fn collect_leaves(nodes: &[BspNode], idx: usize, leaves: &mut Vec<Rect>) {
        let node = &nodes[idx];
        match node.children {
            None => leaves.push(node.region),
            Some((first, second)) => {
                Self::collect_leaves(nodes, first, leaves);
                Self::collect_leaves(nodes, second, leaves);
            }
        }
    }

    /// Create a room within a leaf region, with some margin.
    fn room_in_leaf<R: Rng>(&self, leaf: &Rect, rng: &mut R) -> Option<Rect> {
        let free_width = leaf.width - DUNGEON_ROOM_MARGIN * 2;
        let free_height = leaf.height - DUNGEON_ROOM_MARGIN * 2;
        let max_width = free_width.min(self.max_room_size);
        let max_height = free_height.min(self.max_room_size);

        if max_width < self.min_room_size || max_height < self.min_room_size {
            return None; // Region too small for a room
        }

        let room_width = rng.gen_range(self.min_room_size..=max_width);
        let room_height = rng.gen_range(self.min_room_size..=max_height);

        // Random position within the region (with margin)
        let room_x = leaf.x + DUNGEON_ROOM_MARGIN + rng.gen_range(0..=(free_width - room_width));
        let room_y = leaf.y + DUNGEON_ROOM_MARGIN + rng.gen_range(0..=(free_height - room_height));

        Some(Rect::new(room_x, room_y, room_width, room_height))
    }
}

impl RoomPlacer for BinarySpacePartition {
    const ROOM_TYPE: &'static str = ROOM_TYPE_NORMAL;

    fn place_rooms<R: Rng>(&self, grid: &mut TileGrid, rng: &mut R) -> Result<Vec<Rect>, DungeonError> {
        puffin::profile_function!();

        let root = Rect::new(
            DUNGEON_BORDER,
            DUNGEON_BORDER,
            grid.width() - 2 * DUNGEON_BORDER,
            grid.height() - 2 * DUNGEON_BORDER,
        );
        if root.width <= 0 || root.height <= 0 {
            return Ok(Vec::new());
        }

        let nodes = self.build_tree(root, rng);
        let mut leaves = Vec::new();
        Self::collect_leaves(&nodes, 0, &mut leaves);

        let mut rooms = Vec::with_capacity(leaves.len());
        for leaf in &leaves {
            if let Some(room) = self.room_in_leaf(leaf, rng) {
                grid.fill_rect(&room, Tile::floor())?;
                rooms.push(room);
            }
        }

        tracing::debug!(
            leaves = leaves.len(),
            rooms = rooms.len(),
            depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            "bsp partitioned"
        );
        Ok(rooms)
    }
}
