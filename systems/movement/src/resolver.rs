use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use loop_quest_core::{TileId, Travel};
use loop_quest_world::board::Board;

/// Progress through a bridge crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum BridgePhase {
    /// Not on a bridge.
    None,
    /// Just stepped onto the first bridge tile; must continue across.
    EnteredFirst,
    /// On the far bridge tile; must step off through a link.
    OnSecond,
}

/// Identity of one search state; two arrivals with equal keys are duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SearchKey {
    tile: TileId,
    steps: u32,
    bridge_used: bool,
    phase: BridgePhase,
}

/// Breadth-first enumeration of every tile reachable with exactly `steps`
/// hops while walking loops in one fixed direction.
///
/// Movement follows the loop in `travel` direction, may jump through links to
/// other loops, and may cross at most one bridge per roll. Bridges are crossed
/// in exactly two hops and are never a stop. Shops are never entered.
#[derive(Debug)]
pub struct DirectedSearch {
    travel: Travel,
    endpoints: BTreeMap<TileId, SearchKey>,
    parents: HashMap<SearchKey, SearchKey>,
}

impl DirectedSearch {
    /// Runs the search from `start` with a budget of `steps` hops.
    #[must_use]
    pub fn run(board: &Board, start: TileId, steps: u32, travel: Travel) -> Self {
        let mut search = Self {
            travel,
            endpoints: BTreeMap::new(),
            parents: HashMap::new(),
        };
        if board.tile(start).is_none() {
            return search;
        }

        let origin = SearchKey {
            tile: start,
            steps,
            bridge_used: false,
            phase: BridgePhase::None,
        };
        let mut seen = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);

        while let Some(current) = queue.pop_front() {
            if current.steps == 0 {
                if board.is_stop(current.tile) {
                    let _ = search.endpoints.entry(current.tile).or_insert(current);
                }
                continue;
            }
            for next in successors(board, current, travel) {
                if seen.insert(next) {
                    let _ = search.parents.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        search
    }

    /// Direction the search walked.
    #[must_use]
    pub const fn travel(&self) -> Travel {
        self.travel
    }

    /// Landing tiles in ascending order; may include the start.
    pub fn endpoints(&self) -> impl Iterator<Item = TileId> + '_ {
        self.endpoints.keys().copied()
    }

    /// Reports whether `goal` is a landing tile of this search.
    #[must_use]
    pub fn reaches(&self, goal: TileId) -> bool {
        self.endpoints.contains_key(&goal)
    }

    /// Hop-by-hop route to `goal`, excluding the start and ending at `goal`.
    #[must_use]
    pub fn path_to(&self, goal: TileId) -> Option<Vec<TileId>> {
        let mut cursor = *self.endpoints.get(&goal)?;
        let mut path = vec![cursor.tile];
        while let Some(parent) = self.parents.get(&cursor) {
            cursor = *parent;
            path.push(cursor.tile);
        }
        // The walk ends at the origin, which is not a hop.
        let _ = path.pop();
        path.reverse();
        Some(path)
    }
}

fn successors(board: &Board, current: SearchKey, travel: Travel) -> Vec<SearchKey> {
    let Some(tile) = board.tile(current.tile) else {
        return Vec::new();
    };
    let steps = current.steps - 1;
    let along = tile.step(travel);
    let hop = |tile: TileId, bridge_used: bool, phase: BridgePhase| SearchKey {
        tile,
        steps,
        bridge_used,
        phase,
    };

    let mut next = Vec::new();
    match current.phase {
        BridgePhase::None => {
            if board.is_stop(along) {
                next.push(hop(along, current.bridge_used, BridgePhase::None));
            }
            for link in tile.links().iter().copied() {
                if board.is_shop(link) {
                    continue;
                }
                if board.is_bridge(link) {
                    if !current.bridge_used {
                        next.push(hop(link, true, BridgePhase::EnteredFirst));
                    }
                } else {
                    next.push(hop(link, current.bridge_used, BridgePhase::None));
                }
            }
            // Only reachable when a roll starts on a bridge tile.
            if board.is_bridge(current.tile) && board.is_bridge(along) {
                next.push(hop(along, true, BridgePhase::OnSecond));
            }
        }
        BridgePhase::EnteredFirst => {
            if board.is_bridge(along) {
                next.push(hop(along, current.bridge_used, BridgePhase::OnSecond));
            }
        }
        BridgePhase::OnSecond => {
            for link in tile.links().iter().copied() {
                if board.is_stop(link) {
                    next.push(hop(link, current.bridge_used, BridgePhase::None));
                }
            }
        }
    }
    next
}

/// Landing tiles reachable with exactly `steps` hops in either direction,
/// sorted by loop then tile. The start is excluded when `steps > 0`.
#[must_use]
pub fn landing_tiles(board: &Board, start: TileId, steps: u32) -> Vec<TileId> {
    landing_tiles_in_order(board, start, steps, Travel::ALL)
}

/// [`landing_tiles`] with an explicit order of the two directional searches.
#[must_use]
pub fn landing_tiles_in_order(
    board: &Board,
    start: TileId,
    steps: u32,
    order: [Travel; 2],
) -> Vec<TileId> {
    let mut union = BTreeSet::new();
    for travel in order {
        union.extend(DirectedSearch::run(board, start, steps, travel).endpoints());
    }
    if steps > 0 {
        let _ = union.remove(&start);
    }
    union.into_iter().collect()
}

/// Concrete route of exactly `steps` hops from `start` to `goal`.
///
/// The clockwise search is preferred; the counter-clockwise search is used
/// only when the clockwise one cannot land on `goal`.
#[must_use]
pub fn path_to(board: &Board, start: TileId, steps: u32, goal: TileId) -> Option<Vec<TileId>> {
    Travel::ALL.into_iter().find_map(|travel| {
        let search = DirectedSearch::run(board, start, steps, travel);
        search.path_to(goal)
    })
}
