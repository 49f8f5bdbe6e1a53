use crate::levels::Legend;
use arrayvec::ArrayVec;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

/// Puzzle-format constant: a level never holds more than four actors.
pub const MAX_ACTORS: usize = 4;
/// Upper bound on `width * height`; each tile owns two bits of a 256-bit state key.
pub const MAX_TILES: usize = 128;
/// Exit distance of tiles that cannot reach the exit.
pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

/// Expansion order used by every search driver.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];

impl Direction {
    fn index(self) -> usize {
        self as usize
    }

    /// Contra-actors move this way when the actors are told to move `self`.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "Left"),
            Direction::Up => write!(f, "Up"),
            Direction::Right => write!(f, "Right"),
            Direction::Down => write!(f, "Down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Empty,
    Block,
    Exit,
    Trap,
    PusherUp,
    PusherDown,
    PusherLeft,
    PusherRight,
}

impl TileKind {
    /// The direction a pusher tile forces onto whatever stands on it.
    pub fn forced_direction(self) -> Option<Direction> {
        match self {
            TileKind::PusherUp => Some(Direction::Up),
            TileKind::PusherDown => Some(Direction::Down),
            TileKind::PusherLeft => Some(Direction::Left),
            TileKind::PusherRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// The kind seen in a mirror along `mirror`. Pushers flip with the axis they point along.
    fn mirrored(self, mirror: Mirror) -> TileKind {
        let (flip_horizontal, flip_vertical) = match mirror {
            Mirror::Identity => (false, false),
            Mirror::Horizontal => (true, false),
            Mirror::Vertical => (false, true),
            Mirror::Both => (true, true),
        };
        match self {
            TileKind::PusherLeft if flip_horizontal => TileKind::PusherRight,
            TileKind::PusherRight if flip_horizontal => TileKind::PusherLeft,
            TileKind::PusherUp if flip_vertical => TileKind::PusherDown,
            TileKind::PusherDown if flip_vertical => TileKind::PusherUp,
            kind => kind,
        }
    }

    fn can_hold_token(self) -> bool {
        !matches!(self, TileKind::Block | TileKind::Trap | TileKind::Exit)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    #[default]
    None,
    Actor,
    ContraActor,
}

/// One decoded map cell: the static tile and the token starting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub kind: TileKind,
    pub occupant: Occupant,
}

impl Cell {
    pub fn new(kind: TileKind, occupant: Occupant) -> Self {
        Cell { kind, occupant }
    }
}

/// Row-major index of a tile on its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u8);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Selects which of a tile's hash indexes to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    Identity,
    Horizontal,
    Vertical,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Symmetry {
    fn from_axes(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (false, false) => Symmetry::None,
            (true, false) => Symmetry::Horizontal,
            (false, true) => Symmetry::Vertical,
            (true, true) => Symmetry::Both,
        }
    }

    /// Mirrors under which a position on a board with this symmetry is equivalent.
    pub fn mirrors(self) -> &'static [Mirror] {
        match self {
            Symmetry::None => &[],
            Symmetry::Horizontal => &[Mirror::Horizontal],
            Symmetry::Vertical => &[Mirror::Vertical],
            Symmetry::Both => &[Mirror::Horizontal, Mirror::Vertical, Mirror::Both],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    kind: TileKind,
    x: u8,
    y: u8,
    neighbours: [Option<TileId>; 4],
    distance_to_exit: u32,
    // [own, horizontal mirror, vertical mirror, both]; only the first when folding is off
    indexes: ArrayVec<u8, 4>,
}

impl Tile {
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn position(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    pub fn neighbour(&self, direction: Direction) -> Option<TileId> {
        self.neighbours[direction.index()]
    }

    pub fn distance_to_exit(&self) -> u32 {
        self.distance_to_exit
    }

    /// Bit-slot index of this tile as seen through `mirror`.
    /// Panics for a non-identity mirror on a board built without symmetry folding.
    pub fn index(&self, mirror: Mirror) -> u8 {
        self.indexes[mirror as usize]
    }
}

/// Where a single token ends up after one resolved move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    At(TileId),
    Exited,
    Trapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Require an exit and at least one actor.
    pub strict_validation: bool,
    /// Fill mirrored tile indexes so symmetric positions can share visited keys.
    pub symmetry_folding: bool,
    pub legend: Legend,
}

impl BoardConfig {
    /// Accepts maps without exit or actors. Used for rule tests on partial maps.
    pub fn relaxed() -> Self {
        BoardConfig {
            strict_validation: false,
            ..Self::default()
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            strict_validation: true,
            symmetry_folding: true,
            legend: Legend::Classic,
        }
    }
}

/// Error type for map construction. No partial board is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Empty,
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    TooLarge {
        tiles: usize,
    },
    MultipleExits,
    NoExit,
    NoActors,
    TooManyActors {
        found: usize,
    },
    UnknownSymbol {
        symbol: char,
        x: usize,
        y: usize,
    },
    OccupiedObstacle {
        x: usize,
        y: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Empty => write!(f, "Empty map"),
            MapError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, found, expected
            ),
            MapError::TooLarge { tiles } => write!(
                f,
                "Map has {} tiles, maximum is {}",
                tiles, MAX_TILES
            ),
            MapError::MultipleExits => write!(f, "Map exit already defined"),
            MapError::NoExit => write!(f, "No exit on map"),
            MapError::NoActors => write!(f, "No actors on map"),
            MapError::TooManyActors { found } => write!(
                f,
                "Map has {} actors, maximum is {}",
                found, MAX_ACTORS
            ),
            MapError::UnknownSymbol { symbol, x, y } => {
                write!(f, "Unknown map symbol '{}' at ({}, {})", symbol, x, y)
            }
            MapError::OccupiedObstacle { x, y } => {
                write!(f, "Token placed on a block, trap or exit at ({}, {})", x, y)
            }
        }
    }
}

impl Error for MapError {}

/// The tile graph of one puzzle. Built once, then shared read-only by every search state.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    actors: ArrayVec<TileId, MAX_ACTORS>,
    contra_actors: Vec<TileId>,
    exit: Option<TileId>,
    symmetry: Symmetry,
    folding: bool,
    legend: Legend,
}

impl Board {
    /// Parse a map with the legend selected in `config`.
    pub fn from_text(text: &str, config: &BoardConfig) -> Result<Self, MapError> {
        let rows = config.legend.decode_rows(text)?;
        Self::build(&rows, config)
    }

    /// Build the tile graph from a rectangular, row-major grid of decoded cells.
    pub fn build(rows: &[Vec<Cell>], config: &BoardConfig) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(MapError::Empty);
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }

        if width * height > MAX_TILES {
            return Err(MapError::TooLarge {
                tiles: width * height,
            });
        }

        let actor_count = rows
            .iter()
            .flatten()
            .filter(|cell| cell.occupant == Occupant::Actor)
            .count();
        if actor_count > MAX_ACTORS {
            return Err(MapError::TooManyActors { found: actor_count });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut actors = ArrayVec::new();
        let mut contra_actors = Vec::new();
        let mut exit = None;

        for (y, cells) in rows.iter().enumerate() {
            for (x, cell) in cells.iter().enumerate() {
                let id = TileId((y * width + x) as u8);

                if cell.kind == TileKind::Exit {
                    if exit.is_some() {
                        return Err(MapError::MultipleExits);
                    }
                    exit = Some(id);
                }

                if cell.occupant != Occupant::None && !cell.kind.can_hold_token() {
                    return Err(MapError::OccupiedObstacle { x, y });
                }
                match cell.occupant {
                    Occupant::None => {}
                    Occupant::Actor => actors.push(id),
                    Occupant::ContraActor => contra_actors.push(id),
                }

                tiles.push(Tile {
                    kind: cell.kind,
                    x: x as u8,
                    y: y as u8,
                    neighbours: [None; 4],
                    distance_to_exit: UNREACHABLE,
                    indexes: ArrayVec::new(),
                });
            }
        }

        if config.strict_validation {
            if exit.is_none() {
                return Err(MapError::NoExit);
            }
            if actors.is_empty() {
                return Err(MapError::NoActors);
            }
        }

        let mut board = Board {
            width,
            height,
            tiles,
            actors,
            contra_actors,
            exit,
            symmetry: Symmetry::None,
            folding: config.symmetry_folding,
            legend: config.legend,
        };
        board.link_neighbours();
        board.assign_indexes();
        board.symmetry = board.find_symmetry();
        board.compute_exit_distances();

        log::debug!(
            "built {}x{} board: {} actors, {} contra-actors, symmetry {:?}",
            width,
            height,
            board.actors.len(),
            board.contra_actors.len(),
            board.symmetry
        );

        Ok(board)
    }

    fn link_neighbours(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let mut neighbours = [None; 4];
                if x > 0 {
                    neighbours[Direction::Left.index()] = Some(self.id_at(x - 1, y));
                }
                if y > 0 {
                    neighbours[Direction::Up.index()] = Some(self.id_at(x, y - 1));
                }
                if x + 1 < self.width {
                    neighbours[Direction::Right.index()] = Some(self.id_at(x + 1, y));
                }
                if y + 1 < self.height {
                    neighbours[Direction::Down.index()] = Some(self.id_at(x, y + 1));
                }
                let id = self.id_at(x, y);
                self.tiles[id.index()].neighbours = neighbours;
            }
        }
    }

    /// Index 0 is the tile's own row-major slot. With folding enabled, slots 1..=3 are the
    /// slots of the tile it maps onto under horizontal, vertical and point mirroring.
    fn assign_indexes(&mut self) {
        let (width, height) = (self.width, self.height);
        let count = width * height;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            let (x, y) = (tile.x as usize, tile.y as usize);
            tile.indexes.push(i as u8);
            if self.folding {
                tile.indexes.push((width * y + (width - 1 - x)) as u8);
                tile.indexes.push((width * (height - 1 - y) + x) as u8);
                tile.indexes.push((count - 1 - i) as u8);
            }
        }
    }

    /// Symmetric along an axis when each tile's mirrored kind equals the kind of its twin
    /// across that axis. Pushers pointing along the axis must therefore face each other.
    /// Tokens are ignored.
    fn find_symmetry(&self) -> Symmetry {
        let (width, height) = (self.width, self.height);
        let vertical = (0..height).all(|y| {
            (0..width).all(|x| {
                self.kind_at(x, y).mirrored(Mirror::Vertical) == self.kind_at(x, height - 1 - y)
            })
        });
        let horizontal = (0..height).all(|y| {
            (0..width).all(|x| {
                self.kind_at(x, y).mirrored(Mirror::Horizontal) == self.kind_at(width - 1 - x, y)
            })
        });
        Symmetry::from_axes(horizontal, vertical)
    }

    /// Breadth-first fill from the exit. Blocks and traps are never entered; pushers are
    /// treated as plain floor.
    fn compute_exit_distances(&mut self) {
        let Some(exit) = self.exit else {
            return;
        };

        let mut queue = VecDeque::new();
        self.tiles[exit.index()].distance_to_exit = 0;
        queue.push_back(exit);

        while let Some(id) = queue.pop_front() {
            let dist = self.tiles[id.index()].distance_to_exit;
            for direction in [
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down,
            ] {
                let Some(next) = self.tiles[id.index()].neighbour(direction) else {
                    continue;
                };
                let tile = &mut self.tiles[next.index()];
                if matches!(tile.kind, TileKind::Block | TileKind::Trap)
                    || tile.distance_to_exit != UNREACHABLE
                {
                    continue;
                }
                tile.distance_to_exit = dist + 1;
                queue.push_back(next);
            }
        }
    }

    /// Resolve where a token standing on `from` ends up.
    ///
    /// With no direction the token only moves if it stands on a pusher. Landing on a pusher
    /// chains exactly one more hop in the pusher's direction; a second pusher reached by that
    /// hop holds the token until the next forced-push phase.
    pub fn step(&self, from: TileId, direction: Option<Direction>) -> Step {
        match direction.or_else(|| self.tile(from).kind.forced_direction()) {
            Some(direction) => self.slide(from, direction, true),
            None => Step::At(from),
        }
    }

    fn slide(&self, from: TileId, direction: Direction, chain: bool) -> Step {
        let Some(next) = self.tile(from).neighbour(direction) else {
            return Step::At(from);
        };
        let kind = self.tile(next).kind;
        match kind {
            TileKind::Block => Step::At(from),
            TileKind::Trap => Step::Trapped,
            TileKind::Exit => Step::Exited,
            TileKind::Empty => Step::At(next),
            _ => match kind.forced_direction() {
                Some(forced) if chain => self.slide(next, forced, false),
                _ => Step::At(next),
            },
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    /// Panics if `(x, y)` lies outside the board.
    pub fn id_at(&self, x: usize, y: usize) -> TileId {
        assert!(x < self.width && y < self.height, "position out of bounds");
        TileId((y * self.width + x) as u8)
    }

    fn kind_at(&self, x: usize, y: usize) -> TileKind {
        self.tiles[y * self.width + x].kind
    }

    pub fn actors(&self) -> &[TileId] {
        &self.actors
    }

    pub fn contra_actors(&self) -> &[TileId] {
        &self.contra_actors
    }

    pub fn exit(&self) -> Option<TileId> {
        self.exit
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Mirrors whose keys are folded into the visited set alongside the identity key.
    pub fn mirrors(&self) -> &'static [Mirror] {
        if self.folding {
            self.symmetry.mirrors()
        } else {
            &[]
        }
    }

    /// Render the board with tokens placed by `occupant`, one line per row.
    pub fn render(&self, occupant: impl Fn(TileId) -> Occupant) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                let id = self.id_at(x, y);
                out.push(
                    self.legend
                        .encode(Cell::new(self.tile(id).kind, occupant(id))),
                );
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render(|id| {
            if self.actors.contains(&id) {
                Occupant::Actor
            } else if self.contra_actors.contains(&id) {
                Occupant::ContraActor
            } else {
                Occupant::None
            }
        });
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed(rows: &[&str]) -> Board {
        Board::from_text(&rows.join("\n"), &BoardConfig::relaxed()).unwrap()
    }

    #[test]
    fn test_load_single_row() {
        let board = relaxed(&["ex #<>^_@"]);

        let kinds: Vec<TileKind> = (0..9).map(|x| board.tile(board.id_at(x, 0)).kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TileKind::Exit,
                TileKind::Trap,
                TileKind::Empty,
                TileKind::Block,
                TileKind::PusherLeft,
                TileKind::PusherRight,
                TileKind::PusherUp,
                TileKind::PusherDown,
                TileKind::Empty,
            ]
        );
        assert_eq!(board.actors(), &[board.id_at(8, 0)]);
        assert_eq!(board.exit(), Some(board.id_at(0, 0)));
    }

    #[test]
    fn test_neighbours() {
        let board = relaxed(&["   ", "   "]);
        let corner = board.tile(board.id_at(0, 0));
        assert_eq!(corner.neighbour(Direction::Left), None);
        assert_eq!(corner.neighbour(Direction::Up), None);
        assert_eq!(corner.neighbour(Direction::Right), Some(board.id_at(1, 0)));
        assert_eq!(corner.neighbour(Direction::Down), Some(board.id_at(0, 1)));

        let edge = board.tile(board.id_at(2, 1));
        assert_eq!(edge.neighbour(Direction::Right), None);
        assert_eq!(edge.neighbour(Direction::Down), None);
        assert_eq!(edge.neighbour(Direction::Left), Some(board.id_at(1, 1)));
        assert_eq!(edge.neighbour(Direction::Up), Some(board.id_at(2, 0)));
        assert_eq!(edge.position(), (2, 1));
    }

    #[test]
    fn test_strict_validation() {
        let config = BoardConfig::default();
        assert_eq!(Board::from_text("  @", &config).unwrap_err(), MapError::NoExit);
        assert_eq!(Board::from_text(" e ", &config).unwrap_err(), MapError::NoActors);
        assert!(Board::from_text("@ e", &config).is_ok());

        // Relaxed validation still refuses a second exit.
        assert_eq!(
            Board::from_text("e@e", &BoardConfig::relaxed()).unwrap_err(),
            MapError::MultipleExits
        );
    }

    #[test]
    fn test_malformed_maps() {
        let config = BoardConfig::relaxed();
        assert_eq!(Board::build(&[], &config).unwrap_err(), MapError::Empty);
        assert_eq!(
            Board::from_text("   \n  ", &config).unwrap_err(),
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            Board::from_text("@@@@@e", &config).unwrap_err(),
            MapError::TooManyActors { found: 5 }
        );
        assert_eq!(
            Board::from_text(" ?", &config).unwrap_err(),
            MapError::UnknownSymbol {
                symbol: '?',
                x: 1,
                y: 0
            }
        );

        let row = " ".repeat(MAX_TILES + 1);
        assert_eq!(
            Board::from_text(&row, &config).unwrap_err(),
            MapError::TooLarge {
                tiles: MAX_TILES + 1
            }
        );
    }

    #[test]
    fn test_token_on_obstacle() {
        let rows = vec![vec![
            Cell::new(TileKind::Exit, Occupant::None),
            Cell::new(TileKind::Block, Occupant::Actor),
        ]];
        assert_eq!(
            Board::build(&rows, &BoardConfig::relaxed()).unwrap_err(),
            MapError::OccupiedObstacle { x: 1, y: 0 }
        );
    }

    #[test]
    fn test_actor_on_pusher_from_cells() {
        let rows = vec![vec![
            Cell::new(TileKind::PusherRight, Occupant::Actor),
            Cell::new(TileKind::Empty, Occupant::ContraActor),
            Cell::new(TileKind::Exit, Occupant::None),
        ]];
        let board = Board::build(&rows, &BoardConfig::default()).unwrap();
        assert_eq!(board.actors(), &[board.id_at(0, 0)]);
        assert_eq!(board.contra_actors(), &[board.id_at(1, 0)]);
    }

    #[test]
    fn test_find_symmetry() {
        let cases: Vec<(Vec<&str>, Symmetry)> = vec![
            (vec!["# # #", "  #  "], Symmetry::Horizontal),
            (vec!["# # ", "# # "], Symmetry::Vertical),
            (vec!["  ", "  "], Symmetry::Both),
            (vec!["# # #", "# # #"], Symmetry::Both),
            (vec!["# # #", "#   #", "# # #"], Symmetry::Both),
            (vec!["  # #", "# #  "], Symmetry::None),
            (vec!["####", "#   ", "#   "], Symmetry::None),
            (vec!["##", "# "], Symmetry::None),
            (vec!["  #", "# #", "# #"], Symmetry::None),
            // Pushers along the axis must point the opposite way in the mirrored half.
            (vec!["<   >", " x x "], Symmetry::Horizontal),
            (vec!["<   <", " x x "], Symmetry::None),
            (vec!["^  ", "   ", "_  "], Symmetry::Vertical),
            (vec!["^  ", "   ", "^  "], Symmetry::None),
            (vec!["< _ >", "#   #", "< ^ >"], Symmetry::Both),
            // Pushers across the axis keep their kind.
            (vec!["^ ^", "< >"], Symmetry::Horizontal),
            (vec!["> ", "  ", "> "], Symmetry::Vertical),
            // A pusher on the axis cannot face its own mirror image.
            (vec![" < "], Symmetry::Vertical),
            (vec!["   ", " _ ", "   "], Symmetry::Horizontal),
        ];

        for (rows, expected) in cases {
            assert_eq!(relaxed(&rows).symmetry(), expected, "Failed for {:?}", rows);
        }
    }

    #[test]
    fn test_symmetry_ignores_tokens() {
        let board = relaxed(&["@ o", "   "]);
        assert_eq!(board.symmetry(), Symmetry::Both);
    }

    #[test]
    fn test_mirror_indexes() {
        let board = relaxed(&["   ", "   "]);
        let tile = board.tile(board.id_at(0, 0));
        assert_eq!(tile.index(Mirror::Identity), 0);
        assert_eq!(tile.index(Mirror::Horizontal), 2);
        assert_eq!(tile.index(Mirror::Vertical), 3);
        assert_eq!(tile.index(Mirror::Both), 5);

        let tile = board.tile(board.id_at(1, 1));
        assert_eq!(tile.index(Mirror::Identity), 4);
        assert_eq!(tile.index(Mirror::Horizontal), 4);
        assert_eq!(tile.index(Mirror::Vertical), 1);
        assert_eq!(tile.index(Mirror::Both), 1);

        // Mirrored indexes land on a tile of the same kind on a symmetric board.
        let board = relaxed(&["# # #", "#   #", "# # #"]);
        for y in 0..board.height() {
            for x in 0..board.width() {
                let tile = board.tile(board.id_at(x, y));
                for &mirror in board.mirrors() {
                    let index = tile.index(mirror) as usize;
                    let other = board.tile(board.id_at(index % 5, index / 5));
                    assert_eq!(tile.kind(), other.kind());
                }
            }
        }
    }

    #[test]
    fn test_folding_disabled() {
        let config = BoardConfig {
            symmetry_folding: false,
            ..BoardConfig::relaxed()
        };
        let board = Board::from_text("  \n  ", &config).unwrap();
        assert_eq!(board.symmetry(), Symmetry::Both);
        assert!(board.mirrors().is_empty());
    }

    #[test]
    fn test_distance_to_exit() {
        let board = relaxed(&["   #", "e# x", " #  ", " <  "]);
        let dist = |x, y| board.tile(board.id_at(x, y)).distance_to_exit();

        assert_eq!(dist(0, 1), 0);
        assert_eq!(dist(0, 0), 1);
        assert_eq!(dist(0, 3), 2);
        assert_eq!(dist(1, 3), 3);
        assert_eq!(dist(3, 3), 5);
        assert_eq!(dist(1, 1), UNREACHABLE);
        assert_eq!(dist(3, 1), UNREACHABLE);
    }

    #[test]
    fn test_distance_without_exit() {
        let board = relaxed(&["  ", " @"]);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(board.tile(board.id_at(x, y)).distance_to_exit(), UNREACHABLE);
            }
        }
    }

    #[test]
    fn test_step_bounds() {
        let board = relaxed(&["  ", "  "]);
        let stay = |x, y, dir| {
            let id = board.id_at(x, y);
            assert_eq!(board.step(id, Some(dir)), Step::At(id));
        };
        stay(0, 0, Direction::Left);
        stay(1, 0, Direction::Right);
        stay(1, 0, Direction::Up);
        stay(1, 1, Direction::Down);
    }

    #[test]
    fn test_step_empty_block_exit_trap() {
        let board = relaxed(&["  ", "  "]);
        assert_eq!(
            board.step(board.id_at(0, 0), Some(Direction::Down)),
            Step::At(board.id_at(0, 1))
        );

        let board = relaxed(&["  ", " #"]);
        let from = board.id_at(0, 1);
        assert_eq!(board.step(from, Some(Direction::Right)), Step::At(from));

        let board = relaxed(&[" e", "  "]);
        assert_eq!(board.step(board.id_at(0, 0), Some(Direction::Right)), Step::Exited);

        let board = relaxed(&["x ", "  "]);
        assert_eq!(board.step(board.id_at(0, 1), Some(Direction::Up)), Step::Trapped);
    }

    #[test]
    fn test_step_pushers() {
        let board = relaxed(&[" > ^", "^ _<", " <  "]);
        let check = |from: (usize, usize), dir, to: (usize, usize)| {
            assert_eq!(
                board.step(board.id_at(from.0, from.1), Some(dir)),
                Step::At(board.id_at(to.0, to.1)),
                "from {:?} {}",
                from,
                dir
            );
        };

        check((0, 0), Direction::Right, (2, 0));
        check((2, 0), Direction::Down, (2, 2));
        check((2, 2), Direction::Left, (0, 2));
        check((0, 2), Direction::Up, (0, 0));

        // Pusher looks off the board: stay on the pusher.
        check((2, 0), Direction::Right, (3, 0));

        // Pusher looks into another pusher: stop on the second one.
        check((3, 2), Direction::Up, (2, 1));
    }

    #[test]
    fn test_step_without_direction() {
        let board = relaxed(&["  ^", " > ", " _e"]);

        // Plain floor: no-op.
        let floor = board.id_at(0, 0);
        assert_eq!(board.step(floor, None), Step::At(floor));

        // Pusher moves the token in its own direction.
        assert_eq!(board.step(board.id_at(1, 1), None), Step::At(board.id_at(2, 1)));

        // Pusher into the board edge keeps the token on the pusher.
        let up = board.id_at(2, 0);
        assert_eq!(board.step(up, None), Step::At(up));
        let down = board.id_at(1, 2);
        assert_eq!(board.step(down, None), Step::At(down));

        // Forced moves chain through one more pusher.
        let board = relaxed(&["_  ", "> e", "   "]);
        assert_eq!(board.step(board.id_at(0, 0), None), Step::At(board.id_at(1, 1)));

        let board = relaxed(&[" >e"]);
        assert_eq!(board.step(board.id_at(1, 0), None), Step::Exited);
    }

    #[test]
    fn test_step_pusher_into_trap_and_exit() {
        let board = relaxed(&[" >x", " <e"]);
        assert_eq!(board.step(board.id_at(0, 0), Some(Direction::Right)), Step::Trapped);

        let board = relaxed(&[" >e"]);
        assert_eq!(board.step(board.id_at(0, 0), Some(Direction::Right)), Step::Exited);

        let board = relaxed(&[" >#"]);
        assert_eq!(
            board.step(board.id_at(0, 0), Some(Direction::Right)),
            Step::At(board.id_at(1, 0))
        );
    }

    #[test]
    fn test_opposite() {
        for direction in ALL_DIRECTIONS {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }

    #[test]
    fn test_display() {
        let input = "#  o#\n@ e <\n^_  @";
        let board = Board::from_text(input, &BoardConfig::default()).unwrap();
        assert_eq!(board.to_string(), input);
    }
}
