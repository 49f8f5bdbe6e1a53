use crate::board::{Board, BoardConfig, Cell, MapError, Occupant, TileKind};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;

/// Text encodings for maps. Exactly one is selected per board at build time.
///
/// Shared symbols:
/// - ` ` = Empty
/// - `#` = Block
/// - `e` = Exit
/// - `x` = Trap
/// - `^` `_` `<` `>` = Pusher Up, Down, Left, Right
/// - `@` = Actor (on an empty tile)
///
/// The contra-actor is `o` in [`Legend::Classic`] and `a` in [`Legend::Alternate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Legend {
    #[default]
    Classic,
    Alternate,
}

impl Legend {
    fn contra_symbol(self) -> char {
        match self {
            Legend::Classic => 'o',
            Legend::Alternate => 'a',
        }
    }

    pub fn decode(self, symbol: char) -> Option<Cell> {
        let cell = |kind| Some(Cell::new(kind, Occupant::None));
        match symbol {
            ' ' => cell(TileKind::Empty),
            '#' => cell(TileKind::Block),
            'e' => cell(TileKind::Exit),
            'x' => cell(TileKind::Trap),
            '^' => cell(TileKind::PusherUp),
            '_' => cell(TileKind::PusherDown),
            '<' => cell(TileKind::PusherLeft),
            '>' => cell(TileKind::PusherRight),
            '@' => Some(Cell::new(TileKind::Empty, Occupant::Actor)),
            c if c == self.contra_symbol() => {
                Some(Cell::new(TileKind::Empty, Occupant::ContraActor))
            }
            _ => None,
        }
    }

    /// Tokens win over the tile beneath them, so a token standing on a pusher prints as
    /// the token.
    pub fn encode(self, cell: Cell) -> char {
        match cell.occupant {
            Occupant::Actor => return '@',
            Occupant::ContraActor => return self.contra_symbol(),
            Occupant::None => {}
        }
        match cell.kind {
            TileKind::Empty => ' ',
            TileKind::Block => '#',
            TileKind::Exit => 'e',
            TileKind::Trap => 'x',
            TileKind::PusherUp => '^',
            TileKind::PusherDown => '_',
            TileKind::PusherLeft => '<',
            TileKind::PusherRight => '>',
        }
    }

    /// Decode one map, one line per row. Rows are kept verbatim, including trailing spaces.
    pub fn decode_rows(self, text: &str) -> Result<Vec<Vec<Cell>>, MapError> {
        text.lines()
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, symbol)| {
                        self.decode(symbol)
                            .ok_or(MapError::UnknownSymbol { symbol, x, y })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Error type for level parsing operations.
#[derive(Debug)]
pub enum LevelError {
    /// IO error when reading from file
    Io(io::Error),
    /// Invalid level content; `level` is 1-indexed
    InvalidLevel { level: usize, source: MapError },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(err) => write!(f, "IO error: {}", err),
            LevelError::InvalidLevel { level, source } => {
                write!(f, "Invalid level {}: {}", level, source)
            }
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LevelError::Io(err) => Some(err),
            LevelError::InvalidLevel { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        LevelError::Io(err)
    }
}

/// A collection of puzzle boards.
#[derive(Debug)]
pub struct Levels {
    levels: Vec<Board>,
}

impl Levels {
    /// Parse several maps from a string.
    ///
    /// - Lines starting with `;` are comments and end the current map
    /// - An empty line ends the current map
    /// - A line of spaces is a map row, not a separator
    pub fn from_text(contents: &str, config: &BoardConfig) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        let mut rows: Vec<&str> = Vec::new();

        for line in contents.lines() {
            if line.is_empty() || line.trim_start().starts_with(';') {
                Self::flush(&mut rows, &mut levels, config)?;
                continue;
            }
            rows.push(line);
        }
        Self::flush(&mut rows, &mut levels, config)?;

        Ok(Levels { levels })
    }

    fn flush(
        rows: &mut Vec<&str>,
        levels: &mut Vec<Board>,
        config: &BoardConfig,
    ) -> Result<(), LevelError> {
        if rows.is_empty() {
            return Ok(());
        }
        let board = Board::from_text(&rows.join("\n"), config).map_err(|source| {
            LevelError::InvalidLevel {
                level: levels.len() + 1,
                source,
            }
        })?;
        levels.push(board);
        rows.clear();
        Ok(())
    }

    pub fn from_file(path: &str, config: &BoardConfig) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents, config)
    }

    /// Get the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<&Board> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
