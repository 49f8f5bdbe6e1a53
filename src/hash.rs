use crate::board::{Board, MAX_TILES, Mirror, TileId};

const WORD_BITS: usize = 64;
const SLOT_BITS: usize = 2;
const SLOTS_PER_WORD: usize = WORD_BITS / SLOT_BITS;
const NUM_WORDS: usize = MAX_TILES / SLOTS_PER_WORD;

/// Two-bit value stored in a tile's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Actor = 1,
    ContraActor = 2,
}

/// Occupancy key of a game state: two bits per tile, 256 bits in total.
///
/// Exact for boards of up to [`MAX_TILES`] tiles, so two states share a key iff the same
/// tiles hold the same kind of token. Actor slots are not distinguished from one another.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash {
    words: [u64; NUM_WORDS],
}

impl StateHash {
    pub fn new() -> Self {
        Self {
            words: [0; NUM_WORDS],
        }
    }

    pub fn add(&mut self, index: u8, token: Token) {
        let index = index as usize;
        assert!(index < MAX_TILES, "index out of bounds");
        let shift = (index % SLOTS_PER_WORD) * SLOT_BITS;
        self.words[index / SLOTS_PER_WORD] |= (token as u64) << shift;
    }

    /// Raw two-bit slot value at `index` (0 when empty).
    pub fn slot(&self, index: u8) -> u8 {
        let index = index as usize;
        assert!(index < MAX_TILES, "index out of bounds");
        let shift = (index % SLOTS_PER_WORD) * SLOT_BITS;
        ((self.words[index / SLOTS_PER_WORD] >> shift) & 0b11) as u8
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Key of the given occupancy as seen through `mirror`. Removed tokens contribute nothing.
    pub fn compute(
        board: &Board,
        actors: &[Option<TileId>],
        contra_actors: &[Option<TileId>],
        mirror: Mirror,
    ) -> Self {
        let mut hash = StateHash::new();
        for &tile in actors.iter().flatten() {
            hash.add(board.tile(tile).index(mirror), Token::Actor);
        }
        for &tile in contra_actors.iter().flatten() {
            hash.add(board.tile(tile).index(mirror), Token::ContraActor);
        }
        hash
    }
}
