use crate::board::{Board, Direction, MAX_ACTORS, Mirror, Occupant, Step, TileId};
use crate::hash::StateHash;
use arrayvec::ArrayVec;

/// Index of a state in the solver's arena.
pub type StateId = usize;

/// Why a single ply was refused. A normal outcome of expansion, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// An actor would enter a trap.
    Trapped,
    /// Two actors would share a tile.
    ActorCollision,
    /// A contra-actor would share a tile with an actor.
    ContraCollision,
    /// The resulting position is already in the visited set.
    AlreadySeen,
}

/// One node of the search tree. Immutable once built; the predecessor is referenced by
/// arena index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // `None` once the token has left play (exit, trap or contra-actor collision)
    actors: ArrayVec<Option<TileId>, MAX_ACTORS>,
    contra_actors: Vec<Option<TileId>>,
    direction: Option<Direction>,
    parent: Option<StateId>,
    turn: u32,
    hash: StateHash,
}

impl GameState {
    /// The starting position of `board`.
    pub fn root(board: &Board) -> Self {
        let actors: ArrayVec<Option<TileId>, MAX_ACTORS> =
            board.actors().iter().copied().map(Some).collect();
        let contra_actors: Vec<Option<TileId>> =
            board.contra_actors().iter().copied().map(Some).collect();
        let hash = StateHash::compute(board, &actors, &contra_actors, Mirror::Identity);

        GameState {
            actors,
            contra_actors,
            direction: None,
            parent: None,
            turn: 0,
            hash,
        }
    }

    /// Check if every actor has left through the exit (win condition)
    pub fn is_finished(&self) -> bool {
        self.actors.iter().all(Option::is_none)
    }

    pub fn actors(&self) -> &[Option<TileId>] {
        &self.actors
    }

    pub fn contra_actors(&self) -> &[Option<TileId>] {
        &self.contra_actors
    }

    /// The move that produced this state; `None` for the root.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn hash(&self) -> StateHash {
        self.hash
    }

    /// Identity key followed by one key per mirror the board folds.
    pub fn hashes<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = StateHash> + 'a {
        std::iter::once(self.hash).chain(board.mirrors().iter().map(move |&mirror| {
            StateHash::compute(board, &self.actors, &self.contra_actors, mirror)
        }))
    }

    /// A* ordering key: summed exit distance of present actors plus `turn_cost` per turn.
    pub fn weight(&self, board: &Board, turn_cost: f32) -> f32 {
        let distance: f32 = self
            .actors
            .iter()
            .flatten()
            .map(|&tile| board.tile(tile).distance_to_exit() as f32)
            .sum();
        distance + turn_cost * self.turn as f32
    }

    pub fn occupant_at(&self, tile: TileId) -> Occupant {
        if self.actors.contains(&Some(tile)) {
            Occupant::Actor
        } else if self.contra_actors.contains(&Some(tile)) {
            Occupant::ContraActor
        } else {
            Occupant::None
        }
    }

    pub fn render(&self, board: &Board) -> String {
        board.render(|tile| self.occupant_at(tile))
    }

    /// Play one ply in `direction` from this state, which lives at `id` in the arena.
    ///
    /// All tokens move simultaneously in four phases: actors step, contra-actors step the
    /// opposite way, actors are moved by the pushers they stand on, then contra-actors are.
    /// Contra-actors meeting each other drop out (the lowest index survives); any token
    /// meeting an actor rejects the ply. `is_seen` is consulted last, on the identity key.
    pub fn advance(
        &self,
        board: &Board,
        id: StateId,
        direction: Direction,
        is_seen: impl Fn(&StateHash) -> bool,
    ) -> Result<GameState, Rejected> {
        let mut actors = self.actors.clone();
        let mut contra_actors = self.contra_actors.clone();

        // Actors move.
        for slot in actors.iter_mut() {
            if let Some(tile) = *slot {
                *slot = settle_actor(board.step(tile, Some(direction)))?;
            }
        }
        check_actor_collisions(&actors)?;

        // Contra-actors move the opposite way.
        for idx in 0..contra_actors.len() {
            let Some(tile) = contra_actors[idx] else {
                continue;
            };
            if actors.contains(&Some(tile)) {
                return Err(Rejected::ContraCollision);
            }
            let settled = settle_contra_actor(
                board.step(tile, Some(direction.opposite())),
                &actors,
                &contra_actors[..idx],
            )?;
            contra_actors[idx] = settled;
        }

        // Pushers act on actors.
        for slot in actors.iter_mut() {
            if let Some(tile) = *slot {
                *slot = settle_actor(board.step(tile, None))?;
            }
        }
        check_actor_collisions(&actors)?;

        // Pushers act on contra-actors.
        for idx in 0..contra_actors.len() {
            let Some(tile) = contra_actors[idx] else {
                continue;
            };
            let settled =
                settle_contra_actor(board.step(tile, None), &actors, &contra_actors[..idx])?;
            contra_actors[idx] = settled;
        }

        let hash = StateHash::compute(board, &actors, &contra_actors, Mirror::Identity);
        if is_seen(&hash) {
            return Err(Rejected::AlreadySeen);
        }

        Ok(GameState {
            actors,
            contra_actors,
            direction: Some(direction),
            parent: Some(id),
            turn: self.turn + 1,
            hash,
        })
    }
}

fn settle_actor(step: Step) -> Result<Option<TileId>, Rejected> {
    match step {
        Step::At(tile) => Ok(Some(tile)),
        Step::Exited => Ok(None),
        Step::Trapped => Err(Rejected::Trapped),
    }
}

/// Contra-actors leave play through traps and the exit, or by landing on a tile an
/// earlier contra-actor already holds.
fn settle_contra_actor(
    step: Step,
    actors: &[Option<TileId>],
    earlier: &[Option<TileId>],
) -> Result<Option<TileId>, Rejected> {
    let tile = match step {
        Step::At(tile) => tile,
        Step::Exited | Step::Trapped => return Ok(None),
    };
    if actors.contains(&Some(tile)) {
        Err(Rejected::ContraCollision)
    } else if earlier.contains(&Some(tile)) {
        Ok(None)
    } else {
        Ok(Some(tile))
    }
}

fn check_actor_collisions(actors: &[Option<TileId>]) -> Result<(), Rejected> {
    for (i, a) in actors.iter().enumerate() {
        let Some(a) = a else {
            continue;
        };
        if actors[i + 1..].contains(&Some(*a)) {
            return Err(Rejected::ActorCollision);
        }
    }
    Ok(())
}
