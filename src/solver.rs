use crate::board::{ALL_DIRECTIONS, Board, Direction};
use crate::game::{GameState, StateId};
use crate::hash::StateHash;
use crate::pqueue::PriorityQueue;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_TURN_COST: f32 = 1.4;
const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Breadth-first: minimal turn count.
    Bfs,
    /// Best-first on exit distance plus weighted turn count. Stops at the first finish
    /// generated, so the result may be longer than the BFS one.
    AStar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub turn_cost: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            algorithm: Algorithm::AStar,
            turn_cost: DEFAULT_TURN_COST,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States fully expanded.
    pub iterations: usize,
    /// States admitted to the frontier, root included.
    pub unique_states: usize,
    pub peak_frontier: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Direction>,
    /// Root first, finishing state last.
    pub states: Vec<GameState>,
}

impl Solution {
    pub fn turns(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Searching,
    Solved(Solution),
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved(Solution),
    Impossible,
}

/// A* frontier entry. Equal weights pop in insertion order.
#[derive(Debug)]
struct Scored {
    weight: f32,
    sequence: u64,
    state: StateId,
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored {}

enum Frontier {
    Fifo(VecDeque<StateId>),
    Weighted {
        queue: PriorityQueue<Scored>,
        sequence: u64,
    },
}

impl Frontier {
    fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Frontier::Fifo(VecDeque::new()),
            Algorithm::AStar => Frontier::Weighted {
                queue: PriorityQueue::new(),
                sequence: 0,
            },
        }
    }

    /// `None` once the frontier is exhausted.
    fn pop(&mut self) -> Option<StateId> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Weighted { queue, .. } => queue.extract_min().ok().map(|entry| entry.state),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Weighted { queue, .. } => queue.len(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Done {
    Solved(StateId),
    Exhausted,
}

/// Stepwise search over one board. Every generated state lives in an arena and refers to
/// its predecessor by index; the visited set holds identity keys plus the mirrored keys of
/// symmetric boards.
pub struct Solver<'a> {
    board: &'a Board,
    config: SearchConfig,
    states: Vec<GameState>,
    visited: FxHashSet<StateHash>,
    frontier: Frontier,
    stats: SearchStats,
    started: Instant,
    done: Option<Done>,
}

impl<'a> Solver<'a> {
    pub fn new(board: &'a Board, config: SearchConfig) -> Self {
        let mut solver = Solver {
            board,
            config,
            states: Vec::new(),
            visited: FxHashSet::default(),
            frontier: Frontier::new(config.algorithm),
            stats: SearchStats::default(),
            started: Instant::now(),
            done: None,
        };
        solver.admit(GameState::root(board));
        solver.stats.peak_frontier = solver.frontier.len();
        solver
    }

    /// Expand one frontier state. Once the search has ended, repeats the final outcome.
    pub fn step(&mut self) -> Progress {
        match self.done {
            Some(Done::Solved(goal)) => return Progress::Solved(self.solution(goal)),
            Some(Done::Exhausted) => return Progress::Exhausted,
            None => {}
        }

        let Some(id) = self.frontier.pop() else {
            return self.finish(Done::Exhausted);
        };

        // Only the root can be admitted already finished.
        if self.states[id].is_finished() {
            return self.finish(Done::Solved(id));
        }

        for direction in ALL_DIRECTIONS {
            let visited = &self.visited;
            let next = match self.states[id].advance(self.board, id, direction, |key| {
                visited.contains(key)
            }) {
                Ok(next) => next,
                Err(_) => continue,
            };

            if next.is_finished() {
                self.states.push(next);
                return self.finish(Done::Solved(self.states.len() - 1));
            }
            self.admit(next);
        }

        self.stats.iterations += 1;
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
        if self.stats.iterations % PROGRESS_INTERVAL == 0 {
            log::debug!(
                "{} iterations, {} states, frontier {}, {:?} elapsed",
                self.stats.iterations,
                self.stats.unique_states,
                self.frontier.len(),
                self.started.elapsed()
            );
        }

        Progress::Searching
    }

    /// Run to completion.
    pub fn solve(&mut self) -> SolveResult {
        loop {
            match self.step() {
                Progress::Searching => {}
                Progress::Solved(solution) => return SolveResult::Solved(solution),
                Progress::Exhausted => return SolveResult::Impossible,
            }
        }
    }

    /// Counters so far; `elapsed` stops advancing once the search has ended.
    pub fn stats(&self) -> SearchStats {
        let mut stats = self.stats;
        if self.done.is_none() {
            stats.elapsed = self.started.elapsed();
        }
        stats
    }

    fn admit(&mut self, state: GameState) {
        for key in state.hashes(self.board) {
            self.visited.insert(key);
        }

        let id = self.states.len();
        match &mut self.frontier {
            Frontier::Fifo(queue) => queue.push_back(id),
            Frontier::Weighted { queue, sequence } => {
                queue.insert(Scored {
                    weight: state.weight(self.board, self.config.turn_cost),
                    sequence: *sequence,
                    state: id,
                });
                *sequence += 1;
            }
        }
        self.states.push(state);
        self.stats.unique_states += 1;
    }

    fn finish(&mut self, done: Done) -> Progress {
        self.done = Some(done);
        self.stats.elapsed = self.started.elapsed();

        match done {
            Done::Solved(goal) => {
                let solution = self.solution(goal);
                log::info!(
                    "solved in {} turns: {} iterations, {} states, {:?}",
                    solution.turns(),
                    self.stats.iterations,
                    self.stats.unique_states,
                    self.stats.elapsed
                );
                Progress::Solved(solution)
            }
            Done::Exhausted => {
                log::info!(
                    "no solution: {} iterations, {} states, {:?}",
                    self.stats.iterations,
                    self.stats.unique_states,
                    self.stats.elapsed
                );
                Progress::Exhausted
            }
        }
    }

    /// Walk parent links from `goal` back to the root.
    fn solution(&self, goal: StateId) -> Solution {
        let mut states = Vec::new();
        let mut current = Some(goal);
        while let Some(id) = current {
            let state = &self.states[id];
            states.push(state.clone());
            current = state.parent();
        }
        states.reverse();

        let moves = states.iter().filter_map(GameState::direction).collect();
        Solution { moves, states }
    }
}
