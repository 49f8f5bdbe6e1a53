use clap::{Parser, ValueEnum};
use syncro::board::{Board, BoardConfig};
use syncro::levels::{Legend, Levels};
use syncro::solver::{
    Algorithm, DEFAULT_TURN_COST, Progress, SearchConfig, SearchStats, Solution, Solver,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Bfs,
    Astar,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Bfs => Algorithm::Bfs,
            AlgorithmArg::Astar => Algorithm::AStar,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LegendArg {
    /// Contra-actors written as `o`
    Classic,
    /// Contra-actors written as `a`
    Alternate,
}

impl From<LegendArg> for Legend {
    fn from(arg: LegendArg) -> Self {
        match arg {
            LegendArg::Classic => Legend::Classic,
            LegendArg::Alternate => Legend::Alternate,
        }
    }
}

fn print_solution(board: &Board, solution: &Solution) {
    println!("\nStarting position:\n{}", board);
    let total = solution.turns();
    for (count, (direction, state)) in solution
        .moves
        .iter()
        .zip(&solution.states[1..])
        .enumerate()
    {
        println!(
            "Move {} ({}/{}):\n{}",
            direction,
            count + 1,
            total,
            state.render(board)
        );
    }
}

enum Outcome {
    Solved(Solution),
    Cutoff,
    Impossible,
}

struct LevelStats {
    solved: bool,
    turns: usize,
    states: usize,
    elapsed_ms: u128,
}

struct SolveOpts {
    level_num: usize,
    max_iterations: usize,
    search: SearchConfig,
    print_solution: bool,
}

/// Drive the solver one expansion at a time so the iteration budget can cut it off.
fn run(board: &Board, opts: &SolveOpts) -> (Outcome, SearchStats) {
    let mut solver = Solver::new(board, opts.search);
    let outcome = loop {
        match solver.step() {
            Progress::Solved(solution) => break Outcome::Solved(solution),
            Progress::Exhausted => break Outcome::Impossible,
            Progress::Searching => {
                if solver.stats().iterations >= opts.max_iterations {
                    log::warn!(
                        "level {}: stopped after {} iterations",
                        opts.level_num,
                        opts.max_iterations
                    );
                    break Outcome::Cutoff;
                }
            }
        }
    };
    (outcome, solver.stats())
}

fn solve_level(board: &Board, opts: SolveOpts) -> LevelStats {
    let (outcome, stats) = run(board, &opts);
    let elapsed_ms = stats.elapsed.as_millis();

    let (solved_char, turns) = match &outcome {
        Outcome::Solved(solution) => ('Y', solution.turns()),
        Outcome::Cutoff => ('N', 0),
        Outcome::Impossible => ('X', 0),
    };

    println!(
        "level: {:<3}  solved: {}  turns: {:<5}  iterations: {:<10}  states: {:<10}  frontier: {:<8}  elapsed: {} ms",
        opts.level_num,
        solved_char,
        turns,
        stats.iterations,
        stats.unique_states,
        stats.peak_frontier,
        elapsed_ms
    );

    match &outcome {
        Outcome::Solved(solution) => {
            let moves: Vec<String> = solution.moves.iter().map(ToString::to_string).collect();
            println!("Solution turns count: {}", turns);
            println!("Moves: {}", moves.join(" "));
            if opts.print_solution {
                print_solution(board, solution);
            }
        }
        Outcome::Cutoff => println!("Search budget exhausted."),
        Outcome::Impossible => println!("No solution found."),
    }

    LevelStats {
        solved: matches!(outcome, Outcome::Solved(_)),
        turns,
        states: stats.unique_states,
        elapsed_ms,
    }
}

#[derive(Parser)]
#[command(name = "syncro")]
#[command(about = "A Syncomania puzzle solver", long_about = None)]
struct Args {
    /// Path to the levels file
    #[arg(value_name = "FILE")]
    levels_file: String,

    /// Level number to solve (1-indexed), or start of range
    #[arg(value_name = "LEVEL")]
    level_start: usize,

    /// Optional end of level range (inclusive, 1-indexed)
    #[arg(value_name = "LEVEL_END")]
    level_end: Option<usize>,

    /// Print every position of the solution
    #[arg(short, long)]
    print_solution: bool,

    /// Maximum number of expanded states before giving up
    #[arg(short = 'n', long, default_value = "5000000")]
    max_iterations: usize,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value = "astar")]
    algorithm: AlgorithmArg,

    /// A* cost of one turn, added to the summed exit distance
    #[arg(short, long, default_value_t = DEFAULT_TURN_COST)]
    turn_cost: f32,

    /// Map symbol set
    #[arg(short, long, value_enum, default_value = "classic")]
    legend: LegendArg,

    /// Do not fold mirrored positions of symmetric maps
    #[arg(long, default_value = "false")]
    no_symmetry: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = BoardConfig {
        symmetry_folding: !args.no_symmetry,
        legend: args.legend.into(),
        ..BoardConfig::default()
    };

    // Load levels from file
    let levels = match Levels::from_file(&args.levels_file, &config) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            std::process::exit(1);
        }
    };

    let level_end = args.level_end.unwrap_or(args.level_start);

    // Validate range
    if args.level_start == 0 {
        eprintln!("Error: level numbers must be at least 1");
        std::process::exit(1);
    }

    if level_end < args.level_start {
        eprintln!("Error: level end must be >= level start");
        std::process::exit(1);
    }

    if level_end > levels.len() {
        eprintln!(
            "Error: level {} not found (file contains {} levels)",
            level_end,
            levels.len()
        );
        std::process::exit(1);
    }

    if !(args.turn_cost.is_finite() && args.turn_cost >= 0.0) {
        eprintln!("Error: turn cost must be a non-negative number");
        std::process::exit(1);
    }

    let num_levels = level_end - args.level_start + 1;
    let search = SearchConfig {
        algorithm: args.algorithm.into(),
        turn_cost: args.turn_cost,
    };

    let mut total_solved = 0;
    let mut total_turns = 0;
    let mut total_states = 0;
    let mut total_time_ms = 0;

    for (level_num, board) in (args.level_start..=level_end)
        .filter_map(|level_num| levels.get(level_num - 1).map(|board| (level_num, board)))
    {
        let opts = SolveOpts {
            level_num,
            max_iterations: args.max_iterations,
            search,
            print_solution: args.print_solution,
        };
        let stats = solve_level(board, opts);

        if stats.solved {
            total_solved += 1;
        }
        total_turns += stats.turns;
        total_states += stats.states;
        total_time_ms += stats.elapsed_ms;
    }

    // Print summary statistics if multiple levels were solved
    if num_levels > 1 {
        println!("---");
        println!(
            "solved: {:>3}/{:<3}        turns: {:<5}  states: {:<10}  elapsed: {} ms",
            total_solved, num_levels, total_turns, total_states, total_time_ms
        );
    }
}
