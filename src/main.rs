use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use mini_crazyhouse::engines::engine_iterative::IterativeEngine;
use mini_crazyhouse::engines::engine_random::RandomEngine;
use mini_crazyhouse::engines::engine_trait::{Engine, GoParams};
use mini_crazyhouse::game_state::game_state::GameState;
use mini_crazyhouse::move_generation::legal_move_generator::MiniCrazyhouseRules;
use mini_crazyhouse::move_generation::perft::perft_divide;
use mini_crazyhouse::utils::engine_match_harness::{play_match, MatchConfig};
use mini_crazyhouse::utils::long_algebraic::move_to_long_algebraic;
use mini_crazyhouse::utils::render_game_state::render_game_state;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace); RUST_LOG applies when omitted
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a position and print the chosen move
    Bestmove {
        /// Position text; the standard start position when omitted
        #[arg(long)]
        position: Option<String>,
        #[arg(long, default_value_t = 6)]
        depth: u8,
        /// Root worker threads; 0 uses every core
        #[arg(long)]
        threads: Option<usize>,
        /// Search root moves in parallel
        #[arg(long)]
        parallel: bool,
        #[arg(long, value_enum, default_value_t = EvaluatorArg::Heuristic)]
        evaluator: EvaluatorArg,
        /// JSON file the move cache is loaded from and saved to
        #[arg(long)]
        move_cache: Option<PathBuf>,
    },
    /// Play the searching engine against itself or a random mover
    Selfplay {
        #[arg(long, default_value_t = 3)]
        depth: u8,
        #[arg(long, default_value_t = 80)]
        max_plies: u16,
        /// Let a random mover play Black
        #[arg(long)]
        random_black: bool,
    },
    /// Count legal move-tree leaves per root move
    Perft {
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        depth: u8,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EvaluatorArg {
    Heuristic,
    Material,
}

impl EvaluatorArg {
    fn option_value(self) -> &'static str {
        match self {
            EvaluatorArg::Heuristic => "heuristic",
            EvaluatorArg::Material => "material",
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .init();
}

fn load_position(position: Option<&str>) -> Result<GameState, String> {
    match position {
        Some(text) => GameState::from_fen(text).map_err(|e| format!("bad position '{text}': {e}")),
        None => Ok(GameState::new_game()),
    }
}

fn run_bestmove(
    position: Option<&str>,
    depth: u8,
    threads: Option<usize>,
    parallel: bool,
    evaluator: EvaluatorArg,
    move_cache: Option<PathBuf>,
) -> Result<(), String> {
    let state = load_position(position)?;
    let mut engine = IterativeEngine::new(depth);
    if let Some(threads) = threads {
        engine.set_option("Threads", &threads.to_string())?;
    }
    engine.set_option("ParallelRoot", if parallel { "true" } else { "false" })?;
    engine.set_option("Evaluator", evaluator.option_value())?;
    if let Some(path) = move_cache {
        engine.set_option("MoveCacheFile", &path.to_string_lossy())?;
    }

    println!("{}", render_game_state(&state));
    let out = engine.choose_move(&state, &GoParams::default())?;
    for line in &out.info_lines {
        println!("{line}");
    }
    match (out.best_move, out.score) {
        (Some(mv), Some(score)) => println!("bestmove {} score {score}", move_to_long_algebraic(&mv)),
        (Some(mv), None) => println!("bestmove {}", move_to_long_algebraic(&mv)),
        (None, _) => println!("bestmove none"),
    }
    Ok(())
}

fn run_selfplay(depth: u8, max_plies: u16, random_black: bool) -> Result<(), String> {
    let mut white = IterativeEngine::new(depth);
    let mut black: Box<dyn Engine> = if random_black {
        Box::new(RandomEngine::new())
    } else {
        Box::new(IterativeEngine::new(depth))
    };
    let config = MatchConfig {
        max_plies,
        ..MatchConfig::default()
    };
    println!("{} vs {}", white.name(), black.name());

    let result = play_match(&mut white, black.as_mut(), &config)?;
    println!("moves: {}", result.played_moves_lan.join(" "));
    println!("{}", render_game_state(&result.final_state));
    println!(
        "outcome: {:?} after {} plies (white {} ms, black {} ms)",
        result.outcome,
        result.played_moves_lan.len(),
        result.white_total_time_ns / 1_000_000,
        result.black_total_time_ns / 1_000_000
    );
    Ok(())
}

fn run_perft(position: Option<&str>, depth: u8) -> Result<(), String> {
    let state = load_position(position)?;
    let divide = perft_divide(&MiniCrazyhouseRules, &state, depth).map_err(|e| e.to_string())?;
    let mut total = 0u64;
    for (mv, nodes) in &divide {
        println!("{}: {nodes}", move_to_long_algebraic(mv));
        total += nodes;
    }
    println!("total: {total}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let result = match cli.command {
        Command::Bestmove {
            position,
            depth,
            threads,
            parallel,
            evaluator,
            move_cache,
        } => run_bestmove(position.as_deref(), depth, threads, parallel, evaluator, move_cache),
        Command::Selfplay {
            depth,
            max_plies,
            random_black,
        } => run_selfplay(depth, max_plies, random_black),
        Command::Perft { position, depth } => run_perft(position.as_deref(), depth),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
