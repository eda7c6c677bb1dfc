use std::{error::Error, time::Duration};

use itertools::Itertools;
use log::info;

use marbit::{parallel_perft, search::MAX_SEARCH_DEPTH, Engine, GameTime, Position, STARTING_FEN};

const USAGE: &str = "usage:
  marbit perft <depth> [fen]
  marbit divide <depth> [fen]
  marbit search [depth <d>] [movetime <ms>] [time <ms>] [inc <ms>] [fen <fen>] [moves <uci>...]
  marbit fen [fen]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect_vec();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "perft" => {
            let (depth, pos) = depth_and_position(rest)?;
            let start = std::time::Instant::now();
            let nodes = parallel_perft(&pos, depth);
            let secs = start.elapsed().as_secs_f64().max(1e-9);
            println!("Nodes searched: {nodes}");
            info!("{} nps", (nodes as f64 / secs) as u64);
        }
        "divide" => {
            let (depth, mut pos) = depth_and_position(rest)?;
            let divide = pos.perft_divide(depth);
            for (m, count) in divide.iter().sorted() {
                println!("{m}: {count}");
            }
            println!("\nNodes searched: {}", divide.values().sum::<u64>());
        }
        "search" => run_search(rest)?,
        "fen" => {
            let pos = position_from(rest)?;
            println!("{pos}");
            println!("{}", pos.to_fen());
        }
        _ => println!("{USAGE}"),
    }
    Ok(())
}

fn position_from(fen: &[String]) -> Result<Position, Box<dyn Error>> {
    if fen.is_empty() {
        Ok(Position::from_fen(STARTING_FEN)?)
    } else {
        Ok(Position::from_fen(&fen.join(" "))?)
    }
}

fn depth_and_position(args: &[String]) -> Result<(u32, Position), Box<dyn Error>> {
    let Some((depth, fen)) = args.split_first() else {
        return Err("missing depth".into());
    };
    Ok((depth.parse()?, position_from(fen)?))
}

fn run_search(args: &[String]) -> Result<(), Box<dyn Error>> {
    let split = |key: &str| args.iter().position(|a| a == key);
    let fen_at = split("fen");
    let moves_at = split("moves");
    let settings_end = [fen_at, moves_at].into_iter().flatten().min().unwrap_or(args.len());

    let mut depth = MAX_SEARCH_DEPTH;
    let mut movetime = None;
    let mut clock = GameTime::default();
    for (key, value) in args[..settings_end].iter().tuples() {
        match key.as_str() {
            "depth" => depth = value.parse()?,
            "movetime" => movetime = Some(Duration::from_millis(value.parse()?)),
            "time" => clock.remaining = Duration::from_millis(value.parse()?),
            "inc" => clock.increment = Duration::from_millis(value.parse()?),
            _ => return Err(format!("unknown search setting {key}").into()),
        }
    }

    let mut pos = match fen_at {
        Some(i) => position_from(&args[i + 1..moves_at.filter(|&m| m > i).unwrap_or(args.len())])?,
        None => Position::new(),
    };
    if let Some(i) = moves_at {
        let end = fen_at.filter(|&f| f > i).unwrap_or(args.len());
        for text in &args[i + 1..end] {
            let m = pos.parse_uci_move(text)?;
            pos.try_make_move(m)?;
        }
    }

    let budget = movetime.or_else(|| (clock.remaining > Duration::ZERO).then(|| clock.budget()));
    let engine = Engine::default();
    let result = engine.search(&pos, depth, budget);
    match result.best_move {
        Some(m) => println!("bestmove {m}"),
        None => println!("bestmove (none) {:?}", pos.status()),
    }
    Ok(())
}
