use itertools::Itertools;
use log::{debug, info};

use crate::{
    board::position::Position,
    engine::transposition::EntryFlag,
    moves::{movegenerator::MGT, movepicker::MovePicker, moves::Move},
};

use super::{
    eval::evaluate, killers::store_killer_move, quiescence::quiescence, SearchInfo, SearchResult, CHECKMATE,
    INFINITY, MAX_SEARCH_DEPTH, NEAR_CHECKMATE, STALEMATE,
};

/// Searches one depth at a time, keeping the result of the deepest iteration that finished.
/// The deadline is only armed after depth 1, so a legal position always yields a move
pub(crate) fn iterative_deepening(pos: &mut Position, info: &mut SearchInfo, max_depth: i32) -> SearchResult {
    let mut result = SearchResult { best_move: None, score: 0, depth: 0, nodes: 0, elapsed: Default::default() };

    for depth in 1..=max_depth {
        let (score, best_move) = search_root(pos, info, depth);

        if info.stopped {
            debug!("depth {} abandoned after {} nodes", depth, info.nodes);
            break;
        }

        result = SearchResult { best_move, score, depth, nodes: info.nodes, elapsed: info.start.elapsed() };
        print_search_stats(pos, info, &result);
        info.timer.arm();

        if best_move.is_none() || info.timer.expired() {
            break;
        }
    }

    result.nodes = info.nodes;
    result.elapsed = info.start.elapsed();
    result
}

fn print_search_stats(pos: &mut Position, info: &SearchInfo, result: &SearchResult) {
    let millis = result.elapsed.as_millis();
    let nps = (result.nodes as f64 / result.elapsed.as_secs_f64().max(0.001)) as u64;
    let pv = principal_variation(pos, info, result.depth).iter().map(|m| m.to_uci()).join(" ");
    info!(
        "depth {} score cp {} nodes {} nps {} time {} hashfull {} pv {}",
        result.depth,
        result.score,
        result.nodes,
        nps,
        millis,
        info.tt.hashfull(),
        pv
    );
}

/// Follows best moves stored in the table from the current position. Stops at the first
/// missing or illegal move, or once a position repeats
fn principal_variation(pos: &mut Position, info: &SearchInfo, depth: i32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut seen = vec![pos.hash()];
    while (pv.len() as i32) < depth {
        let Some(m) = info.tt.best_move(pos.hash()) else { break };
        if !pos.is_legal(m) {
            break;
        }
        pos.apply_move(m);
        pv.push(m);
        if seen.contains(&pos.hash()) {
            break;
        }
        seen.push(pos.hash());
    }
    for _ in 0..pv.len() {
        pos.unapply_move();
    }
    pv
}

/// Root node: every legal move is searched with a full window and the best one is kept
fn search_root(pos: &mut Position, info: &mut SearchInfo, depth: i32) -> (i32, Option<Move>) {
    info.nodes += 1;
    let hash = pos.hash();
    let tt_move = info.tt.best_move(hash);
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best_score = -INFINITY;
    let mut best_move = None;

    let mut picker = MovePicker::new(pos, MGT::All, tt_move, info.killer_moves[0], &info.history);
    while let Some(entry) = picker.next() {
        if !pos.apply_if_legal(entry.m) {
            continue;
        }
        let score = -alpha_beta(pos, info, depth - 1, -beta, -alpha, 1, true);
        pos.unapply_move();

        if info.stopped {
            return (0, None);
        }

        if score > best_score {
            best_score = score;
            best_move = Some(entry.m);
        }
        if score > alpha {
            alpha = score;
        }
    }

    if best_move.is_none() {
        let score = if pos.in_check() { -CHECKMATE } else { STALEMATE };
        return (score, None);
    }

    info.tt.store(hash, best_move, depth, EntryFlag::Exact, best_score, 0);
    (best_score, best_move)
}

/// Score returned when a null move search fails high. Passing can't prove a mate, so mate
/// scores are clamped to beta
fn null_move_cutoff(null_eval: i32, beta: i32) -> i32 {
    if null_eval >= NEAR_CHECKMATE {
        beta
    } else {
        null_eval
    }
}

/// Fail-soft negamax alpha-beta
fn alpha_beta(
    pos: &mut Position,
    info: &mut SearchInfo,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: i32,
    null_ok: bool,
) -> i32 {
    if info.visit_node() {
        return 0;
    }

    if pos.is_draw() {
        return STALEMATE;
    }

    if ply >= MAX_SEARCH_DEPTH {
        return evaluate(pos);
    }

    let hash = pos.hash();
    if let Some(score) = info.tt.probe(hash, depth, alpha, beta, ply) {
        return score;
    }

    if depth <= 0 {
        return quiescence(pos, info, alpha, beta, ply);
    }

    let in_check = pos.in_check();
    let stm = pos.side_to_move();

    // Null move pruning: if passing still fails high, a real move will too
    let r = info.options.null_move_reduction;
    if null_ok && !in_check && depth > r && pos.has_non_pawns(stm) {
        let state = pos.make_null_move();
        let null_eval = -alpha_beta(pos, info, depth - 1 - r, -beta, -beta + 1, ply + 1, false);
        pos.unmake_null_move(state);

        if info.stopped {
            return 0;
        }
        if null_eval >= beta {
            return null_move_cutoff(null_eval, beta);
        }
    }

    let tt_move = info.tt.best_move(hash);
    let original_alpha = alpha;
    let mut best_score = -INFINITY;
    let mut best_move = None;
    let mut legal_moves = 0;

    let mut picker = MovePicker::new(pos, MGT::All, tt_move, info.killer_moves[ply as usize], &info.history);
    while let Some(entry) = picker.next() {
        let m = entry.m;
        let piece = match pos.piece_at(m.from) {
            Some(p) => p.name,
            None => continue,
        };
        if !pos.apply_if_legal(m) {
            continue;
        }
        legal_moves += 1;

        let eval = -alpha_beta(pos, info, depth - 1, -beta, -alpha, ply + 1, true);
        pos.unapply_move();

        if info.stopped {
            return 0;
        }

        if eval > best_score {
            best_score = eval;
            best_move = Some(m);
        }

        if eval > alpha {
            alpha = eval;
            if m.is_quiet() {
                info.history.update_history(stm, piece, m.to, depth);
            }
        }

        if alpha >= beta {
            if m.is_quiet() {
                store_killer_move(ply, m, info);
            }
            info.tt.store(hash, Some(m), depth, EntryFlag::LowerBound, best_score, ply);
            return best_score;
        }
    }

    if legal_moves == 0 {
        // Checkmate if in check, otherwise stalemate
        return if in_check { -CHECKMATE + ply } else { STALEMATE };
    }

    let flag = if best_score > original_alpha { EntryFlag::Exact } else { EntryFlag::UpperBound };
    info.tt.store(hash, best_move, depth, flag, best_score, ply);
    best_score
}
