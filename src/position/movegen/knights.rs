//! Knight move generation. A pinned knight has no legal moves: every square it can reach
//! leaves the pin line, so it is skipped outright rather than masked.

use crate::tables;
use crate::types::{Bitboard, Move, MoveList, Square};

use super::super::pins::pin_restriction;
use super::super::state::Position;

pub(super) fn generate(pos: &Position, from: Square, dest_mask: Bitboard, captures_only: bool, moves: &mut MoveList) {
    if pin_restriction(pos, from).is_some() {
        return;
    }
    let us = pos.side_to_move;
    let own = pos.color_bb[us.index()];
    let enemy = pos.color_bb[us.opponent().index()];
    let mut targets = tables::knight_attacks(from).and(dest_mask).and(own.not());
    if captures_only {
        targets = targets.and(enemy);
    }
    for to in targets.iter() {
        moves.push(if enemy.contains(to) { Move::capture(from, to) } else { Move::quiet(from, to) });
    }
}
