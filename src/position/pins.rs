//! Pin and check detection: `set_pins`/`set_pins_and_checks`, called by move generation
//! before enumerating moves for the side to move.

use crate::tables;
use crate::types::{Bitboard, Color, Piece, Square};

use super::state::{PinState, Position};

/// Walk every opponent slider of the given `arms` kind set, recording pins (and, if
/// `with_checks`, direct checks) against `king`.
fn scan_sliders(
    pos: &Position,
    us: Color,
    king: Square,
    attackers: Bitboard,
    pin_field: &mut Bitboard,
    with_checks: bool,
    record_check: &mut impl FnMut(Square),
) {
    let own = pos.color_bb[us.index()];
    for slider in attackers.iter() {
        let ray = tables::ray_between_exclusive(slider, king);
        let blockers = ray.and(pos.all_bb);
        if blockers.is_single() {
            if blockers.intersects(own) {
                // Include the slider's own square: the pinned piece may still legally capture
                // it, since that also blocks the check.
                *pin_field |= ray | Bitboard::from_square(slider);
            }
        } else if with_checks && blockers.is_empty() {
            record_check(slider);
        }
    }
}

fn compute_pins(pos: &mut Position, with_checks: bool) {
    let us = pos.side_to_move;
    let them = us.opponent();
    let king = pos.king_square[us.index()];

    let diagonal_attackers =
        (pos.pieces(them, Piece::Bishop) | pos.pieces(them, Piece::Queen)) & tables::bishop_full_rays(king);
    let straight_attackers =
        (pos.pieces(them, Piece::Rook) | pos.pieces(them, Piece::Queen)) & tables::rook_full_rays(king);

    let bishops = pos.pieces(them, Piece::Bishop);
    let rooks = pos.pieces(them, Piece::Rook);

    let mut straight_pins = Bitboard::EMPTY;
    let mut diagonal_pins = Bitboard::EMPTY;
    let mut check_rays = Bitboard::EMPTY;
    let mut bishop_checks = Bitboard::EMPTY;
    let mut rook_checks = Bitboard::EMPTY;
    let mut queen_checks = Bitboard::EMPTY;

    scan_sliders(pos, us, king, diagonal_attackers, &mut diagonal_pins, with_checks, &mut |slider| {
        check_rays |= tables::ray_between_exclusive(slider, king);
        if bishops.contains(slider) {
            bishop_checks |= Bitboard::from_square(slider);
        } else {
            queen_checks |= Bitboard::from_square(slider);
        }
    });
    scan_sliders(pos, us, king, straight_attackers, &mut straight_pins, with_checks, &mut |slider| {
        check_rays |= tables::ray_between_exclusive(slider, king);
        if rooks.contains(slider) {
            rook_checks |= Bitboard::from_square(slider);
        } else {
            queen_checks |= Bitboard::from_square(slider);
        }
    });

    let mut pawn_checks = Bitboard::EMPTY;
    let mut knight_checks = Bitboard::EMPTY;
    if with_checks {
        let pawn_attack_origin = match us {
            Color::White => tables::white_pawn_attacks(king),
            Color::Black => tables::black_pawn_attacks(king),
        };
        pawn_checks = pawn_attack_origin & pos.pieces(them, Piece::Pawn);
        knight_checks = tables::knight_attacks(king) & pos.pieces(them, Piece::Knight);
    }

    pos.pins = PinState {
        straight_pins,
        diagonal_pins,
        all_pins: straight_pins | diagonal_pins,
        pawn_checks,
        knight_checks,
        bishop_checks,
        rook_checks,
        queen_checks,
        check_rays,
        num_checks: 0,
        valid: true,
    };
    pos.pins.num_checks = pos.pins.checkers().popcount() as u8;
}

/// Compute pins only. Call when the side to move is not in check.
pub(crate) fn set_pins(pos: &mut Position) {
    compute_pins(pos, false);
}

/// Compute pins and checks. Call when the side to move is in check.
pub(crate) fn set_pins_and_checks(pos: &mut Position) {
    compute_pins(pos, true);
}

/// The pin restriction bitboard for a piece on `sq`, if it is pinned: the exact line (straight
/// or diagonal) it is pinned along. A square can never be pinned along both at once, since every
/// non-king square lies on exactly one line through the king (a diagonal, a straight line, or
/// neither).
pub(crate) fn pin_restriction(pos: &Position, sq: Square) -> Option<Bitboard> {
    if pos.pins.diagonal_pins.contains(sq) {
        Some(pos.pins.diagonal_pins)
    } else if pos.pins.straight_pins.contains(sq) {
        Some(pos.pins.straight_pins)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position as PublicPosition;

    #[test]
    fn starting_position_has_no_pins_or_checks() {
        let mut pos = PublicPosition::starting_position();
        set_pins(&mut pos);
        assert!(pos.pins.all_pins.is_empty());
        assert_eq!(pos.pins.num_checks, 0);
    }

    #[test]
    fn pinned_rook_is_recorded_in_straight_pins() {
        // White king e1, white rook e2, black rook e8: rook is pinned on the e-file.
        let mut pos = PublicPosition::empty();
        pos.set_piece("e1".parse().unwrap(), Color::White, Piece::King);
        pos.set_piece("e2".parse().unwrap(), Color::White, Piece::Rook);
        pos.set_piece("e8".parse().unwrap(), Color::Black, Piece::Rook);
        pos.set_piece("a8".parse().unwrap(), Color::Black, Piece::King);
        crate::position::attacks::recompute_all(&mut pos);
        set_pins(&mut pos);
        let e2: Square = "e2".parse().unwrap();
        assert!(pos.pins.straight_pins.contains(e2));
        assert!(pos.pins.diagonal_pins.is_empty());
    }

    #[test]
    fn direct_rook_check_has_exclusive_check_ray() {
        let mut pos = PublicPosition::empty();
        pos.set_piece("e1".parse().unwrap(), Color::White, Piece::King);
        pos.set_piece("e8".parse().unwrap(), Color::Black, Piece::Rook);
        pos.set_piece("a8".parse().unwrap(), Color::Black, Piece::King);
        crate::position::attacks::recompute_all(&mut pos);
        set_pins_and_checks(&mut pos);
        assert_eq!(pos.pins.num_checks, 1);
        let e4: Square = "e4".parse().unwrap();
        assert!(pos.pins.check_rays.contains(e4));
        assert!(!pos.pins.check_rays.contains("e8".parse().unwrap()));
        assert!(!pos.pins.check_rays.contains("e1".parse().unwrap()));
    }
}
