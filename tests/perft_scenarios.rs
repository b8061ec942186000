//! End-to-end perft scenarios against the public `Position` API, independent of the crate's
//! own unit test suite (which cross-checks the generator against the naive oracle directly).

use position_core::perft::perft;
use position_core::position::{from_fen, Position};

#[test]
fn starting_position_depth_five() {
    let mut pos = Position::starting_position();
    assert_eq!(perft(&mut pos, 5), 4_865_609);
}

#[test]
fn kiwipete_depth_four() {
    let mut pos =
        from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(perft(&mut pos, 4), 4_085_603);
}

#[test]
fn king_blocked_promotion_square_yields_only_king_moves() {
    let mut pos = from_fen("3k4/3P4/3K4/8/8/8/8/8 w - - 0 1").unwrap();
    let moves = pos.generate_all_legal();
    // d6 king reaches c5, c6, d5, e5, e6 (c7/e7 adjacent to the black king on d8 are denied,
    // d7 is blocked by the own pawn) — 5 legal king moves, no pawn promotion.
    assert_eq!(moves.len(), 5);
}

#[test]
fn en_passant_pin_along_fifth_rank_is_excluded() {
    let mut pos = from_fen("8/8/8/K2Pp2r/8/8/8/8 w - e6 0 1").unwrap();
    assert_eq!(pos.generate_all_legal().len(), 7);
}

#[test]
fn castling_legal_on_both_sides_when_unobstructed() {
    let mut pos = from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(perft(&mut pos, 1), 26);
}

#[test]
fn promotion_position_emits_all_variants() {
    let mut pos = from_fen("4k3/6P1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let moves = pos.generate_all_legal();
    assert_eq!(moves.len(), 4 /* promotions */ + 5 /* king moves */);
}

#[test]
fn double_check_allows_only_king_moves() {
    let mut pos = from_fen("8/8/8/8/3k4/8/3K4/3R1B2 b - - 0 1").unwrap();
    assert!(pos.is_check());
    let moves = pos.generate_all_legal();
    for mv in moves.iter() {
        assert_eq!(pos.piece_at(mv.from()).map(|(_, p)| p), Some(position_core::types::Piece::King));
    }
}
