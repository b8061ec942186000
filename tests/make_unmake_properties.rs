//! Property-based round-trip checks over randomly walked reachable positions, using only the
//! public `Position` API (see `src/position/movegen/mod.rs` and `src/position/make_unmake.rs`
//! for the corresponding in-crate tests that also inspect the NNUE accumulator and cross-check
//! against the naive oracle generator).

use position_core::position::Position;
use proptest::prelude::*;

/// Walk `steps` random legal moves from the starting position, checking at every step that
/// `make(m); unmake(m)` restores the externally observable state exactly.
fn walk_and_check(seed: u64, steps: usize) {
    let mut rng_state = seed.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(1);
    let mut next_index = |bound: usize| -> usize {
        // xorshift64*, good enough for picking a move index deterministically from a seed.
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        (rng_state as usize) % bound
    };

    let mut pos = Position::starting_position();
    for _ in 0..steps {
        let moves = pos.generate_all_legal();
        if moves.is_empty() {
            break;
        }
        let mv = moves.get(next_index(moves.len())).unwrap();

        let hash_before = pos.hash();
        let occ_before = pos.occupied();
        let ep_before = pos.en_passant_target();
        let castling_before = pos.castling_rights();
        let halfmove_before = pos.halfmove_clock();
        let stm_before = pos.side_to_move();

        pos.make(mv);
        pos.unmake(mv);

        prop_assert_eq_panic(pos.hash(), hash_before);
        prop_assert_eq_panic(pos.occupied(), occ_before);
        prop_assert_eq_panic(pos.en_passant_target(), ep_before);
        prop_assert_eq_panic(pos.castling_rights(), castling_before);
        prop_assert_eq_panic(pos.halfmove_clock(), halfmove_before);
        prop_assert_eq_panic(pos.side_to_move(), stm_before);

        pos.make(mv);
    }
}

fn prop_assert_eq_panic<T: PartialEq + std::fmt::Debug>(a: T, b: T) {
    assert_eq!(a, b, "make/unmake round trip did not restore state");
}

proptest! {
    #[test]
    fn make_unmake_round_trips_over_random_walks(seed in any::<u64>(), steps in 1usize..40) {
        walk_and_check(seed, steps);
    }
}

#[test]
fn generate_all_legal_has_no_duplicate_moves_along_a_walk() {
    let mut pos = Position::starting_position();
    let mut rng_state = 0xDEADBEEFu64;
    for _ in 0..30 {
        let moves = pos.generate_all_legal();
        if moves.is_empty() {
            break;
        }
        let seen: std::collections::HashSet<_> = moves.iter().collect();
        assert_eq!(seen.len(), moves.len(), "duplicate legal move generated");

        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        let idx = (rng_state as usize) % moves.len();
        let mv = moves.get(idx).unwrap();
        pos.make(mv);
    }
}
