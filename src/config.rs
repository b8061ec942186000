//! Process-wide immutable configuration: the NNUE network weights.
//!
//! Loaded once, lazily, the same way the magic tables and Zobrist keys are: a
//! [`std::sync::LazyLock`] built the first time anything asks for it. `POSITION_CORE_NNUE_DIR`
//! lets a trained network be dropped in without recompiling; absent that, the embedded
//! smoke-test network (or, without the `embedded_nnue` feature, an all-zero placeholder) is
//! used instead.

use std::env;
use std::sync::LazyLock;

use crate::nnue::NnueNetwork;

const NNUE_DIR_ENV: &str = "POSITION_CORE_NNUE_DIR";

/// Whether the process-wide network came from real weights (embedded or user-supplied) or is
/// the all-zero placeholder standing in for a model that was never loaded. `evaluate()` consults
/// this to implement the "model not initialized" error class (spec §7): the accumulator delta
/// machinery in `make`/`unmake` always has *a* network to index into (so it never fails), but a
/// caller asking for an actual evaluation from the placeholder is asking a question this process
/// can't answer yet.
#[derive(Clone, Copy, PartialEq, Eq)]
enum NetworkSource {
    Embedded,
    UserProvided,
    Placeholder,
}

fn load_network() -> (NnueNetwork, NetworkSource) {
    if let Ok(dir) = env::var(NNUE_DIR_ENV) {
        match NnueNetwork::load(&dir) {
            Ok(net) => return (net, NetworkSource::UserProvided),
            Err(_err) => {
                #[cfg(feature = "logging")]
                log::warn!("{NNUE_DIR_ENV}={dir} set but failed to load ({_err}); falling back");
            }
        }
    }

    #[cfg(feature = "embedded_nnue")]
    {
        (NnueNetwork::from_embedded(), NetworkSource::Embedded)
    }
    #[cfg(not(feature = "embedded_nnue"))]
    {
        #[cfg(feature = "logging")]
        log::warn!("no NNUE network available; evaluating with an all-zero placeholder network");
        (NnueNetwork::placeholder(), NetworkSource::Placeholder)
    }
}

static NETWORK: LazyLock<(NnueNetwork, NetworkSource)> = LazyLock::new(load_network);

/// The process-wide NNUE network. Immutable after first access; every [`crate::position::Position`]
/// shares it, the way every position shares the magic attack tables.
#[must_use]
pub fn network() -> &'static NnueNetwork {
    &NETWORK.0
}

/// `false` iff the process is still running the all-zero placeholder network (no embedded net
/// compiled in and `POSITION_CORE_NNUE_DIR` unset or unloadable). `Position::evaluate` consults
/// this to report [`crate::position::NnueError::NotInitialized`] instead of silently returning a
/// meaningless zero.
#[must_use]
pub fn is_initialized() -> bool {
    NETWORK.1 != NetworkSource::Placeholder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_is_reachable_and_stable() {
        let a = network() as *const NnueNetwork;
        let b = network() as *const NnueNetwork;
        assert_eq!(a, b);
    }
}
