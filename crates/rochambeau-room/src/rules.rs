//! Move resolution.

use rochambeau_protocol::Move;

/// Result of one round, from the point of view of seat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tie,
    FirstWins,
    SecondWins,
}

impl Outcome {
    /// Seat index of the winner, `None` on a tie.
    pub fn winner_seat(self) -> Option<usize> {
        match self {
            Self::Tie => None,
            Self::FirstWins => Some(0),
            Self::SecondWins => Some(1),
        }
    }
}

/// Resolves a round.
///
/// Moves are compared by their position in the cycle `[R, P, S]`:
/// the first move wins iff `(i1 - i2) mod 3 == 1`.
pub fn resolve(first: Move, second: Move) -> Outcome {
    if first == second {
        return Outcome::Tie;
    }
    let n = Move::ALL.len();
    if (first.index() + n - second.index()) % n == 1 {
        Outcome::FirstWins
    } else {
        Outcome::SecondWins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Move::{Paper, Rock, Scissors};

    #[test]
    fn test_resolve_equal_moves_tie() {
        for m in Move::ALL {
            assert_eq!(resolve(m, m), Outcome::Tie);
        }
    }

    #[test]
    fn test_resolve_classic_matchups() {
        assert_eq!(resolve(Rock, Scissors), Outcome::FirstWins);
        assert_eq!(resolve(Paper, Rock), Outcome::FirstWins);
        assert_eq!(resolve(Scissors, Paper), Outcome::FirstWins);
        assert_eq!(resolve(Scissors, Rock), Outcome::SecondWins);
        assert_eq!(resolve(Rock, Paper), Outcome::SecondWins);
        assert_eq!(resolve(Paper, Scissors), Outcome::SecondWins);
    }

    #[test]
    fn test_resolve_is_antisymmetric() {
        for a in Move::ALL {
            for b in Move::ALL {
                if a == b {
                    continue;
                }
                let forward = resolve(a, b);
                let backward = resolve(b, a);
                assert_ne!(forward, Outcome::Tie);
                assert_eq!(
                    forward == Outcome::FirstWins,
                    backward == Outcome::SecondWins,
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_outcome_winner_seat() {
        assert_eq!(Outcome::Tie.winner_seat(), None);
        assert_eq!(Outcome::FirstWins.winner_seat(), Some(0));
        assert_eq!(Outcome::SecondWins.winner_seat(), Some(1));
    }
}
