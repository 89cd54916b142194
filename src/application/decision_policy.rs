// Decision policies - Pure stay/switch/disconnect verdicts
use crate::domain::connection::{ConnectionState, Decision};
use crate::domain::network::NetworkObservation;
use std::cmp::Ordering;

/// A handoff strategy.
///
/// Implementations must be total: every state and candidate set yields
/// exactly one decision, and the same inputs always yield the same decision.
pub trait DecisionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn decide(&self, state: &ConnectionState, candidates: &[NetworkObservation]) -> Decision;
}

/// Strongest signal wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Top-ranked candidate. Equal strengths go to the lexicographically
    /// smallest name so the choice never depends on input order.
    pub fn best<'a>(&self, candidates: &'a [NetworkObservation]) -> Option<&'a NetworkObservation> {
        candidates.iter().max_by(|a, b| rank(a, b))
    }
}

fn rank(a: &NetworkObservation, b: &NetworkObservation) -> Ordering {
    a.ranking_strength()
        .total_cmp(&b.ranking_strength())
        .then_with(|| b.name.cmp(&a.name))
}

impl DecisionPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn decide(&self, state: &ConnectionState, candidates: &[NetworkObservation]) -> Decision {
        let Some(best) = self.best(candidates) else {
            return Decision::Disconnect;
        };

        match state {
            ConnectionState::Connected(current) if *current == best.name => Decision::Stay,
            _ => Decision::SwitchTo(best.name.clone()),
        }
    }
}

/// Keeps the current link while it stays at or above `minimum_signal_dbm`,
/// otherwise falls back to the greedy choice.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisPolicy {
    greedy: GreedyPolicy,
    minimum_signal_dbm: f64,
}

impl HysteresisPolicy {
    pub fn new(minimum_signal_dbm: f64) -> Self {
        Self {
            greedy: GreedyPolicy::new(),
            minimum_signal_dbm,
        }
    }

    // A current network without an rssi reading is not protected.
    fn current_link_acceptable(&self, current: &str, candidates: &[NetworkObservation]) -> bool {
        candidates
            .iter()
            .find(|n| n.name == current)
            .and_then(|n| n.rssi_dbm)
            .is_some_and(|rssi| rssi >= self.minimum_signal_dbm)
    }
}

impl DecisionPolicy for HysteresisPolicy {
    fn name(&self) -> &'static str {
        "hysteresis"
    }

    fn decide(&self, state: &ConnectionState, candidates: &[NetworkObservation]) -> Decision {
        match state {
            ConnectionState::Connected(current) if self.current_link_acceptable(current, candidates) => {
                Decision::Stay
            }
            _ => self.greedy.decide(state, candidates),
        }
    }
}
