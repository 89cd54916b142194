// Connection state machine - Applies policy verdicts to the current link
use crate::application::decision_policy::DecisionPolicy;
use crate::domain::connection::{ConnectionSnapshot, ConnectionState, Decision};
use crate::domain::network::NetworkObservation;

/// Receives a snapshot every time the machine acts on a non-`Stay` verdict.
pub trait ConnectionObserver: Send {
    fn connection_changed(&mut self, snapshot: &ConnectionSnapshot);
}

impl<F> ConnectionObserver for F
where
    F: FnMut(&ConnectionSnapshot) + Send,
{
    fn connection_changed(&mut self, snapshot: &ConnectionSnapshot) {
        self(snapshot)
    }
}

/// Owns the agent's connection state. Starts `Disconnected`; only a policy
/// verdict can move it.
pub struct ConnectionStateMachine {
    policy: Box<dyn DecisionPolicy>,
    state: ConnectionState,
    available_networks: Vec<String>,
    observer: Option<Box<dyn ConnectionObserver>>,
}

impl ConnectionStateMachine {
    pub fn new(policy: Box<dyn DecisionPolicy>) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            available_networks: Vec::new(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl ConnectionObserver + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl ConnectionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Names of every network in the most recent `process` call, selected or not.
    pub fn available_networks(&self) -> &[String] {
        &self.available_networks
    }

    pub fn current_network_label(&self) -> &str {
        self.state.label()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            state: self.state.clone(),
            available_networks: self.available_networks.clone(),
            current_network: self.current_network_label().to_string(),
        }
    }

    /// Run one decision cycle over the networks seen in a single sample.
    ///
    /// `Disconnect` notifies even if the machine was already disconnected.
    pub fn process(&mut self, networks: &[NetworkObservation]) {
        self.available_networks = networks.iter().map(|n| n.name.clone()).collect();

        let decision = self.policy.decide(&self.state, networks);
        tracing::debug!("{} policy verdict in {}: {:?}", self.policy.name(), self.state, decision);

        let next = match decision {
            Decision::Stay => return,
            Decision::Disconnect => ConnectionState::Disconnected,
            Decision::SwitchTo(name) => ConnectionState::Connected(name),
        };

        if next != self.state {
            tracing::info!("Connection {} -> {}", self.state, next);
        }
        self.state = next;

        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer.connection_changed(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::decision_policy::{GreedyPolicy, HysteresisPolicy};
    use std::sync::{Arc, Mutex};

    fn nets(entries: &[(&str, f64)]) -> Vec<NetworkObservation> {
        entries
            .iter()
            .map(|(name, rssi)| NetworkObservation::with_rssi(*name, *rssi))
            .collect()
    }

    fn connected(name: &str) -> ConnectionState {
        ConnectionState::Connected(name.to_string())
    }

    fn recording_machine(policy: Box<dyn DecisionPolicy>) -> (ConnectionStateMachine, Arc<Mutex<Vec<ConnectionSnapshot>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let machine = ConnectionStateMachine::new(policy)
            .with_observer(move |snapshot: &ConnectionSnapshot| sink.lock().unwrap().push(snapshot.clone()));
        (machine, seen)
    }

    #[test]
    fn test_starts_disconnected() {
        let machine = ConnectionStateMachine::new(Box::new(GreedyPolicy::new()));
        assert_eq!(machine.state(), &ConnectionState::Disconnected);
        assert_eq!(machine.current_network_label(), "not connected");
        assert!(machine.available_networks().is_empty());
    }

    #[test]
    fn test_greedy_drive() {
        let (mut machine, seen) = recording_machine(Box::new(GreedyPolicy::new()));

        machine.process(&nets(&[("Rogers", -10.0), ("Bell", -30.0)]));
        assert_eq!(machine.state(), &connected("Rogers"));

        let swapped = nets(&[("Rogers", -30.0), ("Bell", -10.0)]);
        machine.process(&swapped);
        assert_eq!(machine.state(), &connected("Bell"));

        machine.process(&swapped);
        assert_eq!(machine.state(), &connected("Bell"));

        machine.process(&[]);
        assert_eq!(machine.state(), &ConnectionState::Disconnected);

        let states: Vec<ConnectionState> = seen.lock().unwrap().iter().map(|s| s.state.clone()).collect();
        assert_eq!(
            states,
            vec![connected("Rogers"), connected("Bell"), ConnectionState::Disconnected]
        );
    }

    #[test]
    fn test_hysteresis_drive() {
        let (mut machine, seen) = recording_machine(Box::new(HysteresisPolicy::new(-50.0)));

        machine.process(&nets(&[("Rogers", -10.0), ("Bell", -30.0)]));
        assert_eq!(machine.state(), &connected("Rogers"));

        let swapped = nets(&[("Rogers", -30.0), ("Bell", -10.0)]);
        machine.process(&swapped);
        assert_eq!(machine.state(), &connected("Rogers"));
        machine.process(&swapped);
        assert_eq!(machine.state(), &connected("Rogers"));

        machine.process(&nets(&[("Rogers", -60.0), ("Bell", -10.0)]));
        assert_eq!(machine.state(), &connected("Bell"));

        machine.process(&[]);
        assert_eq!(machine.state(), &ConnectionState::Disconnected);

        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_disconnect_notifies_even_when_already_disconnected() {
        let (mut machine, seen) = recording_machine(Box::new(GreedyPolicy::new()));

        machine.process(&[]);
        machine.process(&[]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.state == ConnectionState::Disconnected));
        assert!(seen.iter().all(|s| s.current_network == "not connected"));
    }

    #[test]
    fn test_snapshot_lists_every_visible_network() {
        let (mut machine, seen) = recording_machine(Box::new(GreedyPolicy::new()));

        machine.process(&nets(&[("Rogers", -80.0), ("Bell", -30.0), ("Fido", -55.0)]));

        let snapshot = seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(snapshot.available_networks, vec!["Rogers", "Bell", "Fido"]);
        assert_eq!(snapshot.current_network, "Bell");
        assert_eq!(machine.current_network_label(), "Bell");
    }

    #[test]
    fn test_stay_does_not_notify_but_updates_visible_networks() {
        let (mut machine, seen) = recording_machine(Box::new(GreedyPolicy::new()));

        machine.process(&nets(&[("Rogers", -10.0)]));
        machine.process(&nets(&[("Rogers", -12.0), ("Bell", -40.0)]));

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(machine.available_networks(), ["Rogers", "Bell"]);
    }
}
