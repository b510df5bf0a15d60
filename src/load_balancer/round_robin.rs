//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::{server::Server, LoadBalancer};

/// Round-robin selector.
/// Stores an internal counter to rotate through candidates.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, candidates: &[Server]) -> Option<Server> {
        if candidates.is_empty() {
            return None;
        }

        // Rotate over the candidate list itself so survivors share load evenly
        // after a failover.
        let turn = self.counter.fetch_add(1, Ordering::Relaxed);
        candidates.get(turn % candidates.len()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let s1 = Server::new("127.0.0.1", 8080);
        let s2 = Server::new("127.0.0.1", 8081);
        let candidates = vec![s1.clone(), s2.clone()];

        assert_eq!(lb.next_server(&candidates), Some(s1.clone()));
        assert_eq!(lb.next_server(&candidates), Some(s2));
        assert_eq!(lb.next_server(&candidates), Some(s1));
    }

    #[test]
    fn test_empty_candidates() {
        let lb = RoundRobin::new();
        assert_eq!(lb.next_server(&[]), None);
    }
}
