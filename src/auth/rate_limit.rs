use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const DEFAULT_MAX_FAILURES: usize = 5;
const DEFAULT_WINDOW: Duration = Duration::from_secs(900);

/// Sliding-window counter of failed logins per client IP. The backend does
/// its own throttling; this keeps obvious guessing off it.
#[derive(Clone)]
pub struct LoginThrottle {
    failures: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_failures: usize,
    window: Duration,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILURES, DEFAULT_WINDOW)
    }
}

impl LoginThrottle {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            failures: Arc::new(Mutex::new(HashMap::new())),
            max_failures,
            window,
        }
    }

    /// True once `max_failures` failures fall inside the window. Stale entries
    /// for this IP are dropped on the way.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        self.is_blocked_at(ip, Instant::now())
    }

    fn is_blocked_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let Some(stamps) = map.get_mut(&ip) else {
            return false;
        };
        stamps.retain(|t| now.duration_since(*t) < self.window);
        if stamps.is_empty() {
            map.remove(&ip);
            return false;
        }
        stamps.len() >= self.max_failures
    }

    pub fn record_failure(&self, ip: IpAddr) {
        self.record_failure_at(ip, Instant::now());
    }

    fn record_failure_at(&self, ip: IpAddr, at: Instant) {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(ip).or_default().push(at);
    }

    /// Forget an IP after a successful login.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }

    /// Drop every stamp older than the window. Returns how many IPs remain tracked.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let mut map = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, stamps| {
            stamps.retain(|t| now.duration_since(*t) < self.window);
            !stamps.is_empty()
        });
        map.len()
    }
}

/// IPs that fail once and never come back would otherwise stay in the map.
pub fn spawn_pruner(throttle: LoginThrottle, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let tracked = throttle.prune();
            log::debug!("Login throttle pruned, {} IPs tracked", tracked);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));

    #[test]
    fn blocks_after_max_failures() {
        let t = LoginThrottle::new(3, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..2 {
            t.record_failure_at(IP, now);
        }
        assert!(!t.is_blocked_at(IP, now));
        t.record_failure_at(IP, now);
        assert!(t.is_blocked_at(IP, now));
    }

    #[test]
    fn failures_expire_with_window() {
        let t = LoginThrottle::new(1, Duration::from_secs(60));
        let now = Instant::now();
        t.record_failure_at(IP, now);
        assert!(t.is_blocked_at(IP, now));
        assert!(!t.is_blocked_at(IP, now + Duration::from_secs(61)));
    }

    #[test]
    fn prune_drops_expired_ips() {
        let t = LoginThrottle::new(5, Duration::from_secs(60));
        let now = Instant::now();
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8));
        t.record_failure_at(IP, now);
        t.record_failure_at(other, now + Duration::from_secs(50));
        assert_eq!(t.prune_at(now + Duration::from_secs(70)), 1);
        assert!(!t.is_blocked_at(IP, now + Duration::from_secs(70)));
    }

    #[test]
    fn clear_unblocks() {
        let t = LoginThrottle::new(1, Duration::from_secs(60));
        t.record_failure(IP);
        t.clear(IP);
        assert!(!t.is_blocked(IP));
    }
}
