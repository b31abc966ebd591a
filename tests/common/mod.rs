//! Shared test helpers and mock connection.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mcp_bridge::bridge::{Bridge, BridgeTimeouts, Connection};
use mcp_bridge::error::{BridgeError, Result};

/// Counters shared between a test and every connection its factory builds.
#[derive(Debug, Default)]
pub struct Probe {
    pub factory_calls: AtomicUsize,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl Probe {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// How the mock connection behaves during its lifecycle.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub connect_delay: Duration,
    /// Number of initial connect attempts that fail.
    pub failing_connects: usize,
    /// Disconnect never completes.
    pub wedged_disconnect: bool,
}

/// Connection whose handshake and work are simulated with sleeps.
pub struct MockConnection {
    probe: Arc<Probe>,
    behavior: MockBehavior,
    pub served: u32,
}

impl MockConnection {
    /// Simulated request: holds the connection for `delay`, then returns how
    /// many requests this connection has served.
    pub async fn work(&mut self, delay: Duration) -> Result<u32> {
        let now = self.probe.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(delay).await;
        self.probe.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.served += 1;
        Ok(self.served)
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn connect(&mut self) -> Result<()> {
        tokio::time::sleep(self.behavior.connect_delay).await;
        let attempt = self.probe.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.behavior.failing_connects {
            return Err(BridgeError::Transport(format!(
                "handshake attempt {attempt} refused"
            )));
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.probe.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.behavior.wedged_disconnect {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

pub fn short_timeouts() -> BridgeTimeouts {
    BridgeTimeouts {
        connect: Duration::from_millis(500),
        call: Duration::from_millis(500),
        disconnect: Duration::from_secs(2),
    }
}

/// Bridge over [`MockConnection`]s plus the probe observing them.
pub fn mock_bridge(behavior: MockBehavior) -> (Bridge<MockConnection>, Arc<Probe>) {
    let probe = Arc::new(Probe::default());
    let factory_probe = Arc::clone(&probe);
    let bridge = Bridge::new(move || {
        factory_probe.factory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection {
            probe: Arc::clone(&factory_probe),
            behavior: behavior.clone(),
            served: 0,
        })
    })
    .with_name("mock")
    .with_timeouts(short_timeouts());
    (bridge, probe)
}
