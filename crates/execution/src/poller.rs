//! Periodic reserve refresh with stale-read protection.
//!
//! Each selected pair gets one polling task. Re-selecting bumps a
//! monotonic epoch and aborts the previous task; any update carrying an
//! older epoch is superseded and must be discarded by the consumer, so a
//! slow read finishing after a pair change can never overwrite current
//! state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use woosh_chain::reader::PairReader;
use woosh_chain::ChainError;
use woosh_domain::pool::ReserveSnapshot;
use woosh_domain::Address;

/// Reserve refresh cadence on the swap screen.
pub const SWAP_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Reserve refresh cadence on the liquidity screen.
pub const LIQUIDITY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One completed poll. `result` is `Ok(None)` when the pair does not
/// exist; an `Err` is transient and polling continues.
#[derive(Debug, Clone)]
pub struct ReserveUpdate {
    /// Epoch the poll was issued under.
    pub epoch: u64,
    pub token_a: Address,
    pub token_b: Address,
    pub result: Result<Option<ReserveSnapshot>, ChainError>,
}

/// Owns the polling task for the currently selected pair.
pub struct ReservePoller {
    reader: Arc<PairReader>,
    interval: Duration,
    epoch: Arc<AtomicU64>,
    update_tx: mpsc::Sender<ReserveUpdate>,
    update_rx: Option<mpsc::Receiver<ReserveUpdate>>,
    task: Option<JoinHandle<()>>,
}

impl ReservePoller {
    pub fn new(reader: Arc<PairReader>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(32);
        Self {
            reader,
            interval,
            epoch: Arc::new(AtomicU64::new(0)),
            update_tx: tx,
            update_rx: Some(rx),
            task: None,
        }
    }

    /// Takes the update receiver for processing updates.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<ReserveUpdate>> {
        self.update_rx.take()
    }

    /// Latest issued epoch.
    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Whether an update still reflects the active selection.
    pub fn is_current(&self, update: &ReserveUpdate) -> bool {
        update.epoch == self.current_epoch()
    }

    /// Starts polling a pair, superseding any previous selection.
    /// Returns the new epoch.
    pub fn watch(&mut self, token_a: Address, token_b: Address) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }

        info!(token_a = %token_a, token_b = %token_b, epoch, "watching pair reserves");

        let reader = Arc::clone(&self.reader);
        let latest_epoch = Arc::clone(&self.epoch);
        let update_tx = self.update_tx.clone();
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if latest_epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }

                let result = reader.pair_state(&token_a, &token_b).await;
                if let Err(error) = &result {
                    warn!(%error, "reserve poll failed; will retry");
                }

                // The selection may have changed while the read was in
                // flight; a superseded result must not be published.
                if latest_epoch.load(Ordering::SeqCst) != epoch {
                    debug!(epoch, "discarding superseded reserve read");
                    break;
                }
                let update = ReserveUpdate {
                    epoch,
                    token_a: token_a.clone(),
                    token_b: token_b.clone(),
                    result,
                };
                if update_tx.send(update).await.is_err() {
                    break;
                }
            }
        }));
        epoch
    }

    /// Stops polling (pair deselected).
    pub fn stop(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("reserve polling stopped");
        }
    }
}

impl Drop for ReservePoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use woosh_chain::mock::MockChain;
    use woosh_chain::DexContracts;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn reader_with(chain: &Arc<MockChain>) -> Arc<PairReader> {
        Arc::new(PairReader::new(chain.clone(), DexContracts::arc_testnet()))
    }

    #[tokio::test]
    async fn publishes_snapshots_for_watched_pair() {
        let chain = Arc::new(MockChain::new());
        let contracts = DexContracts::arc_testnet();
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        let pair = addr("0x33d3c9DC1D84613FCc9356353435c35C3c08ea63");
        chain.seed_pair(&contracts, &a, &b, &pair, U256::from(100u64), U256::from(400u64), U256::from(200u64));

        let mut poller = ReservePoller::new(reader_with(&chain), Duration::from_millis(10));
        let mut rx = poller.take_receiver().unwrap();
        poller.watch(a.clone(), b.clone());

        let update = rx.recv().await.unwrap();
        assert!(poller.is_current(&update));
        let snapshot = update.result.unwrap().unwrap();
        assert_eq!(snapshot.pair, pair);
        assert_eq!(snapshot.reserve0, woosh_domain::TokenAmount::from(100u64));
    }

    #[tokio::test]
    async fn rewatching_supersedes_old_epoch() {
        let chain = Arc::new(MockChain::new());
        let contracts = DexContracts::arc_testnet();
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        let c = addr("0xC5124C846c6e6307986988dFb7e743327aA05F19");
        let pair_ab = addr("0x33d3c9DC1D84613FCc9356353435c35C3c08ea63");
        let pair_ac = addr("0x7065C3dd0a430E542330702C8541FD9bAFd25dC8");
        chain.seed_pair(&contracts, &a, &b, &pair_ab, U256::from(1u64), U256::from(1u64), U256::from(1u64));
        chain.seed_pair(&contracts, &a, &c, &pair_ac, U256::from(2u64), U256::from(2u64), U256::from(2u64));

        let mut poller = ReservePoller::new(reader_with(&chain), Duration::from_millis(10));
        let mut rx = poller.take_receiver().unwrap();
        let first_epoch = poller.watch(a.clone(), b.clone());
        let second_epoch = poller.watch(a.clone(), c.clone());
        assert!(second_epoch > first_epoch);

        // Anything stamped with the first epoch is stale by definition.
        let stale = ReserveUpdate {
            epoch: first_epoch,
            token_a: a.clone(),
            token_b: b.clone(),
            result: Ok(None),
        };
        assert!(!poller.is_current(&stale));

        // The channel eventually carries only current-epoch updates.
        let update = rx.recv().await.unwrap();
        if poller.is_current(&update) {
            assert_eq!(update.token_b, c);
        }
    }

    #[tokio::test]
    async fn stop_invalidates_epoch() {
        let chain = Arc::new(MockChain::new());
        let mut poller = ReservePoller::new(reader_with(&chain), Duration::from_millis(10));
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        let epoch = poller.watch(a.clone(), b.clone());
        poller.stop();
        assert!(poller.current_epoch() > epoch);
        assert!(poller.task.is_none());
    }
}
