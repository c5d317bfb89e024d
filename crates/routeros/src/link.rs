//! Single-flight access to the router
//!
//! [`RouterLink`] is the only handle the gateway keeps to the router. Each
//! call takes the link's lock, opens a session, runs its command(s), closes
//! the session on every exit path and only then releases the lock, so
//! concurrent requests never interleave on one router connection. A paced
//! batch gives the lock up while it sleeps between commands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{Command, Record, RouterConnector, RouterError, RouterSession};

/// Per-command results of [`RouterLink::run_each`]
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<Result<Vec<Record>, RouterError>>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

#[derive(Clone)]
pub struct RouterLink {
    connector: Arc<dyn RouterConnector>,
    lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for RouterLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterLink").finish_non_exhaustive()
    }
}

impl RouterLink {
    pub fn new(connector: Arc<dyn RouterConnector>) -> Self {
        Self {
            connector,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Connect, write one command, close.
    pub async fn run(&self, command: &Command) -> Result<Vec<Record>, RouterError> {
        let _guard = self.lock.lock().await;
        let mut session = self.connector.connect().await?;
        let result = session.write(command).await;
        release(session).await;
        result
    }

    /// Runs the commands in order on one session, sleeping `pacing` between
    /// them. A failed command is recorded and the batch continues.
    ///
    /// The link is released while the batch sleeps, so other calls run
    /// between paced commands. Only a failure to open the session fails the
    /// whole batch.
    pub async fn run_each(
        &self,
        commands: &[Command],
        pacing: Duration,
    ) -> Result<BatchOutcome, RouterError> {
        let mut guard = self.lock.lock().await;
        let mut session = self.connector.connect().await?;

        let mut outcome = BatchOutcome::default();
        for (index, command) in commands.iter().enumerate() {
            if index > 0 && !pacing.is_zero() {
                drop(guard);
                tokio::time::sleep(pacing).await;
                guard = self.lock.lock().await;
            }
            outcome.results.push(session.write(command).await);
        }

        release(session).await;
        drop(guard);
        Ok(outcome)
    }
}

async fn release(session: Box<dyn RouterSession>) {
    if let Err(e) = session.close().await {
        tracing::warn!("failed to close router session: {}", e);
    }
}
