use async_trait::async_trait;

use crate::{Command, Record, RouterError};

/// Opens sessions to a router
///
/// Implementations hold the address and credentials; every call to
/// [`RouterConnector::connect`] yields an independent session.
#[async_trait]
pub trait RouterConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn RouterSession>, RouterError>;
}

/// An open, authenticated router session
#[async_trait]
pub trait RouterSession: Send {
    /// Issues one command and returns its reply records
    async fn write(&mut self, command: &Command) -> Result<Vec<Record>, RouterError>;

    /// Ends the session. Called exactly once, on success and failure paths alike.
    async fn close(self: Box<Self>) -> Result<(), RouterError>;
}
