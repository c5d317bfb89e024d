//! RouterOS session client
//!
//! The gateway talks to the router through a narrow contract: open a
//! session, write one command, read back the reply records, close the
//! session. This crate provides:
//!
//! - [`Command`] and [`Record`], the command/reply model shared by every transport
//! - [`RouterConnector`] / [`RouterSession`], the connect / write / close contract
//! - [`RestConnector`], a transport over the router's `/rest` interface
//! - [`RouterLink`], which serializes access to the router and scopes every
//!   session to a single call

pub mod command;
pub mod error;
pub mod link;
pub mod rest;
pub mod session;

pub use command::{Command, Record, hotspot};
pub use error::RouterError;
pub use link::{BatchOutcome, RouterLink};
pub use rest::{RestConfig, RestConnector};
pub use session::{RouterConnector, RouterSession};
