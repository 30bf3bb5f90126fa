//! Outbound ports - Interfaces that the application requires from external systems

mod ledger_port;
mod player_port;
mod testing;

pub use ledger_port::{ActionFilter, LedgerError, LedgerPort, TimeRange};
pub use player_port::{PlayerDirectoryError, PlayerDirectoryPort};
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use ledger_port::MockLedgerPort;
#[cfg(test)]
pub use player_port::MockPlayerDirectoryPort;
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};
