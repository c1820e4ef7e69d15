//! Connectors enable playing against Reason through different interfaces.

mod connector;
mod cs2;

pub use connector::{Connector, RefereeTurn};
pub use cs2::{Cs2Connector, ProtocolError};
