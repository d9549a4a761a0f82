//! Collaborator trait definitions

mod lookup;
mod transport;

pub use lookup::{LookupResponse, RelayHost, RelayInfo, RoomInfo, RoomLookup};
pub use transport::{Connection, Connector, WireMessage, WireSink, WireSource};
