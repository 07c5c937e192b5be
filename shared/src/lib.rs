pub mod pricing;
pub mod region;
pub mod snapshot;

pub use pricing::quote_cents;
pub use region::*;
pub use snapshot::{payload_checksum, snapshot_order, to_snapshot_json, to_snapshot_json_pretty};
