pub mod animate;
pub mod cache;
pub mod config;
pub mod error;
pub mod remote;
pub mod render;
pub mod session;
pub mod store;
pub mod sync;
pub mod validate;
pub mod viewport;

pub use animate::{Easing, ScrollAnimator};
pub use cache::{FileCache, LocalCache, MemoryCache, decode_snapshot};
pub use config::GridConfig;
pub use error::RegionError;
pub use remote::{HttpRemoteStore, RemoteStore};
pub use render::{PaintInstruction, Selection, render};
pub use session::{GridSession, HydrationSource, PointerHit};
pub use store::{CoverageStats, RegionStore};
pub use sync::{SyncAction, SyncController};
pub use viewport::{CellRange, ViewportState};
