pub mod sync;
pub mod validation;

pub use sync::{sync_to_dir, SyncTarget};
pub use validation::{parse_assignments, ValidationError};
