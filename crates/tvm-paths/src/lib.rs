//! On-disk layout, link-directory indirection and the cross-process lock
//! (§3, §4.F, §5).

mod error;
pub mod layout;
pub mod link;
pub mod lock;

pub use error::{Error, Result};
pub use layout::Layout;
pub use link::LinkStrategy;
pub use lock::ProcessLock;
