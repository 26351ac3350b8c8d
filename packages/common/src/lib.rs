pub mod flag;
pub mod hash;
pub mod identity;
pub mod policy;
pub mod rejection;
pub mod storage;

pub use flag::{ScreeningAction, ScreeningEventKind, ScreeningFlag};
pub use hash::ContentHash;
pub use identity::Uploader;
pub use rejection::RejectionReason;
