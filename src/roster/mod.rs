pub mod types;
pub mod splitter;
pub mod teams;
pub mod cars;
pub mod assignment;
pub mod store;

pub use types::{Member, MemberId, RosterSnapshot, SlotTarget, Team};
pub use store::{RosterStats, RosterStore};
