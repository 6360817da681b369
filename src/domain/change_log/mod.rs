//! Change log domain module.
//!
//! Append-only audit trail. Every mutation applied by an accepted change
//! request produces one `Change`, phrased through [`record_change`] so all
//! mutation sites read the same way.

mod change;

pub use change::{record_change, Change, ChangeField};
