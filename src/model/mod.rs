//! Plain data shared across the table: narration events and flavor text.

pub mod flavor;
pub mod narration;

pub use flavor::*;
pub use narration::*;
