#[macro_use]
pub mod pattern;

pub mod category;
pub mod money;
pub mod period;
pub mod text;
pub mod transaction;

pub use category::Category;
pub use money::{per_day, share_percent, Rupees};
pub use period::{TimeWindow, TimeWindowResolver};
pub use text::title_case;
pub use transaction::{DateError, Transaction};
