pub mod history;

pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
