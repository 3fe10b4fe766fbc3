pub mod entry_list;
pub mod leaderboard;
pub mod sort_controls;
pub mod stats_form;

pub use entry_list::EntryList;
pub use leaderboard::Leaderboard;
pub use sort_controls::SortControls;
pub use stats_form::StatsForm;
