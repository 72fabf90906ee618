pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, movie_card, person_card, section, success, summary_row, warn};
pub use progress::{ListingProgress, Spinner};
pub use table::{cast_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
