pub mod icons;
pub mod output;
pub mod render;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, muted, section, success, summary_row, warn};
pub use render::{render_outline, render_page, render_tabs, strip_markup};
pub use table::{property_table, TableBuilder};
pub use theme::{theme, Theme};
