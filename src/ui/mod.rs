mod menu;
mod quiz;
mod summary;

pub use menu::draw_menu;
pub use quiz::draw_quiz;
pub use summary::draw_summary;
