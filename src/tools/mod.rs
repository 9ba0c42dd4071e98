pub mod calendar;
pub mod favorite;
pub mod import;
pub mod notifications;
pub mod on_this_day;
pub mod refresh;
pub mod remove;
pub mod settings;
