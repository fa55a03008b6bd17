pub mod categories;
pub mod entries;
pub mod report;
pub mod schema;
pub mod watch;
