pub mod watch_records;

pub use watch_records::{PgWatchRecordStore, WatchRecordStore};
