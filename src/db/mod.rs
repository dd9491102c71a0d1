pub mod watch_record_queries;
