use std::io::Write;
use std::thread;

use chrono::prelude::*;
use env_logger::fmt::Formatter;
use env_logger::Builder;
use log::{LevelFilter, Record};

/// Installs the global logger.
///
/// Everything at `info` and above is printed unless `rust_log` (same syntax
/// as `RUST_LOG`, e.g. `rdkafka=trace`) says otherwise. When `log_thread` is
/// set each line carries the name of the thread that emitted it, which tells
/// apart the producer's main thread, the delivery-report worker and
/// librdkafka's own threads.
pub fn setup_logger(log_thread: bool, rust_log: Option<&str>) {
    let output_format = move |formatter: &mut Formatter, record: &Record| {
        let thread_name = if log_thread {
            format!("(t: {}) ", thread::current().name().unwrap_or("unknown"))
        } else {
            "".to_string()
        };

        let local_time: DateTime<Local> = Local::now();
        let time_str = local_time.format("%H:%M:%S%.3f").to_string();
        writeln!(
            formatter,
            "{} {}{} - {} - {}",
            time_str,
            thread_name,
            record.level(),
            record.target(),
            record.args()
        )
    };

    let mut builder = Builder::new();
    builder.format(output_format).filter(None, LevelFilter::Info);

    if let Some(conf) = rust_log {
        builder.parse_filters(conf);
    }

    builder.init();
}
