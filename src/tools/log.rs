//!                                  Logging                                 !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Logger setup and progress line

use std::time::{Duration, Instant};

use env_logger::Builder;
use hamfec::StreamInfo;
use log::LevelFilter;

use crate::common::format_si;

/// init
/// Installs the stderr logger, verbosity from -v count, RUST_LOG wins if set
/// Parameters: Verbosity level
pub fn init(loglevel: u8) {
    let level = match loglevel {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

/// LogObj
/// Rate-limited progress line on stderr
pub struct LogObj {
    level: u8,
    last_logging: Instant,
    log_interval: Duration,
}

impl LogObj {
    pub fn new(level: u8, log_intv: f64) -> LogObj {
        LogObj {
            level,
            last_logging: Instant::now(),
            log_interval: Duration::from_secs_f64(log_intv),
        }
    }

    /// logging
    /// Prints the progress line if the interval has passed
    /// Parameters: Stream info, Force flag for the final line
    pub fn logging(&mut self, info: &StreamInfo, force: bool) {
        if self.level == 0 { return; }
        if !force && self.last_logging.elapsed() < self.log_interval { return; }
        self.last_logging = Instant::now();

        let line = format!("size={}B out={}B groups={} speed={}B/s    ",
            format_si(info.get_bytes_in() as f64),
            format_si(info.get_bytes_out() as f64),
            info.get_groups(),
            format_si(info.get_speed())
        );
        if force { eprintln!("{}", line); } else { eprint!("{}\r", line); }
    }
}
