//! Stderr logging for the `log` facade, filtered by the `-v` count.

use env_logger::{Builder, Target};
use log::{LevelFilter, SetLoggerError};

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level).format_timestamp(None).target(Target::Stderr);
    builder
}

pub fn initialize(level: LevelFilter) -> Result<(), SetLoggerError> {
    builder(level).try_init()
}
