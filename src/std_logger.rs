use chrono::Local;
use log::{max_level, LevelFilter, Level, Metadata, Record};
use std::io::{Error, ErrorKind};

pub struct StdLogger;

static LOGGER: StdLogger = StdLogger;

pub fn init(level: LevelFilter) -> std::io::Result<()> {
  log::set_logger(&LOGGER).map_err(|err| Error::new(ErrorKind::Other, err))?;
  log::set_max_level(level);
  Ok(())
}

impl log::Log for StdLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let time_str = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f");

      if record.level() <= Level::Warn {
        eprintln!("{0} {1:<5} [{2}] {3}", time_str, record.level(), record.target(), record.args())
      } else {
        println!("{0} {1:<5} [{2}] {3}", time_str, record.level(), record.target(), record.args())
      }
    }
  }

  fn flush(&self) {}
}
