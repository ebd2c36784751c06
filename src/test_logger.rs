use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

/// Keeps every record in memory so tests can assert on what was logged.
struct CapturingLogger {
  records: Mutex<Vec<(Level, String)>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
  records: Mutex::new(Vec::new()),
};

static INSTALL: Once = Once::new();

pub fn install() {
  INSTALL.call_once(|| {
    if log::set_logger(&LOGGER).is_ok() {
      log::set_max_level(LevelFilter::Info);
    }
  });
}

/// Records at `level` whose message contains `needle`. Tests run in parallel,
/// so callers pass something unique to their own request.
pub fn records_containing(level: Level, needle: &str) -> Vec<String> {
  let records = LOGGER.records.lock().unwrap();

  records
    .iter()
    .filter(|(record_level, message)| *record_level == level && message.contains(needle))
    .map(|(_, message)| message.clone())
    .collect()
}

impl Log for CapturingLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      if let Ok(mut records) = self.records.lock() {
        records.push((record.level(), record.args().to_string()));
      }
    }
  }

  fn flush(&self) {}
}
