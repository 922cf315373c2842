use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;

/// Routes engine `log` output to stderr and, optionally, a JSON-lines file.
pub struct Logger {
    verbose: bool,
    json_file: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(verbose: bool, json_path: Option<PathBuf>) -> Result<Self> {
        let json_file = match json_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { verbose, json_file })
    }

    pub fn install(self) -> Result<()> {
        let level = if self.verbose || self.json_file.is_some() {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| anyhow!("failed to install logger: {e}"))?;
        log::set_max_level(level);
        Ok(())
    }

    fn event(&self, level: &str, message: &str) {
        let Some(file) = &self.json_file else {
            return;
        };
        let Ok(mut file) = file.lock() else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let entry = json!({
            "ts_ms": ts_ms,
            "level": level,
            "msg": message,
        });

        let _ = writeln!(file, "{}", entry);
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        if self.verbose {
            eprintln!("[{}] {}", record.level(), message);
        }
        self.event(&record.level().as_str().to_ascii_lowercase(), &message);
    }

    fn flush(&self) {
        if let Some(file) = &self.json_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
