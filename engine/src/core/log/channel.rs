use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, Metadata, Record, SetLoggerError};

/// A single formatted log record forwarded by a [`ChannelLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogMessage {
    pub fn from_record(record: &Record) -> Self {
        Self {
            level: record.level(),
            target: record.target().to_string(),
            message: format!("{}", record.args()),
        }
    }
}

/// A `log::Log` implementation that forwards records over a crossbeam channel.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: Level,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.sender.try_send(LogMessage::from_record(record));
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    /// Create a logger forwarding `Info` and more severe records to `sender`.
    pub fn new(sender: Sender<LogMessage>) -> Self {
        Self {
            sender,
            level: Level::Info,
        }
    }

    /// Create a logger along with the receiving end of its channel.
    pub fn with_receiver() -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }

    /// Set the most verbose level this logger forwards.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Install this logger as the global `log` sink.
    ///
    /// Fails if another logger has already been installed for the process.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }
}
