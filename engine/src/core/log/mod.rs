//! Log sinks for the `log` facade.
//!
//! Singleton accessors report through `log::{debug, info, warn, error}`. Hosts that keep their
//! own console can install a [`ChannelLogger`] and drain the [`LogMessage`]s it forwards.

mod channel;

#[cfg(test)]
pub(crate) mod capture;

pub use channel::{ChannelLogger, LogMessage};
