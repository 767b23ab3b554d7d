//! Error manipulations.

use std::{error, fmt};

use rdkafka::error::KafkaError;

/// Result of the setup and shutdown steps of either program.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a program.
///
/// Per-message delivery failures and per-read failures are not represented
/// here: they are logged where they happen and never leave the read or
/// delivery loop.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// The connection handle could not be created.
    ClientCreation(KafkaError),
    /// The consumer could not subscribe to its topic.
    Subscription(KafkaError),
    /// The settings could not be turned into a client configuration.
    Config(String),
    /// A background task panicked or was cancelled before it was joined.
    Worker(String),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ClientCreation(ref err) => write!(f, "Error (Client creation: {:?})", err),
            Error::Subscription(ref err) => write!(f, "Error (Subscription: {:?})", err),
            Error::Config(ref err) => write!(f, "Error (Configuration: {})", err),
            Error::Worker(ref err) => write!(f, "Error (Worker: {})", err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ClientCreation(ref err) => write!(f, "Failed to create client: {}", err),
            Error::Subscription(ref err) => write!(f, "Failed to subscribe: {}", err),
            Error::Config(ref err) => write!(f, "Invalid configuration: {}", err),
            Error::Worker(ref err) => write!(f, "Background worker failed: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::ClientCreation(err) | Error::Subscription(err) => Some(err),
            Error::Config(_) | Error::Worker(_) => None,
        }
    }
}

impl Error {
    /// Returns whether the error happened while acquiring the connection
    /// handle, before any message was sent or read.
    pub fn is_setup(&self) -> bool {
        matches!(self, Error::ClientCreation(_) | Error::Subscription(_))
    }
}
