use std::{error, fmt, io};

use plotclock_core::KinematicsError;

#[derive(Debug)]
pub enum Error {
    /// Target cannot be reached by the mechanism.
    Kinematics(KinematicsError),
    /// Configuration holds values the engine cannot work with.
    InvalidConfig(String),
    /// Configuration file could not be read.
    Io(io::Error),
    /// Configuration file could not be parsed.
    Parse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Kinematics(e) => write!(f, "kinematics: {}", e),
            Error::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
            Error::Io(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Kinematics(e) => Some(e),
            Error::InvalidConfig(_) => None,
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
        }
    }
}

impl From<KinematicsError> for Error {
    fn from(value: KinematicsError) -> Self {
        Error::Kinematics(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Parse(value)
    }
}
