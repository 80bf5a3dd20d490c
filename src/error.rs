use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error(transparent)]
    IO(#[from] std::io::Error),

    // --------------------------------- configuration errors --------------------------------------
    #[error("config file parsing error: {0}")]
    ConfigParsing(#[from] toml::de::Error),
    #[error("read config file {0:?}: {1}")]
    ConfigRead(PathBuf, std::io::Error),

    // --------------------------------- session errors --------------------------------------------
    #[error("entry for file \"{0}\" already exists")]
    DuplicateEntry(String),
    #[error("path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("path {0:?} is not a valid utf-8 string")]
    NonUtf8Path(PathBuf),

    // --------------------------------- third party errors ----------------------------------------
    #[error("subscriber: {0}")]
    Subscriber(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "session", "{:#}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "session", concat!($msg, " {:#}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}

/// Transforms `Result` into `Option` and put error into debug logs if it occurs.
#[macro_export]
macro_rules! muted_error {
    ($res: expr) => {
        $crate::_error!(log::debug, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::debug, $res, $msg)
    };
}
