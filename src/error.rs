use std::error::Error;

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum DNSResolverError {
    #[error("error while decoding `{0}`: `{1}`")]
    Decode(String, String),
    #[error("error while encoding `{0}`: `{1}`")]
    Encode(String, String),
    #[error("error while parsing bytes")]
    Parse,
    #[error("invalid record type: `{0}`")]
    InvalidRecordType(String),
    #[error("failed while trying to connect to `{0}`: `{1}`")]
    ConnectionFailure(String, String),
    #[error("failed while trying to `{0}` data: `{1}`")]
    IOFailure(String, String),
    #[error("query to `{0}` timed out after {1} ms")]
    Timeout(String, u128),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("resolution failed at all {1} root servers, unable to resolve `{0}`")]
    LookupFailure(String, usize),
}

pub type Result<T> = std::result::Result<T, DNSResolverError>;

pub fn map_decode_err(step: &str, err: &impl Error) -> DNSResolverError {
    DNSResolverError::Decode(String::from(step), err.to_string())
}

pub fn map_encode_err(step: &str, err: &impl Error) -> DNSResolverError {
    DNSResolverError::Encode(String::from(step), err.to_string())
}

// Error for a message that ended before the named field was complete.
pub fn truncated(step: &str) -> DNSResolverError {
    DNSResolverError::Decode(String::from(step), String::from("message is truncated"))
}
