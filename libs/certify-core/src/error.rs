use alloc::vec::Vec;
use core::fmt::{Debug, Display};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CertifyError {
    /// Caller is not the chairperson.
    Unauthorized,
    NotAPublisher,
    UnknownCertificate,
    /// Signature does not recover to an active publisher.
    UnauthorizedPublisher,
    MalformedSignature,
    EmptyUsername,
    InvalidAddress,
    AlreadyInitialized,
    /// Registry has no chairperson yet.
    NotInitialized,
}

impl CertifyError {
    /// Revert message returned by the contract.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Only chairperson can call this function.",
            Self::NotAPublisher => "Publisher is not valid!",
            Self::UnknownCertificate => "Certificate does not exist",
            Self::UnauthorizedPublisher => "Only valid publisher can call this function.",
            Self::MalformedSignature => "Invalid signature length",
            Self::EmptyUsername => "Username cannot be empty",
            Self::InvalidAddress => "Cannot use null address",
            Self::AlreadyInitialized => "Already initialized",
            Self::NotInitialized => "Not initialized",
        }
    }
}

impl Debug for CertifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::NotAPublisher => write!(f, "NotAPublisher"),
            Self::UnknownCertificate => write!(f, "UnknownCertificate"),
            Self::UnauthorizedPublisher => write!(f, "UnauthorizedPublisher"),
            Self::MalformedSignature => write!(f, "MalformedSignature"),
            Self::EmptyUsername => write!(f, "EmptyUsername"),
            Self::InvalidAddress => write!(f, "InvalidAddress"),
            Self::AlreadyInitialized => write!(f, "AlreadyInitialized"),
            Self::NotInitialized => write!(f, "NotInitialized"),
        }
    }
}

impl Display for CertifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<CertifyError> for Vec<u8> {
    fn from(err: CertifyError) -> Self {
        err.message().as_bytes().to_vec()
    }
}

impl core::error::Error for CertifyError {}

pub type CertifyResult<T> = Result<T, CertifyError>;
