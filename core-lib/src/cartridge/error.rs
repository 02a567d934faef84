use thiserror::Error;

/// Errors that can occur when loading or parsing cartridge ROM images
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing iNES magic number")]
    BadMagic,
    #[error("ROM image truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("ROM declares no program banks")]
    NoProgramBanks,
}
