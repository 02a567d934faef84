/// core-lib/src/bus/mapper.rs
use thiserror::Error;

/// Size of one program-ROM bank (16KB).
pub const PRG_BANK_SIZE: usize = 0x4000;

/// Base of the program-ROM window in the CPU address space.
const PRG_WINDOW: u16 = 0x8000;

/// Errors that can occur when installing or switching program banks
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Invalid program bank index {index} (cartridge has {count} banks)")]
    InvalidBank { index: usize, count: usize },
    #[error("Program image of {0} bytes is not a whole number of 16KB banks")]
    InvalidImage(usize),
    #[error("Program image declares {declared} banks but holds {actual}")]
    BankCountMismatch { declared: usize, actual: usize },
    #[error("Address {0:#06X} is outside the program-ROM window")]
    Unmapped(u16),
}

/// Program-bank mapping behind the `$8000-$FFFF` window.
///
/// `select_bank` re-points which physical segment is visible; it never
/// copies data.
pub trait Mapper {
    /// Read a byte from the program-ROM window.
    fn read(&self, addr: u16) -> Result<u8, MapperError>;

    /// Handle a write into the program-ROM window. Schemes with bank-select
    /// registers decode them here; everything else discards the write,
    /// matching non-writable ROM.
    fn write(&mut self, addr: u16, value: u8);

    /// Re-point the switchable window at the given physical bank.
    fn select_bank(&mut self, index: usize) -> Result<(), MapperError>;

    /// Number of physical 16KB banks on the cartridge.
    fn bank_count(&self) -> usize;

    /// Bank currently backing the switchable window.
    fn selected_bank(&self) -> usize;
}

/// Fixed mapping for one or two banks. A single 16KB bank is mirrored across
/// both halves of the window; two banks map linearly.
pub struct Nrom {
    prg: Vec<u8>,
}

impl Nrom {
    pub fn new(prg: Vec<u8>) -> Self {
        Self { prg }
    }
}

impl Mapper for Nrom {
    fn read(&self, addr: u16) -> Result<u8, MapperError> {
        if addr < PRG_WINDOW {
            return Err(MapperError::Unmapped(addr));
        }
        let offset = (addr - PRG_WINDOW) as usize % self.prg.len();
        Ok(self.prg[offset])
    }

    fn write(&mut self, _addr: u16, _value: u8) {
        // No registers in the window; the write lands on ROM and is dropped.
    }

    fn select_bank(&mut self, index: usize) -> Result<(), MapperError> {
        if index >= self.bank_count() {
            return Err(MapperError::InvalidBank {
                index,
                count: self.bank_count(),
            });
        }
        Ok(())
    }

    fn bank_count(&self) -> usize {
        self.prg.len() / PRG_BANK_SIZE
    }

    fn selected_bank(&self) -> usize {
        0
    }
}

/// Switched mapping for more than two banks: `$8000-$BFFF` is the switchable
/// window, `$C000-$FFFF` always shows the last bank (where the vectors live).
pub struct BankedPrg {
    prg: Vec<u8>,
    bank: usize,
}

impl BankedPrg {
    pub fn new(prg: Vec<u8>) -> Self {
        Self { prg, bank: 0 }
    }
}

impl Mapper for BankedPrg {
    fn read(&self, addr: u16) -> Result<u8, MapperError> {
        let offset = match addr {
            0x8000..=0xBFFF => self.bank * PRG_BANK_SIZE + (addr as usize - 0x8000),
            0xC000..=0xFFFF => {
                (self.bank_count() - 1) * PRG_BANK_SIZE + (addr as usize - 0xC000)
            }
            _ => return Err(MapperError::Unmapped(addr)),
        };
        Ok(self.prg[offset])
    }

    fn write(&mut self, _addr: u16, value: u8) {
        // The whole window acts as the bank-select register; the index wraps
        // to the populated banks, matching the hardware latch width.
        self.bank = value as usize % self.bank_count();
    }

    fn select_bank(&mut self, index: usize) -> Result<(), MapperError> {
        if index >= self.bank_count() {
            return Err(MapperError::InvalidBank {
                index,
                count: self.bank_count(),
            });
        }
        self.bank = index;
        Ok(())
    }

    fn bank_count(&self) -> usize {
        self.prg.len() / PRG_BANK_SIZE
    }

    fn selected_bank(&self) -> usize {
        self.bank
    }
}
