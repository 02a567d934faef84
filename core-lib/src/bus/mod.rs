//! CPU memory bus: owns the 64KB address space and routes every access to
//! the region that backs it.
//!
//! # CPU Memory Map
//!
//! ```text
//! $0000-$07FF: 2KB internal RAM
//! $0800-$1FFF: mirrors of $0000-$07FF
//! $2000-$3FFF: PPU registers, 8 registers mirrored every 8 bytes
//! $4000-$401F: APU and I/O registers
//! $4020-$5FFF: expansion area (open bus)
//! $6000-$7FFF: cartridge work RAM
//! $8000-$FFFF: program ROM, banked by the installed mapper
//! ```

pub mod mapper;
pub use mapper::{BankedPrg, Mapper, MapperError, Nrom, PRG_BANK_SIZE};

/// Byte and little-endian word access over the full 16-bit address space.
pub trait MemoryBus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);

    /// Read a 16-bit value from memory in little-endian format
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = u16::from(self.read(addr));
        let hi = u16::from(self.read(addr.wrapping_add(1)));
        (hi << 8) | lo
    }

    /// Write a 16-bit value to memory in little-endian format
    fn write_word(&mut self, addr: u16, value: u16) {
        self.write(addr, (value & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (value >> 8) as u8);
    }
}

/// A memory-mapped device (PPU, APU, input ports). The bus forwards
/// window-relative register offsets; all register semantics, including read
/// side effects, live in the device model.
pub trait IoDevice {
    fn read(&mut self, offset: u16) -> u8;
    fn write(&mut self, offset: u16, value: u8);
}

const RAM_SIZE: usize = 0x0800;
const PRG_RAM_SIZE: usize = 0x2000;

/// Value returned for reads that reach no backing device.
const OPEN_BUS: u8 = 0x00;

/// The CPU-side bus. Routes reads and writes to internal RAM (with
/// mirroring), the device-register windows, cartridge work RAM, or the
/// banked program ROM.
pub struct Bus {
    ram: [u8; RAM_SIZE],
    prg_ram: [u8; PRG_RAM_SIZE],
    mapper: Option<Box<dyn Mapper>>,
    ppu: Option<Box<dyn IoDevice>>,
    apu: Option<Box<dyn IoDevice>>,
}

impl Bus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; RAM_SIZE],
            prg_ram: [0; PRG_RAM_SIZE],
            mapper: None,
            ppu: None,
            apu: None,
        }
    }

    /// Install the cartridge's program image.
    ///
    /// One or two 16KB banks get the fixed layout; more than two get the
    /// switched layout with the last bank pinned under the vectors.
    ///
    /// # Errors
    /// Returns an error if the image is not a whole number of banks or does
    /// not match the declared bank count.
    pub fn install_program_banks(
        &mut self,
        bank_count: usize,
        bytes: Vec<u8>,
    ) -> Result<(), MapperError> {
        if bytes.is_empty() || bytes.len() % PRG_BANK_SIZE != 0 {
            return Err(MapperError::InvalidImage(bytes.len()));
        }
        let actual = bytes.len() / PRG_BANK_SIZE;
        if actual != bank_count {
            return Err(MapperError::BankCountMismatch {
                declared: bank_count,
                actual,
            });
        }
        log::debug!("installing {bank_count} program bank(s)");
        self.mapper = if bank_count > 2 {
            Some(Box::new(BankedPrg::new(bytes)))
        } else {
            Some(Box::new(Nrom::new(bytes)))
        };
        Ok(())
    }

    /// Re-point the switchable program window at the given bank.
    ///
    /// # Errors
    /// Returns an error if no banks are installed or the index is out of
    /// range.
    pub fn select_bank(&mut self, index: usize) -> Result<(), MapperError> {
        match &mut self.mapper {
            Some(mapper) => mapper.select_bank(index),
            None => Err(MapperError::InvalidBank { index, count: 0 }),
        }
    }

    /// Attach the device model backing the `$2000-$3FFF` register window.
    pub fn attach_ppu(&mut self, device: Box<dyn IoDevice>) {
        self.ppu = Some(device);
    }

    /// Attach the device model backing the `$4000-$401F` register window.
    pub fn attach_apu(&mut self, device: Box<dyn IoDevice>) {
        self.apu = Some(device);
    }

    /// Read a byte from the bus at the specified address.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            // RAM and its mirrors
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            // PPU registers, mirrored every 8 bytes
            0x2000..=0x3FFF => match &mut self.ppu {
                Some(device) => device.read(addr & 0x0007),
                None => OPEN_BUS,
            },
            // APU and I/O registers
            0x4000..=0x401F => match &mut self.apu {
                Some(device) => device.read(addr - 0x4000),
                None => OPEN_BUS,
            },
            // Expansion area
            0x4020..=0x5FFF => OPEN_BUS,
            // Cartridge work RAM
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            // Program ROM
            0x8000..=0xFFFF => match &self.mapper {
                Some(mapper) => mapper
                    .read(addr)
                    .unwrap_or_else(|e| panic!("bus routing bug: {e}")),
                None => OPEN_BUS,
            },
        }
    }

    /// Write a byte to the bus at the specified address.
    ///
    /// Writes into the program-ROM window go to the mapper, which either
    /// decodes a bank-select register or discards them; they are never an
    /// error.
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // RAM and its mirrors
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            // PPU registers, mirrored every 8 bytes
            0x2000..=0x3FFF => {
                if let Some(device) = &mut self.ppu {
                    device.write(addr & 0x0007, value);
                }
            }
            // APU and I/O registers
            0x4000..=0x401F => {
                if let Some(device) = &mut self.apu {
                    device.write(addr - 0x4000, value);
                }
            }
            // Expansion area
            0x4020..=0x5FFF => {}
            // Cartridge work RAM
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = value,
            // Program ROM / mapper registers
            0x8000..=0xFFFF => {
                if let Some(mapper) = &mut self.mapper {
                    mapper.write(addr, value);
                }
            }
        }
    }

    /// Number of installed program banks, zero before installation.
    #[must_use]
    pub fn bank_count(&self) -> usize {
        self.mapper.as_ref().map_or(0, |m| m.bank_count())
    }

    /// Bank currently backing the switchable window.
    #[must_use]
    pub fn selected_bank(&self) -> usize {
        self.mapper.as_ref().map_or(0, |m| m.selected_bank())
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
