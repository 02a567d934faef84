use crate::bus::MemoryBus;
use crate::interrupts::{Interrupt, InterruptLine, RESET_VECTOR};
use thiserror::Error;

pub mod addressing;
pub mod opcodes;

pub use addressing::{Operand, Resolved};
pub use opcodes::{decode, AddressingMode, Instruction, Operation, OPCODES};

use opcodes::{alu, jump, load_store};

bitflags::bitflags! {
    /// Processor status flags. The unused bit exists only in the pushed-byte
    /// representation and always reads back as set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const CARRY             = 0b0000_0001;
        const ZERO              = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        /// Accepted but semantically inert; the 2A03 has no BCD unit.
        const DECIMAL           = 0b0000_1000;
        const BREAK             = 0b0001_0000;
        const UNUSED            = 0b0010_0000;
        const OVERFLOW          = 0b0100_0000;
        const NEGATIVE          = 0b1000_0000;
    }
}

/// Base of the fixed 256-byte stack region.
const STACK_BASE: u16 = 0x0100;

/// The register file. Mutated only by the execution engine; the addressing
/// resolver advances `pc` while consuming operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
}

impl Registers {
    /// Power-on state. The program counter is loaded separately from the
    /// reset vector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::UNUSED.union(Status::INTERRUPT_DISABLE),
        }
    }

    /// Set Zero and Negative from a result byte. Every other flag is the
    /// responsibility of the individual operation.
    pub fn set_zn(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum CpuError {
    /// The fetched byte has no table entry and is not a supported unofficial
    /// opcode. The counter is left on the faulting byte; the run loop
    /// decides whether to halt, skip or log.
    #[error("Illegal opcode {opcode:#04X} at {pc:#06X}")]
    IllegalOpcode { opcode: u8, pc: u16 },
}

/// Point-in-time copy of the register file, reported through the tracing
/// side channel and available for debuggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,
}

pub struct Cpu {
    pub regs: Registers,
    interrupts: InterruptLine,
    cycles: u64, // Total cycles since power-on
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            interrupts: InterruptLine::new(),
            cycles: 0,
        }
    }

    /// Load the power-on register state and the program counter from the
    /// reset vector.
    pub fn reset(&mut self, bus: &mut dyn MemoryBus) {
        self.regs = Registers::new();
        self.regs.pc = bus.read_word(RESET_VECTOR);
        self.interrupts = InterruptLine::new();
    }

    /// Latch an interrupt request; it is observed between instructions.
    pub fn request_interrupt(&mut self, kind: Interrupt) {
        self.interrupts.request(kind);
    }

    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.regs.a,
            x: self.regs.x,
            y: self.regs.y,
            sp: self.regs.sp,
            pc: self.regs.pc,
            status: self.regs.status.bits(),
            cycles: self.cycles,
        }
    }

    /// Execute exactly one instruction, or service a pending interrupt, and
    /// return the cycles consumed.
    ///
    /// # Errors
    /// Returns `CpuError::IllegalOpcode` when the fetched byte has no table
    /// entry; the program counter is left on the faulting byte.
    pub fn step(&mut self, bus: &mut dyn MemoryBus) -> Result<u32, CpuError> {
        let masked = self.regs.status.contains(Status::INTERRUPT_DISABLE);
        if let Some(kind) = self.interrupts.take(masked) {
            let cycles = self.service_interrupt(kind, bus);
            self.cycles += u64::from(cycles);
            return Ok(cycles);
        }

        let pc = self.regs.pc;
        let opcode = self.fetch_byte(bus);
        let Some(instr) = opcodes::decode(opcode) else {
            self.regs.pc = pc;
            return Err(CpuError::IllegalOpcode { opcode, pc });
        };

        let resolved = self.resolve(instr.mode, bus);
        let mut cycles = instr.cycles;
        if instr.page_penalty && resolved.page_crossed {
            cycles += 1;
        }
        cycles += self.execute(instr, resolved, bus);

        tracing::trace!(
            "step pc={pc:04X} opcode={opcode:02X} op={} mode={:?} a={:02X} x={:02X} y={:02X} sp={:02X} p={:02X} cyc={cycles}",
            instr.operation.mnemonic(),
            instr.mode,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.sp,
            self.regs.status.bits(),
        );

        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Interrupt entry: push the counter and status (Break clear in the
    /// pushed copy), mask IRQs, load the counter from the service vector.
    fn service_interrupt(&mut self, kind: Interrupt, bus: &mut dyn MemoryBus) -> u32 {
        let pc = self.regs.pc;
        self.push_word(bus, pc);
        let bits = ((self.regs.status | Status::UNUSED) - Status::BREAK).bits();
        self.push(bus, bits);
        self.regs.status.insert(Status::INTERRUPT_DISABLE);
        self.regs.pc = bus.read_word(InterruptLine::vector(kind));
        tracing::trace!("servicing {kind:?}, vectored to {:04X}", self.regs.pc);
        7
    }

    /// Dispatch a decoded instruction. Returns the extra cycles beyond the
    /// table base (taken branches only).
    fn execute(&mut self, instr: Instruction, resolved: Resolved, bus: &mut dyn MemoryBus) -> u32 {
        let operand = resolved.operand;
        match instr.operation {
            // Loads and stores
            Operation::Lda => {
                let m = self.read_operand(bus, operand);
                load_store::lda(self, m);
            }
            Operation::Ldx => {
                let m = self.read_operand(bus, operand);
                load_store::ldx(self, m);
            }
            Operation::Ldy => {
                let m = self.read_operand(bus, operand);
                load_store::ldy(self, m);
            }
            Operation::Sta => load_store::sta(self, bus, operand),
            Operation::Stx => load_store::stx(self, bus, operand),
            Operation::Sty => load_store::sty(self, bus, operand),

            // Transfers
            Operation::Tax => {
                self.regs.x = self.regs.a;
                self.regs.set_zn(self.regs.x);
            }
            Operation::Tay => {
                self.regs.y = self.regs.a;
                self.regs.set_zn(self.regs.y);
            }
            Operation::Tsx => {
                self.regs.x = self.regs.sp;
                self.regs.set_zn(self.regs.x);
            }
            Operation::Txa => {
                self.regs.a = self.regs.x;
                self.regs.set_zn(self.regs.a);
            }
            // TXS is the one transfer that touches no flags.
            Operation::Txs => self.regs.sp = self.regs.x,
            Operation::Tya => {
                self.regs.a = self.regs.y;
                self.regs.set_zn(self.regs.a);
            }

            // Stack
            Operation::Pha => load_store::pha(self, bus),
            Operation::Php => load_store::php(self, bus),
            Operation::Pla => load_store::pla(self, bus),
            Operation::Plp => load_store::plp(self, bus),

            // Arithmetic
            Operation::Adc => {
                let m = self.read_operand(bus, operand);
                alu::adc(self, m);
            }
            Operation::Sbc => {
                let m = self.read_operand(bus, operand);
                alu::sbc(self, m);
            }

            // Logic
            Operation::And => {
                let m = self.read_operand(bus, operand);
                alu::and(self, m);
            }
            Operation::Ora => {
                let m = self.read_operand(bus, operand);
                alu::ora(self, m);
            }
            Operation::Eor => {
                let m = self.read_operand(bus, operand);
                alu::eor(self, m);
            }
            Operation::Bit => {
                let m = self.read_operand(bus, operand);
                alu::bit(self, m);
            }

            // Compares
            Operation::Cmp => {
                let m = self.read_operand(bus, operand);
                let lhs = self.regs.a;
                alu::compare(self, lhs, m);
            }
            Operation::Cpx => {
                let m = self.read_operand(bus, operand);
                let lhs = self.regs.x;
                alu::compare(self, lhs, m);
            }
            Operation::Cpy => {
                let m = self.read_operand(bus, operand);
                let lhs = self.regs.y;
                alu::compare(self, lhs, m);
            }

            // Shifts and rotates
            Operation::Asl => alu::modify(self, bus, operand, alu::asl),
            Operation::Lsr => alu::modify(self, bus, operand, alu::lsr),
            Operation::Rol => alu::modify(self, bus, operand, alu::rol),
            Operation::Ror => alu::modify(self, bus, operand, alu::ror),

            // Increments and decrements
            Operation::Inc => alu::modify(self, bus, operand, alu::inc),
            Operation::Dec => alu::modify(self, bus, operand, alu::dec),
            Operation::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.set_zn(self.regs.x);
            }
            Operation::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.set_zn(self.regs.y);
            }
            Operation::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.set_zn(self.regs.x);
            }
            Operation::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.set_zn(self.regs.y);
            }

            // Branches
            Operation::Bcc => {
                let taken = !self.regs.status.contains(Status::CARRY);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bcs => {
                let taken = self.regs.status.contains(Status::CARRY);
                return jump::branch(self, resolved, taken);
            }
            Operation::Beq => {
                let taken = self.regs.status.contains(Status::ZERO);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bmi => {
                let taken = self.regs.status.contains(Status::NEGATIVE);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bne => {
                let taken = !self.regs.status.contains(Status::ZERO);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bpl => {
                let taken = !self.regs.status.contains(Status::NEGATIVE);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bvc => {
                let taken = !self.regs.status.contains(Status::OVERFLOW);
                return jump::branch(self, resolved, taken);
            }
            Operation::Bvs => {
                let taken = self.regs.status.contains(Status::OVERFLOW);
                return jump::branch(self, resolved, taken);
            }

            // Jumps, subroutines and interrupts
            Operation::Jmp => jump::jmp(self, operand),
            Operation::Jsr => jump::jsr(self, bus, operand),
            Operation::Rts => jump::rts(self, bus),
            Operation::Brk => jump::brk(self, bus),
            Operation::Rti => jump::rti(self, bus),

            // Flag operations
            Operation::Clc => self.regs.status.remove(Status::CARRY),
            Operation::Cld => self.regs.status.remove(Status::DECIMAL),
            Operation::Cli => self.regs.status.remove(Status::INTERRUPT_DISABLE),
            Operation::Clv => self.regs.status.remove(Status::OVERFLOW),
            Operation::Sec => self.regs.status.insert(Status::CARRY),
            Operation::Sed => self.regs.status.insert(Status::DECIMAL),
            Operation::Sei => self.regs.status.insert(Status::INTERRUPT_DISABLE),

            // No-ops, including the unofficial variants, still perform their
            // operand read.
            Operation::Nop => {
                if let Operand::Address(addr) = operand {
                    let _ = bus.read(addr);
                }
            }
        }
        0
    }

    /// Operand value for read-class instructions.
    fn read_operand(&mut self, bus: &mut dyn MemoryBus, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => bus.read(addr),
            Operand::Immediate(value) => value,
            Operand::None => self.regs.a,
        }
    }

    // --- Stack helpers. Each push decrements and each pull increments the
    // pointer with 8-bit wraparound; overflow is not detected, matching the
    // hardware. ---

    pub(crate) fn push(&mut self, bus: &mut dyn MemoryBus, value: u8) {
        bus.write(STACK_BASE | u16::from(self.regs.sp), value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    pub(crate) fn pull(&mut self, bus: &mut dyn MemoryBus) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        bus.read(STACK_BASE | u16::from(self.regs.sp))
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn MemoryBus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    pub(crate) fn pull_word(&mut self, bus: &mut dyn MemoryBus) -> u16 {
        let lo = u16::from(self.pull(bus));
        let hi = u16::from(self.pull(bus));
        (hi << 8) | lo
    }
}
