//! Control-flow semantics: branches, jumps, subroutines and interrupt
//! return.

use crate::bus::MemoryBus;
use crate::cpu::addressing::{Operand, Resolved};
use crate::cpu::{Cpu, Status};
use crate::interrupts::{Interrupt, InterruptLine};

use super::load_store::status_from_stack;

/// Conditional branch. The counter moves only when the condition holds;
/// taking the branch costs one cycle, plus one more when the target sits on
/// a different page.
pub(crate) fn branch(cpu: &mut Cpu, resolved: Resolved, condition: bool) -> u32 {
    if !condition {
        return 0;
    }
    cpu.regs.pc = resolved.operand.address();
    1 + u32::from(resolved.page_crossed)
}

pub(crate) fn jmp(cpu: &mut Cpu, operand: Operand) {
    cpu.regs.pc = operand.address();
}

/// Push the address of the instruction's last byte, then jump. RTS adds the
/// one back.
pub(crate) fn jsr(cpu: &mut Cpu, bus: &mut dyn MemoryBus, operand: Operand) {
    let ret = cpu.regs.pc.wrapping_sub(1);
    cpu.push_word(bus, ret);
    cpu.regs.pc = operand.address();
}

pub(crate) fn rts(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let ret = cpu.pull_word(bus);
    cpu.regs.pc = ret.wrapping_add(1);
}

/// Software interrupt: push the counter past the padding byte and the status
/// with Break set, mask IRQs, vector through `$FFFE`.
pub(crate) fn brk(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let ret = cpu.regs.pc.wrapping_add(1);
    cpu.push_word(bus, ret);
    let bits = (cpu.regs.status | Status::BREAK | Status::UNUSED).bits();
    cpu.push(bus, bits);
    cpu.regs.status.insert(Status::BREAK);
    cpu.regs.status.insert(Status::INTERRUPT_DISABLE);
    cpu.regs.pc = bus.read_word(InterruptLine::vector(Interrupt::Irq));
}

/// Return from interrupt: status first, then the counter, no increment.
pub(crate) fn rti(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let value = cpu.pull(bus);
    cpu.regs.status = status_from_stack(value);
    cpu.regs.pc = cpu.pull_word(bus);
}
