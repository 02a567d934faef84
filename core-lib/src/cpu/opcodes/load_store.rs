//! Load, store, transfer and stack-move semantics.

use crate::bus::MemoryBus;
use crate::cpu::addressing::Operand;
use crate::cpu::{Cpu, Status};

pub(crate) fn lda(cpu: &mut Cpu, m: u8) {
    cpu.regs.a = m;
    cpu.regs.set_zn(m);
}

pub(crate) fn ldx(cpu: &mut Cpu, m: u8) {
    cpu.regs.x = m;
    cpu.regs.set_zn(m);
}

pub(crate) fn ldy(cpu: &mut Cpu, m: u8) {
    cpu.regs.y = m;
    cpu.regs.set_zn(m);
}

pub(crate) fn sta(cpu: &mut Cpu, bus: &mut dyn MemoryBus, operand: Operand) {
    bus.write(operand.address(), cpu.regs.a);
}

pub(crate) fn stx(cpu: &mut Cpu, bus: &mut dyn MemoryBus, operand: Operand) {
    bus.write(operand.address(), cpu.regs.x);
}

pub(crate) fn sty(cpu: &mut Cpu, bus: &mut dyn MemoryBus, operand: Operand) {
    bus.write(operand.address(), cpu.regs.y);
}

pub(crate) fn pha(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let a = cpu.regs.a;
    cpu.push(bus, a);
}

/// The pushed status byte always carries Break and the unused bit set.
pub(crate) fn php(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let bits = (cpu.regs.status | Status::BREAK | Status::UNUSED).bits();
    cpu.push(bus, bits);
}

pub(crate) fn pla(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let value = cpu.pull(bus);
    cpu.regs.a = value;
    cpu.regs.set_zn(value);
}

pub(crate) fn plp(cpu: &mut Cpu, bus: &mut dyn MemoryBus) {
    let value = cpu.pull(bus);
    cpu.regs.status = status_from_stack(value);
}

/// Rebuild the status register from a pulled byte: Break exists only in the
/// pushed copy and the unused bit always reads as set.
pub(crate) fn status_from_stack(value: u8) -> Status {
    let mut status = Status::from_bits_truncate(value);
    status.remove(Status::BREAK);
    status.insert(Status::UNUSED);
    status
}
