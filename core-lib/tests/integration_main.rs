use core_lib::bus::{Bus, PRG_BANK_SIZE};
use core_lib::cpu::Cpu;
use core_lib::interrupts::Interrupt;

/// Bus with the program at `$8000`, an NMI handler region at `$9000` and
/// the vectors wired up.
fn machine_with(program: &[u8], nmi_handler: &[u8]) -> (Cpu, Bus) {
    let mut prg = vec![0; 2 * PRG_BANK_SIZE];
    prg[..program.len()].copy_from_slice(program);
    prg[0x1000..0x1000 + nmi_handler.len()].copy_from_slice(nmi_handler);
    prg[0x7FFA] = 0x00; // NMI -> $9000
    prg[0x7FFB] = 0x90;
    prg[0x7FFC] = 0x00; // reset -> $8000
    prg[0x7FFD] = 0x80;
    prg[0x7FFE] = 0x00; // IRQ/BRK -> $9800
    prg[0x7FFF] = 0x98;
    let mut bus = Bus::new();
    bus.install_program_banks(2, prg).unwrap();
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[test]
fn multiply_by_repeated_addition() {
    // LDA #0; LDX #5; loop: CLC; ADC #3; DEX; BNE loop; STA $0200; BRK
    let program = [
        0xA9, 0x00, // $8000
        0xA2, 0x05, // $8002
        0x18, // $8004
        0x69, 0x03, // $8005
        0xCA, // $8007
        0xD0, 0xFA, // $8008  BNE -6
        0x8D, 0x00, 0x02, // $800A
        0x00, // $800D  BRK
    ];
    let (mut cpu, mut bus) = machine_with(&program, &[]);

    let mut guard = 0;
    while cpu.regs.pc != 0x800D {
        cpu.step(&mut bus).unwrap();
        guard += 1;
        assert!(guard < 100, "program failed to terminate");
    }

    assert_eq!(cpu.regs.a, 0x0F);
    assert_eq!(bus.read(0x0200), 0x0F);
    // 2 + 2 + 5*(2+2+2) + 4 taken branches + 1 fallthrough + 4
    assert_eq!(cpu.cycles(), 52);
}

#[test]
fn nmi_handler_runs_between_instructions_and_returns() {
    // Main program spins on JMP $8000; the handler increments $10 and RTIs.
    let program = [0x4C, 0x00, 0x80];
    let handler = [0xE6, 0x10, 0x40]; // INC $10; RTI
    let (mut cpu, mut bus) = machine_with(&program, &handler);

    cpu.step(&mut bus).unwrap(); // one trip around the loop
    assert_eq!(cpu.regs.pc, 0x8000);

    cpu.request_interrupt(Interrupt::Nmi);
    let cycles = cpu.step(&mut bus).unwrap(); // entry sequence, not a fetch
    assert_eq!(cycles, 7);
    assert_eq!(cpu.regs.pc, 0x9000);

    cpu.step(&mut bus).unwrap(); // INC $10
    cpu.step(&mut bus).unwrap(); // RTI

    assert_eq!(cpu.regs.pc, 0x8000);
    assert_eq!(bus.read(0x0010), 1);
}

#[test]
fn subroutine_call_preserves_flow_and_stack_depth() {
    // JSR $8010; STA $0200; BRK ... $8010: LDA #$2A; RTS
    let mut program = vec![0x20, 0x10, 0x80, 0x8D, 0x00, 0x02, 0x00];
    program.resize(0x10, 0xEA);
    program.extend_from_slice(&[0xA9, 0x2A, 0x60]);
    let (mut cpu, mut bus) = machine_with(&program, &[]);
    let sp = cpu.regs.sp;

    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }

    assert_eq!(bus.read(0x0200), 0x2A);
    assert_eq!(cpu.regs.sp, sp);
    assert_eq!(cpu.regs.pc, 0x8006); // sitting on the BRK
}
