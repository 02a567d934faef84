use core_lib::bus::{Bus, PRG_BANK_SIZE};
use core_lib::cartridge::Cartridge;
use core_lib::cpu::Cpu;

/// Build an iNES image whose banks each carry their index in their first
/// byte, with the reset vector (in the last bank) pointing at `$8000`.
fn build_ines(bank_count: usize) -> Vec<u8> {
    let mut prg = vec![0u8; bank_count * PRG_BANK_SIZE];
    for bank in 0..bank_count {
        prg[bank * PRG_BANK_SIZE] = bank as u8;
    }
    let last = (bank_count - 1) * PRG_BANK_SIZE;
    prg[last + 0x3FFC] = 0x00;
    prg[last + 0x3FFD] = 0x80;

    let mut rom = vec![0x4E, 0x45, 0x53, 0x1A, bank_count as u8, 0, 0, 0];
    rom.extend_from_slice(&[0; 8]);
    rom.extend_from_slice(&prg);
    rom
}

fn bus_from_ines(bank_count: usize) -> Bus {
    let cart = Cartridge::from_bytes(&build_ines(bank_count)).unwrap();
    let banks = cart.prg_bank_count();
    let mut bus = Bus::new();
    bus.install_program_banks(banks, cart.prg_rom).unwrap();
    bus
}

#[test]
fn cartridge_image_installs_into_the_bus() {
    let mut bus = bus_from_ines(2);
    assert_eq!(bus.bank_count(), 2);
    assert_eq!(bus.read(0x8000), 0);
    assert_eq!(bus.read(0xC000), 1);
}

#[test]
fn switching_leaves_the_fixed_bank_under_the_vectors() {
    let mut bus = bus_from_ines(8);

    for bank in 0..7 {
        bus.select_bank(bank).unwrap();
        assert_eq!(bus.read(0x8000), bank as u8);
        assert_eq!(bus.read(0xC000), 7);
    }
}

#[test]
fn bank_register_write_matches_select_bank() {
    let mut bus = bus_from_ines(4);

    bus.select_bank(2).unwrap();
    let via_select = bus.read(0x8000);

    bus.write(0x9000, 0x02); // any address in the window is the register
    assert_eq!(bus.read(0x8000), via_select);
}

#[test]
fn work_ram_survives_bank_switching() {
    let mut bus = bus_from_ines(4);
    bus.write(0x6000, 0x42);

    bus.select_bank(3).unwrap();
    assert_eq!(bus.read(0x6000), 0x42);
}

#[test]
fn reset_vector_reads_from_the_fixed_bank() {
    let mut bus = bus_from_ines(8);
    bus.select_bank(5).unwrap();

    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);

    assert_eq!(cpu.regs.pc, 0x8000);
}
