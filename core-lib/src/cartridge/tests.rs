/// core-lib/src/cartridge/tests.rs
use super::{Cartridge, CartridgeError, Mirroring};
use pretty_assertions::assert_eq;

/// Build a minimal iNES image for testing
fn build_rom(prg_pages: u8, chr_pages: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut rom = vec![0x4E, 0x45, 0x53, 0x1A];
    rom.push(prg_pages);
    rom.push(chr_pages);
    rom.push(flags6);
    rom.push(flags7);
    rom.extend_from_slice(&[0; 8]); // rest of the header
    rom.extend_from_slice(&vec![0xFF; prg_pages as usize * 0x4000]);
    rom.extend_from_slice(&vec![0xAA; chr_pages as usize * 0x2000]);
    rom
}

#[test]
fn parses_sizes_and_bank_count() {
    let cart = Cartridge::from_bytes(&build_rom(2, 1, 0x00, 0x00)).unwrap();
    assert_eq!(cart.prg_rom_size(), 0x8000);
    assert_eq!(cart.chr_rom_size(), 0x2000);
    assert_eq!(cart.prg_bank_count(), 2);
    assert_eq!(cart.mapper_id, 0);
    assert_eq!(cart.mirroring, Mirroring::Horizontal);
    assert!(!cart.has_battery);
}

#[test]
fn parses_vertical_mirroring() {
    let cart = Cartridge::from_bytes(&build_rom(1, 1, 0x01, 0x00)).unwrap();
    assert_eq!(cart.mirroring, Mirroring::Vertical);
}

#[test]
fn four_screen_takes_precedence() {
    let cart = Cartridge::from_bytes(&build_rom(1, 1, 0x09, 0x00)).unwrap();
    assert_eq!(cart.mirroring, Mirroring::FourScreen);
}

#[test]
fn mapper_id_combines_both_flag_nibbles() {
    let cart = Cartridge::from_bytes(&build_rom(1, 1, 0x30, 0x40)).unwrap();
    assert_eq!(cart.mapper_id, 0x43);
}

#[test]
fn battery_flag() {
    let cart = Cartridge::from_bytes(&build_rom(1, 1, 0x02, 0x00)).unwrap();
    assert!(cart.has_battery);
}

#[test]
fn trainer_is_skipped() {
    let mut rom = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0, 0x04, 0];
    rom.extend_from_slice(&[0; 8]);
    rom.extend_from_slice(&[0xEE; 512]); // trainer payload
    let mut prg = vec![0x00; 0x4000];
    prg[0] = 0xAB;
    rom.extend_from_slice(&prg);

    let cart = Cartridge::from_bytes(&rom).unwrap();
    assert_eq!(cart.prg_rom[0], 0xAB);
}

#[test]
fn rejects_missing_magic() {
    let mut rom = build_rom(1, 1, 0x00, 0x00);
    rom[0] = 0x00;
    assert!(matches!(
        Cartridge::from_bytes(&rom),
        Err(CartridgeError::BadMagic)
    ));
}

#[test]
fn rejects_truncated_image() {
    let mut rom = build_rom(2, 1, 0x00, 0x00);
    rom.truncate(rom.len() - 1);
    assert!(matches!(
        Cartridge::from_bytes(&rom),
        Err(CartridgeError::Truncated { .. })
    ));
}

#[test]
fn rejects_zero_program_banks() {
    let rom = build_rom(0, 1, 0x00, 0x00);
    assert!(matches!(
        Cartridge::from_bytes(&rom),
        Err(CartridgeError::NoProgramBanks)
    ));
}
