/// nesoxide CLI
///
/// Provides subcommands for running ROMs headless and inspecting their
/// headers.
use anyhow::Context;
use clap::{Parser, Subcommand};
use core_lib::{Bus, Cartridge, Cpu};
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable per-instruction trace output (also honours RUST_LOG)
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a ROM headless for a bounded number of instructions
    Run {
        /// Path to the ROM file
        #[arg(value_name = "ROM_PATH")]
        rom_path: std::path::PathBuf,
        /// Maximum number of instructions to execute
        #[arg(long, default_value_t = 1_000_000)]
        steps: u64,
    },
    /// Print a summary of the ROM header
    Info {
        /// Path to the ROM file
        #[arg(value_name = "ROM_PATH")]
        rom_path: std::path::PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.trace);
    match &cli.command {
        Commands::Run { rom_path, steps } => run_rom(rom_path, *steps),
        Commands::Info { rom_path } => print_info(rom_path),
    }
}

fn init_tracing(trace: bool) {
    use tracing_subscriber::EnvFilter;
    let default = if trace { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the fetch-decode-execute loop for at most `steps` instructions.
///
/// Illegal opcodes halt the run with a nonzero exit code; the core reports
/// them as structured errors and leaves the policy to this layer.
fn run_rom(rom_path: &Path, steps: u64) -> anyhow::Result<()> {
    let cart = Cartridge::load(rom_path)
        .with_context(|| format!("Failed to load ROM from {}", rom_path.display()))?;
    let bank_count = cart.prg_bank_count();

    let mut bus = Bus::new();
    bus.install_program_banks(bank_count, cart.prg_rom)?;
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);

    for _ in 0..steps {
        if let Err(err) = cpu.step(&mut bus) {
            eprintln!("halted: {err}");
            print_snapshot(&cpu);
            std::process::exit(1);
        }
    }
    print_snapshot(&cpu);
    Ok(())
}

fn print_snapshot(cpu: &Cpu) {
    let snap = cpu.snapshot();
    println!(
        "A={:02X} X={:02X} Y={:02X} SP={:02X} PC={:04X} P={:02X} CYC={}",
        snap.a, snap.x, snap.y, snap.sp, snap.pc, snap.status, snap.cycles
    );
}

fn print_info(rom_path: &Path) -> anyhow::Result<()> {
    let cart = Cartridge::load(rom_path)
        .with_context(|| format!("Failed to load ROM from {}", rom_path.display()))?;
    println!("Mapper:    {}", cart.mapper_id);
    println!(
        "PRG ROM:   {} KB ({} banks)",
        cart.prg_rom_size() / 1024,
        cart.prg_bank_count()
    );
    println!("CHR ROM:   {} KB", cart.chr_rom_size() / 1024);
    println!("Mirroring: {:?}", cart.mirroring);
    println!("Battery:   {}", cart.has_battery);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
