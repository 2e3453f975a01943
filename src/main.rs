use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use eyre::Result;
use mem32_verif::{runner, AccessSize, Backend, HarnessConfig, VerilatorConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Verilator,
    Reference,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Byte,
    Half,
    Word,
}

/// Sweep the mem_32 address range, writing each location and reading it back
/// on both read ports.
#[derive(Debug, Parser)]
#[command(name = "mem32-verif", version)]
struct Args {
    #[arg(long, value_enum, default_value = "verilator")]
    backend: BackendArg,

    /// Sweep addresses 0 .. 2^LOG_SIZE [default: the whole mem_32 array]
    #[arg(long)]
    log_size: Option<u32>,

    #[arg(long, value_enum, default_value = "byte")]
    size: SizeArg,

    /// Issue sign-extending reads
    #[arg(long)]
    signed: bool,

    /// Must be the file the mem_32 model was generated from
    #[arg(long, default_value = "rtl/mem_32.sv")]
    source: Utf8PathBuf,

    #[arg(long = "include", default_value = "rtl")]
    include_dirs: Vec<Utf8PathBuf>,

    #[arg(long, default_value = "artifacts")]
    artifacts: Utf8PathBuf,
}

impl From<Args> for HarnessConfig {
    fn from(args: Args) -> Self {
        let backend = match args.backend {
            BackendArg::Verilator => Backend::Verilator,
            BackendArg::Reference => Backend::Reference,
        };
        HarnessConfig {
            backend,
            log_size: args.log_size.unwrap_or(backend.default_log_size()),
            size: match args.size {
                SizeArg::Byte => AccessSize::Byte,
                SizeArg::Half => AccessSize::Half,
                SizeArg::Word => AccessSize::Word,
            },
            signed: args.signed,
            verilator: VerilatorConfig {
                source: args.source,
                include_dirs: args.include_dirs,
                artifacts: args.artifacts,
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = HarnessConfig::from(Args::parse());
    config.validate()?;

    println!(
        "🚀 Sweeping mem_32 with the {} backend ({} addresses)...",
        config.backend.name(),
        config.sweep().len()
    );

    let report = runner::run(&config)?;

    for case in report.failures() {
        for mismatch in &case.mismatches {
            println!("❌ case {} @ {:#x}: {}", case.index, case.address, mismatch);
        }
    }

    let report = runner::verdict(report)?;
    println!("🎉 All cases passed: {}", report);
    Ok(())
}
