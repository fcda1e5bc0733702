//! Command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use aplusb::output::format_report;
use aplusb::runtime::BackendSpec;
use aplusb::{pipeline, BenchConfig, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum BackendArg {
    /// OpenCL when compiled in, otherwise the host reference backend.
    #[default]
    Auto,
    /// CPU reference backend.
    Host,
    /// Real OpenCL backend (requires the `opencl` cargo feature).
    Opencl,
}

impl From<BackendArg> for BackendSpec {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => Self::Auto,
            BackendArg::Host => Self::Host,
            BackendArg::Opencl => Self::OpenCl,
        }
    }
}

/// Vector-addition benchmark over a compute backend.
#[derive(Debug, Parser)]
#[command(name = "aplusb", version, about)]
struct Cli {
    /// Elements per array.
    #[arg(long, default_value_t = 100_000_000)]
    n: usize,

    /// 1-D local work-group size.
    #[arg(long, default_value_t = 128)]
    work_group_size: usize,

    /// Timed laps per measured phase.
    #[arg(long, default_value_t = 20)]
    laps: usize,

    /// Deterministic input seed (defaults to n).
    #[arg(long)]
    seed: Option<u64>,

    /// Path to the kernel source file.
    #[arg(long, default_value = "kernels/aplusb.cl")]
    kernel: PathBuf,

    /// Which compute backend to run on.
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    backend: BackendArg,

    /// Print the report as JSON instead of the colored summary.
    #[arg(long)]
    json: bool,

    /// Small preset (1 Mi elements, 10 laps); overrides --n and --laps.
    #[arg(long)]
    quick: bool,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let base = if self.quick {
            BenchConfig::quick()
        } else {
            BenchConfig::new().n(self.n).laps(self.laps)
        };
        let config = base
            .work_group_size(self.work_group_size)
            .kernel_path(self.kernel.clone());
        match self.seed {
            Some(seed) => config.seed(seed),
            None => config,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut backend = BackendSpec::from(cli.backend).resolve()?;
    eprintln!("Using device: {}", backend.device_name());

    let report = pipeline::run(backend.as_mut(), &cli.config())?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .expect("report serialization cannot fail")
        );
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
