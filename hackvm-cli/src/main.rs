//! hackvm command-line tool
//!
//! ```bash
//! hackvm asm lock.s -o lock.bin
//! hackvm disasm lock.bin --base 0x1000
//! hackvm run --lock lock.s --unlock unlock.s --tx prev.tx
//! hackvm worker < requests.jsonl
//! ```

use clap::{Parser, Subcommand};
use hackvm_spec::VmConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hackvm", version, about = "Assemble, inspect and run hackvm spend programs")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a source file
    Asm {
        /// Assembly source
        file: PathBuf,
        /// Write raw code here instead of printing hex
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an address/word/instruction listing
    Disasm {
        /// Code file (raw bytes, or assembly if it ends in .s/.asm)
        file: PathBuf,
        /// The file holds hex text rather than raw bytes
        #[arg(long)]
        hex: bool,
        /// Word address of the first instruction
        #[arg(long, default_value = "0", value_parser = commands::parse_word)]
        base: u16,
    },

    /// Decide whether an unlocking program may spend a locked output
    ///
    /// Exits 0 on accept and 1 on reject.
    Run {
        /// Locking (output) program
        #[arg(long)]
        lock: PathBuf,
        /// Unlocking (input) program
        #[arg(long)]
        unlock: PathBuf,
        /// Previous transaction hash as hex
        #[arg(long, conflicts_with = "tx")]
        hash: Option<String>,
        /// Raw previous transaction; its SHA-256 becomes the hash
        #[arg(long)]
        tx: Option<PathBuf>,
        /// Steps the locking program may take alone
        #[arg(long, default_value_t = VmConfig::DEFAULT.max_init_ticks)]
        solo_budget: u32,
        /// Lockstep rounds once both programs run
        #[arg(long, default_value_t = VmConfig::DEFAULT.max_ticks)]
        budget: u32,
    },

    /// Serve JSON-lines run requests on stdin
    Worker {
        #[arg(long, default_value_t = VmConfig::DEFAULT.max_init_ticks)]
        solo_budget: u32,
        #[arg(long, default_value_t = VmConfig::DEFAULT.max_ticks)]
        budget: u32,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Asm { file, output } => commands::asm(&file, output.as_deref()),
        Commands::Disasm { file, hex, base } => commands::disasm(&file, hex, base),
        Commands::Run {
            lock,
            unlock,
            hash,
            tx,
            solo_budget,
            budget,
        } => commands::run(commands::RunArgs {
            lock: &lock,
            unlock: &unlock,
            hash: hash.as_deref(),
            tx: tx.as_deref(),
            solo_budget,
            budget,
        }),
        Commands::Worker { solo_budget, budget } => commands::worker(solo_budget, budget),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
