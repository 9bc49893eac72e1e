//! Subcommand implementations

use anyhow::{bail, Context, Result};
use hackvm_assembler::assemble_file;
use hackvm_disassembler::disassemble;
use hackvm_runtime::{serve, Interpreter, RunContext};
use hackvm_spec::{VmConfig, HASH_SIZE};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Parse a word address in decimal or `0x` hex
pub fn parse_word(text: &str) -> Result<u16, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => text.parse(),
    };
    parsed.map_err(|err| format!("invalid word address `{}`: {}", text, err))
}

fn is_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("s") | Some("asm")
    )
}

/// Read code, assembling source files on the way
fn load_code(path: &Path) -> Result<Vec<u8>> {
    if is_source(path) {
        assemble_file(path).with_context(|| format!("assembling {}", path.display()))
    } else {
        fs::read(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn config(solo_budget: u32, budget: u32) -> Result<VmConfig> {
    VmConfig::new(solo_budget, budget).context("invalid step budgets")
}

pub fn asm(file: &Path, output: Option<&Path>) -> Result<ExitCode> {
    let code = assemble_file(file).with_context(|| format!("assembling {}", file.display()))?;
    info!(bytes = code.len(), "assembled {}", file.display());

    match output {
        Some(path) => {
            fs::write(path, &code).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", hex::encode(&code)),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn disasm(file: &Path, is_hex: bool, base: u16) -> Result<ExitCode> {
    let code = if is_hex {
        let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let digits: String = text.split_whitespace().collect();
        hex::decode(digits).with_context(|| format!("decoding hex in {}", file.display()))?
    } else {
        load_code(file)?
    };

    print!("{}", disassemble(&code, base));
    Ok(ExitCode::SUCCESS)
}

pub struct RunArgs<'a> {
    pub lock: &'a Path,
    pub unlock: &'a Path,
    pub hash: Option<&'a str>,
    pub tx: Option<&'a Path>,
    pub solo_budget: u32,
    pub budget: u32,
}

fn previous_hash(hash: Option<&str>, tx: Option<&Path>) -> Result<Vec<u8>> {
    match (hash, tx) {
        (Some(_), Some(_)) => bail!("--hash and --tx are mutually exclusive"),
        (Some(text), None) => hex::decode(text.trim()).context("decoding --hash"),
        (None, Some(path)) => {
            let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(Sha256::digest(&raw).to_vec())
        }
        (None, None) => Ok(vec![0; HASH_SIZE]),
    }
}

pub fn run(args: RunArgs<'_>) -> Result<ExitCode> {
    let hash = previous_hash(args.hash, args.tx)?;
    let lock = load_code(args.lock)?;
    let unlock = load_code(args.unlock)?;

    let mut interpreter = Interpreter::with_config(config(args.solo_budget, args.budget)?);
    let result = interpreter
        .run(&RunContext::new(&hash, &lock, &unlock))
        .context("running programs")?;

    println!("{}: {}", result.verdict, result.reason);
    println!(
        "solo steps: {}, concurrent rounds: {}",
        result.solo_steps, result.concurrent_rounds
    );

    Ok(if result.is_accept() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn worker(solo_budget: u32, budget: u32) -> Result<ExitCode> {
    let mut interpreter = Interpreter::with_config(config(solo_budget, budget)?);
    let stdin = io::stdin();
    let stdout = io::stdout();

    let served = serve(&mut interpreter, stdin.lock(), stdout.lock()).context("worker I/O")?;
    info!(served, "worker finished");
    Ok(ExitCode::SUCCESS)
}
