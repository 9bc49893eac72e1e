//! Two-phase validation run
//!
//! The locking (output) program first runs alone. If it stops at
//! `irq yield` the unlocking (input) program is loaded and both machines
//! advance in lockstep until the output machine stops again. The input
//! spends the output only when the output machine reaches an interrupt
//! within budget.

use crate::error::Result;
use crate::memory::{Memory, Region};
use crate::thread::Thread;
use hackvm_spec::{SpecError, VmConfig, INPUT_OFFSET, OUTPUT_OFFSET};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Data for one validation run
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Hash of the previous transaction, readable by both programs
    pub hash: &'a [u8],
    /// Program of the output being spent
    pub locking_code: &'a [u8],
    /// Program of the spending input
    pub unlocking_code: &'a [u8],
}

impl<'a> RunContext<'a> {
    pub fn new(hash: &'a [u8], locking_code: &'a [u8], unlocking_code: &'a [u8]) -> Self {
        Self {
            hash,
            locking_code,
            unlocking_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The input may spend the output
    Accept,
    Reject,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "accept"),
            Verdict::Reject => write!(f, "reject"),
        }
    }
}

/// Which rule produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The output program ran out of solo steps, so it guards nothing
    SoloBudgetExhausted,
    /// The output program succeeded without looking at the input
    SoloSuccess,
    /// The output program reached an interrupt while running with the input
    OutputDecided,
    /// The output program never stopped once the input was loaded
    ConcurrentBudgetExhausted,
}

impl Decision {
    pub fn verdict(self) -> Verdict {
        match self {
            Decision::ConcurrentBudgetExhausted => Verdict::Reject,
            _ => Verdict::Accept,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Decision::SoloBudgetExhausted => "output program exhausted its solo budget",
            Decision::SoloSuccess => "output program succeeded before input was loaded",
            Decision::OutputDecided => "output program stopped while running with input",
            Decision::ConcurrentBudgetExhausted => "output program never stopped",
        };
        f.write_str(text)
    }
}

/// Execution result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub verdict: Verdict,
    pub reason: Decision,
    /// Output machine steps taken alone
    pub solo_steps: u32,
    /// Lockstep rounds taken with both machines loaded
    pub concurrent_rounds: u32,
}

impl ExecutionResult {
    fn decided(reason: Decision, solo_steps: u32, concurrent_rounds: u32) -> Self {
        Self {
            verdict: reason.verdict(),
            reason,
            solo_steps,
            concurrent_rounds,
        }
    }

    pub fn is_accept(&self) -> bool {
        self.verdict.is_accept()
    }
}

/// Owns the shared memory and both machines
///
/// One interpreter can validate any number of spends; every run starts
/// from cleared memory and fresh machines.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: VmConfig,
    memory: Memory,
    output: Thread,
    input: Thread,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(VmConfig::DEFAULT)
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            memory: Memory::new(),
            output: Thread::new(OUTPUT_OFFSET),
            input: Thread::new(INPUT_OFFSET),
        }
    }

    /// Interpreter with custom budgets, validated
    pub fn with_budgets(max_init_ticks: u32, max_ticks: u32) -> Result<Self> {
        let config = VmConfig::new(max_init_ticks, max_ticks).map_err(SpecError::from)?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> VmConfig {
        self.config
    }

    /// Zero memory and reset both machines
    pub fn clear(&mut self) {
        self.memory.clear();
        self.output = Thread::new(OUTPUT_OFFSET);
        self.input = Thread::new(INPUT_OFFSET);
    }

    /// Decide whether `ctx.unlocking_code` may spend `ctx.locking_code`
    ///
    /// Fails only when a buffer does not fit its region.
    pub fn run(&mut self, ctx: &RunContext<'_>) -> Result<ExecutionResult> {
        self.clear();
        self.memory.load_region(Region::Hash, ctx.hash)?;
        self.memory.load_region(Region::Output, ctx.locking_code)?;

        let solo_steps = self.run_solo();
        if !self.output.is_done() {
            debug!(solo_steps, "output exhausted solo budget");
            return Ok(ExecutionResult::decided(Decision::SoloBudgetExhausted, solo_steps, 0));
        }
        if self.output.is_success() {
            debug!(solo_steps, "output succeeded alone");
            return Ok(ExecutionResult::decided(Decision::SoloSuccess, solo_steps, 0));
        }

        self.output.resume();
        self.memory.load_region(Region::Input, ctx.unlocking_code)?;
        debug!(solo_steps, input_len = ctx.unlocking_code.len(), "output yielded, input loaded");

        let rounds = self.run_concurrent();
        let reason = if self.output.is_done() {
            Decision::OutputDecided
        } else {
            Decision::ConcurrentBudgetExhausted
        };
        let result = ExecutionResult::decided(reason, solo_steps, rounds);
        debug!(
            verdict = %result.verdict,
            reason = ?result.reason,
            rounds,
            output = %self.output.state(),
            input = %self.input.state(),
            "run finished"
        );
        Ok(result)
    }

    /// Output alone, one step and commit per tick
    fn run_solo(&mut self) -> u32 {
        let mut steps = 0;
        while steps < self.config.max_init_ticks {
            self.output.step(&self.memory);
            self.output.commit(&mut self.memory);
            steps += 1;
            if self.output.is_done() {
                break;
            }
        }
        steps
    }

    /// Both machines per round; input commits first so output wins a
    /// same-address race
    fn run_concurrent(&mut self) -> u32 {
        let mut rounds = 0;
        while rounds < self.config.max_ticks {
            self.output.step(&self.memory);
            if !self.input.is_done() {
                self.input.step(&self.memory);
            }
            self.input.commit(&mut self.memory);
            self.output.commit(&mut self.memory);
            rounds += 1;
            if self.output.is_done() {
                break;
            }
        }
        rounds
    }

    /// Locking program machine
    pub fn output(&self) -> &Thread {
        &self.output
    }

    /// Unlocking program machine
    pub fn input(&self) -> &Thread {
        &self.input
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
