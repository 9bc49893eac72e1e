//! Register machine
//!
//! A thread executes code out of the shared [`Memory`] starting at its base
//! word. Stores are held back until [`Thread::commit`], so two threads
//! stepped in the same round both observe memory as it was before the
//! round.

use crate::execute::execute;
use crate::memory::Memory;
use crate::state::{PendingWrite, RegisterFile, ThreadState};
use hackvm_disassembler::{decode, format};
use hackvm_spec::{IrqKind, Register, NUM_REGISTERS};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Thread {
    base_word: u16,
    regs: RegisterFile,
    pc: u16,
    state: ThreadState,
    pending: Option<PendingWrite>,
}

impl Thread {
    /// Fresh machine fetching from `base_word`: registers and `pc` zero
    pub fn new(base_word: u16) -> Self {
        Self {
            base_word,
            regs: RegisterFile::new(),
            pc: 0,
            state: ThreadState::Running,
            pending: None,
        }
    }

    /// Execute one instruction
    ///
    /// Does nothing once the thread has yielded or succeeded.
    pub fn step(&mut self, memory: &Memory) {
        if self.state.is_done() {
            return;
        }

        let word = memory.fetch(self.fetch_offset());
        trace!(
            base = self.base_word,
            pc = self.pc,
            word,
            instr = %format(&decode(word)),
            "step"
        );

        let outcome = execute(word, self.pc, &mut self.regs, memory);
        self.pc = outcome.next_pc;
        if let Some(write) = outcome.write {
            self.pending = Some(write);
        }
        match outcome.irq {
            Some(IrqKind::Success) => self.state = ThreadState::Succeeded,
            Some(IrqKind::Yield) => self.state = ThreadState::Yielded,
            None => {}
        }
    }

    /// Apply the staged store, if any
    pub fn commit(&mut self, memory: &mut Memory) {
        if let Some(write) = self.pending.take() {
            trace!(base = self.base_word, address = write.address, value = write.value, "commit");
            memory.store_word(write.address, write.value);
        }
    }

    /// Continue after a yield
    pub fn resume(&mut self) {
        if self.state == ThreadState::Yielded {
            self.state = ThreadState::Running;
        }
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn is_yield(&self) -> bool {
        self.state == ThreadState::Yielded
    }

    pub fn is_success(&self) -> bool {
        self.state == ThreadState::Succeeded
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn reg(&self, reg: Register) -> u16 {
        self.regs.read(reg)
    }

    pub fn regs(&self) -> [u16; NUM_REGISTERS] {
        self.regs.as_array()
    }

    /// Word index relative to the base
    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn base_word(&self) -> u16 {
        self.base_word
    }

    pub fn pending_write(&self) -> Option<PendingWrite> {
        self.pending
    }

    fn fetch_offset(&self) -> usize {
        (self.base_word as usize + self.pc as usize) * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Region;

    fn loaded(code: &[u8]) -> Memory {
        let mut memory = Memory::new();
        memory.load_region(Region::Hash, code).unwrap();
        memory
    }

    #[test]
    fn test_step_on_done_thread_is_noop() {
        // irq success; addi r1, r0, 1
        let memory = loaded(&[0xE0, 0x01, 0x24, 0x01]);
        let mut thread = Thread::new(0);
        thread.step(&memory);
        assert!(thread.is_success());
        assert_eq!(thread.pc(), 1);

        thread.step(&memory);
        assert_eq!(thread.pc(), 1);
        assert_eq!(thread.reg(Register::R1), 0);
    }

    #[test]
    fn test_store_waits_for_commit() {
        // sw r0, r0, 5
        let mut memory = loaded(&[0x80, 0x05]);
        memory.store_word(5, 0xAAAA);
        let mut thread = Thread::new(0);

        thread.step(&memory);
        assert_eq!(memory.load_word(5), 0xAAAA);
        assert_eq!(thread.pending_write(), Some(PendingWrite { address: 5, value: 0 }));

        thread.commit(&mut memory);
        assert_eq!(memory.load_word(5), 0);
        assert_eq!(thread.pending_write(), None);
    }

    #[test]
    fn test_resume_only_from_yield() {
        let memory = loaded(&[0xE0, 0x81, 0xE0, 0x01]);
        let mut thread = Thread::new(0);
        thread.step(&memory);
        assert!(thread.is_yield());

        thread.resume();
        assert_eq!(thread.state(), ThreadState::Running);
        thread.step(&memory);
        assert!(thread.is_success());

        thread.resume();
        assert!(thread.is_success());
    }

    #[test]
    fn test_fetch_relative_to_base() {
        let mut memory = Memory::new();
        memory.load_region(Region::Input, &[0xE0, 0x01]).unwrap();
        let mut thread = Thread::new(0x2000);
        thread.step(&memory);
        assert!(thread.is_success());
    }

    #[test]
    fn test_fetch_wraps_around_memory() {
        // Base near the top of memory: pc 0x10 lands at word 0x000F
        let mut code = vec![0u8; 0x1E];
        code.extend_from_slice(&[0xE0, 0x01]);
        let memory = loaded(&code);
        let mut thread = Thread::new(0xFFFF);
        for _ in 0..0x10 {
            thread.step(&memory);
        }
        assert!(!thread.is_done());
        thread.step(&memory);
        assert!(thread.is_success());
    }
}
