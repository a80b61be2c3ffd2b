// In: src/engine/mock.rs

//! A scripted engine for exercising the drivers against exact, hand-picked
//! step results, including ones no real codec would ever report.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::engine::{Engine, StepResult};
use crate::params::{CompressParams, DecompressParams};

/// Every step pops the next scripted result. Reported `produced` bytes are
/// filled with `fill` as far as the window allows; reporting more than the
/// window is how overrun scenarios are staged.
#[derive(Default)]
pub struct ScriptedEngine {
    script: RefCell<VecDeque<StepResult>>,
    fill: u8,
    refuse_init: Cell<bool>,
    refuse_reinit: Cell<bool>,
    inits: Cell<usize>,
    reinits: Cell<usize>,
    steps: Cell<usize>,
    windows: RefCell<Vec<(usize, usize)>>,
    last_compress_params: Cell<Option<CompressParams>>,
    last_decompress_params: Cell<Option<DecompressParams>>,
}

pub struct MockSession {
    pub generation: usize,
}

impl ScriptedEngine {
    pub fn new(script: Vec<StepResult>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            fill: 0xAB,
            ..Default::default()
        }
    }

    pub fn refusing_init() -> Self {
        let engine = Self::new(Vec::new());
        engine.refuse_init.set(true);
        engine
    }

    pub fn refuse_reinit(&self) {
        self.refuse_reinit.set(true);
    }

    pub fn push(&self, step: StepResult) {
        self.script.borrow_mut().push_back(step);
    }

    pub fn inits(&self) -> usize {
        self.inits.get()
    }
    pub fn reinits(&self) -> usize {
        self.reinits.get()
    }
    pub fn steps(&self) -> usize {
        self.steps.get()
    }
    /// `(input_window, output_window)` lengths offered at each step.
    pub fn windows(&self) -> Vec<(usize, usize)> {
        self.windows.borrow().clone()
    }
    pub fn last_compress_params(&self) -> Option<CompressParams> {
        self.last_compress_params.get()
    }
    pub fn last_decompress_params(&self) -> Option<DecompressParams> {
        self.last_decompress_params.get()
    }

    fn step(&self, input: &[u8], output: &mut [u8]) -> StepResult {
        self.steps.set(self.steps.get() + 1);
        self.windows.borrow_mut().push((input.len(), output.len()));
        let next = self
            .script
            .borrow_mut()
            .pop_front()
            .expect("scripted engine ran out of steps");
        let writable = next.produced.min(output.len());
        output[..writable].fill(self.fill);
        next
    }

    fn open(&self) -> Option<MockSession> {
        self.inits.set(self.inits.get() + 1);
        if self.refuse_init.get() {
            return None;
        }
        Some(MockSession { generation: 0 })
    }

    fn reopen(&self, session: MockSession) -> Option<MockSession> {
        self.reinits.set(self.reinits.get() + 1);
        if self.refuse_reinit.get() {
            return None;
        }
        Some(MockSession {
            generation: session.generation + 1,
        })
    }
}

impl Engine for ScriptedEngine {
    type CompressSession = MockSession;
    type DecompressSession = MockSession;

    fn version(&self) -> u32 {
        0x1010
    }

    fn compress_init(&self, params: &CompressParams) -> Option<MockSession> {
        self.last_compress_params.set(Some(*params));
        self.open()
    }

    fn compress_reinit(&self, session: MockSession) -> Option<MockSession> {
        self.reopen(session)
    }

    fn compress(
        &self,
        _session: &mut MockSession,
        input: &[u8],
        output: &mut [u8],
        _no_more_input: bool,
    ) -> StepResult {
        self.step(input, output)
    }

    fn decompress_init(&self, params: &DecompressParams) -> Option<MockSession> {
        self.last_decompress_params.set(Some(*params));
        self.open()
    }

    fn decompress_reinit(&self, session: MockSession, params: &DecompressParams) -> Option<MockSession> {
        self.last_decompress_params.set(Some(*params));
        self.reopen(session)
    }

    fn decompress(
        &self,
        _session: &mut MockSession,
        input: &[u8],
        output: &mut [u8],
        _no_more_input: bool,
    ) -> StepResult {
        self.step(input, output)
    }
}
