// In: src/bridge/registry.rs

//! The handle registry.
//!
//! Engine sessions never leave the registry. Callers receive a `Handle`, a
//! non-zero token that can only be traded back for the session it names. A
//! token that was never issued, was released, or is the null token resolves
//! to `CorruptedHandle` and never reaches the engine.

use std::fmt;

use hashbrown::HashMap;

use crate::error::BridgeError;

/// Opaque session token. `Handle::NULL` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    /// Rebuilds a handle from the integer a host stored.
    pub fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle {:#x}", self.0)
    }
}

/// Where a registered session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to stream.
    Active,
    /// The engine reported a terminal status. Only reinit or release are allowed.
    Finished,
}

struct Slot<S> {
    session: S,
    state: SessionState,
}

pub struct HandleRegistry<S> {
    slots: HashMap<u64, Slot<S>>,
    next_id: u64,
}

impl<S> Default for HandleRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HandleRegistry<S> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_id: 1,
        }
    }

    /// Stores a fresh session and issues its token.
    pub fn register(&mut self, session: S) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(
            id,
            Slot {
                session,
                state: SessionState::Active,
            },
        );
        Handle(id)
    }

    /// Session ready for streaming. Finished sessions are rejected.
    pub fn active_mut(&mut self, handle: Handle) -> Result<&mut S, BridgeError> {
        match self.slots.get_mut(&handle.0) {
            Some(slot) if slot.state == SessionState::Active => Ok(&mut slot.session),
            _ => Err(BridgeError::CorruptedHandle(handle)),
        }
    }

    /// Marks the session finished after the engine reported a terminal status.
    pub fn finish(&mut self, handle: Handle) {
        if let Some(slot) = self.slots.get_mut(&handle.0) {
            slot.state = SessionState::Finished;
        }
    }

    /// Removes a session (active or finished) so it can be handed back to the
    /// engine by value. Pair with `restore` to keep the same token.
    pub fn take(&mut self, handle: Handle) -> Result<S, BridgeError> {
        if handle.is_null() {
            return Err(BridgeError::CorruptedHandle(handle));
        }
        self.slots
            .remove(&handle.0)
            .map(|slot| slot.session)
            .ok_or(BridgeError::CorruptedHandle(handle))
    }

    /// Puts a re-armed session back under a token previously returned by `take`.
    pub fn restore(&mut self, handle: Handle, session: S) -> Handle {
        self.slots.insert(
            handle.0,
            Slot {
                session,
                state: SessionState::Active,
            },
        );
        handle
    }

    pub fn state(&self, handle: Handle) -> Option<SessionState> {
        self.slots.get(&handle.0).map(|slot| slot.state)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
