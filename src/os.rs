//! The single OS facility the engine depends on: an `sbrk`-style "extend the
//! data segment by N bytes, return the old end" call (spec §6's "OS
//! boundary"). Abstracted behind [`Grower`] so the allocation policy engine
//! in `alloc.rs` never calls `libc::sbrk` directly — the heap-growth
//! *mechanism* is swappable, the heap-growth *policy* (when and how much to
//! grow) is not. The same split is named `Grower` in `rusty_malloc`, one of
//! the other boundary-tag allocators in this pack.

use libc::{c_void, intptr_t, sbrk};

use crate::error::AllocError;

/// A single OS-level primitive: move the program break by `delta` bytes
/// (zero to query without growing) and report the address it used to sit
/// at. Negative `delta` is part of the real `sbrk` contract but the engine
/// itself never passes one (spec §1 non-goal: shrinking the heap back to
/// the OS).
pub trait Grower {
  /// Requests a break move of `delta` bytes. Returns the break's address
  /// *before* the move. `Err` means the OS refused the request.
  fn sbrk(&mut self, delta: isize) -> Result<*mut u8, AllocError>;
}

/// The real OS-backed [`Grower`], implemented with `libc::sbrk` exactly as
/// the teacher crate does it.
#[derive(Debug, Default)]
pub struct SbrkGrower {
  _private: (),
}

impl SbrkGrower {
  pub const fn new() -> Self {
    Self { _private: () }
  }
}

impl Grower for SbrkGrower {
  fn sbrk(&mut self, delta: isize) -> Result<*mut u8, AllocError> {
    let old_brk = unsafe { sbrk(delta as intptr_t) };
    if old_brk == usize::MAX as *mut c_void {
      log::warn!("sbrk({delta}) refused by the OS");
      return Err(AllocError::OutOfMemory);
    }
    Ok(old_brk as *mut u8)
  }
}

/// A test double that simulates a growable arena inside a fixed-capacity
/// heap buffer instead of touching the real process break. Used by the
/// integration tests in `tests/allocator.rs` so exercising the engine never
/// perturbs the test process's own heap, and so the "OS refuses growth"
/// scenario (spec §8 scenario 6) is reproducible by picking a small
/// capacity up front.
pub struct VecGrower {
  buf: Box<[u8]>,
  brk: usize,
}

impl VecGrower {
  /// Creates a grower backed by `capacity` bytes of simulated address
  /// space. `sbrk` fails once growth would exceed that capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buf: vec![0u8; capacity].into_boxed_slice(),
      brk: 0,
    }
  }

  fn base(&self) -> *mut u8 {
    self.buf.as_ptr() as *mut u8
  }
}

impl Grower for VecGrower {
  fn sbrk(&mut self, delta: isize) -> Result<*mut u8, AllocError> {
    let old_brk = unsafe { self.base().add(self.brk) };
    if delta == 0 {
      return Ok(old_brk);
    }
    debug_assert!(delta > 0, "VecGrower never shrinks");
    let new_brk = self.brk.checked_add(delta as usize).ok_or(AllocError::OutOfMemory)?;
    if new_brk > self.buf.len() {
      log::warn!("VecGrower exhausted: requested {delta} bytes past capacity {}", self.buf.len());
      return Err(AllocError::OutOfMemory);
    }
    self.brk = new_brk;
    Ok(old_brk)
  }
}
