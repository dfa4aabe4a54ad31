//! Error kinds and the per-"thread" last-error slot the public operations
//! write to on failure, mirroring libc's `errno` contract (spec §6, §7).
//!
//! The crate is explicitly single-threaded (spec §5), so a `thread_local!`
//! is overkill in spirit but matches the shape every caller expects from a
//! malloc replacement, and costs nothing extra since there is only ever one
//! live thread touching the allocator.

use std::cell::Cell;

/// The two error kinds spec §7 defines for this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
  /// The OS refused to grow the arena, a requested size could not be
  /// represented as a block size without overflowing, or
  /// `zeroed_allocate`'s `count * size` multiplication overflowed.
  #[error("out of memory")]
  OutOfMemory,

  /// Reserved for future validation (spec §7): releasing a pointer not
  /// produced by this allocator, a double-free, or a misaligned pointer.
  /// Only raised when the `debug-validate` feature is enabled; see
  /// `alloc::debug_validate`.
  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),
}

thread_local! {
  static LAST_ERROR: Cell<Option<AllocError>> = const { Cell::new(None) };
}

/// Records `err` in the calling thread's last-error slot.
pub(crate) fn set_last_error(err: AllocError) {
  LAST_ERROR.with(|slot| slot.set(Some(err)));
}

/// Returns the error recorded by the most recent failing public operation
/// on this thread, if any.
pub fn last_error() -> Option<AllocError> {
  LAST_ERROR.with(|slot| slot.get())
}

/// Clears the last-error slot. Exposed mainly for tests that assert on
/// `last_error()` across multiple operations.
pub fn clear_last_error() {
  LAST_ERROR.with(|slot| slot.set(None));
}
