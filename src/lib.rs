//! # rallocator - A Segregated Free-List Heap Allocator
//!
//! This crate replaces `malloc`/`free`/`calloc`/`realloc` for a single
//! process with a boundary-tag, segregated free-list allocator grown over
//! `sbrk`: a single contiguous arena, 75 free lists (one unsorted, 62
//! exact-size, 12 power-of-two), and a two-stage `find_block` search that
//! drains the unsorted list before falling back to segregated fit.
//!
//! ## Crate structure
//!
//! ```text
//!   rallocator
//!   ├── align     - WORD/ALIGN constants, align_to!/align! macros
//!   ├── block     - boundary-tag header/footer layout (internal)
//!   ├── freelist  - the 75 free lists (internal)
//!   ├── arena     - prologue/epilogue + heap growth (internal)
//!   ├── alloc     - the allocation policy engine (internal)
//!   ├── os        - the Grower trait + SbrkGrower/VecGrower
//!   ├── error     - AllocError + the last-error slot
//!   └── global    - optional #[global_allocator] adapter (feature "global")
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use rallocator::{allocate, release};
//!
//! unsafe {
//!     let ptr = allocate(64).expect("out of memory");
//!     ptr.as_ptr().write_bytes(0, 64);
//!     release(Some(ptr));
//! }
//! ```
//!
//! ## How it works
//!
//! Each live block carries a boundary tag in its first and last word (the
//! header and footer), so any block can walk to its physical neighbors
//! without consulting a free list:
//!
//! ```text
//!   Single block:
//!   ┌─────────┬──────────────────────────────┬─────────┐
//!   │ header  │      user payload            │ footer  │
//!   │ size|fl │                               │ size|fl │
//!   └─────────┴──────────────────────────────┴─────────┘
//!             ▲
//!             └── pointer returned to the caller
//! ```
//!
//! A free block's payload doubles as two free-list link words. `release`
//! always attempts to coalesce with both physical neighbors before handing
//! the result to the unsorted list, so adjacent frees never fragment the
//! arena.
//!
//! ## Safety
//!
//! Every public operation here is the unsafe-memory-management equivalent
//! of its C namesake: callers must not use a pointer after releasing it,
//! must not release a pointer twice, and must not release a pointer this
//! allocator did not produce. The crate is single-threaded and not
//! reentrant — calling any of these functions from a signal handler or a
//! second thread is undefined behavior.

use std::cell::UnsafeCell;
use std::ptr::NonNull;

pub mod align;
mod alloc;
mod arena;
mod block;
pub mod error;
mod freelist;
pub mod os;

#[cfg(feature = "global")]
pub mod global;

pub use alloc::Allocator;
pub use error::{AllocError, clear_last_error, last_error};
pub use os::{Grower, SbrkGrower};

/// Process-wide allocator instance, lazily constructed on first use
/// (spec §5: every public entry point triggers `Arena::initialize`
/// idempotently). `UnsafeCell` rather than a `Mutex` because the crate is
/// explicitly single-threaded; `Sync` is asserted manually on that basis,
/// not enforced by the type system.
struct GlobalCell(UnsafeCell<Option<Allocator<SbrkGrower>>>);

unsafe impl Sync for GlobalCell {}

static GLOBAL: GlobalCell = GlobalCell(UnsafeCell::new(None));

fn with_global<R>(f: impl FnOnce(&mut Allocator<SbrkGrower>) -> R) -> R {
  let slot = unsafe { &mut *GLOBAL.0.get() };
  let allocator = slot.get_or_insert_with(|| Allocator::with_grower(SbrkGrower::new()));
  f(allocator)
}

/// Allocates at least `size` bytes, aligned to [`align::ALIGN`]. Returns
/// `None` and records an [`AllocError`] (see [`last_error`]) if `size` is
/// zero or the request cannot be satisfied.
pub fn allocate(size: usize) -> Option<NonNull<u8>> {
  with_global(|a| a.allocate(size))
}

/// Releases a block previously returned by [`allocate`], [`zeroed_allocate`],
/// or [`resize`]. A `None` pointer is a no-op.
pub fn release(ptr: Option<NonNull<u8>>) {
  with_global(|a| a.release(ptr))
}

/// Allocates `count * size` bytes and zeroes them, failing cleanly on
/// overflow instead of wrapping.
pub fn zeroed_allocate(count: usize, size: usize) -> Option<NonNull<u8>> {
  with_global(|a| a.zeroed_allocate(count, size))
}

/// Resizes the block at `ptr` to `new_size` bytes, preserving the
/// overlapping prefix of its contents. `ptr = None` behaves like
/// [`allocate`]; `new_size = 0` behaves like [`release`] and returns `None`.
pub fn resize(ptr: Option<NonNull<u8>>, new_size: usize) -> Option<NonNull<u8>> {
  with_global(|a| a.resize(ptr, new_size))
}
