//! Optional `#[global_allocator]` adapter, feature-gated behind `global`
//! (off by default, spec §1: symbol interposition is explicitly out of
//! scope for the engine itself). The pattern — a thin `GlobalAlloc` shim
//! delegating straight into the engine's own `allocate`/`release` — is
//! grounded on `rusty_malloc`'s `unsafe impl<T: Grower> GlobalAlloc for
//! RawMalloc<T>` in the pack.
//!
//! `core::alloc::Layout` carries an alignment this engine does not honor
//! beyond [`crate::align::ALIGN`] (spec §1 non-goal: custom alignment
//! requests); `alloc`/`realloc` silently ignore any stricter request rather
//! than fail, matching the teacher crate's own stance on alignment.

use std::alloc::{GlobalAlloc, Layout};
use std::ptr::NonNull;

use crate::{allocate, release, resize, zeroed_allocate};

/// Wires this crate's process-wide instance up as the program's allocator:
///
/// ```rust,ignore
/// #[global_allocator]
/// static GLOBAL: rallocator::GlobalRallocator = rallocator::GlobalRallocator;
/// ```
pub struct GlobalRallocator;

unsafe impl GlobalAlloc for GlobalRallocator {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    allocate(layout.size()).map_or(std::ptr::null_mut(), NonNull::as_ptr)
  }

  unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
    release(NonNull::new(ptr));
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    zeroed_allocate(1, layout.size()).map_or(std::ptr::null_mut(), NonNull::as_ptr)
  }

  unsafe fn realloc(&self, ptr: *mut u8, _layout: Layout, new_size: usize) -> *mut u8 {
    resize(NonNull::new(ptr), new_size).map_or(std::ptr::null_mut(), NonNull::as_ptr)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alloc_dealloc_round_trip() {
    let allocator = GlobalRallocator;
    let layout = Layout::from_size_align(64, 8).unwrap();
    unsafe {
      let ptr = allocator.alloc(layout);
      assert!(!ptr.is_null());
      ptr.write_bytes(0x42, 64);
      allocator.dealloc(ptr, layout);
    }
  }

  #[test]
  fn alloc_zeroed_is_zero() {
    let allocator = GlobalRallocator;
    let layout = Layout::from_size_align(128, 8).unwrap();
    unsafe {
      let ptr = allocator.alloc_zeroed(layout);
      assert!(!ptr.is_null());
      let bytes = std::slice::from_raw_parts(ptr, 128);
      assert!(bytes.iter().all(|&b| b == 0));
      allocator.dealloc(ptr, layout);
    }
  }
}
