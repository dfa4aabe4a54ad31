//! Free-list set (spec §4.3): 75 doubly-linked LIFO lists of free blocks,
//! index 0 distinguished as the unsorted list.
//!
//! A free block's payload region doubles as its link storage: the first
//! payload word is the forward link, the second is the backward link
//! (spec §3). Both are block-header pointers, or null.

use crate::block::{self, NUM_CLASSES};

/// The 75 list heads, externally allocated (spec §3) — in this port, a
/// plain array owned by the `Allocator`, not memory carved from the
/// `sbrk`-backed arena (see DESIGN.md).
pub struct FreeLists {
  heads: [*mut u8; NUM_CLASSES],
}

impl FreeLists {
  pub const fn new() -> Self {
    Self { heads: [std::ptr::null_mut(); NUM_CLASSES] }
  }

  #[inline]
  unsafe fn next_link(b: *mut u8) -> *mut u8 {
    unsafe { block::user_of(b).cast::<*mut u8>().read() }
  }

  #[inline]
  unsafe fn prev_link(b: *mut u8) -> *mut u8 {
    unsafe { block::user_of(b).cast::<*mut u8>().add(1).read() }
  }

  #[inline]
  unsafe fn set_next_link(b: *mut u8, v: *mut u8) {
    unsafe { block::user_of(b).cast::<*mut u8>().write(v) }
  }

  #[inline]
  unsafe fn set_prev_link(b: *mut u8, v: *mut u8) {
    unsafe { block::user_of(b).cast::<*mut u8>().add(1).write(v) }
  }

  /// Inserts free block `b` at the head of the unsorted list (`unsorted =
  /// true`) or its size class's list, clearing `ALLOC`/`QUICK` and syncing
  /// the footer first (spec §4.3).
  pub fn insert(&mut self, b: *mut u8, unsorted: bool) {
    unsafe {
      block::mark_free(b);
      block::mark_unquick(b);
      block::sync_footer(b);

      let idx = if unsorted { 0 } else { block::class_of(block::size(b)) };
      let old_head = self.heads[idx];

      Self::set_prev_link(b, std::ptr::null_mut());
      Self::set_next_link(b, old_head);
      if !old_head.is_null() {
        Self::set_prev_link(old_head, b);
      }
      self.heads[idx] = b;
    }
  }

  /// Unlinks `b` from whichever list it currently sits on, then marks it
  /// allocated and syncs the footer (spec §4.3). `b` must actually be free
  /// and on a list — a block coalesce has already detached is not a valid
  /// argument (see `alloc::coalesce`, which tracks this itself).
  pub fn remove(&mut self, b: *mut u8) {
    unsafe {
      let class = block::class_of(block::size(b));
      let next = Self::next_link(b);
      let prev = Self::prev_link(b);

      if prev.is_null() {
        // `b` is a head of one of at most two lists: the unsorted list or
        // its own size class. Check and update whichever one matches.
        if self.heads[0] == b {
          self.heads[0] = next;
        } else if self.heads[class] == b {
          self.heads[class] = next;
        }
      } else {
        Self::set_next_link(prev, next);
      }

      if !next.is_null() {
        Self::set_prev_link(next, prev);
      }

      block::mark_alloc(b);
      block::mark_unquick(b);
      block::sync_footer(b);
    }
  }

  /// The head of list `idx`, or null.
  pub fn head(&self, idx: usize) -> *mut u8 {
    self.heads[idx]
  }

  /// The head of the unsorted list (`L[0]`), or null.
  pub fn unsorted_head(&self) -> *mut u8 {
    self.heads[0]
  }
}

impl Default for FreeLists {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_free(mem: &mut [u8], size: usize) -> *mut u8 {
    let b = mem.as_mut_ptr();
    unsafe { block::init_free(b, size) };
    b
  }

  #[test]
  fn insert_and_remove_single_block_unsorted() {
    let mut mem = [0u8; 64];
    let mut fl = FreeLists::new();
    let b = make_free(&mut mem, 64);

    fl.insert(b, true);
    assert_eq!(fl.unsorted_head(), b);
    unsafe {
      assert!(!block::is_alloc(b));
    }

    fl.remove(b);
    assert!(fl.unsorted_head().is_null());
    unsafe {
      assert!(block::is_alloc(b));
    }
  }

  #[test]
  fn insert_is_lifo() {
    let mut mem_a = [0u8; 64];
    let mut mem_b = [0u8; 64];
    let mut fl = FreeLists::new();
    let a = make_free(&mut mem_a, 64);
    let b = make_free(&mut mem_b, 64);

    fl.insert(a, true);
    fl.insert(b, true);
    assert_eq!(fl.unsorted_head(), b);
    unsafe {
      assert_eq!(FreeLists::next_link(b), a);
      assert_eq!(FreeLists::prev_link(a), b);
    }
  }

  #[test]
  fn remove_middle_block_relinks_neighbors() {
    let mut mem_a = [0u8; 64];
    let mut mem_b = [0u8; 64];
    let mut mem_c = [0u8; 64];
    let mut fl = FreeLists::new();
    let a = make_free(&mut mem_a, 64);
    let b = make_free(&mut mem_b, 64);
    let c = make_free(&mut mem_c, 64);

    // list (head to tail): c -> b -> a
    fl.insert(a, true);
    fl.insert(b, true);
    fl.insert(c, true);

    fl.remove(b);
    unsafe {
      assert_eq!(FreeLists::next_link(c), a);
      assert_eq!(FreeLists::prev_link(a), c);
    }
  }
}
