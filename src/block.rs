//! Block-metadata layer (spec §4.2): header/footer boundary-tag layout,
//! flag semantics, alignment arithmetic, and the user-pointer <-> block
//! pointer conversions. Every other component reads and mutates blocks only
//! through these functions — none of them touch the header/footer words
//! directly.
//!
//! A block pointer (`*mut u8` everywhere in this module) always points at
//! the first byte of the block's **header word**, never at the payload.

use crate::align::{ALIGN, WORD};

/// Minimum block size: header + two free-list link words + footer.
pub const MIN_BLOCK: usize = 4 * WORD;

const ALLOC_BIT: usize = 0b01;
const QUICK_BIT: usize = 0b10;
const SIZE_MASK: usize = !0b111;

#[inline]
unsafe fn read_word(p: *mut u8) -> usize {
  unsafe { p.cast::<usize>().read() }
}

#[inline]
unsafe fn write_word(p: *mut u8, v: usize) {
  unsafe { p.cast::<usize>().write(v) }
}

/// Total byte size encoded in `b`'s header (flag bits masked off).
#[inline]
pub unsafe fn size(b: *mut u8) -> usize {
  unsafe { read_word(b) & SIZE_MASK }
}

#[inline]
pub unsafe fn is_alloc(b: *mut u8) -> bool {
  unsafe { read_word(b) & ALLOC_BIT != 0 }
}

#[inline]
pub unsafe fn is_quick(b: *mut u8) -> bool {
  unsafe { read_word(b) & QUICK_BIT != 0 }
}

#[inline]
pub unsafe fn mark_alloc(b: *mut u8) {
  unsafe {
    let w = read_word(b);
    write_word(b, w | ALLOC_BIT);
  }
}

#[inline]
pub unsafe fn mark_free(b: *mut u8) {
  unsafe {
    let w = read_word(b);
    write_word(b, w & !ALLOC_BIT);
  }
}

#[inline]
pub unsafe fn mark_quick(b: *mut u8) {
  unsafe {
    let w = read_word(b);
    write_word(b, w | QUICK_BIT);
  }
}

#[inline]
pub unsafe fn mark_unquick(b: *mut u8) {
  unsafe {
    let w = read_word(b);
    write_word(b, w & !QUICK_BIT);
  }
}

/// Copies `b`'s header word verbatim to its footer word (I1). Forbidden on
/// sentinels, which have no footer.
#[inline]
pub unsafe fn sync_footer(b: *mut u8) {
  unsafe {
    let header = read_word(b);
    write_word(footer_of(b), header);
  }
}

/// Writes `s` into `b`'s header, preserving `b`'s current flag bits, then
/// syncs the footer. Used when resizing a block that already carries
/// meaningful flags (coalescing, the tail-growth fast path). Forbidden on
/// sentinels.
#[inline]
pub unsafe fn set_size_and_sync(b: *mut u8, s: usize) {
  unsafe {
    debug_assert_eq!(s & !SIZE_MASK, 0, "block size must be a multiple of {ALIGN}");
    let flags = read_word(b) & !SIZE_MASK;
    write_word(b, s | flags);
    sync_footer(b);
  }
}

/// Stamps `b` as a fresh free block of size `s` (flags cleared), then syncs
/// the footer. Unlike [`set_size_and_sync`], this does not preserve
/// whatever bits happened to occupy `b` beforehand — used for blocks carved
/// out of raw, previously-uninterpreted bytes (a split remainder), where
/// there is no prior header whose flags are worth preserving.
#[inline]
pub unsafe fn init_free(b: *mut u8, s: usize) {
  unsafe {
    debug_assert_eq!(s & !SIZE_MASK, 0, "block size must be a multiple of {ALIGN}");
    write_word(b, s);
    sync_footer(b);
  }
}

/// Writes the one-word `ALLOC | size=0` sentinel value used for the
/// prologue and epilogue. Sentinels have no footer, so this does not sync
/// one.
#[inline]
pub unsafe fn set_boundary(b: *mut u8) {
  unsafe { write_word(b, ALLOC_BIT) }
}

/// The user-visible payload pointer for block `b`.
#[inline]
pub unsafe fn user_of(b: *mut u8) -> *mut u8 {
  unsafe { b.add(WORD) }
}

/// The block header pointer for a user payload pointer `u`.
#[inline]
pub unsafe fn block_of(u: *mut u8) -> *mut u8 {
  unsafe { u.sub(WORD) }
}

/// The footer word of `b`, derived from `b`'s current size.
#[inline]
pub unsafe fn footer_of(b: *mut u8) -> *mut u8 {
  unsafe { b.add(size(b) - WORD) }
}

/// Walks to the block immediately preceding `b` in raw address order, using
/// the boundary tag in the word just below `b` (the previous block's
/// footer, which by I1 equals its header).
///
/// When `b` is the arena's first real block, the word below it is the
/// prologue sentinel's `size=0` word, so this degenerates to `b.sub(0) ==
/// b` rather than a real predecessor. Callers that use the result to test
/// coalescability must not treat `prev_raw(b) == b` as a neighbor (see
/// `alloc::coalesce`).
#[inline]
pub unsafe fn prev_raw(b: *mut u8) -> *mut u8 {
  unsafe {
    let prev_footer = b.sub(WORD);
    let prev_size = read_word(prev_footer) & SIZE_MASK;
    b.sub(prev_size)
  }
}

/// Walks to the block immediately following `b` in raw address order.
#[inline]
pub unsafe fn next_raw(b: *mut u8) -> *mut u8 {
  unsafe { b.add(size(b)) }
}

/// Free-list index for a block of byte size `s` (spec §4.2).
///
/// Preconditions: `s` is a positive multiple of `ALIGN`. The engine never
/// calls this with `s == 0` — `(0 >> 3) - 1` would otherwise underflow, a
/// case spec §9 notes the reference implementation also never exercises.
///
/// Note: `usize::leading_zeros()` returns the bit width for an all-zero
/// input, which is exactly the convention this formula needs at the `t ==
/// 0` boundary (`s` in `512..1024`) to land in class 63 without a special
/// case.
pub fn class_of(s: usize) -> usize {
  debug_assert!(s > 0 && s % ALIGN == 0);
  if s < 512 {
    (s >> 3) - 1
  } else {
    let t = s >> 10;
    let l = (usize::BITS - t.leading_zeros()) as usize;
    if l < 12 { 63 + l } else { 74 }
  }
}

/// Number of free-list classes (spec §3: `L[0..74]`, the unsorted list plus
/// 74 size classes).
pub const NUM_CLASSES: usize = 75;
