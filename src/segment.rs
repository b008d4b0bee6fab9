use std::slice;

use libc::{c_void, intptr_t, sbrk};

/// A contiguous region of memory addressed by byte offset, bounded above by
/// a movable break.
///
/// The heap never touches addresses directly; it indexes into `bytes()`.
/// Offset 0 is the start of the managed region and `brk()` is one past the
/// last usable byte.
pub trait Segment {
  /// Current break offset.
  fn brk(&self) -> usize;

  /// Moves the break up by `len` bytes and returns the old break, which is
  /// the offset of the freshly usable region. Returns `None` when the
  /// underlying memory is exhausted; existing bytes are left untouched.
  fn grow(
    &mut self,
    len: usize,
  ) -> Option<usize>;

  /// Retracts the break to the absolute offset `brk`. Bytes at and above
  /// `brk` are handed back and must not be read again.
  fn shrink_to(
    &mut self,
    brk: usize,
  );

  fn bytes(&self) -> &[u8];

  fn bytes_mut(&mut self) -> &mut [u8];
}

/// The process data segment, grown and retracted with `sbrk(2)`.
///
/// Construction captures the current program break as offset zero. From
/// that point on the segment assumes it is the only mover of the break;
/// anything else in the process calling `brk`/`sbrk` (including an
/// allocator-backed runtime) breaks the contiguity of the region.
pub struct SystemSegment {
  start: *mut u8,
  len: usize,
}

impl SystemSegment {
  pub fn new() -> Self {
    let start = unsafe { sbrk(0) } as *mut u8;

    Self { start, len: 0 }
  }
}

impl Default for SystemSegment {
  fn default() -> Self {
    Self::new()
  }
}

impl Segment for SystemSegment {
  fn brk(&self) -> usize {
    self.len
  }

  fn grow(
    &mut self,
    len: usize,
  ) -> Option<usize> {
    let old = unsafe { sbrk(len as intptr_t) };

    if old == usize::MAX as *mut c_void {
      return None;
    }

    self.len += len;

    Some(self.len - len)
  }

  fn shrink_to(
    &mut self,
    brk: usize,
  ) {
    let decrement = (self.len - brk) as intptr_t;

    unsafe { sbrk(-decrement) };

    self.len = brk;
  }

  fn bytes(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.start, self.len) }
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.start, self.len) }
  }
}

/// A segment over a preallocated in-process buffer.
///
/// `grow` fails once the capacity is spent, which models address-space
/// exhaustion deterministically. Used by the test suite and usable where
/// the OS break is off limits.
pub struct FixedSegment {
  buf: Box<[u8]>,
  len: usize,
}

impl FixedSegment {
  pub fn new(capacity: usize) -> Self {
    Self {
      buf: vec![0; capacity].into_boxed_slice(),
      len: 0,
    }
  }
}

impl Segment for FixedSegment {
  fn brk(&self) -> usize {
    self.len
  }

  fn grow(
    &mut self,
    len: usize,
  ) -> Option<usize> {
    if self.len + len > self.buf.len() {
      return None;
    }

    self.len += len;

    Some(self.len - len)
  }

  fn shrink_to(
    &mut self,
    brk: usize,
  ) {
    self.len = brk;
  }

  fn bytes(&self) -> &[u8] {
    &self.buf[..self.len]
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    &mut self.buf[..self.len]
  }
}
