use crate::align4;
use crate::block::{Block, HEADER_SIZE};
use crate::segment::{Segment, SystemSegment};

/// Smallest payload worth carving into its own block. When splitting would
/// leave a remainder unable to hold a header plus this many bytes, the
/// whole block is handed over instead (internal fragmentation).
pub const MIN_SPLIT: usize = 4;

/// Prints the block chain and the current break, one line per block.
pub fn print_heap<S: Segment>(heap: &Heap<S>) {
  println!("heap: break = {}", heap.brk());

  for (at, block) in heap.blocks() {
    println!(
      "  block @ {:>6}: size = {:>6}, free = {}",
      at, block.size, block.free
    );
  }
}

/// A first-fit free-list allocator over a [`Segment`].
///
/// Blocks form a doubly linked, address-ordered chain that tiles the
/// segment exactly: each block starts where the previous one's payload
/// ends. Allocation reuses the first free block large enough, splitting off
/// the excess; releasing fuses the block with free neighbors and hands
/// trailing free space back to the segment immediately.
///
/// Payloads are identified by their byte offset into the segment. The heap
/// is single-owner by construction: every mutating operation takes
/// `&mut self`.
pub struct Heap<S: Segment> {
  segment: S,
  base: Option<usize>,
}

impl Heap<SystemSegment> {
  /// A heap over the process data segment.
  pub fn system() -> Self {
    Self::new(SystemSegment::new())
  }
}

impl<S: Segment> Heap<S> {
  pub fn new(segment: S) -> Self {
    Self {
      segment,
      base: None,
    }
  }

  /// Current break of the underlying segment.
  pub fn brk(&self) -> usize {
    self.segment.brk()
  }

  /// Iterates over `(offset, header)` pairs in address order.
  pub fn blocks(&self) -> Blocks<'_, S> {
    Blocks {
      heap: self,
      at: self.base,
    }
  }

  /// Reserves `size` bytes (rounded up to the 4-byte grain) and returns the
  /// payload offset, or `None` when the segment cannot grow any further.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Option<usize> {
    let size = align4!(size);

    let at = match self.base {
      None => {
        let at = self.extend(None, size)?;
        self.base = Some(at);
        at
      }
      Some(base) => {
        let (fit, last) = self.find_fit(base, size);

        match fit {
          Some(at) => {
            let mut block = self.read(at);

            if block.size - size >= HEADER_SIZE + MIN_SPLIT {
              self.split(at, size);
              block = self.read(at);
            }

            block.free = false;
            block.tag = Some(at + HEADER_SIZE);
            self.write(at, block);

            at
          }
          None => self.extend(Some(last), size)?,
        }
      }
    };

    Some(at + HEADER_SIZE)
  }

  /// Returns the block at `ptr` to the heap. Invalid offsets are ignored.
  ///
  /// The freed block absorbs free neighbors on both sides; if the surviving
  /// block ends the chain, the break is retracted to its start, so trailing
  /// free space is never retained.
  pub fn release(
    &mut self,
    ptr: usize,
  ) {
    if !self.validate(ptr) {
      return;
    }

    let mut at = ptr - HEADER_SIZE;
    let mut block = self.read(at);

    block.free = true;
    block.tag = None;
    self.write(at, block);

    if let Some(prev) = block.prev {
      if self.read(prev).free {
        self.fuse(prev);
        at = prev;
      }
    }

    self.reclaim(at);
  }

  /// Changes the capacity of the block at `ptr` to `size` (rounded up to
  /// the grain), preferring in-place adjustment over relocation.
  ///
  /// `ptr == None` degenerates to [`Heap::allocate`]. An invalid offset is
  /// reported as `None`. On relocation the first `min(old, new)` payload
  /// bytes are preserved and the old block is released; if the relocating
  /// allocation fails, the original block is left untouched.
  pub fn resize(
    &mut self,
    ptr: Option<usize>,
    size: usize,
  ) -> Option<usize> {
    let Some(ptr) = ptr else {
      return self.allocate(size);
    };

    if !self.validate(ptr) {
      return None;
    }

    let size = align4!(size);
    let at = ptr - HEADER_SIZE;
    let block = self.read(at);

    // Shrink, or grow within the existing capacity.
    if block.size >= size {
      if block.size - size >= HEADER_SIZE + MIN_SPLIT {
        self.split(at, size);
        self.reclaim(at + HEADER_SIZE + size);
      }

      return Some(ptr);
    }

    // Grow in place by absorbing a free right neighbor.
    if let Some(next) = block.next {
      let neighbor = self.read(next);

      if neighbor.free && block.size + HEADER_SIZE + neighbor.size >= size {
        self.fuse(at);

        if self.read(at).size - size >= HEADER_SIZE + MIN_SPLIT {
          self.split(at, size);
          self.reclaim(at + HEADER_SIZE + size);
        }

        return Some(ptr);
      }
    }

    // Relocate. A failed allocation must leave the old block as it was.
    let moved = self.allocate(size)?;
    let copy = block.size.min(size);

    self.segment.bytes_mut().copy_within(ptr..ptr + copy, moved);
    self.release(ptr);

    Some(moved)
  }

  /// Whether `ptr` designates a live payload: the heap has been grown, the
  /// offset lies inside the managed region, and the header in front of it
  /// carries a tag equal to `ptr` itself.
  ///
  /// This is a heuristic against foreign offsets, not a guarantee: a stale
  /// offset whose bytes happen to still decode to a matching tag would
  /// pass.
  pub fn validate(
    &self,
    ptr: usize,
  ) -> bool {
    let Some(base) = self.base else {
      return false;
    };

    if ptr < base + HEADER_SIZE || ptr >= self.segment.brk() {
      return false;
    }

    self.read(ptr - HEADER_SIZE).tag == Some(ptr)
  }

  /// The payload bytes of a live block, `None` if `ptr` fails validation.
  pub fn payload(
    &self,
    ptr: usize,
  ) -> Option<&[u8]> {
    if !self.validate(ptr) {
      return None;
    }

    let size = self.read(ptr - HEADER_SIZE).size;

    Some(&self.segment.bytes()[ptr..ptr + size])
  }

  pub fn payload_mut(
    &mut self,
    ptr: usize,
  ) -> Option<&mut [u8]> {
    if !self.validate(ptr) {
      return None;
    }

    let size = self.read(ptr - HEADER_SIZE).size;

    Some(&mut self.segment.bytes_mut()[ptr..ptr + size])
  }

  fn read(
    &self,
    at: usize,
  ) -> Block {
    Block::read(self.segment.bytes(), at)
  }

  fn write(
    &mut self,
    at: usize,
    block: Block,
  ) {
    block.write(self.segment.bytes_mut(), at);
  }

  /// First-fit scan from `base`. Returns the first free block of at least
  /// `size` bytes, along with the last block visited so a miss can extend
  /// the chain from the tail.
  fn find_fit(
    &self,
    base: usize,
    size: usize,
  ) -> (Option<usize>, usize) {
    let mut at = base;

    loop {
      let block = self.read(at);

      if block.free && block.size >= size {
        return (Some(at), at);
      }

      match block.next {
        Some(next) => at = next,
        None => return (None, at),
      }
    }
  }

  /// Grows the segment by one header plus `size` bytes and formats the new
  /// region as an occupied block linked after `last`, the chain tail.
  fn extend(
    &mut self,
    last: Option<usize>,
    size: usize,
  ) -> Option<usize> {
    let at = self.segment.grow(HEADER_SIZE + size)?;

    let block = Block {
      size,
      next: None,
      prev: last,
      free: false,
      tag: Some(at + HEADER_SIZE),
    };
    self.write(at, block);

    if let Some(last) = last {
      let mut tail = self.read(last);
      tail.next = Some(at);
      self.write(last, tail);
    }

    Some(at)
  }

  /// Carves a free remainder off the block at `at`, truncating it to
  /// exactly `size` payload bytes. Callers must ensure the remainder can
  /// hold a header plus [`MIN_SPLIT`] bytes. Payload bytes never move.
  fn split(
    &mut self,
    at: usize,
    size: usize,
  ) {
    let mut block = self.read(at);
    let rest = at + HEADER_SIZE + size;

    let carved = Block {
      size: block.size - size - HEADER_SIZE,
      next: block.next,
      prev: Some(at),
      free: true,
      tag: None,
    };
    self.write(rest, carved);

    if let Some(next) = carved.next {
      let mut neighbor = self.read(next);
      neighbor.prev = Some(rest);
      self.write(next, neighbor);
    }

    block.size = size;
    block.next = Some(rest);
    self.write(at, block);
  }

  /// Absorbs the successor of the block at `at`, discarding its header.
  /// Callers must ensure the successor exists and is free.
  fn fuse(
    &mut self,
    at: usize,
  ) {
    let mut block = self.read(at);

    let Some(next) = block.next else {
      return;
    };
    let absorbed = self.read(next);

    block.size += HEADER_SIZE + absorbed.size;
    block.next = absorbed.next;
    self.write(at, block);

    if let Some(after) = absorbed.next {
      let mut neighbor = self.read(after);
      neighbor.prev = Some(at);
      self.write(after, neighbor);
    }
  }

  /// Tail handling for a freshly freed block at `at`: fuse a free successor
  /// into it, then, if the block now ends the chain, unlink it and retract
  /// the break to its start. The retraction boundary is always the
  /// surviving block's own offset; after any cascade of fusions that is the
  /// lowest offset of the trailing free run.
  fn reclaim(
    &mut self,
    at: usize,
  ) {
    let mut block = self.read(at);

    if let Some(next) = block.next {
      if self.read(next).free {
        self.fuse(at);
        block = self.read(at);
      }
    }

    if block.next.is_none() {
      match block.prev {
        Some(prev) => {
          let mut tail = self.read(prev);
          tail.next = None;
          self.write(prev, tail);
        }
        None => self.base = None,
      }

      self.segment.shrink_to(at);
    }
  }
}

/// Address-ordered iterator over a heap's block chain.
pub struct Blocks<'a, S: Segment> {
  heap: &'a Heap<S>,
  at: Option<usize>,
}

impl<S: Segment> Iterator for Blocks<'_, S> {
  type Item = (usize, Block);

  fn next(&mut self) -> Option<Self::Item> {
    let at = self.at?;
    let block = self.heap.read(at);

    self.at = block.next;

    Some((at, block))
  }
}
