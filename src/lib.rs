//! # rheap - A Free-List Memory Allocator Library
//!
//! This crate implements a **first-fit free-list allocator** over a single
//! growable heap region, the classic design sitting beneath
//! `malloc`/`free`/`realloc`, reworked around byte offsets instead of raw
//! pointers.
//!
//! ## Overview
//!
//! The heap is one contiguous run of blocks that tiles the managed region
//! exactly, each block a fixed header followed by its payload:
//!
//! ```text
//!   Free-List Heap Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                      MANAGED SEGMENT                             │
//!   │                                                                  │
//!   │   ┌────┬──────┬────┬────────┬────┬──────────┐                    │
//!   │   │ H  │ used │ H  │  free  │ H  │   used   │    (not owned)     │
//!   │   └────┴──────┴────┴────────┴────┴──────────┘                    │
//!   │   0                                         ▲                    │
//!   │                                             │                    │
//!   │                                           Break                  │
//!   │                                                                  │
//!   └──────────────────────────────────────────────────────────────────┘
//!
//!   Allocation reuses the first free block that fits (splitting off the
//!   excess); releasing fuses free neighbors and retracts the break when
//!   the tail of the heap becomes free.
//! ```
//!
//! Each header is five little-endian `u32` words:
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │           Payload              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ next: offset    │  │  │                          │  │
//!   │  │ prev: offset    │  │  │     N bytes usable       │  │
//!   │  │ free: 0/1       │  │  │                          │  │
//!   │  │ tag:  offset    │  │  └──────────────────────────┘  │
//!   │  └─────────────────┘  │                                │
//!   │      20 bytes         │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Offset returned to the caller
//! ```
//!
//! The `tag` word holds the block's own payload offset while the block is
//! live. `release` and `resize` check it before trusting a caller-supplied
//! offset, so a foreign or stale offset is rejected instead of corrupting
//! the chain.
//!
//! ## Crate Structure
//!
//! ```text
//!   rheap
//!   ├── align      - Alignment macro (align4!)
//!   ├── block      - Block header record (internal encoding)
//!   ├── segment    - Segment trait, sbrk-backed and fixed-buffer segments
//!   └── heap       - Heap implementation and chain iterator
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rheap::{FixedSegment, Heap};
//!
//! let mut heap = Heap::new(FixedSegment::new(4096));
//!
//! // Allocate 8 bytes and store a value.
//! let ptr = heap.allocate(8).unwrap();
//! heap.payload_mut(ptr).unwrap().copy_from_slice(&42u64.to_le_bytes());
//!
//! // Read it back.
//! let bytes: [u8; 8] = heap.payload(ptr).unwrap().try_into().unwrap();
//! assert_eq!(u64::from_le_bytes(bytes), 42);
//!
//! // Grow it in place or move it, then give it back.
//! let ptr = heap.resize(Some(ptr), 32).unwrap();
//! heap.release(ptr);
//! ```
//!
//! Use [`Heap::system`] for a heap over the real process data segment,
//! grown and retracted with `sbrk(2)`.
//!
//! ## How It Works
//!
//! - **allocate** scans the chain front to back for the first free block
//!   with enough capacity (first-fit). An oversized hit is split in two so
//!   the remainder stays allocatable; on a miss the segment grows by one
//!   header plus the rounded request.
//! - **release** marks the block free, fuses it with free neighbors on
//!   either side, and, when the surviving block ends the chain, retracts
//!   the break to its start. Trailing free space is never retained.
//! - **resize** shrinks in place, grows in place by absorbing a free right
//!   neighbor, or falls back to allocate-copy-release.
//!
//! ## Limitations
//!
//! - **Single-owner**: every operation takes `&mut self`; wrap the heap in
//!   a mutex before sharing it across threads.
//! - **Fixed grain**: payloads are aligned to 4 bytes, nothing more.
//! - **Linear scan**: allocation is O(blocks); there is no free-list index
//!   or size-class segregation.
//! - **`SystemSegment` is Unix-only** and must be the sole user of the
//!   program break for the life of the heap.

pub mod align;
mod block;
mod heap;
mod segment;

pub use block::{Block, HEADER_SIZE};
pub use heap::{Blocks, Heap, MIN_SPLIT, print_heap};
pub use segment::{FixedSegment, Segment, SystemSegment};
