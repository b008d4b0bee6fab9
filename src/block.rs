/// Bytes of metadata stored in front of every payload: five little-endian
/// `u32` words (`size`, `next`, `prev`, `free`, `tag`).
pub const HEADER_SIZE: usize = 20;

/// Encoded form of an absent link.
const NIL: u32 = u32::MAX;

/// Decoded view of one block header.
///
/// Blocks are identified by their byte offset into the managed segment;
/// `next` and `prev` hold such offsets. `tag` is the block's own payload
/// offset while the block is occupied and `None` while it is free, which is
/// what pointer validation checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub size: usize,
  pub next: Option<usize>,
  pub prev: Option<usize>,
  pub free: bool,
  pub tag: Option<usize>,
}

impl Block {
  pub fn read(
    bytes: &[u8],
    at: usize,
  ) -> Self {
    Self {
      size: word(bytes, at) as usize,
      next: link(word(bytes, at + 4)),
      prev: link(word(bytes, at + 8)),
      free: word(bytes, at + 12) != 0,
      tag: link(word(bytes, at + 16)),
    }
  }

  pub fn write(
    &self,
    bytes: &mut [u8],
    at: usize,
  ) {
    put(bytes, at, self.size as u32);
    put(bytes, at + 4, unlink(self.next));
    put(bytes, at + 8, unlink(self.prev));
    put(bytes, at + 12, self.free as u32);
    put(bytes, at + 16, unlink(self.tag));
  }
}

fn word(
  bytes: &[u8],
  at: usize,
) -> u32 {
  u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn put(
  bytes: &mut [u8],
  at: usize,
  value: u32,
) {
  bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn link(word: u32) -> Option<usize> {
  if word == NIL { None } else { Some(word as usize) }
}

fn unlink(link: Option<usize>) -> u32 {
  match link {
    Some(at) => at as u32,
    None => NIL,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_write() {
    let mut bytes = [0u8; 64];

    let block = Block {
      size: 24,
      next: Some(44),
      prev: None,
      free: false,
      tag: Some(28),
    };

    block.write(&mut bytes, 8);

    assert_eq!(block, Block::read(&bytes, 8));
  }

  #[test]
  fn test_layout() {
    let mut bytes = [0u8; HEADER_SIZE];

    let block = Block {
      size: 0x0102,
      next: None,
      prev: Some(3),
      free: true,
      tag: None,
    };

    block.write(&mut bytes, 0);

    assert_eq!(&bytes[0..4], &[0x02, 0x01, 0, 0]);
    assert_eq!(&bytes[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&bytes[8..12], &[3, 0, 0, 0]);
    assert_eq!(&bytes[12..16], &[1, 0, 0, 0]);
    assert_eq!(&bytes[16..20], &[0xFF, 0xFF, 0xFF, 0xFF]);
  }
}
