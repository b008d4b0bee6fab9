use rheap::{Heap, print_heap};

/// Walks the canonical allocator round trip on the real program break:
/// allocate one value, print it, show reuse, release everything.
fn main() {
  let mut heap = Heap::system();

  println!("[start] break = {}", heap.brk());

  // ----------------------------------------------------------------------
  // 1) Allocate space for a double and store 42.3 in it.
  // ----------------------------------------------------------------------
  let x = heap.allocate(8).expect("out of memory");
  heap
    .payload_mut(x)
    .expect("freshly allocated offset is valid")
    .copy_from_slice(&42.3f64.to_le_bytes());

  let bytes: [u8; 8] = heap.payload(x).unwrap().try_into().unwrap();
  println!("\n[1] x = {}", f64::from_le_bytes(bytes));
  print_heap(&heap);

  // ----------------------------------------------------------------------
  // 2) A second allocation lands right after the first one.
  // ----------------------------------------------------------------------
  let y = heap.allocate(8).expect("out of memory");
  println!("\n[2] x @ {}, y @ {}", x, y);
  print_heap(&heap);

  // ----------------------------------------------------------------------
  // 3) Release x, allocate again: first-fit hands the same offset back.
  // ----------------------------------------------------------------------
  heap.release(x);
  let z = heap.allocate(8).expect("out of memory");
  println!(
    "\n[3] z @ {} ({})",
    z,
    if z == x { "reused x's block" } else { "fresh block" }
  );
  print_heap(&heap);

  // ----------------------------------------------------------------------
  // 4) Release everything; the break retracts to where it started.
  // ----------------------------------------------------------------------
  heap.release(y);
  heap.release(z);
  println!("\n[4] released all, break = {}", heap.brk());
}
