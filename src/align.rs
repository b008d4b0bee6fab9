/// Rounds an allocation size up to the allocator's 4-byte grain.
///
/// Every payload capacity the heap hands out is a multiple of 4 bytes, and
/// a zero-byte request still reserves one grain.
///
/// # Examples
///
/// ```rust
/// use rheap::align4;
///
/// assert_eq!(align4!(0), 4);
/// assert_eq!(align4!(1), 4);
/// assert_eq!(align4!(4), 4);
/// assert_eq!(align4!(13), 16);
/// ```
#[macro_export]
macro_rules! align4 {
  ($value:expr) => {{
    let value: usize = $value;
    if value == 0 { 4 } else { ((value - 1) & !3) + 4 }
  }};
}

#[cfg(test)]
mod tests {
  #[test]
  fn test_align4() {
    assert_eq!(align4!(0), 4);

    for i in 0..10 {
      let sizes = (4 * i + 1)..=(4 * (i + 1));

      let expected_alignment = 4 * (i + 1);

      for size in sizes {
        assert_eq!(expected_alignment, align4!(size));
      }
    }
  }
}
