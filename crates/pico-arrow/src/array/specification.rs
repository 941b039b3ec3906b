//! Validation helpers shared by the variable-length arrays.
use pico_error::{pico_bail, PicoResult};

use crate::offset::{Offset, OffsetsBuffer};

/// Checks that `offsets` is bounded by `values_len`, i.e. that the last
/// offset does not point past the values.
pub fn try_check_offsets_bounds<O: Offset>(
    offsets: &OffsetsBuffer<O>,
    values_len: usize,
) -> PicoResult<()> {
    if offsets.last().to_usize() > values_len {
        pico_bail!(OutOfSpec: "offsets must not exceed the values length")
    }
    Ok(())
}

/// Checks that `values[first..last]` is valid UTF-8 and that every offset
/// lands on a character boundary.
pub fn try_check_utf8<O: Offset>(offsets: &OffsetsBuffer<O>, values: &[u8]) -> PicoResult<()> {
    if offsets.len_proxy() == 0 {
        return Ok(());
    }
    let first = offsets.first().to_usize();
    let last = offsets.last().to_usize();
    if last > values.len() {
        pico_bail!(OutOfSpec: "offsets must not exceed the values length")
    }
    simdutf8::basic::from_utf8(&values[first..last])?;

    // a slot may not start in the middle of a code point: a continuation
    // byte is of the form 0b10xxxxxx
    if offsets
        .as_slice()
        .iter()
        .any(|offset| values.get(offset.to_usize()).is_some_and(|&b| (b as i8) < -0x40))
    {
        pico_bail!(OutOfSpec: "offsets of a utf8 array must lie on character boundaries")
    }
    Ok(())
}
