use std::collections::VecDeque;
use std::io::{Read, Seek};

use pico_error::{pico_err, PicoResult};

use super::super::read_basic::*;
use super::super::{Compression, IpcBuffer, Node, OutOfSpecKind};
use super::{try_get_array_length, try_get_field_node};
use crate::array::PrimitiveArray;
use crate::buffer::Buffer;
use crate::datatypes::DataType;
use crate::types::NativeType;

#[allow(clippy::too_many_arguments)]
pub fn read_primitive<T: NativeType, R: Read + Seek>(
    field_nodes: &mut VecDeque<Node>,
    data_type: DataType,
    buffers: &mut VecDeque<IpcBuffer>,
    reader: &mut R,
    block_offset: u64,
    is_little_endian: bool,
    compression: Option<Compression>,
    scratch: &mut Vec<u8>,
) -> PicoResult<PrimitiveArray<T>> {
    let field_node = try_get_field_node(field_nodes, &data_type)?;

    let validity = read_validity(
        buffers,
        field_node,
        reader,
        block_offset,
        compression,
        scratch,
    )?;

    let length = try_get_array_length(field_node)?;

    let values = if length == 0 {
        // an empty array may have its values elided by the writer; the slot
        // is still counted and the body is not touched
        let _ = buffers
            .pop_front()
            .ok_or_else(|| pico_err!(oos = OutOfSpecKind::ExpectedBuffer))?;
        Buffer::new()
    } else {
        read_buffer(
            buffers,
            length,
            reader,
            block_offset,
            is_little_endian,
            compression,
            scratch,
        )?
    };

    PrimitiveArray::<T>::try_new(data_type, values, validity)
}
