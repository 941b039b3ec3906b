use std::collections::VecDeque;
use std::io::{Read, Seek};

use pico_error::{pico_bail, PicoResult};

use super::super::deserialize::read;
use super::super::read_basic::*;
use super::super::{Compression, Dictionaries, IpcBuffer, Node, MAX_NESTING_DEPTH};
use super::{try_get_array_length, try_get_field_node};
use crate::array::ListArray;
use crate::buffer::Buffer;
use crate::datatypes::DataType;
use crate::io::ipc::IpcField;
use crate::offset::{Offset, OffsetsBuffer};

#[allow(clippy::too_many_arguments)]
pub fn read_list<O: Offset, R: Read + Seek>(
    field_nodes: &mut VecDeque<Node>,
    data_type: DataType,
    ipc_field: &IpcField,
    buffers: &mut VecDeque<IpcBuffer>,
    reader: &mut R,
    dictionaries: &Dictionaries,
    block_offset: u64,
    is_little_endian: bool,
    compression: Option<Compression>,
    remaining_depth: usize,
    scratch: &mut Vec<u8>,
) -> PicoResult<ListArray<O>> {
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

    let offsets: Buffer<O> = read_buffer(
        buffers,
        1 + length,
        reader,
        block_offset,
        is_little_endian,
        compression,
        scratch,
    )?;
    let offsets: OffsetsBuffer<O> = offsets.try_into()?;

    let field = ListArray::<O>::try_get_child(&data_type)?;

    if remaining_depth == 0 {
        pico_bail!(NestingTooDeep: "schemas are bounded to a nesting depth of {MAX_NESTING_DEPTH}")
    }
    let values = read(
        field_nodes,
        field,
        &ipc_field.fields[0],
        buffers,
        reader,
        dictionaries,
        block_offset,
        is_little_endian,
        compression,
        remaining_depth - 1,
        scratch,
    )?;

    ListArray::try_new(data_type, offsets, values, validity)
}
