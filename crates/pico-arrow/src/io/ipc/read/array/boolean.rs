use std::collections::VecDeque;
use std::io::{Read, Seek};

use pico_error::PicoResult;

use super::super::read_basic::*;
use super::super::{Compression, IpcBuffer, Node};
use super::{try_get_array_length, try_get_field_node};
use crate::array::BooleanArray;
use crate::datatypes::DataType;

#[allow(clippy::too_many_arguments)]
pub fn read_boolean<R: Read + Seek>(
    field_nodes: &mut VecDeque<Node>,
    data_type: DataType,
    buffers: &mut VecDeque<IpcBuffer>,
    reader: &mut R,
    block_offset: u64,
    compression: Option<Compression>,
    scratch: &mut Vec<u8>,
) -> PicoResult<BooleanArray> {
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

    let values = read_bitmap(buffers, length, reader, block_offset, compression, scratch)?;

    BooleanArray::try_new(data_type, values, validity)
}
