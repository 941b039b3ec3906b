use std::collections::VecDeque;
use std::io::{Read, Seek};

use pico_error::{pico_bail, PicoResult};

use super::super::deserialize::read;
use super::super::read_basic::*;
use super::super::{Compression, Dictionaries, IpcBuffer, Node, MAX_NESTING_DEPTH};
use super::{try_get_array_length, try_get_field_node};
use crate::array::StructArray;
use crate::datatypes::DataType;
use crate::io::ipc::IpcField;

#[allow(clippy::too_many_arguments)]
pub fn read_struct<R: Read + Seek>(
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
) -> PicoResult<StructArray> {
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

    let fields = StructArray::try_get_fields(&data_type)?;

    if remaining_depth == 0 {
        pico_bail!(NestingTooDeep: "schemas are bounded to a nesting depth of {MAX_NESTING_DEPTH}")
    }
    let values = fields
        .iter()
        .zip(ipc_field.fields.iter())
        .map(|(field, ipc_field)| {
            read(
                field_nodes,
                field,
                ipc_field,
                buffers,
                reader,
                dictionaries,
                block_offset,
                is_little_endian,
                compression,
                remaining_depth - 1,
                scratch,
            )
        })
        .collect::<PicoResult<Vec<_>>>()?;

    StructArray::try_new(data_type, length, values, validity)
}
