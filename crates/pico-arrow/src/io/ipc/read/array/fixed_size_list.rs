use std::collections::VecDeque;
use std::io::{Read, Seek};

use pico_error::{pico_bail, PicoResult};

use super::super::deserialize::read;
use super::super::read_basic::*;
use super::super::{Compression, Dictionaries, IpcBuffer, Node, MAX_NESTING_DEPTH};
use super::try_get_field_node;
use crate::array::FixedSizeListArray;
use crate::datatypes::DataType;
use crate::io::ipc::IpcField;

#[allow(clippy::too_many_arguments)]
pub fn read_fixed_size_list<R: Read + Seek>(
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
) -> PicoResult<FixedSizeListArray> {
    let field_node = try_get_field_node(field_nodes, &data_type)?;

    let validity = read_validity(
        buffers,
        field_node,
        reader,
        block_offset,
        compression,
        scratch,
    )?;

    let (field, _) = FixedSizeListArray::try_child_and_size(&data_type)?;

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

    FixedSizeListArray::try_new(data_type, values, validity)
}
