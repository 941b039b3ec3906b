use std::collections::VecDeque;

use pico_error::PicoResult;

use super::super::Node;
use super::{try_get_array_length, try_get_field_node};
use crate::array::NullArray;
use crate::datatypes::DataType;

pub fn read_null(field_nodes: &mut VecDeque<Node>, data_type: DataType) -> PicoResult<NullArray> {
    let field_node = try_get_field_node(field_nodes, &data_type)?;
    let length = try_get_array_length(field_node)?;

    NullArray::try_new(data_type, length)
}
