mod binary;
mod boolean;
mod fixed_size_binary;
mod fixed_size_list;
mod list;
mod map;
mod null;
mod primitive;
mod struct_;
mod utf8;

use std::collections::VecDeque;

use pico_error::{pico_err, PicoResult};

pub use binary::read_binary;
pub use boolean::read_boolean;
pub use fixed_size_binary::read_fixed_size_binary;
pub use fixed_size_list::read_fixed_size_list;
pub use list::read_list;
pub use map::read_map;
pub use null::read_null;
pub use primitive::read_primitive;
pub use struct_::read_struct;
pub use utf8::read_utf8;

use super::{Node, OutOfSpecKind};
use crate::datatypes::DataType;

pub(super) fn try_get_field_node<'a>(
    field_nodes: &mut VecDeque<Node<'a>>,
    data_type: &DataType,
) -> PicoResult<Node<'a>> {
    field_nodes.pop_front().ok_or_else(|| {
        pico_err!(oos = format!("unable to fetch the field node for {data_type:?}; the file is corrupted"))
    })
}

pub(super) fn try_get_array_length(field_node: Node) -> PicoResult<usize> {
    field_node
        .length()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))
}
