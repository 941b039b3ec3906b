//! Contains [`RecordBatchT`], a container of [`Array`] where every array has
//! the same length.
use pico_error::{pico_bail, PicoResult};

use crate::array::{Array, ArrayRef};
use crate::datatypes::SchemaRef;

/// A fixed-schema, row-aligned chunk of columnar data: a row count plus one
/// array per top-level schema field.
///
/// The row count is carried explicitly so that batches over zero-column
/// schemas still know their height.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatchT<A: AsRef<dyn Array>> {
    length: usize,
    schema: SchemaRef,
    arrays: Vec<A>,
}

/// A [`RecordBatchT`] of boxed [`Array`]s.
pub type RecordBatch = RecordBatchT<ArrayRef>;

impl<A: AsRef<dyn Array>> RecordBatchT<A> {
    /// Creates a new [`RecordBatchT`].
    /// # Errors
    /// Errors iff the number of arrays differs from the number of schema
    /// fields, or any array's length differs from `length`.
    pub fn try_new(length: usize, schema: SchemaRef, arrays: Vec<A>) -> PicoResult<Self> {
        if schema.fields.len() != arrays.len() {
            pico_bail!(OutOfSpec:
                "RecordBatch requires an array per schema field ({} fields, {} arrays)",
                schema.fields.len(),
                arrays.len()
            );
        }
        if arrays.iter().any(|array| array.as_ref().len() != length) {
            pico_bail!(OutOfSpec: "RecordBatch requires all its arrays to have an equal number of rows");
        }
        Ok(Self {
            length,
            schema,
            arrays,
        })
    }

    /// Creates a new [`RecordBatchT`].
    /// # Panics
    /// Panics iff [`RecordBatchT::try_new`] errors.
    pub fn new(length: usize, schema: SchemaRef, arrays: Vec<A>) -> Self {
        Self::try_new(length, schema, arrays).unwrap()
    }

    /// The number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the batch has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The schema of this batch.
    #[inline]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The columns of this batch, in schema order.
    #[inline]
    pub fn arrays(&self) -> &[A] {
        &self.arrays
    }

    /// The number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.arrays.len()
    }

    /// Consumes this batch into its columns.
    pub fn into_arrays(self) -> Vec<A> {
        self.arrays
    }
}

impl<A: AsRef<dyn Array>> std::ops::Deref for RecordBatchT<A> {
    type Target = [A];

    #[inline]
    fn deref(&self) -> &[A] {
        self.arrays()
    }
}
