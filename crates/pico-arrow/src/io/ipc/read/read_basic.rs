use std::collections::VecDeque;
use std::io::{Read, Seek, SeekFrom};
use std::mem::size_of;

use pico_error::{pico_bail, pico_ensure, pico_err, PicoResult};

use super::super::compression;
use super::super::endianness::is_native_little_endian;
use super::{Compression, IpcBuffer, Node, OutOfSpecKind};
use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::types::NativeType;

fn read_swapped<T: NativeType, R: Read + Seek>(
    reader: &mut R,
    length: usize,
    buffer: &mut [T],
    is_little_endian: bool,
) -> PicoResult<()> {
    // slow case where the file's endianness is not the native one
    let mut slice = vec![0u8; length * size_of::<T>()];
    reader.read_exact(&mut slice)?;

    let chunks = slice.chunks_exact(size_of::<T>());
    if !is_little_endian {
        // machine is little endian, file is big endian
        buffer
            .iter_mut()
            .zip(chunks)
            .try_for_each(|(slot, chunk)| {
                let a: T::Bytes = match chunk.try_into() {
                    Ok(a) => a,
                    Err(_) => unreachable!(),
                };
                *slot = T::from_be_bytes(a);
                PicoResult::Ok(())
            })?;
    } else {
        // machine is big endian, file is little endian
        pico_bail!(Unsupported: "reading little endian files on big endian machines")
    }
    Ok(())
}

fn read_uncompressed_buffer<T: NativeType, R: Read + Seek>(
    reader: &mut R,
    buffer_length: usize,
    length: usize,
    is_little_endian: bool,
) -> PicoResult<Vec<T>> {
    let required_number_of_bytes = length.saturating_mul(size_of::<T>());
    if required_number_of_bytes > buffer_length {
        pico_bail!(
            oos = OutOfSpecKind::InvalidBuffer {
                length,
                type_name: std::any::type_name::<T>(),
                required_number_of_bytes,
                buffer_length,
            }
        );
    }

    // it is undefined behavior to call read_exact on an un-initialized buffer
    let mut buffer = vec![T::default(); length];

    if is_native_little_endian() == is_little_endian {
        // fast case where we can just copy the contents
        let slice = bytemuck::cast_slice_mut(&mut buffer);
        reader.read_exact(slice)?;
    } else {
        read_swapped(reader, length, &mut buffer, is_little_endian)?;
    }
    Ok(buffer)
}

fn read_compressed_buffer<T: NativeType, R: Read + Seek>(
    reader: &mut R,
    buffer_length: usize,
    length: usize,
    is_little_endian: bool,
    compression: Compression,
    scratch: &mut Vec<u8>,
) -> PicoResult<Vec<T>> {
    if is_little_endian != is_native_little_endian() {
        pico_bail!(Unsupported: "reading compressed and non-native endian IPC")
    }

    read_compression_frame(reader, buffer_length, scratch)?;

    let required_number_of_bytes = length.saturating_mul(size_of::<T>());
    let decompressed_len_field = i64::from_le_bytes(scratch[..8].try_into().unwrap());

    // it is undefined behavior to call read_exact on an un-initialized buffer
    let mut buffer = vec![T::default(); length];
    let out_slice = bytemuck::cast_slice_mut(&mut buffer);

    if decompressed_len_field == -1 {
        // the sentinel: the body is stored uncompressed; copy it verbatim
        let data = &scratch[8..];
        if data.len() < required_number_of_bytes {
            pico_bail!(
                oos = OutOfSpecKind::InvalidBuffer {
                    length,
                    type_name: std::any::type_name::<T>(),
                    required_number_of_bytes,
                    buffer_length: data.len(),
                }
            );
        }
        out_slice.copy_from_slice(&data[..required_number_of_bytes]);
        return Ok(buffer);
    }

    let decompressed_bytes: usize = decompressed_len_field.try_into().map_err(|_| {
        pico_err!(oos = format!("invalid decompressed length {decompressed_len_field}"))
    })?;
    if decompressed_bytes < required_number_of_bytes {
        pico_bail!(
            oos = OutOfSpecKind::InvalidBuffer {
                length,
                type_name: std::any::type_name::<T>(),
                required_number_of_bytes,
                buffer_length: decompressed_bytes,
            }
        );
    }

    decompress(compression, &scratch[8..], out_slice)?;
    Ok(buffer)
}

/// Reads the `[i64 LE uncompressed_size | frame]` envelope of a compressed
/// buffer into `scratch`.
fn read_compression_frame<R: Read + Seek>(
    reader: &mut R,
    buffer_length: usize,
    scratch: &mut Vec<u8>,
) -> PicoResult<()> {
    scratch.clear();
    scratch.try_reserve(buffer_length)?;
    reader
        .by_ref()
        .take(buffer_length as u64)
        .read_to_end(scratch)?;
    pico_ensure!(scratch.len() == buffer_length, OutOfSpec: "expected a compressed buffer of len {buffer_length}, got {}", scratch.len());
    pico_ensure!(scratch.len() >= 8, OutOfSpec: "a compressed buffer must carry its uncompressed size");
    Ok(())
}

fn decompress(compression: Compression, input: &[u8], out_slice: &mut [u8]) -> PicoResult<()> {
    let codec = compression
        .codec()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferCompression(err)))?;

    match codec {
        arrow_format::ipc::CompressionType::Lz4Frame => {
            compression::decompress_lz4(input, out_slice)
        },
        arrow_format::ipc::CompressionType::Zstd => compression::decompress_zstd(input, out_slice),
    }
}

/// Reads the next buffer as `length` values of type `T`, decompressing if the
/// batch declares a codec. A descriptor of length 0 yields an empty buffer
/// without touching the body.
pub fn read_buffer<T: NativeType, R: Read + Seek>(
    buf: &mut VecDeque<IpcBuffer>,
    length: usize, // in slots
    reader: &mut R,
    block_offset: u64,
    is_little_endian: bool,
    compression: Option<Compression>,
    scratch: &mut Vec<u8>,
) -> PicoResult<Buffer<T>> {
    let buf = buf
        .pop_front()
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::ExpectedBuffer))?;

    let offset: u64 = buf
        .offset()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    let buffer_length: usize = buf
        .length()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    if buffer_length == 0 {
        if length > 0 {
            pico_bail!(
                oos = OutOfSpecKind::InvalidBuffer {
                    length,
                    type_name: std::any::type_name::<T>(),
                    required_number_of_bytes: length.saturating_mul(size_of::<T>()),
                    buffer_length,
                }
            );
        }
        return Ok(Buffer::new());
    }

    reader.seek(SeekFrom::Start(block_offset + offset))?;

    if let Some(compression) = compression {
        Ok(read_compressed_buffer(
            reader,
            buffer_length,
            length,
            is_little_endian,
            compression,
            scratch,
        )?
        .into())
    } else {
        Ok(read_uncompressed_buffer(reader, buffer_length, length, is_little_endian)?.into())
    }
}

fn read_uncompressed_bitmap<R: Read + Seek>(
    length: usize,
    bytes: usize,
    reader: &mut R,
) -> PicoResult<Vec<u8>> {
    if length > bytes.saturating_mul(8) {
        pico_bail!(
            oos = OutOfSpecKind::InvalidBitmap {
                length,
                number_of_bits: bytes * 8,
            }
        )
    }

    let mut buffer = vec![];
    buffer.try_reserve(bytes)?;
    reader.by_ref().take(bytes as u64).read_to_end(&mut buffer)?;
    pico_ensure!(buffer.len() == bytes, OutOfSpec: "expected a bitmap buffer of len {bytes}, got {}", buffer.len());

    Ok(buffer)
}

fn read_compressed_bitmap<R: Read + Seek>(
    length: usize,
    bytes: usize,
    compression: Compression,
    reader: &mut R,
    scratch: &mut Vec<u8>,
) -> PicoResult<Vec<u8>> {
    read_compression_frame(reader, bytes, scratch)?;

    let decompressed_len_field = i64::from_le_bytes(scratch[..8].try_into().unwrap());

    if decompressed_len_field == -1 {
        // stored uncompressed
        let data = &scratch[8..];
        if length > data.len().saturating_mul(8) {
            pico_bail!(
                oos = OutOfSpecKind::InvalidBitmap {
                    length,
                    number_of_bits: data.len() * 8,
                }
            )
        }
        return Ok(data.to_vec());
    }

    let decompressed_bytes: usize = decompressed_len_field.try_into().map_err(|_| {
        pico_err!(oos = format!("invalid decompressed length {decompressed_len_field}"))
    })?;
    if length > decompressed_bytes.saturating_mul(8) {
        pico_bail!(
            oos = OutOfSpecKind::InvalidBitmap {
                length,
                number_of_bits: decompressed_bytes * 8,
            }
        )
    }

    let mut buffer = vec![0u8; decompressed_bytes];
    decompress(compression, &scratch[8..], &mut buffer)?;
    Ok(buffer)
}

/// Reads the next buffer as a [`Bitmap`] of `length` bits.
pub fn read_bitmap<R: Read + Seek>(
    buf: &mut VecDeque<IpcBuffer>,
    length: usize, // in bits
    reader: &mut R,
    block_offset: u64,
    compression: Option<Compression>,
    scratch: &mut Vec<u8>,
) -> PicoResult<Bitmap> {
    let buf = buf
        .pop_front()
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::ExpectedBuffer))?;

    let offset: u64 = buf
        .offset()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    let bytes: usize = buf
        .length()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    if bytes == 0 && length == 0 {
        return Bitmap::try_new(vec![], 0);
    }

    reader.seek(SeekFrom::Start(block_offset + offset))?;

    let buffer = if let Some(compression) = compression {
        read_compressed_bitmap(length, bytes, compression, reader, scratch)
    } else {
        read_uncompressed_bitmap(length, bytes, reader)
    }?;

    Bitmap::try_new(buffer, length)
}

/// Consumes the validity-bitmap slot of a field node.
///
/// This rule is universal: the slot is consumed for every node. When the
/// node declares no nulls the buffer is skipped without reading the body and
/// the validity is absent.
pub fn read_validity<R: Read + Seek>(
    buffers: &mut VecDeque<IpcBuffer>,
    field_node: Node,
    reader: &mut R,
    block_offset: u64,
    compression: Option<Compression>,
    scratch: &mut Vec<u8>,
) -> PicoResult<Option<Bitmap>> {
    let length: usize = field_node
        .length()
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    Ok(if field_node.null_count() > 0 {
        Some(read_bitmap(
            buffers,
            length,
            reader,
            block_offset,
            compression,
            scratch,
        )?)
    } else {
        let _ = buffers
            .pop_front()
            .ok_or_else(|| pico_err!(oos = OutOfSpecKind::ExpectedBuffer))?;
        None
    })
}
