//! Per-buffer block decompression.
//!
//! A compressed buffer body is `[i64 LE uncompressed_size | frame]`; these
//! functions decode the frame part, streaming it into an output slice that
//! the caller has sized to exactly `uncompressed_size`.
#[cfg(feature = "io_ipc_compression")]
use pico_error::pico_err;
use pico_error::PicoResult;

#[cfg(feature = "io_ipc_compression")]
pub fn decompress_lz4(input_buf: &[u8], output_buf: &mut [u8]) -> PicoResult<()> {
    use std::io::Read;
    let mut decoder = lz4::Decoder::new(input_buf)?;
    decoder
        .read_exact(output_buf)
        .map_err(|e| pico_err!(OutOfSpec: "decompressing an lz4 buffer: {e}"))
}

#[cfg(feature = "io_ipc_compression")]
pub fn decompress_zstd(input_buf: &[u8], output_buf: &mut [u8]) -> PicoResult<()> {
    use std::io::Read;
    let mut decoder = zstd::Decoder::new(input_buf)?;
    decoder
        .read_exact(output_buf)
        .map_err(|e| pico_err!(OutOfSpec: "decompressing a zstd buffer: {e}"))
}

#[cfg(not(feature = "io_ipc_compression"))]
pub fn decompress_lz4(_input_buf: &[u8], _output_buf: &mut [u8]) -> PicoResult<()> {
    use pico_error::pico_bail;
    pico_bail!(OutOfSpec: "The crate was compiled without IPC compression. Use `io_ipc_compression` to read compressed IPC.")
}

#[cfg(not(feature = "io_ipc_compression"))]
pub fn decompress_zstd(_input_buf: &[u8], _output_buf: &mut [u8]) -> PicoResult<()> {
    use pico_error::pico_bail;
    pico_bail!(OutOfSpec: "The crate was compiled without IPC compression. Use `io_ipc_compression` to read compressed IPC.")
}
