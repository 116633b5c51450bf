//! Line supply — splits a byte stream into terminator-free lines.
//!
//! The parser core never reads or buffers; these helpers own all of that
//! and hand each line over as [`Bytes`], ready for a `parse` call or for
//! dispatch into the pipeline.

use std::path::Path;

use async_stream::stream;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::Stream;

use crate::parser::MAX_LINE_SIZE;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

/// Stream the lines of `reader`, without their terminators.
///
/// Both `\n` and `\r\n` endings are accepted; a final line without a
/// terminator is still yielded. A line longer than
/// [`MAX_LINE_SIZE`](crate::parser::MAX_LINE_SIZE) ends the stream with
/// [`ReadError::LineTooLarge`].
pub fn lines<R>(mut reader: R) -> impl Stream<Item = Result<Bytes, ReadError>>
where
    R: AsyncBufRead + Unpin,
{
    stream! {
        let mut buf = Vec::with_capacity(256);
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    yield Err(ReadError::Io(e));
                    break;
                }
            }
            let mut end = buf.len();
            if buf[end - 1] == b'\n' {
                end -= 1;
                if end > 0 && buf[end - 1] == b'\r' {
                    end -= 1;
                }
            }
            if end > MAX_LINE_SIZE {
                yield Err(ReadError::LineTooLarge(end, MAX_LINE_SIZE));
                break;
            }
            yield Ok(Bytes::copy_from_slice(&buf[..end]));
        }
    }
}

/// Open `path` for buffered line reading.
pub async fn open_file(path: &Path) -> Result<BufReader<File>, ReadError> {
    Ok(BufReader::new(File::open(path).await?))
}

/// Buffered stdin.
pub fn stdin() -> BufReader<tokio::io::Stdin> {
    BufReader::new(tokio::io::stdin())
}
