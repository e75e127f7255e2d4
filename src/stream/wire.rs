//! Length-prefixed string framing for the stream transport.
//!
//! Every message on the wire is one UTF-8 string preceded by its byte length
//! as a big-endian `u32`. Both directions use the same framing; there is no
//! message type tag.

use crate::{CalcError, Result};
use bytes::{BufMut, BytesMut};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Writes one framed message.
///
/// The length prefix and payload are assembled into a single buffer so the
/// frame goes out in one write.
pub async fn write_frame<W>(writer: &mut W, message: &str, max_len: usize) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if message.len() > max_len {
        return Err(CalcError::Frame(format!(
            "message of {} bytes exceeds limit of {} bytes",
            message.len(),
            max_len
        )));
    }

    let mut frame = BytesMut::with_capacity(4 + message.len());
    frame.put_u32(message.len() as u32);
    frame.put_slice(message.as_bytes());

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one framed message.
///
/// Returns `Ok(None)` on a clean end-of-stream at a frame boundary (the peer
/// closed the connection). End-of-stream inside a frame is an I/O error. A
/// declared length above `max_len` is rejected before any allocation.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(CalcError::Stream(e)),
    };

    if len > max_len {
        return Err(CalcError::Frame(format!(
            "declared frame of {len} bytes exceeds limit of {max_len} bytes"
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(String::from_utf8(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIMIT: usize = 1024;

    #[tokio::test]
    async fn framed_message_survives_the_wire() {
        let mut wire = Vec::new();
        write_frame(&mut Cursor::new(&mut wire), "3 + 5 * 2", LIMIT)
            .await
            .unwrap();

        let mut reader = wire.as_slice();
        assert_eq!(
            read_frame(&mut reader, LIMIT).await.unwrap(),
            Some("3 + 5 * 2".to_string())
        );
        // Nothing left: the next read sees a clean end-of-stream
        assert_eq!(read_frame(&mut reader, LIMIT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_input_is_a_clean_close() {
        let mut reader: &[u8] = &[];
        assert_eq!(read_frame(&mut reader, LIMIT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn oversized_declared_length_is_rejected() {
        // 16 MiB declared, no payload
        let mut reader: &[u8] = &[0x01, 0x00, 0x00, 0x00];
        let err = read_frame(&mut reader, LIMIT).await.unwrap_err();
        assert!(matches!(err, CalcError::Frame(_)));
    }

    #[tokio::test]
    async fn oversized_outgoing_message_is_rejected() {
        let big = "9".repeat(LIMIT + 1);
        let mut wire = Vec::new();
        let err = write_frame(&mut Cursor::new(&mut wire), &big, LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, CalcError::Frame(_)));
        assert!(wire.is_empty());
    }

    #[tokio::test]
    async fn truncated_frame_is_an_error() {
        // Declares 8 bytes but carries only 3
        let mut reader: &[u8] = &[0x00, 0x00, 0x00, 0x08, b'1', b'+', b'1'];
        let err = read_frame(&mut reader, LIMIT).await.unwrap_err();
        assert!(matches!(err, CalcError::Stream(_)));
    }

    #[tokio::test]
    async fn non_utf8_payload_is_an_error() {
        let mut reader: &[u8] = &[0x00, 0x00, 0x00, 0x02, 0xFF, 0xFE];
        let err = read_frame(&mut reader, LIMIT).await.unwrap_err();
        assert!(matches!(err, CalcError::Utf8(_)));
    }
}
