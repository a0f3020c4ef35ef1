//! Minimal RESP2/RESP3 framing for the pub/sub client

use futures::future::BoxFuture;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Largest bulk string accepted from a broker.
const MAX_BULK_LEN: usize = 16 * 1024 * 1024;

/// Deepest array nesting accepted. Pub/sub pushes nest at most two levels.
pub const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespFrame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Option<Vec<u8>>),
    Array(Option<Vec<RespFrame>>),
}

impl RespFrame {
    /// Payload bytes of a simple or bulk string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RespFrame::Simple(text) => Some(text.as_bytes()),
            RespFrame::Bulk(Some(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_text(&self, expected: &str) -> bool {
        self.as_bytes()
            .map(|bytes| bytes.eq_ignore_ascii_case(expected.as_bytes()))
            .unwrap_or(false)
    }
}

/// Encode a command as an array of bulk strings.
pub fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut out = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        out.extend_from_slice(arg.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// Read one frame. `Ok(None)` means the peer closed cleanly between frames.
///
/// Arrays nested deeper than [`MAX_NESTING`] are rejected as invalid data.
pub fn read_frame<'a, R>(reader: &'a mut R) -> BoxFuture<'a, io::Result<Option<RespFrame>>>
where
    R: AsyncBufRead + Unpin + Send + 'a,
{
    read_nested(reader, 0)
}

fn read_nested<'a, R>(
    reader: &'a mut R,
    depth: usize,
) -> BoxFuture<'a, io::Result<Option<RespFrame>>>
where
    R: AsyncBufRead + Unpin + Send + 'a,
{
    Box::pin(async move {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(None);
        }
        let line = strip_crlf(&line)?;
        let (tag, rest) = line
            .split_first()
            .ok_or_else(|| invalid("empty frame header"))?;
        let text = std::str::from_utf8(rest).map_err(|_| invalid("frame header is not utf-8"))?;

        let frame = match tag {
            b'+' => RespFrame::Simple(text.to_string()),
            b'-' => RespFrame::Error(text.to_string()),
            b':' => RespFrame::Integer(parse_len(text)?),
            b'$' => {
                let len = parse_len(text)?;
                if len < 0 {
                    RespFrame::Bulk(None)
                } else {
                    RespFrame::Bulk(Some(read_bulk(reader, len as usize).await?))
                }
            }
            b'*' | b'>' => {
                let len = parse_len(text)?;
                if len < 0 {
                    RespFrame::Array(None)
                } else if depth >= MAX_NESTING {
                    return Err(invalid("arrays nested too deeply"));
                } else {
                    let mut items = Vec::with_capacity((len as usize).min(16));
                    for _ in 0..len {
                        match read_nested(&mut *reader, depth + 1).await? {
                            Some(item) => items.push(item),
                            None => return Err(io::ErrorKind::UnexpectedEof.into()),
                        }
                    }
                    RespFrame::Array(Some(items))
                }
            }
            other => {
                return Err(invalid(&format!(
                    "unsupported frame type {:?}",
                    *other as char
                )))
            }
        };
        Ok(Some(frame))
    })
}

async fn read_bulk<R>(reader: &mut R, len: usize) -> io::Result<Vec<u8>>
where
    R: AsyncBufRead + Unpin + Send,
{
    if len > MAX_BULK_LEN {
        return Err(invalid("bulk string too large"));
    }
    let mut buf = vec![0u8; len + 2];
    reader.read_exact(&mut buf).await?;
    if !buf.ends_with(b"\r\n") {
        return Err(invalid("bulk string not terminated"));
    }
    buf.truncate(len);
    Ok(buf)
}

fn strip_crlf(line: &[u8]) -> io::Result<&[u8]> {
    match line.strip_suffix(b"\r\n") {
        Some(stripped) => Ok(stripped),
        None if line.ends_with(b"\n") => Err(invalid("frame header not terminated by CRLF")),
        None => Err(io::ErrorKind::UnexpectedEof.into()),
    }
}

fn parse_len(text: &str) -> io::Result<i64> {
    text.parse()
        .map_err(|_| invalid(&format!("invalid integer {text:?}")))
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn decode(bytes: &[u8]) -> io::Result<Option<RespFrame>> {
        let mut reader = BufReader::new(bytes);
        read_frame(&mut reader).await
    }

    fn bulk(text: &str) -> RespFrame {
        RespFrame::Bulk(Some(text.as_bytes().to_vec()))
    }

    #[test]
    fn encodes_subscribe() {
        assert_eq!(
            encode_command(&["SUBSCRIBE", "environmental_stream"]),
            b"*2\r\n$9\r\nSUBSCRIBE\r\n$20\r\nenvironmental_stream\r\n".to_vec()
        );
    }

    #[tokio::test]
    async fn decodes_scalars() {
        assert_eq!(decode(b"+OK\r\n").await.unwrap(), Some(RespFrame::Simple("OK".into())));
        assert_eq!(
            decode(b"-ERR no\r\n").await.unwrap(),
            Some(RespFrame::Error("ERR no".into()))
        );
        assert_eq!(decode(b":42\r\n").await.unwrap(), Some(RespFrame::Integer(42)));
        assert_eq!(decode(b"$-1\r\n").await.unwrap(), Some(RespFrame::Bulk(None)));
        assert_eq!(decode(b"").await.unwrap(), None);
    }

    #[tokio::test]
    async fn decodes_pubsub_message() {
        let wire = b"*3\r\n$7\r\nmessage\r\n$4\r\nenvs\r\n$11\r\n{\"aqi\": 1}\n\r\n";
        let frame = decode(wire).await.unwrap().unwrap();
        assert_eq!(
            frame,
            RespFrame::Array(Some(vec![bulk("message"), bulk("envs"), bulk("{\"aqi\": 1}\n")]))
        );
    }

    #[tokio::test]
    async fn push_frames_decode_as_arrays() {
        let frame = decode(b">2\r\n+pong\r\n:1\r\n").await.unwrap().unwrap();
        assert_eq!(
            frame,
            RespFrame::Array(Some(vec![RespFrame::Simple("pong".into()), RespFrame::Integer(1)]))
        );
    }

    #[tokio::test]
    async fn truncated_frames_are_errors() {
        assert!(decode(b"*2\r\n$3\r\nfoo\r\n").await.is_err());
        assert!(decode(b"$5\r\nab").await.is_err());
        assert!(decode(b"+OK").await.is_err());
        assert!(decode(b"?what\r\n").await.is_err());
    }

    #[tokio::test]
    async fn deep_nesting_is_rejected_without_recursing() {
        let mut wire = b"*1\r\n".repeat(200_000);
        wire.extend_from_slice(b":1\r\n");
        let err = decode(&wire).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn nesting_up_to_the_limit_decodes() {
        let mut wire = b"*1\r\n".repeat(MAX_NESTING);
        wire.extend_from_slice(b":7\r\n");
        let mut frame = decode(&wire).await.unwrap().unwrap();
        for _ in 0..MAX_NESTING {
            frame = match frame {
                RespFrame::Array(Some(mut items)) => items.remove(0),
                other => panic!("expected array, got {other:?}"),
            };
        }
        assert_eq!(frame, RespFrame::Integer(7));
    }
}
