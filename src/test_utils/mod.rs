//! Shared test fixtures.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpListener;

pub(crate) type Responder = Arc<dyn Fn(&[String]) -> Vec<u8> + Send + Sync>;

/// Minimal RESP2 server answering every command through `respond`.
pub(crate) async fn spawn_fake_store(respond: Responder) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let respond = respond.clone();
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut reader = BufReader::new(read_half);
                while let Some(args) = read_command(&mut reader).await {
                    if write_half.write_all(&respond(&args)).await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    addr
}

async fn read_command<R: tokio::io::AsyncBufRead + Unpin>(reader: &mut R) -> Option<Vec<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await.ok()?;
        args.push(String::from_utf8_lossy(&buf[..len]).into_owned());
    }
    Some(args)
}

fn bulk(value: &str) -> String {
    format!("${}\r\n{}\r\n", value.len(), value)
}

fn pmessage(
    channel: &str,
    payload: &str,
) -> String {
    format!("*4\r\n{}{}{}{}", bulk("pmessage"), bulk("*"), bulk(channel), bulk(payload))
}

/// Behaves like a store with keyspace notifications enabled that has just
/// seen `SET foo` and `DEL bar`.
pub(crate) fn notifying_store(args: &[String]) -> Vec<u8> {
    match args.first().map(|c| c.to_ascii_uppercase()).as_deref() {
        Some("PING") => b"+PONG\r\n".to_vec(),
        Some("PSUBSCRIBE") => {
            let mut reply = format!("*3\r\n{}{}:1\r\n", bulk("psubscribe"), bulk(&args[1]));
            reply.push_str(&pmessage("__keyspace@0__:foo", "set"));
            reply.push_str(&pmessage("__keyevent@0__:set", "foo"));
            reply.push_str(&pmessage("__keyspace@0__:bar", "del"));
            reply.push_str(&pmessage("__keyevent@0__:del", "bar"));
            reply.into_bytes()
        }
        _ => b"+OK\r\n".to_vec(),
    }
}

