#![allow(dead_code)]

pub use v5_logger::prelude::*;

use futures::StreamExt;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::codec::FramedRead;
use v5_logger::v5::frame_decoder::FrameDecoder;

pub const DEVICE_SERIAL: u32 = 1_700_000_000;

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Factory;
impl Factory {
    pub fn logger_config(addr: SocketAddr) -> config::Logger {
        config::Logger {
            host: addr.ip().to_string(),
            port: addr.port(),
            serial: DEVICE_SERIAL,
            timeout_secs: Some(1),
            verify_checksum: None,
            max_payload_length: None,
        }
    }

    /// Register `r` holds `r * 3`, so values are easy to predict.
    pub fn register_value(register: u16) -> u16 {
        register.wrapping_mul(3)
    }

    pub fn value_blob(start_register: u16, register_count: u16) -> Vec<u8> {
        (0..register_count)
            .flat_map(|i| Self::register_value(start_register.wrapping_add(i)).to_be_bytes())
            .collect()
    }

    pub fn response_frame(value: &[u8]) -> Frame {
        Frame::with_header(
            ControlCode::Response.into(),
            0x0102,
            DEVICE_SERIAL,
            Response::new(value).bytes(),
        )
    }

    /// Decoded response frame bytes carrying registers 10 and 300.
    pub fn small_response_bytes() -> Vec<u8> {
        vec![
            0xa5, 0x19, 0x00, 0x10, 0x15, 0x01, 0x02, 0x00, 0xf1, 0x53, 0x65, // header
            0x02, 0x01, 0x64, 0x00, 0x00, 0x00, 0x34, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, // payload header
            0x01, 0x03, 0x04, 0x00, 0x0a, 0x01, 0x2c, // business data
            0xda, 0x7c, // crc
            0x00, 0x00, // reserved
            0x2c, 0x15, // checksum, end
        ]
    }
}

/// How the fake logger answers a request.
pub enum Reply {
    /// Registers as requested, per [`Factory::register_value`].
    Registers,
    /// Only this many of the requested registers.
    Short(u16),
    /// These bytes verbatim.
    Raw(Vec<u8>),
    /// A correct reply written in two pieces.
    Split,
    /// Nothing at all; the connection stays open.
    Silent,
}

/// Listens on a random local port and answers one request.
///
/// The returned handle yields the request the logger received.
pub async fn fake_logger(reply: Reply) -> (SocketAddr, tokio::task::JoinHandle<Option<Request>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = socket.into_split();
        let mut frames = FramedRead::new(reader, FrameDecoder::new());

        let frame = frames.next().await?.ok()?;
        let request = Request::decode(&frame.payload).ok()?;

        let ok = || {
            Factory::response_frame(&Factory::value_blob(
                request.start_register,
                request.register_count,
            ))
            .bytes()
        };

        match reply {
            Reply::Registers => writer.write_all(&ok()).await.unwrap(),
            Reply::Short(n) => {
                let frame =
                    Factory::response_frame(&Factory::value_blob(request.start_register, n));
                writer.write_all(&frame.bytes()).await.unwrap();
            }
            Reply::Raw(bytes) => writer.write_all(&bytes).await.unwrap(),
            Reply::Split => {
                let bytes = ok();
                let (a, b) = bytes.split_at(bytes.len() / 2);
                writer.write_all(a).await.unwrap();
                writer.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(50)).await;
                writer.write_all(b).await.unwrap();
            }
            Reply::Silent => tokio::time::sleep(Duration::from_secs(3)).await,
        }

        Some(request)
    });

    (addr, handle)
}
