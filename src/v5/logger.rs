use crate::prelude::*;

use crate::v5::frame_decoder::FrameDecoder;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// A V5 data logger reachable over TCP.
///
/// Every query dials a fresh connection, sends one request frame and waits
/// for one reply frame. There is no retry; a failed query is reported to the
/// caller as-is.
#[derive(Clone, Debug)]
pub struct Logger {
    config: config::Logger,
}

impl Logger {
    pub fn new(config: config::Logger) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &config::Logger {
        &self.config
    }

    /// Reads `register_count` registers starting at `start_register`.
    pub async fn query_registers(
        &self,
        start_register: u16,
        register_count: u16,
    ) -> Result<RegisterMap> {
        info!(
            "logger {}: reading {} registers from {:#06x}",
            self.config.serial(),
            register_count,
            start_register
        );

        let response = self
            .exchange(Request::new(start_register, register_count))
            .await?;

        let registers = RegisterMap::extract(&response.value, start_register, register_count)?;
        debug!("logger {}: registers {:?}", self.config.serial(), registers);

        Ok(registers)
    }

    /// Sends one request and returns the decoded reply payload.
    pub async fn exchange(&self, request: Request) -> Result<Response> {
        let timeout = self.config.timeout();
        let mut framed = self.connect().await?;

        let frame = Frame::new(self.config.serial(), request.bytes());
        debug!("logger {}: TX {:?}", self.config.serial(), frame.bytes());

        match tokio::time::timeout(timeout, framed.send(frame)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => bail!("Failed to write request: {}", e),
            Err(_) => bail!("Write operation timed out after {} seconds", timeout.as_secs()),
        }

        let reply = match tokio::time::timeout(timeout, framed.next()).await {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(e))) => bail!("Failed to read reply: {}", e),
            Ok(None) => bail!("Connection closed by logger before a reply arrived"),
            Err(_) => bail!("No reply received for {} seconds", timeout.as_secs()),
        };
        debug!("logger {}: RX {:?}", self.config.serial(), reply);

        self.check_frame(&reply)?;

        let response = Response::decode(&reply.payload)?;
        self.check_response(&response)?;

        Ok(response)
    }

    async fn connect(&self) -> Result<Framed<TcpStream, FrameDecoder>> {
        let hp = (self.config.host().to_owned(), self.config.port());
        let timeout = self.config.timeout();

        debug!(
            "logger {}: connecting to {}:{}",
            self.config.serial(),
            hp.0,
            hp.1
        );

        let stream = match tokio::time::timeout(timeout, TcpStream::connect(hp)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => bail!("Failed to connect to logger: {}", e),
            Err(_) => bail!("Connection timeout after {} seconds", timeout.as_secs()),
        };

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        let decoder = FrameDecoder::with_max_payload_length(self.config.max_payload_length());
        Ok(Framed::new(stream, decoder))
    }

    fn check_frame(&self, frame: &Frame) -> Result<()> {
        if frame.kind() != Some(ControlCode::Response) {
            warn!(
                "logger {}: unexpected control code {:#06x} in reply",
                self.config.serial(),
                frame.control_code
            );
        }

        if frame.device_serial_number != self.config.serial() {
            warn!(
                "logger serial mismatch found; frame={}, config={} - please check config!",
                frame.device_serial_number,
                self.config.serial()
            );
        }

        if !frame.checksum_matches() {
            let msg = format!(
                "frame checksum mismatch - got {:#04x}, expected {:#04x}",
                frame.checksum,
                frame.compute_checksum()
            );
            if self.config.verify_checksum() {
                bail!(msg);
            }
            warn!("logger {}: {}", self.config.serial(), msg);
        }

        Ok(())
    }

    fn check_response(&self, response: &Response) -> Result<()> {
        if !response.crc_matches() {
            let msg = format!(
                "response crc mismatch - got {:#06x}, expected {:#06x}",
                response.crc,
                response.compute_crc()
            );
            if self.config.verify_checksum() {
                bail!(msg);
            }
            warn!("logger {}: {}", self.config.serial(), msg);
        }

        Ok(())
    }
}
