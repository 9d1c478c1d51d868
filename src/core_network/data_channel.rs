use crate::core_network::error::DataChannelError;
use log::{debug, trace};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// One-shot outcome of a background passive accept.
pub type AcceptSignal = oneshot::Receiver<io::Result<TcpStream>>;

/// The session's data connection: a connected stream, or a passive listener
/// whose accept outcome has not been collected yet. Never both.
#[derive(Debug, Default)]
pub struct DataChannel {
    stream: Option<TcpStream>,
    pending: Option<AcceptSignal>,
    accept_task: Option<JoinHandle<()>>,
}

impl DataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a transfer command has something to work with.
    pub fn is_open(&self) -> bool {
        self.stream.is_some() || self.pending.is_some()
    }

    pub fn set_stream(&mut self, stream: TcpStream) {
        self.close();
        self.stream = Some(stream);
    }

    /// Records a passive accept running on `task` that resolves `signal`.
    pub fn set_pending(&mut self, signal: AcceptSignal, task: JoinHandle<()>) {
        self.close();
        self.pending = Some(signal);
        self.accept_task = Some(task);
    }

    /// Collects an outstanding passive accept, bounded by `limit`, and hands
    /// out the connected stream. On any failure the channel is closed.
    pub async fn take_ready_stream(
        &mut self,
        limit: Duration,
    ) -> Result<TcpStream, DataChannelError> {
        if let Some(signal) = self.pending.take() {
            let outcome = tokio::time::timeout(limit, signal).await;
            match outcome {
                Ok(Ok(Ok(stream))) => {
                    trace!("Passive accept signal consumed");
                    self.accept_task = None;
                    self.stream = Some(stream);
                }
                Ok(Ok(Err(e))) => {
                    self.close();
                    return Err(DataChannelError::Accept(e));
                }
                Ok(Err(_)) => {
                    self.close();
                    return Err(DataChannelError::AcceptAborted);
                }
                Err(_) => {
                    self.close();
                    return Err(DataChannelError::AcceptTimeout);
                }
            }
        }
        self.stream.take().ok_or(DataChannelError::NoConnection)
    }

    /// Drops the stream and any still-listening passive socket.
    pub fn close(&mut self) {
        if let Some(task) = self.accept_task.take() {
            debug!("Aborting pending passive accept");
            task.abort();
        }
        self.pending = None;
        self.stream = None;
    }
}

impl Drop for DataChannel {
    fn drop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
        }
    }
}
