//! Command Worker
//!
//! Runs a client on its own thread behind a single-consumer request queue.
//! Callers that must not block on socket I/O (an event loop, a UI thread)
//! submit commands and collect results later.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::client::RconClient;
use crate::error::{RconError, Result};
use crate::network::Transport;

/// A queued command and where to deliver its result
struct Request {
    command: String,
    reply: Sender<Result<String>>,
}

/// Handle to a thread that owns one client and executes commands in order
pub struct CommandWorker {
    sender: Option<Sender<Request>>,
    handle: Option<JoinHandle<()>>,
}

impl CommandWorker {
    /// Move `client` onto a new worker thread
    pub fn spawn<S>(client: RconClient<S>) -> Result<Self>
    where
        S: Transport + Send + 'static,
    {
        let (sender, receiver) = channel::unbounded::<Request>();

        let handle = thread::Builder::new()
            .name("rcon-worker".to_string())
            .spawn(move || run(client, receiver))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue a command without waiting for it
    pub fn submit(&self, command: impl Into<String>) -> Result<PendingCommand> {
        let sender = self.sender.as_ref().ok_or(RconError::WorkerStopped)?;
        let (reply, receiver) = channel::bounded(1);

        sender
            .send(Request {
                command: command.into(),
                reply,
            })
            .map_err(|_| RconError::WorkerStopped)?;

        Ok(PendingCommand { receiver })
    }

    /// Queue a command and block until its output is available
    pub fn command(&self, command: impl Into<String>) -> Result<String> {
        self.submit(command)?.wait()
    }

    /// Stop accepting commands, drain the queue, close the client and join
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        // Dropping the sender ends the worker loop once queued requests are served
        self.sender.take();

        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| RconError::WorkerStopped),
            None => Ok(()),
        }
    }
}

impl Drop for CommandWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("Command worker did not stop cleanly: {}", e);
        }
    }
}

fn run<S: Transport>(mut client: RconClient<S>, requests: Receiver<Request>) {
    tracing::debug!("Command worker started for {}", client.peer_addr());

    for request in requests.iter() {
        let result = client.command(&request.command);
        if let Err(ref e) = result {
            tracing::debug!("Command '{}' failed: {}", request.command, e);
        }
        // The submitter may have given up on the result
        let _ = request.reply.send(result);
    }

    client.close();
    tracing::debug!("Command worker stopped");
}

/// Result of a queued command, delivered once the worker gets to it
pub struct PendingCommand {
    receiver: Receiver<Result<String>>,
}

impl PendingCommand {
    /// Block until the command has completed
    pub fn wait(self) -> Result<String> {
        self.receiver.recv().map_err(|_| RconError::WorkerStopped)?
    }

    /// Block for at most `timeout`
    ///
    /// On [`RconError::Timeout`] the command is still queued or running on the
    /// connection; only the wait is abandoned.
    pub fn wait_timeout(self, timeout: Duration) -> Result<String> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(RconError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(RconError::WorkerStopped),
        }
    }

    /// Return the result if it is already available
    pub fn try_wait(&self) -> Option<Result<String>> {
        self.receiver.try_recv().ok()
    }
}
