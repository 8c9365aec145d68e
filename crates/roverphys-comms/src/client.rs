use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::broker::{Broker, Message, NodeInfo};
use crate::error::{CommsError, CommsResult};

enum Command {
    Advertise(String, Sender<CommsResult<()>>),
    Publish(String, Vec<u8>, Sender<CommsResult<usize>>),
    Subscribe(String, Sender<Receiver<Message>>),
    ListNodes(Sender<Vec<NodeInfo>>),
    Shutdown,
}

struct Worker {
    tx: Sender<Command>,
    handle: JoinHandle<()>,
}

/// A named node. `connect` starts a worker thread that owns all broker
/// traffic; `shutdown` (or drop) stops it and unregisters the node.
pub struct Client {
    name: String,
    worker: Option<Worker>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), worker: None } }

    #[inline] pub fn name(&self) -> &str { &self.name }
    #[inline] pub fn is_connected(&self) -> bool { self.worker.is_some() }

    /// Renames the node. Only allowed while disconnected.
    pub fn set_name(&mut self, name: impl Into<String>) -> CommsResult<()> {
        if self.worker.is_some() { return Err(CommsError::AlreadyConnected(self.name.clone())); }
        self.name = name.into();
        Ok(())
    }

    /// Registers the node and spawns its worker. Returns immediately.
    pub fn connect(&mut self, broker: &Broker) -> CommsResult<()> {
        if self.worker.is_some() { return Err(CommsError::AlreadyConnected(self.name.clone())); }
        broker.register_node(&self.name)?;
        let (tx, rx) = mpsc::channel::<Command>();
        let broker = broker.clone();
        let name = self.name.clone();
        let spawned = thread::Builder::new()
            .name(format!("comms-{name}"))
            .spawn(move || run_worker(&name, &broker, rx));
        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker { tx, handle });
                Ok(())
            }
            Err(e) => {
                warn!("comms: could not start worker for `{}`: {e}", self.name);
                Err(CommsError::WorkerGone(self.name.clone()))
            }
        }
    }

    fn send(&self, cmd: Command) -> CommsResult<()> {
        let w = self.worker.as_ref().ok_or_else(|| CommsError::NotConnected(self.name.clone()))?;
        w.tx.send(cmd).map_err(|_| CommsError::WorkerGone(self.name.clone()))
    }

    fn request<T>(&self, make: impl FnOnce(Sender<T>) -> Command) -> CommsResult<T> {
        let (tx, rx) = mpsc::channel();
        self.send(make(tx))?;
        rx.recv().map_err(|_| CommsError::WorkerGone(self.name.clone()))
    }

    pub fn advertise(&self, topic: &str) -> CommsResult<()> {
        self.request(|tx| Command::Advertise(topic.to_string(), tx))?
    }

    /// Publishes on an advertised topic; returns how many subscribers got it.
    pub fn publish(&self, topic: &str, payload: impl Into<Vec<u8>>) -> CommsResult<usize> {
        let payload = payload.into();
        self.request(|tx| Command::Publish(topic.to_string(), payload, tx))?
    }

    pub fn subscribe(&self, topic: &str) -> CommsResult<Receiver<Message>> {
        self.request(|tx| Command::Subscribe(topic.to_string(), tx))
    }

    pub fn request_list_of_nodes(&self) -> CommsResult<Vec<NodeInfo>> {
        self.request(Command::ListNodes)
    }

    /// Stops the worker and blocks until it has exited. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(w) = self.worker.take() else { return };
        let _ = w.tx.send(Command::Shutdown);
        if w.handle.join().is_err() {
            warn!("comms: worker of `{}` panicked", self.name);
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) { self.shutdown(); }
}

fn run_worker(name: &str, broker: &Broker, rx: Receiver<Command>) {
    debug!("comms: worker `{name}` up");
    // a dropped requester is not an error for the worker
    while let Ok(cmd) = rx.recv() {
        match cmd {
            Command::Advertise(topic, reply) => { let _ = reply.send(broker.advertise(name, &topic)); }
            Command::Publish(topic, payload, reply) => { let _ = reply.send(broker.publish(name, &topic, payload)); }
            Command::Subscribe(topic, reply) => {
                let (tx, sub) = mpsc::channel();
                broker.subscribe(&topic, tx);
                let _ = reply.send(sub);
            }
            Command::ListNodes(reply) => { let _ = reply.send(broker.list_nodes()); }
            Command::Shutdown => break,
        }
    }
    broker.unregister_node(name);
    debug!("comms: worker `{name}` down");
}
