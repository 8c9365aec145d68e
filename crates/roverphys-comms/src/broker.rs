use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;

use crate::error::{CommsError, CommsResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    /// Publishing node.
    pub from: String,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub advertised: Vec<String>,
}

#[derive(Default)]
struct State {
    nodes: BTreeMap<String, BTreeSet<String>>,
    subscribers: HashMap<String, Vec<Sender<Message>>>,
}

/// Shared topic hub. Cloning hands out another handle to the same hub.
#[derive(Clone, Default)]
pub struct Broker {
    state: Arc<Mutex<State>>,
}

impl Broker {
    pub fn new() -> Self { Self::default() }

    pub(crate) fn register_node(&self, name: &str) -> CommsResult<()> {
        let mut s = self.state.lock();
        if s.nodes.contains_key(name) { return Err(CommsError::NameTaken(name.to_string())); }
        s.nodes.insert(name.to_string(), BTreeSet::new());
        debug!("broker: node `{name}` registered");
        Ok(())
    }

    pub(crate) fn unregister_node(&self, name: &str) {
        if self.state.lock().nodes.remove(name).is_some() {
            debug!("broker: node `{name}` unregistered");
        }
    }

    pub(crate) fn advertise(&self, node: &str, topic: &str) -> CommsResult<()> {
        let mut s = self.state.lock();
        let set = s.nodes.get_mut(node).ok_or_else(|| CommsError::NotConnected(node.to_string()))?;
        set.insert(topic.to_string());
        Ok(())
    }

    /// Fans `payload` out to every live subscriber. Returns the receiver count.
    pub(crate) fn publish(&self, node: &str, topic: &str, payload: Vec<u8>) -> CommsResult<usize> {
        let mut s = self.state.lock();
        let advertised = s.nodes.get(node).map(|t| t.contains(topic))
            .ok_or_else(|| CommsError::NotConnected(node.to_string()))?;
        if !advertised {
            return Err(CommsError::NotAdvertised { node: node.to_string(), topic: topic.to_string() });
        }
        let Some(subs) = s.subscribers.get_mut(topic) else { return Ok(0) };
        let msg = Message { topic: topic.to_string(), from: node.to_string(), payload };
        // dropped receivers are pruned here
        subs.retain(|tx| tx.send(msg.clone()).is_ok());
        trace!("broker: `{node}` -> `{topic}` ({} receivers)", subs.len());
        Ok(subs.len())
    }

    pub(crate) fn subscribe(&self, topic: &str, tx: Sender<Message>) {
        self.state.lock().subscribers.entry(topic.to_string()).or_default().push(tx);
    }

    /// Registered nodes, sorted by name.
    pub fn list_nodes(&self) -> Vec<NodeInfo> {
        self.state.lock().nodes.iter()
            .map(|(name, topics)| NodeInfo { name: name.clone(), advertised: topics.iter().cloned().collect() })
            .collect()
    }
}
