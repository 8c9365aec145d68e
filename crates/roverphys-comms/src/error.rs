use thiserror::Error;

pub type CommsResult<T> = Result<T, CommsError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommsError {
    #[error("client `{0}` is not connected")]
    NotConnected(String),
    #[error("client `{0}` is already connected")]
    AlreadyConnected(String),
    #[error("node name `{0}` is already registered")]
    NameTaken(String),
    #[error("node `{node}` has not advertised `{topic}`")]
    NotAdvertised { node: String, topic: String },
    #[error("worker of `{0}` has exited")]
    WorkerGone(String),
}
