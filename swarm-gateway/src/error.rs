use thiserror::Error;

/// Infrastructure failures talking to the control plane.
///
/// These never describe the state of a service. A missing service is a
/// successful lookup that returns an empty descriptor.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The Docker Engine could not be reached or rejected the request.
    #[error(transparent)]
    Api(#[from] bollard::errors::Error),

    /// Connection parameters could not be turned into a client.
    #[error("Invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// The gateway has no usable control plane behind it.
    #[error("{0}")]
    Unavailable(String),
}

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
