pub mod common;
pub mod market;
pub mod rpc;

// Re-export commonly used types for convenience
pub use common::*;
pub use market::*;
pub use rpc::{JsonRpcRequest, LoginResponse, RpcError};
