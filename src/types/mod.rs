//! Core type definitions: messages, providers, requests, results.

pub mod message;
pub mod provider;
pub mod request;
pub mod result;

pub use message::{Message, MessageRole, ResponseFormat};
pub use provider::{Provider, ProviderStatus};
pub use request::CallRequest;
pub use result::{CallFailure, CallResult, CallStats, CallSuccess, ProviderFailure};
