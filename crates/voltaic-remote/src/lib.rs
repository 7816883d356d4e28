//! Cross-probing protocol: small JSON messages exchanged between
//! cooperating editor instances (schematic and board view of the same
//! design), carrying window control, save requests, highlight sets and part
//! placement handoff.

pub mod message;

pub use message::{apply_highlight, decode, encode, RemoteError, RemoteMessage};
