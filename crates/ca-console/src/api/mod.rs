//! Backend REST access: client, envelope normalization and request sequencing.

mod client;
mod envelope;
mod sequence;

pub use client::{AdminClient, Reply};
pub use envelope::{decode_envelope, Envelope};
pub use sequence::{RequestSequencer, Ticket};
