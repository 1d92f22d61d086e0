//! The JSON documents read and written by the assembly.
//!
//! [`json_doc`] handles whole-file I/O. Outputs are staged next to their
//! destination and only moved into place once every output has been written,
//! so a failed run never leaves a half-updated set of files behind.
//!
//! [`EchoBase`] gives named access to the records embedded in the Echo Base
//! document.

mod echo_base;
pub mod json_doc;

pub use echo_base::{EchoBase, Slot};
