//! Foreign file formats that can be imported into a local snapshot

pub mod csv;
