//! Integration tests for greycard crates.
//!
//! End-to-end scenarios crossing the codec, the engine and PNG files.
