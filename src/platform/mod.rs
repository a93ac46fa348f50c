// LogQuery - platform/mod.rs
//
// Platform abstraction layer: config directory resolution and file reading.
// Dependencies: standard library, directories, memmap2.

pub mod config;
pub mod fs;
