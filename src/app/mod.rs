// LogQuery - app/mod.rs
//
// Application layer: corpus assembly from files, directories and stdin.
// Dependencies: core, platform.

pub mod corpus;
