// brickforge/src/commands/mod.rs

pub mod init;
pub mod options;
pub mod validate;
pub mod verify;
