use std::process::Command;

/// The `lox` binary with a clean logging environment; stderr carries only diagnostics.
pub fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lox"));
    command.env_remove("RUST_LOG");
    command
}
