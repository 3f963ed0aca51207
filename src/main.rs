//! reqiq CLI binary
//!
//! Minimal entrypoint: all logic is in the library; main.rs only invokes
//! cli::run() and maps the result to a process exit code.

fn main() {
    if let Err(code) = reqiq::cli::run() {
        std::process::exit(code.as_i32());
    }
}
