//! Command: print version information.

/// Print the dtm version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dtm {}", crate::logging::version());
}
