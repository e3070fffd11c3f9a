// Prints the version of `xinstall` baked in at compile time.

/// Main function for the `version` command.
pub fn run() {
    println!("xinstall {}", env!("CARGO_PKG_VERSION"));
}
