//! Build script for the baseband firmware
//!
//! Handles:
//! - Linker arguments for the embedded target (cortex-m-rt + defmt)

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (feature `std`) link as a normal library
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
