//! Build script for the player firmware
//!
//! Puts `memory.x` on the linker search path for the soft-core target.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    // Host builds (tests) do not link against the memory map
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() != "riscv32" {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("memory.x", out_dir.join("memory.x")).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
