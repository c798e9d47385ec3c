// Build script for chemfiles-ffi
//
// Linking is opt-in: with the `native` feature the crate links against a
// prebuilt libchemfiles. Set CHEMFILES_LIB_DIR when the library is not on
// the default linker search path.
//
// Without the feature nothing is linked, and whatever links the final
// binary has to provide the chfl_* symbols.

fn main() {
    println!("cargo:rerun-if-env-changed=CHEMFILES_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(dir) = std::env::var_os("CHEMFILES_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=chemfiles");
}
