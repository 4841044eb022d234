//! Binding generator for the livestock_core FFI surface.
//!
//! `cargo run --bin uniffi-bindgen generate --library <lib> --language swift`

fn main() {
    uniffi::uniffi_bindgen_main()
}
