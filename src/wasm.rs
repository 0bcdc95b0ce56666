//! WebAssembly helpers. Rust panics in WASM just call `abort`; the hook pipes the panic message
//! into the browser console instead, which is the only place a canvas build can report one.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
