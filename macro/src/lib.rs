#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Not an issue in a macro crate"
)]
//! Procedural macro turning a SID literal into its self-relative wire bytes.
mod expand;
use expand::sid_impl;
use proc_macro::TokenStream;

use syn::{LitStr, parse_macro_input};

/// Expands `sid!("S-1-5-32-544")` to a `[u8; N]` array holding the binary SID.
///
/// The revision is encoded as written, so `sid!("S-2-5-1")` produces a SID
/// that decoders must reject.
#[proc_macro]
pub fn sid(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match sid_impl(&lit) {
        Ok(token_stream) => token_stream,
        Err(err) => err.to_compile_error(),
    }
    .into()
}
