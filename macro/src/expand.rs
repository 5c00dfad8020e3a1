use parsing::SidComponents;
use proc_macro2::TokenStream;
use quote::quote;
use syn::LitStr;

pub fn sid_impl(input: &LitStr) -> Result<TokenStream, syn::Error> {
    let components: SidComponents = input
        .value()
        .parse()
        .map_err(|e| syn::Error::new_spanned(input, e))?;
    let binary = components.to_binary();
    let bytes = binary.as_slice();

    let expanded = quote! {
        [#(#bytes),*]
    };
    Ok(expanded)
}
