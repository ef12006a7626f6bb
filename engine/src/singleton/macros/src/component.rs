use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Get the struct name we are annotating
    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // `#[component(name = "...")]` overrides the name used for synthesized objects and
    // template paths. Defaults to the bare type identifier.
    let mut name = LitStr::new(&struct_name.to_string(), struct_name.span());
    for attr in ast.attrs.iter().filter(|a| a.path().is_ident("component")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported component attribute, expected `name`"))
            }
        });
        if let Err(err) = parsed {
            return err.to_compile_error().into();
        }
    }

    // Use ::rusty_singleton::singleton::Component which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as rusty_singleton;` in lib.rs
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_singleton::singleton::Component
            for #struct_name #ty_generics #where_clause
        {
            const NAME: &'static str = #name;
        }
    })
}
