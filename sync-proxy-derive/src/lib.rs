use proc_macro::TokenStream;
use syn::{parse_macro_input, Item};

mod gen_inherent;
mod gen_ops;
mod gen_proxy;
mod parse;

/// Generates a synchronizing forwarding proxy for a trait or an inherent
/// impl block.
///
/// For a trait `Foo`, generates `FooOps` (one `Operation` const per method,
/// plus the capability descriptor) and `FooProxy` (implements `Foo`, routing
/// every call through a `SyncInterceptor`). On an inherent `impl Foo` block
/// the same pair is generated for the concrete type.
///
/// Mark property accessors with `#[getter]` / `#[setter]` so a property
/// reference selects both; a setter's property name drops its `set_` prefix.
/// Methods must take `&self` and cannot be generic or async.
#[proc_macro_attribute]
pub fn synchronized(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr2 = proc_macro2::TokenStream::from(attr);
    if !attr2.is_empty() {
        return syn::Error::new_spanned(
            &attr2,
            "synchronized takes no arguments. Usage: #[synchronized]",
        )
        .to_compile_error()
        .into();
    }

    let item = parse_macro_input!(item as Item);

    // Strategy selection by item shape: traits take the open-capability-set
    // path, inherent impl blocks the concrete-type path. Anything else has
    // no applicable strategy.
    let expanded = match item {
        Item::Trait(mut item_trait) => match parse::parse_trait(&mut item_trait) {
            Ok(parsed) => {
                let ops = gen_ops::generate(&parsed);
                let proxy = gen_proxy::generate(&parsed);
                quote::quote! {
                    #item_trait
                    #ops
                    #proxy
                }
            }
            Err(error) => error.to_compile_error(),
        },
        Item::Impl(mut item_impl) => match parse::parse_impl(&mut item_impl) {
            Ok(parsed) => {
                let ops = gen_ops::generate(&parsed);
                let proxy = gen_inherent::generate(&parsed);
                quote::quote! {
                    #item_impl
                    #ops
                    #proxy
                }
            }
            Err(error) => error.to_compile_error(),
        },
        other => syn::Error::new_spanned(
            &other,
            "synchronized cannot generate a proxy for this item; \
             apply it to a trait or an inherent impl block",
        )
        .to_compile_error(),
    };

    expanded.into()
}
