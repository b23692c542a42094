use quote::{format_ident, quote};

use crate::parse::ParsedCapability;

/// Open-capability-set strategy: the proxy implements the annotated trait
/// and forwards every operation to a boxed trait-object subject through the
/// interceptor.
pub fn generate(parsed: &ParsedCapability) -> proc_macro2::TokenStream {
    let vis = &parsed.vis;
    let trait_name = &parsed.name;
    let proxy_name = format_ident!("{}Proxy", trait_name);
    let ops_name = format_ident!("{}Ops", trait_name);
    let trait_str = trait_name.to_string();

    let proxy_doc = format!(
        "Synchronizing proxy for `{trait_str}`.\n\n\
         Implements `{trait_str}` by forwarding every operation to the \
         wrapped subject; operations selected on the builder enter the \
         configured lock first and exit it on every path out of the call.\n\n\
         Created by `#[synchronized]` on `{trait_str}`; build instances with \
         [`SyncProxyBuilder`](sync_proxy::SyncProxyBuilder)."
    );

    let methods: Vec<proc_macro2::TokenStream> = parsed
        .operations
        .iter()
        .map(|operation| {
            let sig = &operation.sig;
            let const_ident = &operation.const_ident;
            let method = &sig.ident;
            let args = &operation.arg_idents;
            quote! {
                #sig {
                    self.interceptor
                        .invoke(&#ops_name::#const_ident, || self.subject.#method(#(#args),*))
                }
            }
        })
        .collect();

    quote! {
        #[doc = #proxy_doc]
        #vis struct #proxy_name {
            subject: ::std::sync::Arc<dyn #trait_name + Send + Sync>,
            interceptor: sync_proxy::SyncInterceptor,
        }

        impl #trait_name for #proxy_name {
            #(#methods)*
        }

        impl sync_proxy::SynchronizedProxy for #proxy_name {
            type Subject = dyn #trait_name + Send + Sync;

            fn capability() -> sync_proxy::CapabilityInfo {
                <#ops_name as sync_proxy::CapabilityDescriptor>::capability()
            }

            fn from_parts(
                subject: ::std::sync::Arc<Self::Subject>,
                interceptor: sync_proxy::SyncInterceptor,
            ) -> Self {
                Self { subject, interceptor }
            }
        }

        impl #proxy_name {
            /// The wrapped subject.
            #vis fn subject(&self) -> &::std::sync::Arc<dyn #trait_name + Send + Sync> {
                &self.subject
            }

            #[doc(hidden)]
            pub fn __intercept<R>(
                &self,
                operation: &sync_proxy::Operation,
                proceed: impl FnOnce() -> R,
            ) -> R {
                self.interceptor.invoke(operation, proceed)
            }
        }
    }
}
