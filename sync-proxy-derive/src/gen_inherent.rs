use quote::{format_ident, quote};

use crate::parse::ParsedCapability;

/// Extensible-concrete-type strategy: the proxy wraps the concrete type and
/// mirrors the annotated impl block's methods, preserving each method's
/// visibility so non-public operations stay interceptable.
///
/// Methods declared on the type outside the annotated block are not exposed
/// on the proxy, the counterpart of non-overridable members not being
/// interceptable.
pub fn generate(parsed: &ParsedCapability) -> proc_macro2::TokenStream {
    let type_name = &parsed.name;
    let proxy_name = format_ident!("{}Proxy", type_name);
    let ops_name = format_ident!("{}Ops", type_name);
    let type_str = type_name.to_string();

    let proxy_doc = format!(
        "Synchronizing proxy for `{type_str}`.\n\n\
         Mirrors the methods of the annotated impl block, forwarding each to \
         the wrapped `{type_str}`; operations selected on the builder enter \
         the configured lock first. Methods declared outside the annotated \
         block are not exposed here.\n\n\
         Created by `#[synchronized]` on an `impl {type_str}` block; build \
         instances with [`SyncProxyBuilder`](sync_proxy::SyncProxyBuilder)."
    );

    let methods: Vec<proc_macro2::TokenStream> = parsed
        .operations
        .iter()
        .map(|operation| {
            let sig = &operation.sig;
            let method_vis = &operation.vis;
            let const_ident = &operation.const_ident;
            let method = &sig.ident;
            let args = &operation.arg_idents;
            quote! {
                #method_vis #sig {
                    self.interceptor
                        .invoke(&#ops_name::#const_ident, || self.subject.#method(#(#args),*))
                }
            }
        })
        .collect();

    quote! {
        #[doc = #proxy_doc]
        pub struct #proxy_name {
            subject: ::std::sync::Arc<#type_name>,
            interceptor: sync_proxy::SyncInterceptor,
        }

        impl #proxy_name {
            #(#methods)*

            /// The wrapped subject.
            pub fn subject(&self) -> &::std::sync::Arc<#type_name> {
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

        impl sync_proxy::SynchronizedProxy for #proxy_name {
            type Subject = #type_name;

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
    }
}
