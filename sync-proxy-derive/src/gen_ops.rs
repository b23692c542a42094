use quote::{format_ident, quote};

use crate::parse::{OperationKind, ParsedCapability};

pub fn generate(parsed: &ParsedCapability) -> proc_macro2::TokenStream {
    let vis = &parsed.vis;
    let name = &parsed.name;
    let ops_name = format_ident!("{}Ops", name);
    let owner = name.to_string();
    // Identity must be path-qualified: two same-named capabilities in
    // different modules are distinct operations.
    let owner_expr = quote! { concat!(module_path!(), "::", #owner) };

    let ops_doc = format!(
        "Operation identities for `{owner}`.\n\n\
         One const per member, usable with the builder's selection calls \
         (`for_member`, `for_members`, `except()...`). `DECLARED` lists the \
         operations declared directly on `{owner}`; operations of extended \
         capabilities are reachable through the capability descriptor.",
    );

    let consts: Vec<proc_macro2::TokenStream> = parsed
        .operations
        .iter()
        .map(|operation| {
            let const_ident = &operation.const_ident;
            let method_name = operation.sig.ident.to_string();
            let expr = match operation.kind {
                OperationKind::Method => {
                    quote! { sync_proxy::Operation::method(#owner_expr, #method_name) }
                }
                OperationKind::Getter => {
                    let property = operation.property.as_deref().unwrap_or(&method_name);
                    quote! { sync_proxy::Operation::getter(#owner_expr, #method_name, #property) }
                }
                OperationKind::Setter => {
                    let property = operation.property.as_deref().unwrap_or(&method_name);
                    quote! { sync_proxy::Operation::setter(#owner_expr, #method_name, #property) }
                }
            };
            let doc = format!("Identity of `{owner}::{method_name}`.");
            quote! {
                #[doc = #doc]
                pub const #const_ident: sync_proxy::Operation = #expr;
            }
        })
        .collect();

    let const_refs: Vec<proc_macro2::TokenStream> = parsed
        .operations
        .iter()
        .map(|operation| {
            let const_ident = &operation.const_ident;
            quote! { Self::#const_ident }
        })
        .collect();

    let parent_descriptors: Vec<proc_macro2::TokenStream> = parsed
        .parents
        .iter()
        .map(|parent| {
            let parent_ops = format_ident!("{}Ops", parent);
            quote! { <#parent_ops as sync_proxy::CapabilityDescriptor>::capability }
        })
        .collect();

    quote! {
        #[doc = #ops_doc]
        #vis struct #ops_name;

        impl #ops_name {
            #(#consts)*

            /// Operations declared directly on this capability.
            pub const DECLARED: &'static [sync_proxy::Operation] = &[#(#const_refs),*];
        }

        impl sync_proxy::CapabilityDescriptor for #ops_name {
            fn capability() -> sync_proxy::CapabilityInfo {
                sync_proxy::CapabilityInfo {
                    name: #owner_expr,
                    declared: Self::DECLARED,
                    parents: &[#(#parent_descriptors),*],
                }
            }
        }
    }
}
