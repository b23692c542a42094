use syn::{
    Attribute, FnArg, Ident, ImplItem, ItemImpl, ItemTrait, Pat, Signature, TraitItem, Type,
    TypeParamBound, Visibility,
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Method,
    Getter,
    Setter,
}

pub struct ParsedOperation {
    pub sig: Signature,
    pub const_ident: Ident,
    pub kind: OperationKind,
    pub property: Option<String>,
    pub vis: Visibility,
    pub arg_idents: Vec<Ident>,
}

pub struct ParsedCapability {
    pub vis: Visibility,
    pub name: Ident,
    pub parents: Vec<Ident>,
    pub operations: Vec<ParsedOperation>,
}

/// Parse a trait definition (the open-capability-set strategy).
///
/// Strips the `#[getter]` / `#[setter]` helper attributes so the re-emitted
/// trait is clean. Supertraits other than the marker traits are recorded so
/// the generated capability descriptor can chain to their `{Name}Ops` types.
pub fn parse_trait(item: &mut ItemTrait) -> syn::Result<ParsedCapability> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "synchronized does not support generic traits",
        ));
    }

    let parents = item
        .supertraits
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(trait_bound) => trait_bound.path.segments.last(),
            _ => None,
        })
        .map(|segment| segment.ident.clone())
        .filter(|ident| !is_marker_trait(ident))
        .collect();

    let mut operations = Vec::new();

    for trait_item in &mut item.items {
        match trait_item {
            TraitItem::Fn(method) => {
                operations.push(parse_method(
                    &mut method.attrs,
                    &method.sig,
                    Visibility::Inherited,
                )?);
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "synchronized traits may only contain methods",
                ));
            }
        }
    }

    Ok(ParsedCapability {
        vis: item.vis.clone(),
        name: item.ident.clone(),
        parents,
        operations,
    })
}

/// Parse an inherent impl block (the extensible-concrete-type strategy).
pub fn parse_impl(item: &mut ItemImpl) -> syn::Result<ParsedCapability> {
    if item.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "synchronized cannot be applied to a trait impl; \
             apply it to the trait definition instead",
        ));
    }

    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "synchronized does not support generic impl blocks",
        ));
    }

    let name = match item.self_ty.as_ref() {
        Type::Path(path) => match path.path.segments.last() {
            Some(segment) => segment.ident.clone(),
            None => {
                return Err(syn::Error::new_spanned(
                    &item.self_ty,
                    "synchronized requires a named self type",
                ));
            }
        },
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "synchronized requires a named self type",
            ));
        }
    };

    let mut operations = Vec::new();

    for impl_item in &mut item.items {
        match impl_item {
            ImplItem::Fn(method) => {
                let vis = method.vis.clone();
                operations.push(parse_method(&mut method.attrs, &method.sig, vis)?);
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "synchronized impl blocks may only contain methods",
                ));
            }
        }
    }

    Ok(ParsedCapability {
        vis: Visibility::Public(Default::default()),
        name,
        parents: Vec::new(),
        operations,
    })
}

fn parse_method(
    attrs: &mut Vec<Attribute>,
    sig: &Signature,
    vis: Visibility,
) -> syn::Result<ParsedOperation> {
    match sig.receiver() {
        Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "synchronized methods must take `&self`",
            ));
        }
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "synchronized methods cannot be generic",
        ));
    }

    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            sig,
            "synchronized methods cannot be async",
        ));
    }

    let mut arg_idents = Vec::new();
    for arg in &sig.inputs {
        if let FnArg::Typed(typed) = arg {
            match typed.pat.as_ref() {
                Pat::Ident(pat) => arg_idents.push(pat.ident.clone()),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "synchronized method arguments must be plain identifiers",
                    ));
                }
            }
        }
    }

    let is_getter = attrs.iter().any(|attr| attr.path().is_ident("getter"));
    let is_setter = attrs.iter().any(|attr| attr.path().is_ident("setter"));
    if is_getter && is_setter {
        return Err(syn::Error::new_spanned(
            sig,
            "a method cannot be both a getter and a setter",
        ));
    }
    attrs.retain(|attr| !attr.path().is_ident("getter") && !attr.path().is_ident("setter"));

    let method_name = sig.ident.to_string();
    let (kind, property) = if is_getter {
        (OperationKind::Getter, Some(method_name.clone()))
    } else if is_setter {
        let property = method_name
            .strip_prefix("set_")
            .unwrap_or(&method_name)
            .to_string();
        (OperationKind::Setter, Some(property))
    } else {
        (OperationKind::Method, None)
    };

    let const_ident = Ident::new(&method_name.to_uppercase(), sig.ident.span());

    Ok(ParsedOperation {
        sig: sig.clone(),
        const_ident,
        kind,
        property,
        vis,
        arg_idents,
    })
}

fn is_marker_trait(ident: &Ident) -> bool {
    ident == "Send" || ident == "Sync" || ident == "Unpin" || ident == "Sized"
}
