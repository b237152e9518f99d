use darling::{
    FromDeriveInput, FromField, FromMeta, FromVariant,
    ast::{Data, Fields},
};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{
    DeriveInput, GenericArgument, Generics, Index, LitStr, Member, Path, PathArguments, Type,
    WherePredicate, parse_quote,
};

#[derive(FromMeta)]
struct PathOverrides {
    #[darling(default = "PathOverrides::default_merge")]
    merge: Path,
}
impl Default for PathOverrides {
    fn default() -> Self {
        Self {
            merge: Self::default_merge(),
        }
    }
}
impl PathOverrides {
    fn default_merge() -> Path {
        parse_quote!(::config_merge::merge)
    }
}

#[derive(FromDeriveInput)]
#[darling(attributes(merge))]
struct MergeInput {
    ident: Ident,
    generics: Generics,
    data: Data<MergeVariant, MergeField>,
    #[darling(default)]
    path_overrides: PathOverrides,
    #[darling(default)]
    bound: Option<Vec<WherePredicate>>,
    #[darling(default)]
    key: Option<LitStr>,
}

#[derive(FromField)]
#[darling(attributes(merge))]
struct MergeField {
    ident: Option<Ident>,
    ty: Type,
    #[darling(default)]
    ignore_duplicates: bool,
    #[darling(default)]
    merged_key: Option<LitStr>,
}

#[derive(FromVariant)]
struct MergeVariant {}

/// How the derived impl merges a single field
enum FieldKind {
    /// Delegates to the field type's own `Merge` impl
    Value,
    /// `Vec` that is concatenated
    Concat,
    /// `Vec` that is correlated by key, under `handle` if it is shared with other fields
    Correlate { handle: Option<LitStr> },
}

struct ResolvedField {
    member: Member,
    name: LitStr,
    kind: FieldKind,
}

pub fn derive(input: DeriveInput) -> TokenStream {
    let MergeInput {
        ident,
        mut generics,
        data,
        path_overrides: PathOverrides { merge: merge_mod },
        bound,
        key,
    } = match MergeInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors(),
    };
    let fields = match data {
        Data::Enum(_) => {
            return quote! {
                compile_error!("`#[derive(Merge)]` does not support enums, implement `Atomic` for them instead");
            };
        }
        Data::Struct(fields) => fields,
    };
    let fields = match resolve_fields(fields) {
        Ok(fields) => fields,
        Err(err) => return err.write_errors(),
    };
    let key_member = match key.as_ref().map(LitStr::parse::<Member>).transpose() {
        Ok(key_member) => key_member,
        Err(err) => return err.into_compile_error(),
    };

    if let Some(bound) = bound {
        let where_clause = generics.make_where_clause();
        where_clause.predicates.extend(bound);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let ignored = fields
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Concat))
        .map(|field| &field.name);
    let (handle_fields, handles): (Vec<_>, Vec<_>) = fields
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Correlate {
                handle: Some(handle),
            } => Some((&field.name, handle)),
            _ => None,
        })
        .unzip();

    let correlated = fields
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Correlate { .. }))
        .collect::<Vec<_>>();
    // The index is only needed if there is anything to correlate
    let index = if correlated.is_empty() {
        quote! {}
    } else {
        let inserts = correlated
            .iter()
            .map(|ResolvedField { member, name, .. }| {
                quote! {
                    index.insert_field(#name, &parent.#member, &child.#member, &context)?;
                }
            })
            .collect::<TokenStream>();
        quote! {
            let mut index = #merge_mod::CorrelationIndex::new(
                #merge_mod::PolicyTable::of::<Self>(),
            );
            #inserts
        }
    };
    let unused = if fields.is_empty() {
        quote! { let _ = (parent, child, context); }
    } else if fields
        .iter()
        .all(|field| matches!(field.kind, FieldKind::Concat))
    {
        quote! { let _ = context; }
    } else {
        quote! {}
    };

    let body = fields
        .iter()
        .map(|ResolvedField { member, name, kind }| {
            let value = match kind {
                FieldKind::Value => quote! {
                    #merge_mod::Merge::merge_with(
                        &parent.#member,
                        &child.#member,
                        context.field(&#name),
                    )?
                },
                FieldKind::Concat => quote! {
                    #merge_mod::concat(&parent.#member, &child.#member)
                },
                FieldKind::Correlate { .. } => quote! {
                    index.merge_field(
                        #name,
                        &parent.#member,
                        &child.#member,
                        context.field(&#name),
                    )?
                },
            };
            quote! { #member: #value, }
        })
        .collect::<TokenStream>();

    let keyed_impl = key_member.map(|key_member| {
        quote! {
            impl #impl_generics #merge_mod::Keyed for #ident #ty_generics #where_clause {
                fn key(&self) -> ::core::option::Option<::std::string::String> {
                    #merge_mod::Keyed::key(&self.#key_member)
                }
            }
        }
    });

    quote! {
        impl #impl_generics #merge_mod::MergePolicy for #ident #ty_generics #where_clause {
            fn ignored_duplicates() -> &'static [&'static str] {
                &[#(#ignored),*]
            }

            fn merged_key_handles() -> &'static [(&'static str, &'static str)] {
                &[#((#handle_fields, #handles)),*]
            }
        }

        impl #impl_generics #merge_mod::Merge for #ident #ty_generics #where_clause {
            fn merge_with(
                parent: &Self,
                child: &Self,
                context: #merge_mod::MergeContext<'_>,
            ) -> ::core::result::Result<Self, #merge_mod::MergeError> {
                #unused
                #index
                ::core::result::Result::Ok(Self { #body })
            }
        }

        #keyed_impl
    }
}

fn resolve_fields(fields: Fields<MergeField>) -> Result<Vec<ResolvedField>, darling::Error> {
    let mut errors = darling::Error::accumulator();
    let resolved = fields
        .into_iter()
        .enumerate()
        .filter_map(|(index, field)| {
            let (member, name) = match &field.ident {
                Some(ident) => (
                    Member::Named(ident.clone()),
                    LitStr::new(&ident.to_string(), ident.span()),
                ),
                None => (
                    Member::Unnamed(Index::from(index)),
                    LitStr::new(&index.to_string(), proc_macro2::Span::call_site()),
                ),
            };
            let kind = errors.handle(field_kind(&field))?;
            Some(ResolvedField { member, name, kind })
        })
        .collect();
    errors.finish_with(resolved)
}

fn field_kind(field: &MergeField) -> Result<FieldKind, darling::Error> {
    let Some(element) = list_element(&field.ty) else {
        if field.ignore_duplicates || field.merged_key.is_some() {
            return Err(darling::Error::custom(
                "`ignore_duplicates` and `merged_key` can only be used on `Vec` fields",
            )
            .with_span(&field.ty));
        }
        return Ok(FieldKind::Value);
    };
    if let Some(shape) = unsupported_element(element) {
        return Err(darling::Error::custom(format!(
            "lists of {shape} cannot be merged, use a list of atomic values or structs instead"
        ))
        .with_span(element));
    }
    match (field.ignore_duplicates, &field.merged_key) {
        (true, Some(handle)) => Err(darling::Error::custom(
            "a list cannot both ignore duplicates and share a merged key",
        )
        .with_span(handle)),
        (true, None) => Ok(FieldKind::Concat),
        (false, handle) => Ok(FieldKind::Correlate {
            handle: handle.clone(),
        }),
    }
}

/// Returns the element type if `ty` is a `Vec`
fn list_element(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Vec" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first()? {
            GenericArgument::Type(element) => Some(element),
            _ => None,
        },
        _ => None,
    }
}

/// Describes `element` if it is a shape that list merging has no rules for
fn unsupported_element(element: &Type) -> Option<&'static str> {
    match element {
        Type::Array(_) | Type::Slice(_) => Some("arrays"),
        Type::Tuple(_) => Some("tuples"),
        _ => match last_segment(element)?.ident.to_string().as_str() {
            "Vec" | "VecDeque" => Some("lists"),
            "Option" => Some("optional values"),
            "Box" | "Rc" | "Arc" => Some("pointers"),
            _ => None,
        },
    }
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}
