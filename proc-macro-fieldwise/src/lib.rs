use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, parse_macro_input, Data, DeriveInput, Field, Fields, GenericParam, Ident,
    LitStr, Type,
};

/// Derives `fieldwise::Shaped` and `fieldwise::Record` for a struct with named fields and a
/// single unbounded type parameter, and registers its shape.
///
/// Attributes:
/// - `#[record(base)]` on the first field: the field holds the parent record, whose fields
///   come first in this record's shape.
/// - `#[record(redeclare(x, y))]` on the struct: lists inherited fields again. They keep their
///   inherited position and their values stay in the base record.
/// - `#[record(validate)]` on the struct: every construction runs `fieldwise::Validate`.
///
/// A field stored both by the base record and by the extending struct fails constant evaluation.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct StructAttrs {
    validate: bool,
    redeclared: Vec<LitStr>,
}

struct Layout<'a> {
    base: Option<&'a Field>,
    own: Vec<&'a Field>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let param = type_param(input)?;
    let attrs = struct_attrs(input)?;
    let layout = layout(input)?;
    if layout.base.is_none() {
        if let Some(first) = attrs.redeclared.first() {
            return Err(syn::Error::new_spanned(
                first,
                "only a record with a `#[record(base)]` field can redeclare fields",
            ));
        }
    }

    let name = LitStr::new(&ident.unraw().to_string(), ident.span());
    let own_names: Vec<LitStr> = layout
        .own
        .iter()
        .map(|field| field_name(field))
        .collect::<syn::Result<_>>()?;
    let own_idents: Vec<&Ident> = layout
        .own
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .collect();
    let own_count = own_idents.len();
    let own_slots: Vec<Ident> = (0..own_count).map(|i| format_ident!("__field{}", i)).collect();

    let redeclared = &attrs.redeclared;
    let path = quote!(::core::concat!(::core::module_path!(), "::", #name));
    let (lineage, shape_init) = match layout.base {
        Some(base) => {
            let base_ty = &base.ty;
            (
                quote! {
                    ::fieldwise::Lineage::extend(
                        <#base_ty as ::fieldwise::Shaped>::LINEAGE,
                        &[#(#redeclared),*],
                        &[#(#own_names),*],
                    )
                },
                quote! {
                    ::fieldwise::Shape::extend(
                        <#base_ty as ::fieldwise::Shaped>::shape(),
                        #name,
                        #path,
                        &[#(#redeclared,)* #(#own_names),*],
                    )
                },
            )
        }
        None => (
            quote! {
                ::fieldwise::Lineage::root(&[#(#own_names),*])
            },
            quote! {
                ::fieldwise::Shape::new(#name, #path, &[#(#own_names),*])
            },
        ),
    };

    let (into_values, values, build) = match layout.base {
        Some(base) => {
            let base_ty = &base.ty;
            let base_ident = base
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(base, "record fields must be named"))?;
            (
                quote! {
                    let mut __values = <#base_ty as ::fieldwise::Record>::into_values(self.#base_ident);
                    #( __values.push(self.#own_idents); )*
                    __values
                },
                quote! {
                    let mut __values = <#base_ty as ::fieldwise::Record>::values(&self.#base_ident);
                    #( __values.push(&self.#own_idents); )*
                    __values
                },
                quote! {
                    let mut __values = __values;
                    let __own = __values.split_off(__values.len().saturating_sub(#own_count));
                    let __own: [#param; #own_count] = ::core::convert::TryFrom::try_from(__own)
                        .map_err(|__own: ::std::vec::Vec<#param>| __shape.arity_error(__own.len()))?;
                    let [#(#own_slots),*] = __own;
                    let __record = Self {
                        #base_ident: <#base_ty as ::fieldwise::Record>::from_values(__values)?,
                        #( #own_idents: #own_slots, )*
                    };
                },
            )
        }
        None => (
            quote! {
                ::std::vec![#(self.#own_idents),*]
            },
            quote! {
                ::std::vec![#(&self.#own_idents),*]
            },
            quote! {
                let __values: [#param; #own_count] = ::core::convert::TryFrom::try_from(__values)
                    .map_err(|__values: ::std::vec::Vec<#param>| __shape.arity_error(__values.len()))?;
                let [#(#own_slots),*] = __values;
                let __record = Self {
                    #( #own_idents: #own_slots, )*
                };
            },
        ),
    };

    let (validate_bound, validate_check) = if attrs.validate {
        (
            quote!(where #ident<#param>: ::fieldwise::Validate),
            quote! {
                <Self as ::fieldwise::Validate>::validate(&__record)
                    .map_err(|__reason| __shape.rejected(__reason))?;
            },
        )
    } else {
        (TokenStream2::new(), TokenStream2::new())
    };

    Ok(quote! {
        const _: () = {
            impl<#param> ::fieldwise::Shaped for #ident<#param> {
                const LINEAGE: &'static ::fieldwise::Lineage = &#lineage;

                fn shape() -> &'static ::fieldwise::Shape {
                    static SHAPE: ::std::sync::OnceLock<::fieldwise::Shape> =
                        ::std::sync::OnceLock::new();
                    SHAPE.get_or_init(|| #shape_init)
                }
            }

            impl<#param> ::fieldwise::Record for #ident<#param> #validate_bound {
                type Field = #param;
                type Rebind<__Rebound> = #ident<__Rebound>;

                fn into_values(self) -> ::std::vec::Vec<#param> {
                    #into_values
                }

                fn values(&self) -> ::std::vec::Vec<&#param> {
                    #values
                }

                fn from_values(
                    __values: ::std::vec::Vec<#param>,
                ) -> ::core::result::Result<Self, ::fieldwise::Error> {
                    let __shape = <Self as ::fieldwise::Shaped>::shape();
                    __shape.check_arity(__values.len())?;
                    #build
                    #validate_check
                    ::core::result::Result::Ok(__record)
                }
            }

            // evaluated eagerly so a repeated base field fails the build
            const _: &::fieldwise::Lineage =
                <#ident<::fieldwise::PartiallyApplied> as ::fieldwise::Shaped>::LINEAGE;

            ::fieldwise::__private::inventory::submit! {
                ::fieldwise::registry::ShapeEntry::new(
                    <#ident<::fieldwise::PartiallyApplied> as ::fieldwise::Shaped>::shape
                )
            }
        };
    })
}

/// The struct's one type parameter, which every field (or the base record) is built over.
fn type_param(input: &DeriveInput) -> syn::Result<&Ident> {
    let generics = &input.generics;
    let mut params = generics.params.iter();
    match (params.next(), params.next()) {
        (Some(GenericParam::Type(param)), None)
            if param.bounds.is_empty() && param.default.is_none() =>
        {
            if generics.where_clause.is_some() {
                return Err(syn::Error::new_spanned(
                    &generics.where_clause,
                    "record type parameters must be unbounded; check values with `#[record(validate)]` instead",
                ));
            }
            Ok(&param.ident)
        }
        (Some(GenericParam::Type(param)), None) => Err(syn::Error::new_spanned(
            param,
            "record type parameters must be unbounded; check values with `#[record(validate)]` instead",
        )),
        _ => Err(syn::Error::new(
            input.ident.span(),
            "records must have exactly one type parameter, the type held by every field",
        )),
    }
}

fn struct_attrs(input: &DeriveInput) -> syn::Result<StructAttrs> {
    let mut attrs = StructAttrs::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("validate") {
                attrs.validate = true;
                Ok(())
            } else if meta.path.is_ident("redeclare") {
                meta.parse_nested_meta(|field| {
                    let ident = field.path.require_ident()?;
                    attrs
                        .redeclared
                        .push(LitStr::new(&ident.unraw().to_string(), ident.span()));
                    Ok(())
                })
            } else {
                Err(meta.error(
                    "unsupported record attribute, expected `validate` or `redeclare(..)`",
                ))
            }
        })?;
    }
    Ok(attrs)
}

fn is_base(field: &Field) -> syn::Result<bool> {
    let mut base = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = true;
                Ok(())
            } else {
                Err(meta.error("unsupported record field attribute, expected `base`"))
            }
        })?;
    }
    Ok(base)
}

fn layout(input: &DeriveInput) -> syn::Result<Layout<'_>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "records must be structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "records must be structs with named fields",
            ))
        }
    };

    let mut layout = Layout {
        base: None,
        own: Vec::new(),
    };
    for (position, field) in fields.iter().enumerate() {
        if is_base(field)? {
            if position != 0 {
                return Err(syn::Error::new_spanned(
                    field,
                    "the base record must be the first field",
                ));
            }
            if let Type::Reference(_) = field.ty {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "the base record must be held by value",
                ));
            }
            layout.base = Some(field);
        } else {
            layout.own.push(field);
        }
    }
    Ok(layout)
}

fn field_name(field: &Field) -> syn::Result<LitStr> {
    field
        .ident
        .as_ref()
        .map(|ident| LitStr::new(&ident.unraw().to_string(), ident.span()))
        .ok_or_else(|| syn::Error::new(Span::call_site(), "record fields must be named"))
}
