//! Procedural macros for `structfold`.
//!
//! The [`Mergeable`](macro@Mergeable) derive implements the shape
//! provider for structs with named fields: one field entry per field,
//! carrying the declared name, the byte offset within the struct, and a
//! deferred link to the field type's own descriptor. Everything else
//! about merging (plan generation, skip handling, execution) lives in
//! the `structfold` crate; the macro only records layout.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields};

#[cfg(test)]
mod tests;

/// Derive macro for `structfold::Mergeable`.
///
/// Supported on structs with named fields (including empty and generic
/// structs; generic parameters receive per-field `Mergeable` bounds).
/// Tuple structs, unit-less enums, and unions produce a compile error.
#[proc_macro_derive(Mergeable)]
pub fn derive_mergeable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand(input: DeriveInput) -> Result<TokenStream2, syn::Error> {
    let ident = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "Mergeable requires named fields",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Mergeable can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Mergeable can only be derived for structs",
            ));
        }
    };

    let entries = fields.iter().map(|field| {
        let name = field.ident.as_ref().expect("named field");
        let name_str = name.to_string();
        let ty = &field.ty;
        quote! {
            ::structfold::shape::Field::new(
                #name_str,
                ::core::mem::offset_of!(Self, #name),
                <#ty as ::structfold::Mergeable>::shape,
            )
        }
    });

    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        // Generic parameters pick up whatever each field demands.
        let predicates = fields
            .iter()
            .map(|field| {
                let ty = &field.ty;
                parse_quote!(#ty: ::structfold::Mergeable)
            })
            .collect::<Vec<syn::WherePredicate>>();
        generics.make_where_clause().predicates.extend(predicates);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::structfold::Mergeable for #ident #ty_generics #where_clause {
            fn shape() -> &'static ::structfold::shape::Shape {
                ::structfold::shape::intern::<Self>(|| {
                    ::structfold::shape::Shape::aggregate::<Self>(
                        ::core::any::type_name::<Self>(),
                        ::std::vec![#(#entries),*],
                    )
                })
            }
        }
    })
}
