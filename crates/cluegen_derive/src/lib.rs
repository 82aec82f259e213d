//! Derive macros for cluegen.
//!
//! - `Clues`: implements `cluegen::Clues` (class name, field set and field values) for a struct

use proc_macro::TokenStream;
use proc_macro2::{Delimiter, Spacing, TokenStream as TokenStream2, TokenTree};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Index, parse_macro_input};

/// Generates the `Clues` trait implementation.
///
/// # Attributes
/// - `#[clue(base)]`: the field's type also implements `Clues`; its fields are spliced in at this
///   position, so a base declared first contributes first.
/// - `#[clue(skip)]`: leave the field out.
///
/// # Example
/// ```ignore
/// #[derive(Clues)]
/// struct Holding {
///     name: String,
///     shares: i64,
/// }
///
/// // Generates:
/// impl cluegen::Clues for Holding {
///     fn class_name() -> &'static str { "Holding" }
///     fn clues() -> cluegen::FieldSet { /* name: String, shares: i64 */ }
///     fn clue_values(&self) -> cluegen::ClueValues<'_> { /* &self.name, &self.shares */ }
/// }
/// ```
#[proc_macro_derive(Clues, attributes(clue))]
pub fn derive_clues(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_clues(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// How one struct field participates.
enum Role {
    Field,
    Base,
    Skip,
}

fn role_of(field: &Field) -> syn::Result<Role> {
    let mut role = Role::Field;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("clue")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                role = Role::Base;
                Ok(())
            } else if meta.path.is_ident("skip") {
                role = Role::Skip;
                Ok(())
            } else {
                Err(meta.error("unsupported clue attribute, expected `base` or `skip`"))
            }
        })?;
    }
    Ok(role)
}

/// Render a field type the way it is written in source: `Vec<u8>`, `&'static str`,
/// `HashMap<String, i64>`, rather than with a space between every token.
fn type_hint(ty: &syn::Type) -> String {
    let mut out = String::new();
    write_tokens(&mut out, quote!(#ty));
    out.trim_end().to_string()
}

fn write_tokens(out: &mut String, tokens: TokenStream2) {
    let mut punct = String::new();
    for tree in tokens {
        match tree {
            TokenTree::Punct(p) => {
                punct.push(p.as_char());
                if p.spacing() == Spacing::Alone {
                    write_punct(out, &punct);
                    punct.clear();
                }
            }
            other => {
                if !punct.is_empty() {
                    write_punct(out, &punct);
                    punct.clear();
                }
                match other {
                    TokenTree::Group(group) => {
                        let (open, close) = match group.delimiter() {
                            Delimiter::Parenthesis => ("(", ")"),
                            Delimiter::Bracket => ("[", "]"),
                            Delimiter::Brace => ("{", "}"),
                            Delimiter::None => ("", ""),
                        };
                        out.push_str(open);
                        write_tokens(out, group.stream());
                        let trimmed = out.trim_end().len();
                        out.truncate(trimmed);
                        out.push_str(close);
                    }
                    word => write_word(out, &word.to_string()),
                }
            }
        }
    }
    if !punct.is_empty() {
        write_punct(out, &punct);
    }
}

fn write_word(out: &mut String, word: &str) {
    let joins = |c: char| c.is_alphanumeric() || c == '_';
    let after_word = out.chars().last().is_some_and(joins);
    if after_word && word.starts_with(joins) {
        out.push(' ');
    }
    out.push_str(word);
}

fn write_punct(out: &mut String, punct: &str) {
    match punct {
        "," | ";" => {
            out.push_str(punct);
            out.push(' ');
        }
        "->" | "+" | "=" => {
            let trimmed = out.trim_end().len();
            out.truncate(trimmed);
            out.push(' ');
            out.push_str(punct);
            out.push(' ');
        }
        _ => out.push_str(punct),
    }
}

fn expand_clues(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Clues can only be derived for structs",
            ));
        }
    };

    let mut declare = Vec::new();
    let mut collect = Vec::new();

    // Named fields (e.g. `struct User { name: String }`) and unnamed fields (e.g.
    // `struct User(String)`, named "0", "1", ...) expand the same way.
    let members: Vec<(String, TokenStream2, &Field)> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| {
                let ident = f.ident.as_ref()?;
                Some((ident.to_string(), quote!(#ident), f))
            })
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let index = Index::from(i);
                (i.to_string(), quote!(#index), f)
            })
            .collect(),
        Fields::Unit => Vec::new(),
    };

    for (field_name, member, field) in &members {
        let ty = &field.ty;
        match role_of(field)? {
            Role::Skip => {}
            Role::Base => {
                declare.push(quote! {
                    set.extend_from(&<#ty as ::cluegen::Clues>::clues());
                });
                collect.push(quote! {
                    values.extend(::cluegen::Clues::clue_values(&self.#member));
                });
            }
            Role::Field => {
                let type_str = type_hint(ty);
                declare.push(quote! {
                    set.declare(#field_name, #type_str);
                });
                collect.push(quote! {
                    values.push(#field_name, &self.#member);
                });
            }
        }
    }

    Ok(quote! {
        impl #impl_generics ::cluegen::Clues for #name #ty_generics #where_clause {
            fn class_name() -> &'static str {
                #name_str
            }

            fn clues() -> ::cluegen::FieldSet {
                #[allow(unused_mut)]
                let mut set = ::cluegen::FieldSet::new();
                #(#declare)*
                set
            }

            fn clue_values(&self) -> ::cluegen::ClueValues<'_> {
                #[allow(unused_mut)]
                let mut values = ::cluegen::ClueValues::new();
                #(#collect)*
                values
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(ty: syn::Type) -> String {
        type_hint(&ty)
    }

    #[test]
    fn type_hints_drop_token_spacing() {
        assert_eq!(hint(syn::parse_quote!(Box<dyn Fn(i32) -> i32 + Send>)), "Box<dyn Fn(i32) -> i32 + Send>");
        assert_eq!(hint(syn::parse_quote!(&'a mut Vec<T>)), "&'a mut Vec<T>");
        assert_eq!(hint(syn::parse_quote!(<T as Iterator>::Item)), "<T as Iterator>::Item");
        assert_eq!(hint(syn::parse_quote!(Box<dyn Iterator<Item = u8>>)), "Box<dyn Iterator<Item = u8>>");
        assert_eq!(hint(syn::parse_quote!(::std::option::Option<()>)), "::std::option::Option<()>");
    }

    #[test]
    fn enums_are_rejected() {
        let input: DeriveInput = syn::parse_quote!(
            enum Shape {
                Circle,
            }
        );
        let err = expand_clues(&input).unwrap_err();
        assert_eq!(err.to_string(), "Clues can only be derived for structs");
    }
}
