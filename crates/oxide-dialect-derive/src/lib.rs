//! Derive macro describing structs as dialect models.
//!
//! `#[derive(Entity)]` implements `oxide_dialect_core::Entity`, snapshotting
//! a struct's fields into a `Model` in declaration order. Each field type
//! must implement `oxide_dialect_core::FieldType`, which supplies the
//! semantic kind and the bound value.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, LitInt, Meta, parse_macro_input};

/// Derives `Entity` for a struct with named fields.
///
/// # Attributes
///
/// - `#[entity(table = "table_name")]` - Specifies the SQL table name
///   (optional, defaults to snake_case of struct name)
///
/// # Field Attributes
///
/// - `#[entity(primary_key)]` - Marks the primary key (defaults to the
///   field named `id`)
/// - `#[entity(name = "column_name")]` - Specifies the column name
/// - `#[entity(size = 255)]` - Size hint for bounded types
/// - `#[entity(not_null)]` - Marks the column NOT NULL
/// - `#[entity(default = "expr")]` - Sets a raw SQL default expression
/// - `#[entity(skip)]` - Leaves the field out of the model
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut column_infos: Vec<ColumnInfo> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = parse_entity_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        column_infos.push(ColumnInfo {
            column_name: attrs.name.unwrap_or_else(|| field_name.to_string()),
            field_name,
            is_primary_key: attrs.primary_key,
            size: attrs.size,
            not_null: attrs.not_null,
            default_expr: attrs.default_expr,
        });
    }

    let marked: Vec<&ColumnInfo> = column_infos.iter().filter(|c| c.is_primary_key).collect();
    let primary_key = match marked.as_slice() {
        [one] => one.column_name.clone(),
        [] => column_infos
            .iter()
            .find(|c| c.column_name == "id")
            .map(|c| c.column_name.clone())
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    struct_name,
                    "Entity derive needs a primary key; mark a field with #[entity(primary_key)]",
                )
            })?,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Entity derive supports a single #[entity(primary_key)] field",
            ));
        }
    };

    let field_exprs: Vec<TokenStream2> = column_infos
        .iter()
        .map(|info| {
            let field_name = &info.field_name;
            let column_name = &info.column_name;
            let size = info.size;
            let not_null = if info.not_null {
                quote! { .not_null() }
            } else {
                quote! {}
            };
            let default = match &info.default_expr {
                Some(expr) => quote! { .default(#expr) },
                None => quote! {},
            };
            quote! {
                ::oxide_dialect_core::Field::of(#column_name, &self.#field_name)
                    .size(#size)
                    #not_null
                    #default
            }
        })
        .collect();

    let expanded = quote! {
        impl ::oxide_dialect_core::Entity for #struct_name {
            const TABLE: &'static str = #table_name;
            const PRIMARY_KEY: &'static str = #primary_key;

            fn to_model(&self) -> ::oxide_dialect_core::Model {
                ::oxide_dialect_core::Model::new(#table_name, #primary_key)
                    #(.field(#field_exprs))*
            }
        }
    };

    Ok(expanded)
}

struct ColumnInfo {
    field_name: Ident,
    column_name: String,
    is_primary_key: bool,
    size: usize,
    not_null: bool,
    default_expr: Option<String>,
}

#[derive(Default)]
struct EntityAttrs {
    name: Option<String>,
    primary_key: bool,
    size: usize,
    not_null: bool,
    default_expr: Option<String>,
    skip: bool,
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("entity") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    table_name = Some(parse_str_value(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported entity attribute"))
                }
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    Ok(to_snake_case(&struct_name.to_string()))
}

fn parse_entity_attrs(attrs: &[Attribute]) -> syn::Result<EntityAttrs> {
    let mut result = EntityAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("entity") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                result.primary_key = true;
            } else if meta.path.is_ident("not_null") {
                result.not_null = true;
            } else if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("name") {
                result.name = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("default") {
                result.default_expr = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("size") {
                let lit: LitInt = meta.value()?.parse()?;
                result.size = lit.base10_parse()?;
            } else {
                return Err(meta.error("unsupported entity attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
