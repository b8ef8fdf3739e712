/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{DeriveInput, Ident, Type};

/// Container-level attributes for `#[bind(...)]`
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(bind), supports(struct_named))]
pub struct BindOpts {
    ident: Ident,
    generics: syn::Generics,
    data: darling::ast::Data<darling::util::Ignored, FieldOpts>,

    /// Bind onto a defaulted (or supplied) instance instead of constructing
    /// a value object; unbound fields keep their existing values.
    #[darling(default)]
    default: bool,
}

/// Field-level attributes for `#[bind(...)]`
#[derive(Debug, FromField)]
#[darling(attributes(bind))]
struct FieldOpts {
    ident: Option<Ident>,
    ty: Type,

    /// Explicit element name (overrides the field identifier)
    #[darling(default)]
    name: Option<String>,

    /// Never bind this field; it takes its `Default`
    #[darling(default)]
    skip: bool,

    /// Fall back to `Default::default()` when unbound
    #[darling(default)]
    default: bool,
}

pub fn generate_impl(input: &DeriveInput) -> TokenStream2 {
    match BindOpts::from_derive_input(input) {
        Ok(opts) => generate_from_opts(opts),
        Err(e) => e.write_errors(),
    }
}

fn generate_from_opts(opts: BindOpts) -> TokenStream2 {
    let struct_name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();
    let fields = match opts.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        darling::ast::Data::Enum(_) => unreachable!("guarded by darling supports"),
    };

    let body = if opts.default {
        generate_defaulted_body(&fields)
    } else {
        generate_value_object_body(&fields)
    };

    quote! {
        impl #impl_generics ::hawser::Bind for #struct_name #ty_generics #where_clause {
            const SHAPE: ::hawser::Shape = ::hawser::Shape::Struct;

            fn bind(
                binder: &::hawser::Binder,
                name: &::hawser::PropertyName,
                ctx: &mut ::hawser::BindContext<'_>,
                target: ::hawser::Bindable<Self>,
            ) -> ::core::result::Result<::hawser::BindResult<Self>, ::hawser::BindError> {
                #body
            }
        }
    }
}

/// Value-object mode: bind every field, then construct all-or-nothing.
fn generate_value_object_body(fields: &[FieldOpts]) -> TokenStream2 {
    let mut bind_steps = Vec::new();
    let mut field_values = Vec::new();
    let mut field_names = Vec::new();

    for field in fields {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        field_names.push(ident.clone());

        if field.skip {
            field_values.push(quote! {
                let #ident = ::core::default::Default::default();
            });
            continue;
        }

        let ty = &field.ty;
        let element = element_name(field, ident);
        let holder = format_ident!("__bound_{}", unraw(ident));

        bind_steps.push(quote! {
            let #holder = binder.bind_value::<#ty>(
                &name.append_ident(#element),
                ctx,
                ::hawser::Bindable::new(),
            )?;
            __any_bound |= #holder.is_bound();
        });

        let fallback = if field.default {
            quote! { ::core::default::Default::default() }
        } else if is_option(ty) {
            quote! { ::core::option::Option::None }
        } else {
            // Required field: a miss unbinds the whole value object.
            quote! { return ::core::result::Result::Ok(::hawser::BindResult::Unbound) }
        };

        field_values.push(quote! {
            let #ident = match #holder {
                ::hawser::BindResult::Bound(value) => value,
                ::hawser::BindResult::Unbound => #fallback,
            };
        });
    }

    quote! {
        let _ = target;
        let mut __any_bound = false;
        #(#bind_steps)*
        if !__any_bound {
            return ::core::result::Result::Ok(::hawser::BindResult::Unbound);
        }
        #(#field_values)*
        ::core::result::Result::Ok(::hawser::BindResult::Bound(Self {
            #(#field_names),*
        }))
    }
}

/// Defaulted mode: start from the existing or default instance, overwrite
/// bound fields, keep the rest.
fn generate_defaulted_body(fields: &[FieldOpts]) -> TokenStream2 {
    let mut bind_steps = Vec::new();

    for field in fields {
        if field.skip {
            continue;
        }
        let ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        let ty = &field.ty;
        let element = element_name(field, ident);

        bind_steps.push(quote! {
            match binder.bind_value::<#ty>(
                &name.append_ident(#element),
                ctx,
                ::hawser::Bindable::new(),
            )? {
                ::hawser::BindResult::Bound(value) => {
                    __value.#ident = value;
                    __any_bound = true;
                }
                ::hawser::BindResult::Unbound => {}
            }
        });
    }

    quote! {
        let mut __value: Self = match target.into_value() {
            ::core::option::Option::Some(existing) => existing,
            ::core::option::Option::None => ::core::default::Default::default(),
        };
        let mut __any_bound = false;
        #(#bind_steps)*
        if __any_bound {
            ::core::result::Result::Ok(::hawser::BindResult::Bound(__value))
        } else {
            ::core::result::Result::Ok(::hawser::BindResult::Unbound)
        }
    }
}

/// The element name a field binds under: the explicit `name` attribute or
/// the field identifier (relaxed matching covers the underscore form).
fn element_name(field: &FieldOpts, ident: &Ident) -> String {
    field.name.clone().unwrap_or_else(|| unraw(ident))
}

fn unraw(ident: &Ident) -> String {
    ident.to_string().trim_start_matches("r#").to_string()
}

/// Whether the field type is an `Option<...>`, making it optional without an
/// explicit `#[bind(default)]`.
fn is_option(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path
        .path
        .segments
        .last()
        .map(|segment| segment.ident == "Option")
        .unwrap_or(false)
}
