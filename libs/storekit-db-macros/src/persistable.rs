use heck::ToUpperCamelCase;
use proc_macro_error2::abort;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, spanned::Spanned};

/// Configuration parsed from `#[persist(...)]` attributes
#[derive(Default)]
struct PersistConfig {
    // Identifier (always required)
    id_col: Option<(String, Span)>,

    // Tenant dimension
    tenant_col: Option<(String, Span)>,
    no_tenant: Option<Span>,

    // Audit dimension
    created_col: Option<(String, Span)>,
    updated_col: Option<(String, Span)>,
    no_audit: Option<Span>,

    // Soft-delete dimension
    soft_delete_col: Option<(String, Span)>,
    no_soft_delete: Option<Span>,
}

#[allow(clippy::needless_pass_by_value)] // DeriveInput is consumed by proc-macro pattern
pub fn expand_derive_persistable(input: DeriveInput) -> TokenStream {
    if !matches!(&input.data, Data::Struct(_)) {
        abort!(
            input.span(),
            "#[derive(Persistable)] can only be applied to structs"
        );
    }

    let config = parse_persist_attrs(&input);
    validate_config(&config, &input);

    let span = input.ident.span();
    let entity_ident = syn::Ident::new("Entity", span);

    // The identifier is mandatory; validate_config has already checked it.
    let Some((id_name, _)) = config.id_col.as_ref() else {
        abort!(input.span(), "persist: missing `id = \"column_name\"`");
    };
    let id_variant = column_variant(id_name, span);
    let id_field = field_ident(id_name, span);

    let tenant_col_impl = col_option_impl("tenant_col", config.tenant_col.as_ref(), span);
    let soft_delete_col_impl =
        col_option_impl("soft_delete_col", config.soft_delete_col.as_ref(), span);

    let audited = config.created_col.is_some();
    let set_created_impl = writer_impl("set_created_at", "at", config.created_col.as_ref(), span);
    let set_updated_impl = writer_impl("set_updated_at", "at", config.updated_col.as_ref(), span);
    let set_tenant_impl = tenant_writer_impl(config.tenant_col.as_ref(), span);

    quote! {
        impl ::storekit_db::StoreEntity for #entity_ident {
            const AUDITED: bool = #audited;

            fn id_col() -> Self::Column {
                Self::Column::#id_variant
            }

            fn id_of(model: &Self::Model) -> ::uuid::Uuid {
                model.#id_field
            }

            fn id_of_row(row: &Self::ActiveModel) -> ::core::option::Option<::uuid::Uuid> {
                match &row.#id_field {
                    ::sea_orm::ActiveValue::Set(v) | ::sea_orm::ActiveValue::Unchanged(v) => {
                        ::core::option::Option::Some(*v)
                    }
                    ::sea_orm::ActiveValue::NotSet => ::core::option::Option::None,
                }
            }

            #tenant_col_impl

            #soft_delete_col_impl

            #set_created_impl

            #set_updated_impl

            #set_tenant_impl
        }
    }
}

/// Generate an `Option<Self::Column>` metadata method
fn col_option_impl(
    method_name: &str,
    col: Option<&(String, Span)>,
    default_span: Span,
) -> TokenStream {
    let method_ident = syn::Ident::new(method_name, default_span);

    if let Some((col_name, _)) = col {
        let col_ident = column_variant(col_name, default_span);
        quote! {
            fn #method_ident() -> ::core::option::Option<Self::Column> {
                ::core::option::Option::Some(Self::Column::#col_ident)
            }
        }
    } else {
        quote! {
            fn #method_ident() -> ::core::option::Option<Self::Column> {
                ::core::option::Option::None
            }
        }
    }
}

/// Generate a timestamp writer; a no-op when the column is not declared
fn writer_impl(
    method_name: &str,
    arg_name: &str,
    col: Option<&(String, Span)>,
    default_span: Span,
) -> TokenStream {
    let method_ident = syn::Ident::new(method_name, default_span);
    let arg_ident = syn::Ident::new(arg_name, default_span);

    if let Some((col_name, _)) = col {
        let field = field_ident(col_name, default_span);
        quote! {
            fn #method_ident(row: &mut Self::ActiveModel, #arg_ident: ::time::OffsetDateTime) {
                row.#field = ::sea_orm::ActiveValue::Set(#arg_ident);
            }
        }
    } else {
        let unused = syn::Ident::new(&format!("_{arg_name}"), default_span);
        quote! {
            fn #method_ident(_row: &mut Self::ActiveModel, #unused: ::time::OffsetDateTime) {}
        }
    }
}

/// Generate the tenant writer; a no-op when the entity is not tenant-owned
fn tenant_writer_impl(col: Option<&(String, Span)>, default_span: Span) -> TokenStream {
    if let Some((col_name, _)) = col {
        let field = field_ident(col_name, default_span);
        quote! {
            fn set_tenant_id(row: &mut Self::ActiveModel, tenant: ::uuid::Uuid) {
                row.#field = ::sea_orm::ActiveValue::Set(tenant);
            }
        }
    } else {
        quote! {
            fn set_tenant_id(_row: &mut Self::ActiveModel, _tenant: ::uuid::Uuid) {}
        }
    }
}

/// Validate the configuration for strict compile-time checks
fn validate_config(config: &PersistConfig, input: &DeriveInput) {
    let struct_span = input.span();

    if config.id_col.is_none() {
        abort!(
            struct_span,
            "persist: missing explicit identifier:\n  use `id = \"column_name\"`"
        );
    }

    validate_dimension(
        "tenant",
        config.tenant_col.as_ref(),
        config.no_tenant,
        struct_span,
    );
    validate_dimension(
        "soft_delete",
        config.soft_delete_col.as_ref(),
        config.no_soft_delete,
        struct_span,
    );

    // Audit is a paired dimension: created and updated travel together.
    match (
        config.created_col.as_ref(),
        config.updated_col.as_ref(),
        &config.no_audit,
    ) {
        (None, None, None) => {
            abort!(
                struct_span,
                "persist: missing explicit decision for audit:\n  \
                 use `created = \"column_name\", updated = \"column_name\"` or `no_audit`"
            );
        }
        (Some((_, span)), None, _) => {
            abort!(*span, "persist: `created` requires a matching `updated`");
        }
        (None, Some((_, span)), _) => {
            abort!(*span, "persist: `updated` requires a matching `created`");
        }
        (Some((_, span)), Some(_), Some(_)) => {
            abort!(
                *span,
                "persist: specify either audit columns or `no_audit`, not both"
            );
        }
        _ => {}
    }

    // Tenant ownership implies the audit columns.
    if let Some((_, span)) = config.tenant_col.as_ref()
        && config.no_audit.is_some()
    {
        abort!(
            *span,
            "persist: tenant-owned entities carry audit columns; replace `no_audit` \
             with `created = ... , updated = ...`"
        );
    }
}

/// Validate a single dimension has exactly one specification
fn validate_dimension(
    name: &str,
    col: Option<&(String, Span)>,
    no_col: Option<Span>,
    struct_span: Span,
) {
    match (col, &no_col) {
        (None, None) => {
            let msg = format!(
                "persist: missing explicit decision for {name}:\n  \
                 use `{name} = \"column_name\"` or `no_{name}`"
            );
            abort!(struct_span, msg);
        }
        (Some((_, col_span)), Some(_no_span)) => {
            let abort_msg = format!("persist: specify either `{name}` or `no_{name}`, not both");
            abort!(*col_span, abort_msg);
        }
        _ => {}
    }
}

/// Parse all `#[persist(...)]` attributes with duplicate detection
fn parse_persist_attrs(input: &DeriveInput) -> PersistConfig {
    let mut config = PersistConfig::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("persist") {
            continue;
        }

        let result = attr.parse_nested_meta(|meta| {
            let span = meta.path.span();

            if meta.path.is_ident("no_tenant") {
                if config.no_tenant.is_some() {
                    abort!(span, "duplicate attribute 'no_tenant'");
                }
                if config.tenant_col.is_some() {
                    abort!(
                        span,
                        "persist: specify either `tenant` or `no_tenant`, not both"
                    );
                }
                config.no_tenant = Some(span);
                return Ok(());
            }

            if meta.path.is_ident("no_audit") {
                if config.no_audit.is_some() {
                    abort!(span, "duplicate attribute 'no_audit'");
                }
                config.no_audit = Some(span);
                return Ok(());
            }

            if meta.path.is_ident("no_soft_delete") {
                if config.no_soft_delete.is_some() {
                    abort!(span, "duplicate attribute 'no_soft_delete'");
                }
                if config.soft_delete_col.is_some() {
                    abort!(
                        span,
                        "persist: specify either `soft_delete` or `no_soft_delete`, not both"
                    );
                }
                config.no_soft_delete = Some(span);
                return Ok(());
            }

            // Key-value pair
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();

            if key.is_empty() {
                abort!(span, "Expected attribute name");
            }

            let value: String = match meta.value() {
                Ok(v) => match v.parse::<syn::LitStr>() {
                    Ok(lit) => lit.value(),
                    Err(_) => abort!(span, "Expected string literal"),
                },
                Err(_) => abort!(span, "Expected '=' followed by a string value"),
            };

            match key.as_str() {
                "id" => {
                    if config.id_col.is_some() {
                        abort!(span, "duplicate attribute 'id'");
                    }
                    config.id_col = Some((value, span));
                }
                "tenant" => {
                    if config.tenant_col.is_some() {
                        abort!(span, "duplicate attribute 'tenant'");
                    }
                    if config.no_tenant.is_some() {
                        abort!(
                            span,
                            "persist: specify either `tenant` or `no_tenant`, not both"
                        );
                    }
                    config.tenant_col = Some((value, span));
                }
                "created" => {
                    if config.created_col.is_some() {
                        abort!(span, "duplicate attribute 'created'");
                    }
                    config.created_col = Some((value, span));
                }
                "updated" => {
                    if config.updated_col.is_some() {
                        abort!(span, "duplicate attribute 'updated'");
                    }
                    config.updated_col = Some((value, span));
                }
                "soft_delete" => {
                    if config.soft_delete_col.is_some() {
                        abort!(span, "duplicate attribute 'soft_delete'");
                    }
                    if config.no_soft_delete.is_some() {
                        abort!(
                            span,
                            "persist: specify either `soft_delete` or `no_soft_delete`, not both"
                        );
                    }
                    config.soft_delete_col = Some((value, span));
                }
                _ => {
                    abort!(
                        span,
                        "Unknown attribute '{}'. Valid attributes: id, tenant, no_tenant, created, updated, no_audit, soft_delete, no_soft_delete",
                        key
                    );
                }
            }

            Ok(())
        });

        if let Err(err) = result {
            abort!(err.span(), "{}", err);
        }
    }

    config
}

/// Convert a `snake_case` field name to its `UpperCamelCase` column variant
fn column_variant(s: &str, span: Span) -> syn::Ident {
    syn::Ident::new(&s.to_upper_camel_case(), span)
}

fn field_ident(s: &str, span: Span) -> syn::Ident {
    syn::Ident::new(s, span)
}
