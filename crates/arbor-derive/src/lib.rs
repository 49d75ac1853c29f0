//! Proc-macro support for arbor commands.

use std::{collections::BTreeSet, result::Result as StdResult};

use proc_macro_error::*;
use quote::{format_ident, quote};
use structmeta::StructMeta;
use syn::{
    Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, ReturnType,
    Type, parse_macro_input,
};

/// Local result type for macro parsing.
type Result<T> = StdResult<T, Error>;

/// Errors raised while parsing command metadata.
#[derive(PartialEq, Eq, thiserror::Error, Debug, Clone)]
enum Error {
    /// Failed to parse an attribute payload.
    #[error("parse error: {0}")]
    Parse(String),
    /// Unsupported signature.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Invalid command name.
    #[error("invalid command name: {0}")]
    Name(String),
}

impl From<Error> for Diagnostic {
    fn from(e: Error) -> Self {
        Self::spanned(proc_macro2::Span::call_site(), Level::Error, format!("{e}"))
    }
}

/// Arguments to the `command` attribute.
#[derive(Debug, Default, StructMeta)]
struct MacroArgs {
    /// Command name. Defaults to the method name.
    name: Option<LitStr>,
    /// Availability predicate: a method defined in the same impl block.
    when: Option<syn::Ident>,
}

/// Parsed metadata describing a command.
#[derive(Debug, Clone)]
struct CommandMeta {
    /// Registered command name.
    name: String,
    /// Method implementing the command.
    method: syn::Ident,
    /// Whether the method takes the controller context.
    takes_context: bool,
    /// Whether the method returns a Result.
    is_result: bool,
    /// Availability predicate method, if any.
    when: Option<syn::Ident>,
}

/// Is this the `command` attribute?
fn is_command_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("command")
}

/// Parse the payload of a `#[command]` attribute.
fn parse_macro_args(attr: &Attribute) -> Result<MacroArgs> {
    match &attr.meta {
        Meta::Path(_) => Ok(MacroArgs::default()),
        Meta::List(_) => attr
            .parse_args::<MacroArgs>()
            .map_err(|e| Error::Parse(e.to_string())),
        Meta::NameValue(_) => Err(Error::Parse("invalid command argument".into())),
    }
}

/// Determine whether a type is a shared reference to a `Context`.
fn is_context_ref(ty: &Type) -> Result<bool> {
    let Type::Reference(reference) = ty else {
        return Ok(false);
    };
    let Type::Path(path) = &*reference.elem else {
        return Ok(false);
    };
    let Some(segment) = path.path.segments.last() else {
        return Ok(false);
    };
    if segment.ident != "Context" {
        return Ok(false);
    }
    if reference.mutability.is_some() {
        return Err(Error::Unsupported(
            "the context is passed as &Context<Self>".into(),
        ));
    }
    Ok(true)
}

/// Does the return type denote a `Result`?
fn parse_return_type(output: &ReturnType) -> Result<bool> {
    match output {
        ReturnType::Default => Ok(false),
        ReturnType::Type(_, ty) => match &**ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(false),
            Type::Path(path) if path.path.segments.last().is_some_and(|s| s.ident == "Result") => {
                Ok(true)
            }
            _ => Err(Error::Unsupported(
                "command methods return () or Result<(), E>".into(),
            )),
        },
    }
}

/// Parse an impl method annotated with `#[command]`, stripping the
/// attribute.
fn parse_command_method(method: &mut ImplItemFn) -> Result<Option<CommandMeta>> {
    let mut macro_args = None;
    for attr in &method.attrs {
        if is_command_attr(attr) {
            if macro_args.is_some() {
                return Err(Error::Parse("duplicate command attribute".into()));
            }
            macro_args = Some(parse_macro_args(attr)?);
        }
    }
    let Some(macro_args) = macro_args else {
        return Ok(None);
    };
    method.attrs.retain(|attr| !is_command_attr(attr));

    let mut inputs = method.sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(Error::Unsupported("command methods must take &self".into()));
        }
    }
    let takes_context = match inputs.next() {
        None => false,
        Some(FnArg::Typed(pat)) if is_context_ref(&pat.ty)? => true,
        Some(_) => {
            return Err(Error::Unsupported(
                "the only command argument is &Context<Self>".into(),
            ));
        }
    };
    if inputs.next().is_some() {
        return Err(Error::Unsupported(
            "the only command argument is &Context<Self>".into(),
        ));
    }
    if !method.sig.generics.params.is_empty() {
        return Err(Error::Unsupported("command methods cannot be generic".into()));
    }

    let name = match &macro_args.name {
        Some(lit) => lit.value(),
        None => method.sig.ident.to_string(),
    };
    if name.trim().is_empty() {
        return Err(Error::Name("command names cannot be empty".into()));
    }

    Ok(Some(CommandMeta {
        name,
        method: method.sig.ident.clone(),
        takes_context,
        is_result: parse_return_type(&method.sig.output)?,
        when: macro_args.when,
    }))
}

/// Does the named predicate take only `&self`? The predicate must be a
/// method of the same impl block, since other blocks are invisible here.
fn predicate_is_bare(items: &[ImplItem], name: &syn::Ident) -> Result<bool> {
    items
        .iter()
        .find_map(|item| match item {
            ImplItem::Fn(f) if f.sig.ident == *name => Some(f.sig.inputs.len() == 1),
            _ => None,
        })
        .ok_or_else(|| {
            Error::Unsupported(format!(
                "predicate `{name}` must be defined in the same impl block as its command"
            ))
        })
}

/// Build the registration statement for one command.
fn registration(cmd: &CommandMeta, items: &[ImplItem]) -> Result<proc_macro2::TokenStream> {
    let name = &cmd.name;
    let method = &cmd.method;
    let (cx, call) = if cmd.takes_context {
        (format_ident!("cx"), quote! { this.#method(cx) })
    } else {
        (format_ident!("_cx"), quote! { this.#method() })
    };
    let body = if cmd.is_result {
        quote! { #call.map_err(arbor::commands::exec_error) }
    } else {
        quote! {
            #call;
            Ok(())
        }
    };
    let action = quote! {
        |this: &Self, #cx: &arbor::Context<Self>| { #body }
    };
    Ok(match &cmd.when {
        None => quote! {
            registry.register(#name, #action)?;
        },
        Some(when) => {
            let predicate = if predicate_is_bare(items, when)? {
                quote! { |this: &Self, _cx: &arbor::Context<Self>| this.#when() }
            } else {
                quote! { |this: &Self, cx: &arbor::Context<Self>| this.#when(cx) }
            };
            quote! {
                registry.register_with_predicate(#name, #predicate, #action)?;
            }
        }
    })
}

/// Generate a `Commands` implementation from the `#[command]` methods in an
/// impl block.
#[proc_macro_error]
#[proc_macro_attribute]
pub fn derive_commands(
    _attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let mut input = parse_macro_input!(input as ItemImpl);
    if input.trait_.is_some() {
        abort_call_site!("derive_commands applies to inherent impl blocks");
    }

    let name = input.self_ty.clone();
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let mut commands = Vec::new();
    let mut seen = BTreeSet::new();
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item
            && let Some(command) = parse_command_method(method).unwrap_or_abort()
        {
            if !seen.insert(command.name.clone()) {
                abort!(
                    method.sig.ident.span(),
                    "duplicate command name: {}",
                    command.name
                );
            }
            commands.push(command);
        }
    }

    let mut registrations: Vec<_> = commands
        .iter()
        .map(|cmd| registration(cmd, &input.items).unwrap_or_abort())
        .collect();
    if registrations.is_empty() {
        registrations.push(quote! { let _ = registry; });
    }

    let output = quote! {
        #input

        impl #impl_generics arbor::commands::Commands for #name #where_clause {
            fn register_commands(
                registry: &mut arbor::commands::CommandRegistry<Self>,
            ) -> arbor::error::Result<()>
            where
                Self: arbor::Controller,
            {
                #(#registrations)*
                Ok(())
            }
        }
    };
    output.into()
}

/// Mark a method as a command. This macro should be used to decorate methods in
/// an `impl` block that uses the `derive_commands` macro.
#[proc_macro_attribute]
pub fn command(
    _attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    input
}
