//! Microbench Macros
//!
//! Procedural macros that register benchmark candidates and hooks.
//!
//! ## Macros
//!
//! - `#[microbench::bench]` - Register a function as a benchmark candidate
//! - `#[microbench::hook]` - Register a function usable as a before/after-each hook
//! - `#[microbench::benchmarks]` - Register the `#[bench]`/`#[hook]` items of an `impl` block
//!
//! Every marked function is registered, whatever its signature. Only functions
//! callable as `fn()` get an entry point; the others are registered with their
//! declared shape so the runner can report them by name.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, FnArg, ImplItem, ItemFn, ItemImpl, Signature, Type, parse_macro_input,
};

// ============================================================================
// Attribute Parsing Helpers
// ============================================================================

mod attr {
    use syn::meta::ParseNestedMeta;
    use syn::{Expr, ExprLit, ExprUnary, Lit, UnOp};

    /// Get the attribute name as a string
    pub fn name(meta: &ParseNestedMeta) -> String {
        meta.path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default()
    }

    /// Parse a string literal attribute: `attr = "value"`
    pub fn string(meta: &ParseNestedMeta) -> syn::Result<String> {
        let value: syn::LitStr = meta.value()?.parse()?;
        Ok(value.value())
    }

    /// Parse a possibly negative integer attribute: `attr = 42`, `attr = -1`
    pub fn signed(meta: &ParseNestedMeta) -> syn::Result<i64> {
        let expr: Expr = meta.value()?.parse()?;
        match &expr {
            Expr::Lit(ExprLit {
                lit: Lit::Int(int), ..
            }) => int.base10_parse(),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: inner,
                ..
            }) => match inner.as_ref() {
                Expr::Lit(ExprLit {
                    lit: Lit::Int(int), ..
                }) => int.base10_parse::<i64>().map(|v| -v),
                other => Err(syn::Error::new_spanned(other, "expected an integer literal")),
            },
            other => Err(syn::Error::new_spanned(other, "expected an integer literal")),
        }
    }

    /// Hook reference as written in the attribute.
    pub enum Hook {
        /// `before_each = "my_crate::fixtures::reset"`
        Named(String),
        /// `before_each = fixtures::reset`
        Path(syn::Path),
    }

    /// Parse a hook attribute: a string reference or a function path
    pub fn hook(meta: &ParseNestedMeta) -> syn::Result<Hook> {
        let expr: Expr = meta.value()?.parse()?;
        match expr {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(Hook::Named(s.value())),
            Expr::Path(p) if p.qself.is_none() => Ok(Hook::Path(p.path)),
            other => Err(syn::Error::new_spanned(
                other,
                "expected a function path or a string reference",
            )),
        }
    }

    /// Create an unknown attribute error
    pub fn unknown(meta: &ParseNestedMeta, name: &str) -> syn::Error {
        meta.error(format!("unknown attribute: {}", name))
    }
}

// ============================================================================
// #[bench]
// ============================================================================

/// Register a benchmark candidate
///
/// # Example
///
/// ```ignore
/// #[microbench::bench]
/// fn parse_small() {
///     parse("{}");
/// }
///
/// // With configuration
/// #[microbench::bench(
///     warm_up_iterations = 10,
///     iterations = 500,
///     tear_down_iterations = 0,
///     before_each = fixtures::reset,
///     after_each = "my_crate::fixtures::check",
///     comment = "cold cache"
/// )]
/// fn parse_large() { ... }
/// ```
///
/// `warm_up` and `tear_down` are accepted as short forms. Counts default to 1000.
///
/// For associated functions, put `#[bench]` on the items of an `impl` block
/// marked `#[microbench::benchmarks]`.
#[proc_macro_attribute]
pub fn bench(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let func = parse_macro_input!(item as ItemFn);

    bench_impl(args, func)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn bench_impl(args: TokenStream2, func: ItemFn) -> Result<TokenStream2, syn::Error> {
    if let Some(receiver) = func.sig.receiver() {
        return Err(syn::Error::new_spanned(
            receiver,
            "microbench: methods must be registered through `#[microbench::benchmarks]` on their impl block",
        ));
    }
    validate_signature(&func.sig)?;

    let config = parse_bench_config(args)?;
    let registration = bench_registration(&func.sig, None, &config)?;

    Ok(quote! {
        #func

        #registration
    })
}

#[derive(Default)]
struct BenchConfig {
    warm_up: Option<i64>,
    iterations: Option<i64>,
    tear_down: Option<i64>,
    before_each: Option<attr::Hook>,
    after_each: Option<attr::Hook>,
    comment: Option<String>,
}

fn parse_bench_config(args: TokenStream2) -> Result<BenchConfig, syn::Error> {
    let mut config = BenchConfig::default();

    if args.is_empty() {
        return Ok(config);
    }

    let parser = syn::meta::parser(|meta| {
        let name = attr::name(&meta);
        match name.as_str() {
            "warm_up_iterations" | "warm_up" => config.warm_up = Some(attr::signed(&meta)?),
            "iterations" => config.iterations = Some(attr::signed(&meta)?),
            "tear_down_iterations" | "tear_down" => config.tear_down = Some(attr::signed(&meta)?),
            "before_each" => config.before_each = Some(attr::hook(&meta)?),
            "after_each" => config.after_each = Some(attr::hook(&meta)?),
            "comment" => config.comment = Some(attr::string(&meta)?),
            _ => return Err(attr::unknown(&meta, &name)),
        }
        Ok(())
    });

    syn::parse::Parser::parse2(parser, args)?;
    Ok(config)
}

/// Rejects signatures that cannot be registered at all.
fn validate_signature(sig: &Signature) -> syn::Result<()> {
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            sig.asyncness,
            "microbench: async functions cannot be benchmarked",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "microbench: generic functions cannot be benchmarked",
        ));
    }
    Ok(())
}

/// `impl` block context for associated functions.
struct Owner<'a> {
    ty: &'a Type,
    name: String,
}

/// Build the `const BenchmarkConfig` expression for a registration.
fn config_expr(config: &BenchConfig, owner: Option<&Owner>) -> TokenStream2 {
    let mut expr = quote! { ::microbench::BenchmarkConfig::new() };
    if let Some(n) = config.warm_up.map(int_expr) {
        expr = quote! { #expr.warm_up_iterations(#n) };
    }
    if let Some(n) = config.iterations.map(int_expr) {
        expr = quote! { #expr.iterations(#n) };
    }
    if let Some(n) = config.tear_down.map(int_expr) {
        expr = quote! { #expr.tear_down_iterations(#n) };
    }
    if let Some(hook) = &config.before_each {
        let hook = hook_expr(hook, owner);
        expr = quote! { #expr.before_each(#hook) };
    }
    if let Some(hook) = &config.after_each {
        let hook = hook_expr(hook, owner);
        expr = quote! { #expr.after_each(#hook) };
    }
    if let Some(comment) = &config.comment {
        expr = quote! { #expr.comment(#comment) };
    }
    expr
}

fn hook_expr(hook: &attr::Hook, owner: Option<&Owner>) -> TokenStream2 {
    match hook {
        attr::Hook::Named(name) => quote! { ::microbench::HookRef::Named(#name) },
        attr::Hook::Path(path) => {
            let path = qualify_self(path, owner);
            quote! { ::microbench::HookRef::Function(#path) }
        }
    }
}

/// Registrations are emitted outside the `impl` block, where `Self` means nothing.
fn qualify_self(path: &syn::Path, owner: Option<&Owner>) -> TokenStream2 {
    match (owner, path.segments.first()) {
        (Some(owner), Some(first)) if first.ident == "Self" && path.leading_colon.is_none() => {
            let ty = owner.ty;
            let rest = path.segments.iter().skip(1);
            quote! { <#ty> #(:: #rest)* }
        }
        _ => path.to_token_stream(),
    }
}

/// Emit the entry wrapper (when callable as `fn()`) and the `inventory` submission.
fn bench_registration(
    sig: &Signature,
    owner: Option<&Owner>,
    config: &BenchConfig,
) -> Result<TokenStream2, syn::Error> {
    let fn_name = &sig.ident;
    let fn_name_str = fn_name.unraw().to_string();
    let config = config_expr(config, owner);

    let receiver = match sig.receiver() {
        None => quote! { ::microbench::Receiver::None },
        Some(r) if r.reference.is_none() => quote! { ::microbench::Receiver::Value },
        Some(r) if r.mutability.is_some() => quote! { ::microbench::Receiver::RefMut },
        Some(_) => quote! { ::microbench::Receiver::Ref },
    };
    let params: Vec<String> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(type_name(&pat.ty)),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let owner_expr = match owner {
        Some(owner) => {
            let name = &owner.name;
            quote! { .owner(#name) }
        }
        None => quote! {},
    };

    if sig.receiver().is_none() && params.is_empty() {
        let wrapper_name = match owner {
            Some(owner) => format_ident!("__microbench_entry_{}_{}", owner.name, fn_name_str),
            None => format_ident!("__microbench_entry_{}", fn_name_str),
        };
        let call = match owner {
            Some(owner) => {
                let ty = owner.ty;
                quote! { <#ty>::#fn_name() }
            }
            None => quote! { #fn_name() },
        };

        Ok(quote! {
            #[doc(hidden)]
            #[allow(non_snake_case)]
            fn #wrapper_name() {
                let _ = ::core::hint::black_box(#call);
            }

            ::microbench::internal::inventory::submit! {
                ::microbench::BenchmarkDef::function(module_path!(), #fn_name_str, #wrapper_name)
                    #owner_expr
                    .config(#config)
                    .location(file!(), line!())
            }
        })
    } else {
        Ok(quote! {
            ::microbench::internal::inventory::submit! {
                ::microbench::BenchmarkDef::declared(
                    module_path!(),
                    #fn_name_str,
                    ::microbench::Shape {
                        receiver: #receiver,
                        params: &[#(#params),*],
                    },
                )
                #owner_expr
                .config(#config)
                .location(file!(), line!())
            }
        })
    }
}

/// Type as written, without the token-stream spacing (`&mut Vec<u8>`, not `& mut Vec < u8 >`).
fn type_name(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' {
            let after_opener = out.ends_with(['&', '<', '(', '[', ':']);
            let before_closer = chars
                .peek()
                .is_some_and(|next| matches!(next, '<' | '>' | ',' | ')' | ']' | ';' | ':'));
            if after_opener || before_closer {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Integer literal, negated when needed.
fn int_expr(n: i64) -> TokenStream2 {
    let magnitude = proc_macro2::Literal::u64_unsuffixed(n.unsigned_abs());
    if n < 0 {
        quote! { -#magnitude }
    } else {
        quote! { #magnitude }
    }
}

// ============================================================================
// #[hook]
// ============================================================================

/// Register a function that benchmarks can run before or after each iteration
///
/// # Example
///
/// ```ignore
/// #[microbench::hook]
/// fn reset_cache() { CACHE.clear(); }
///
/// #[microbench::bench(before_each = "my_crate::reset_cache")]
/// fn lookup() { ... }
/// ```
///
/// Hooks take no arguments. A hook used only through a function path
/// (`before_each = reset_cache`) does not need this attribute.
#[proc_macro_attribute]
pub fn hook(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let func = parse_macro_input!(item as ItemFn);

    hook_impl(args, func)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn hook_impl(args: TokenStream2, func: ItemFn) -> Result<TokenStream2, syn::Error> {
    if !args.is_empty() {
        return Err(syn::Error::new_spanned(args, "microbench: `#[hook]` takes no arguments"));
    }
    validate_hook_signature(&func.sig)?;
    let registration = hook_registration(&func.sig, None);

    Ok(quote! {
        #func

        #registration
    })
}

fn validate_hook_signature(sig: &Signature) -> syn::Result<()> {
    validate_signature(sig)?;
    if !sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            "microbench: hooks must be static functions without parameters",
        ));
    }
    Ok(())
}

fn hook_registration(sig: &Signature, owner: Option<&Owner>) -> TokenStream2 {
    let fn_name = &sig.ident;
    let fn_name_str = fn_name.unraw().to_string();

    let (module_path, func) = match owner {
        Some(owner) => {
            let name = &owner.name;
            let ty = owner.ty;
            (
                quote! { concat!(module_path!(), "::", #name) },
                quote! { <#ty>::#fn_name },
            )
        }
        None => (quote! { module_path!() }, quote! { #fn_name }),
    };

    quote! {
        ::microbench::internal::inventory::submit! {
            ::microbench::HookDef {
                name: #fn_name_str,
                module_path: #module_path,
                func: #func,
            }
        }
    }
}

// ============================================================================
// #[benchmarks]
// ============================================================================

/// Register the `#[bench]` and `#[hook]` associated functions of an inherent `impl` block
///
/// # Example
///
/// ```ignore
/// struct Cache;
///
/// #[microbench::benchmarks]
/// impl Cache {
///     #[hook]
///     fn clear() { ... }
///
///     #[bench(before_each = Self::clear, iterations = 100)]
///     fn fill() { ... }
///
///     // Registered, reported as not static
///     #[bench]
///     fn lookup(&self) { ... }
/// }
/// ```
#[proc_macro_attribute]
pub fn benchmarks(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let input = parse_macro_input!(item as ItemImpl);

    benchmarks_impl(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn benchmarks_impl(args: TokenStream2, mut input: ItemImpl) -> Result<TokenStream2, syn::Error> {
    if !args.is_empty() {
        return Err(syn::Error::new_spanned(
            args,
            "microbench: `#[benchmarks]` takes no arguments",
        ));
    }
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "microbench: `#[benchmarks]` applies to inherent impl blocks only",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "microbench: `#[benchmarks]` does not support generic impl blocks",
        ));
    }

    let self_ty = input.self_ty.as_ref().clone();
    let owner = Owner {
        name: owner_name(&self_ty)?,
        ty: &self_ty,
    };

    let mut registrations = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        if let Some(args) = take_attr(&mut method.attrs, "bench")? {
            validate_signature(&method.sig)?;
            let config = parse_bench_config(args)?;
            registrations.push(bench_registration(&method.sig, Some(&owner), &config)?);
        }
        if let Some(args) = take_attr(&mut method.attrs, "hook")? {
            if !args.is_empty() {
                return Err(syn::Error::new_spanned(
                    args,
                    "microbench: `#[hook]` takes no arguments",
                ));
            }
            if let Some(receiver) = method.sig.receiver() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "microbench: hooks must be static functions without parameters",
                ));
            }
            validate_hook_signature(&method.sig)?;
            registrations.push(hook_registration(&method.sig, Some(&owner)));
        }
    }

    Ok(quote! {
        #input

        #(#registrations)*
    })
}

fn owner_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p
            .path
            .segments
            .last()
            .filter(|seg| seg.arguments.is_empty())
            .map(|seg| seg.ident.unraw().to_string())
            .ok_or_else(|| {
                syn::Error::new_spanned(ty, "microbench: expected a plain type name")
            }),
        _ => Err(syn::Error::new_spanned(
            ty,
            "microbench: expected a plain type name",
        )),
    }
}

/// Remove `#[name(...)]` (or `#[microbench::name(...)]`) from `attrs`, returning its arguments.
fn take_attr(attrs: &mut Vec<Attribute>, name: &str) -> syn::Result<Option<TokenStream2>> {
    let Some(index) = attrs.iter().position(|a| {
        a.path()
            .segments
            .last()
            .is_some_and(|seg| seg.ident == name)
    }) else {
        return Ok(None);
    };

    let attr = attrs.remove(index);
    match attr.meta {
        syn::Meta::Path(_) => Ok(Some(TokenStream2::new())),
        syn::Meta::List(list) => Ok(Some(list.tokens)),
        syn::Meta::NameValue(nv) => Err(syn::Error::new_spanned(
            nv,
            format!("microbench: expected `#[{name}]` or `#[{name}(...)]`"),
        )),
    }
}
