//! Procedural macros shared by the tilebridge crates.
//!
//! [`macro@context`] wraps the `anyhow` error returned by a function with a
//! formatted message. The message may use the function's arguments: the body
//! runs in a closure first, and the message is formatted only on error.
//!
//! ```ignore
//! #[context("reading tile file '{}'", path.display())]
//! fn read(path: &Path) -> Result<Blob> {
//! 	Ok(Blob::from(fs::read(path)?))
//! }
//! ```
//!
//! A body that moves an argument cannot use that argument in the message.

mod args;

use crate::args::Args;
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Ident, ItemFn, ReturnType, parse_macro_input};

#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = parse_macro_input!(args as Args);
	let function = parse_macro_input!(input as ItemFn);

	match wrap_body(args, function) {
		Ok(tokens) => tokens.into(),
		Err(err) => err.to_compile_error().into(),
	}
}

fn wrap_body(args: Args, mut function: ItemFn) -> syn::Result<TokenStream2> {
	if let Some(token) = &function.sig.asyncness {
		return Err(syn::Error::new_spanned(token, "#[context] does not support async functions"));
	}
	let ReturnType::Type(_, return_type) = &function.sig.output else {
		return Err(syn::Error::new_spanned(&function.sig, "#[context] needs a function returning Result"));
	};

	let Args { message, rest } = args;
	let body = &function.block;
	let err = Ident::new("err", Span::mixed_site());
	let once = Ident::new("once", Span::mixed_site());

	// dropping `once` inside makes the closure `FnOnce`, so the body may move captured values
	let wrapped = quote! {
		let #once = ::std::string::String::new();
		(|| -> #return_type {
			::core::mem::drop(#once);
			#body
		})()
		.map_err(|#err| ::anyhow::Error::from(#err).context(::std::format!(#message #rest)).into())
	};

	function.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(wrapped), None)];
	Ok(function.into_token_stream())
}
