use proc_macro2::TokenStream as TokenStream2;
use syn::{
	LitStr, Token,
	parse::{self, Parse, ParseStream},
};

/// Arguments of `#[context(...)]`: a format string, optionally followed by
/// `, arg, arg, ...`.
#[derive(Debug)]
pub struct Args {
	pub message: LitStr,
	pub rest: TokenStream2,
}

impl Parse for Args {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		let message: LitStr = input.parse()?;
		if !input.is_empty() {
			input.fork().parse::<Token![,]>()?;
		}
		Ok(Args {
			message,
			rest: input.parse()?,
		})
	}
}
