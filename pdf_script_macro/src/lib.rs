mod script_enum;

use proc_macro::TokenStream;
use script_enum::script_enum_inner;

/// Turns an enum of `Variant = "keyword"` pairs into a closed keyword enum with
/// `from_str`, `as_str` and `ALL`.
#[proc_macro_attribute]
pub fn script_enum(attr: TokenStream, item: TokenStream) -> TokenStream {
    script_enum_inner(attr, item)
}
