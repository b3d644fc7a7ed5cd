use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{
    braced, parse::Parse, parse_macro_input, punctuated::Punctuated, token, LitStr, Token,
    Visibility,
};

struct ScriptEnumVariant {
    attrs: Vec<syn::Attribute>,
    name: Ident,
    #[allow(dead_code)]
    tok_eq: Token![=],
    value: LitStr,
}

impl Parse for ScriptEnumVariant {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        Ok(ScriptEnumVariant {
            attrs: input.call(syn::Attribute::parse_outer)?,
            name: input.parse()?,
            tok_eq: input.parse()?,
            value: input.parse()?,
        })
    }
}

struct ScriptEnum {
    attrs: Vec<syn::Attribute>,
    vis: Visibility,
    #[allow(dead_code)]
    kw_enum: Token![enum],
    name: Ident,
    #[allow(dead_code)]
    tok_brace: token::Brace,
    variants: Punctuated<ScriptEnumVariant, Token![,]>,
}

impl Parse for ScriptEnum {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let content;
        Ok(ScriptEnum {
            attrs: input.call(syn::Attribute::parse_outer)?,
            vis: input.parse()?,
            kw_enum: input.parse()?,
            name: input.parse()?,
            tok_brace: braced!(content in input),
            variants: content.parse_terminated(ScriptEnumVariant::parse, Token![,])?,
        })
    }
}

pub fn script_enum_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let value_form = parse_macro_input!(attr as Option<Ident>)
        .unwrap_or_else(|| Ident::new("Keyword", Span::call_site()));
    let item = parse_macro_input!(item as ScriptEnum);

    let ScriptEnum {
        vis,
        name,
        variants,
        attrs,
        ..
    } = item;

    let field_attrs = variants.iter().map(|v| &v.attrs).collect::<Vec<_>>();
    let field_names = variants.iter().map(|v| &v.name).collect::<Vec<_>>();
    let field_values = variants.iter().map(|v| &v.value).collect::<Vec<_>>();

    // names are written with a leading `/` in scripts, keywords are bare
    let name_impl = if value_form == Ident::new("Name", Span::call_site()) {
        quote!(impl #name {
            pub fn from_name(s: &str) -> crate::PdfResult<Self> {
                match s.strip_prefix('/') {
                    Some(bare) => Self::from_str(bare),
                    None => anyhow::bail!(crate::ParseError::UnrecognizedVariant {
                        ty: stringify!(#name),
                        found: s.to_owned(),
                    }),
                }
            }
        })
    } else {
        quote!()
    };

    quote!(
        #(#attrs)*
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
        #vis enum #name {
            #(
                #(#field_attrs)*
                #field_names,
            )*
        }

        impl #name {
            pub const ALL: &'static [Self] = &[#(Self::#field_names),*];

            pub fn from_str(s: &str) -> crate::PdfResult<Self> {
                Ok(match s {
                    #(#field_values => Self::#field_names,)*
                    _ => anyhow::bail!(crate::ParseError::UnrecognizedVariant {
                        ty: stringify!(#name),
                        found: s.to_owned(),
                    })
                })
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#field_names => #field_values,)*
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #name_impl
    )
    .into()
}
