use std::collections::HashSet;

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{
    braced,
    parse::{Parse, ParseStream},
    parse_macro_input,
    token::{Colon, Comma, FatArrow},
    Attribute, LitInt, Visibility,
};

// define_codes! {
//      #[attrs]
//      pub EnumName: repr {
//          number => Ident,
//          ...
//      }
// }
struct DefineCodesInput {
    visibility: Visibility,
    attributes: Vec<Attribute>,
    enum_name: Ident,
    repr: Ident,
    codes: Vec<(Ident, LitInt)>,
}

impl Parse for DefineCodesInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attributes = input.call(Attribute::parse_outer)?;
        let visibility = input.parse::<Visibility>()?;
        let enum_name = input.parse::<Ident>()?;
        input.parse::<Colon>()?;
        let repr = input.parse::<Ident>()?;

        let body;
        braced!(body in input);

        let mut codes = Vec::new();
        let mut seen = HashSet::new();

        while !body.is_empty() {
            let code = body.parse::<LitInt>()?;
            body.parse::<FatArrow>()?;
            let ident = body.parse::<Ident>()?;

            if !seen.insert(code.base10_digits().to_string()) {
                return Err(syn::Error::new(
                    code.span(),
                    format!("code {code} is assigned twice"),
                ));
            }

            codes.push((ident, code));

            if body.is_empty() {
                break;
            }
            body.parse::<Comma>()?;
        }

        Ok(Self {
            visibility,
            attributes,
            enum_name,
            repr,
            codes,
        })
    }
}

pub fn define_codes_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let DefineCodesInput {
        visibility,
        attributes,
        enum_name,
        repr,
        codes,
    } = parse_macro_input!(input as DefineCodesInput);

    let members = codes.iter().map(|(ident, _)| quote! { #ident });
    let converts = gen_converts(&repr, &codes);

    quote! {
        #(#attributes)*
        #visibility enum #enum_name {
            #(#members,)*
            Unknown(#repr),
        }

        impl #enum_name {
            #converts
        }

        impl From<#repr> for #enum_name {
            fn from(val: #repr) -> Self {
                Self::from_raw(val)
            }
        }

        impl From<#enum_name> for #repr {
            fn from(val: #enum_name) -> Self {
                val.into_raw()
            }
        }
    }
    .into()
}

fn gen_converts(repr: &Ident, codes: &[(Ident, LitInt)]) -> TokenStream {
    let from_raw_arms = codes.iter().map(|(ident, lit)| {
        quote! {
            #lit => Self::#ident
        }
    });

    let into_raw_arms = codes.iter().map(|(ident, lit)| {
        quote! {
            Self::#ident => #lit
        }
    });

    quote! {
        pub fn from_raw(val: #repr) -> Self {
            match val {
                #(#from_raw_arms,)*
                _ => Self::Unknown(val),
            }
        }

        pub fn into_raw(self) -> #repr {
            match self {
                #(#into_raw_arms,)*
                Self::Unknown(val) => val,
            }
        }
    }
}
