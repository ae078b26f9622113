use define_codes::define_codes_impl;
use proc_macro::TokenStream;

mod define_codes;

/// Declares an input code enum together with its raw conversions.
///
/// Every listed code becomes a unit variant, anything else converts into
/// `Unknown(raw)`.
///
/// # Examples
///
/// ```ignore
/// define_codes! {
///     #[derive(Clone, Copy, Debug)]
///     pub Button: i32 {
///         0 => Left,
///         1 => Right,
///     }
/// }
///
/// assert_eq!(Button::from_raw(1), Button::Right);
/// assert_eq!(Button::from_raw(7).into_raw(), 7);
/// ```
#[proc_macro]
pub fn define_codes(input: TokenStream) -> TokenStream {
    define_codes_impl(input)
}
