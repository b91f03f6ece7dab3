mod ascii_table;

use crate::ascii_table::generate_byte_lookup_table_impl;
use proc_macro::TokenStream;

/// Generate a byte classification lookup table. See [`ascii_table`] for the
/// accepted syntax.
#[proc_macro]
pub fn generate_byte_lookup_table(input: TokenStream) -> TokenStream {
    generate_byte_lookup_table_impl(input)
}
