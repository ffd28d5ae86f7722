use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitStr};

/// Registers the annotated function in the command registry under its own
/// name, or under the name given as `#[command_handler("name")]`.
#[proc_macro_attribute]
pub fn command_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    let fn_name = &input_fn.sig.ident;

    let command_name = if attr.is_empty() {
        fn_name.to_string()
    } else {
        parse_macro_input!(attr as LitStr).value()
    };

    let expanded = quote! {
        #input_fn

        paste::paste! {
            #[ctor::ctor]
            fn [<__register_command_ #fn_name>]() {
                crate::controller::discord::interaction::register_command(
                    #command_name,
                    #fn_name
                );
            }
        }
    };

    TokenStream::from(expanded)
}
