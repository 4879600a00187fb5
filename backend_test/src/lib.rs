use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, FnArg, GenericArgument, ItemFn, Pat, PathArguments,
    Signature, Type,
};

/// Run an asynchronous test against a fresh in-memory document store,
/// injecting dependencies.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`],
/// `crate::model::mongodb::SharedStore` and
/// `crate::model::mongodb::Coll<T>`. Every one of them sees the same store,
/// which starts out empty.
#[proc_macro_attribute]
pub fn backend_test(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let (setup, test_args) = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Rewrite the test function.
    quote! {
        #[rocket::async_test]
        async fn #name() {
            /// The test itself.
            #item_fn

            // Every test gets its own store.
            let store: crate::model::mongodb::SharedStore =
                crate::model::mongodb::MemoryStore::shared();
            let rocket_client =
                rocket::local::asynchronous::Client::tracked(crate::rocket_for_store(store.clone()))
                    .await
                    .unwrap();

            #(#setup)*

            #new_name(#(#test_args),*).await;
        }
    }
    .into()
}

/// Ensure the wrapped test is async, and build the setup statements and the
/// argument list for its parameters, rejecting unknown parameters.
fn check_sig(sig: Signature) -> Result<(Vec<TokenStream2>, Vec<TokenStream2>), syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_store = false;
    let mut setup = vec![];
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                let ident = &pat_ident.ident;
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        } else if type_ident == "SharedStore" {
                            if has_store {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `SharedStore`",
                                ));
                            }
                            has_store = true;
                            args.push(quote! { store.clone() });
                            continue;
                        }
                    }

                    // Valid as the last path segment for any type is itself
                    if let Some(possible_collection) = type_path.path.segments.last() {
                        if possible_collection.ident == "Coll" {
                            if let PathArguments::AngleBracketed(generics) =
                                &possible_collection.arguments
                            {
                                if let Some(GenericArgument::Type(collection_type)) =
                                    generics.args.first()
                                {
                                    setup.push(quote! {
                                        let #ident = crate::model::mongodb::Coll::<#collection_type>::new(store.clone());
                                    });
                                    args.push(quote! { #ident });
                                    continue;
                                }
                            }
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `store_ident: SharedStore` or `collection_ident: Coll<T>`",
        ));
    }

    Ok((setup, args))
}
