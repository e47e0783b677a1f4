extern crate proc_macro;
extern crate quote;
extern crate syn;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident};

/// Generates the configuration and snapshot plumbing for an atomic model:
/// `from_value` (used by the model registry), `get_type`, and a `serialize`
/// state snapshot for observers.  The model must implement serde's
/// `Serialize` and `Deserialize`.
#[proc_macro_derive(SerializableModel)]
pub fn model(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let name = input.ident;
    let tokens = quote! {
        impl #name {
            pub fn from_value(
                value: pdevs::serde_yaml::Value,
            ) -> Option<Box<dyn pdevs::models::AtomicModel>> {
                match pdevs::serde_yaml::from_value::<Self>(value) {
                    Ok(model) => Some(Box::new(model)),
                    Err(_) => None
                }
            }
        }
        impl pdevs::models::SerializableModel for #name {
            fn get_type(&self) -> &'static str {
                stringify!(#name)
            }
            fn serialize(&self) -> pdevs::serde_yaml::Value {
                pdevs::serde_yaml::to_value(self).unwrap_or(pdevs::serde_yaml::Value::Null)
            }
        }
    };
    tokens.into()
}

/// Registers an atomic model type with the model factory, so it can be
/// referenced by name in YAML/JSON model trees.
#[proc_macro]
pub fn register(item: TokenStream) -> TokenStream {
    let name = parse_macro_input!(item as Ident);
    let tokens = quote! {
        pdevs::models::model_factory::register(
            stringify!(#name),
            #name::from_value as pdevs::models::model_factory::ModelConstructor
        );
    };
    tokens.into()
}
