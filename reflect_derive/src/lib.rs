// reflect_derive/src/lib.rs
extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    meta::ParseNestedMeta,
    parse_macro_input,
    Attribute,
    Data,
    DeriveInput,
    Fields,
    Ident,
    Lit,
    LitStr,
    Path,
    Token,
    Type,
    Visibility,
};

/// `#[derive(Reflect)]` – generates `Reflect` and `ReflectField` impls and
/// registers the type with the inspector's type registry.
///
/// Struct attributes: `always_dirty`, `no_default`, `construct_with = path`,
/// `method = ident`, `method(call = ident, name = "..", order = n)`,
/// `property(name = "..", ty = T, get = path, set = path, order = n)`.
///
/// Field attributes: `skip`, `base`, `state`, `name = ".."`, `order = n`,
/// `tooltip = ".."`, `read_only`, `serialize`, `no_serialize`, `native`.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct TypeArgs {
    always_dirty: bool,
    no_default: bool,
    construct_with: Option<Path>,
    methods: Vec<MethodArgs>,
    properties: Vec<PropertyArgs>,
}

struct MethodArgs {
    call: Ident,
    name: Option<String>,
    order: Option<f64>,
}

struct PropertyArgs {
    name: String,
    ty: Type,
    get: Path,
    set: Option<Path>,
    order: Option<f64>,
}

#[derive(Default)]
struct FieldArgs {
    skip: bool,
    base: bool,
    state: bool,
    read_only: bool,
    serialize: bool,
    no_serialize: bool,
    native: bool,
    name: Option<String>,
    order: Option<f64>,
    tooltip: Option<String>,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let generics = &input.generics;

    // Collect field information (only works for structs with named fields)
    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    s.struct_token,
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs",
            ));
        }
    };

    let type_args = parse_type_args(&input.attrs)?;

    let mut base = None;
    let mut state = None;
    let mut members = Vec::new();

    for field in &fields {
        let args = parse_field_args(&field.attrs)?;
        // Named fields always carry an identifier.
        let Some(ident) = field.ident.as_ref() else { continue };
        let ty = &field.ty;

        if args.skip {
            continue;
        }
        if args.state {
            state = Some(ident.clone());
            continue;
        }
        if args.base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(ident, "only one field can be marked `base`"));
            }
            base = Some(quote! {
                .with_base(::inspector_core::reflect::BaseInfo::new::<Self, #ty>(
                    |o| &o.#ident,
                    |o| &mut o.#ident,
                ))
            });
            continue;
        }

        let declared = ident.to_string().trim_start_matches("r#").to_string();
        let is_public = matches!(field.vis, Visibility::Public(_));
        let serializable = !args.no_serialize && (args.serialize || is_public);

        let mut member = quote! {
            ::inspector_core::reflect::MemberDescriptor::field::<Self, #ty>(
                #declared,
                |o| &o.#ident,
                |o| &mut o.#ident,
            )
            .public(#is_public)
            .serializable(#serializable)
        };
        if let Some(display) = &args.name {
            member.extend(quote! { .with_display_name(#display) });
        }
        if let Some(order) = args.order {
            member.extend(quote! { .with_order(#order) });
        }
        if let Some(tooltip) = &args.tooltip {
            member.extend(quote! { .with_tooltip(#tooltip) });
        }
        if args.read_only {
            member.extend(quote! { .read_only() });
        }
        if args.native {
            member.extend(quote! { .host_serialized() });
        }
        members.push(member);
    }

    for property in &type_args.properties {
        let PropertyArgs { name: declared, ty, get, set, order } = property;
        let setter = match set {
            Some(set) => quote! { ::std::option::Option::Some(#set) },
            None => quote! { ::std::option::Option::None },
        };
        let mut member = quote! {
            ::inspector_core::reflect::MemberDescriptor::property::<Self, #ty>(#declared, #get, #setter)
        };
        if let Some(order) = order {
            member.extend(quote! { .with_order(#order) });
        }
        members.push(member);
    }

    for method in &type_args.methods {
        let call = &method.call;
        let declared = call.to_string();
        let mut member = quote! {
            ::inspector_core::reflect::MemberDescriptor::method::<Self>(#declared, |o| { o.#call(); })
        };
        if let Some(display) = &method.name {
            member.extend(quote! { .with_display_name(#display) });
        }
        if let Some(order) = method.order {
            member.extend(quote! { .with_order(#order) });
        }
        members.push(member);
    }

    let constructor = if type_args.no_default {
        quote! {}
    } else {
        quote! { .with_constructor(::inspector_core::reflect::boxed_default::<Self>) }
    };

    let fallback = match &type_args.construct_with {
        Some(path) => quote! {
            .with_fallback_constructor(|| -> ::std::boxed::Box<dyn ::inspector_core::reflect::Reflect> {
                ::std::boxed::Box::new(#path())
            })
        },
        None => quote! {},
    };

    let create_default = match (type_args.no_default, &type_args.construct_with) {
        (false, _) => quote! { ::std::option::Option::Some(<Self as ::std::default::Default>::default()) },
        (true, Some(path)) => quote! { ::std::option::Option::Some(#path()) },
        (true, None) => quote! { ::std::option::Option::None },
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let serialized_object = match &state {
        Some(field) => {
            let always_dirty = type_args.always_dirty;
            quote! {
                impl #impl_generics ::inspector_core::serialization::SerializedObject for #name #ty_generics #where_clause {
                    fn as_reflect(&self) -> &dyn ::inspector_core::reflect::Reflect {
                        self
                    }
                    fn as_reflect_mut(&mut self) -> &mut dyn ::inspector_core::reflect::Reflect {
                        self
                    }
                    fn serialized_state(&self) -> &::inspector_core::serialization::SerializedState {
                        &self.#field
                    }
                    fn serialized_state_mut(&mut self) -> &mut ::inspector_core::serialization::SerializedState {
                        &mut self.#field
                    }
                    fn always_dirty(&self) -> bool {
                        #always_dirty
                    }
                }
            }
        }
        None if type_args.always_dirty => {
            return Err(syn::Error::new_spanned(
                name,
                "`always_dirty` needs a field marked `#[reflect(state)]`",
            ));
        }
        None => quote! {},
    };

    // Generic types cannot be named in a static registration.
    let registration = if generics.params.is_empty() {
        quote! {
            ::inspector_core::inventory::submit! {
                ::inspector_core::reflect::TypeRegistration {
                    type_name: stringify!(#name),
                    type_id: ::std::any::TypeId::of::<#name>,
                    type_info: <#name as ::inspector_core::reflect::ReflectField>::type_info,
                }
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::inspector_core::reflect::Reflect for #name #ty_generics #where_clause {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn descriptor(&self) -> ::std::sync::Arc<::inspector_core::reflect::TypeDescriptor> {
                ::inspector_core::reflect::type_cache().get::<Self>()
            }
            fn reflected_type_name(&self) -> &'static str {
                stringify!(#name)
            }
        }

        impl #impl_generics ::inspector_core::reflect::ReflectField for #name #ty_generics #where_clause {
            fn storage() -> ::inspector_core::reflect::StorageType {
                ::inspector_core::reflect::StorageType::of::<Self>(
                    ::inspector_core::reflect::ValueKind::Object,
                )
            }

            fn type_info() -> ::inspector_core::reflect::TypeInfo {
                ::inspector_core::reflect::TypeInfo::object::<Self>()
                    #base
                    #(.with_member(#members))*
                    #constructor
                    #fallback
            }

            fn to_value(
                &self,
                refs: &mut dyn ::inspector_core::serialization::ReferenceOperator,
            ) -> ::inspector_core::Result<::inspector_core::reflect::Value> {
                ::inspector_core::reflect::object_to_value(self, refs)
            }

            fn from_value(
                value: ::inspector_core::reflect::Value,
                refs: &mut dyn ::inspector_core::serialization::ReferenceOperator,
            ) -> ::inspector_core::Result<Self> {
                ::inspector_core::reflect::object_from_value::<Self>(value, refs)
            }

            fn create_default() -> ::std::option::Option<Self> {
                #create_default
            }

            fn instantiate_references(
                &mut self,
                detector: &mut ::inspector_core::serialization::CycleDetector,
            ) -> bool {
                ::inspector_core::reflect::instantiate_object_references(self, detector)
            }

            fn nested_reflect_mut(&mut self) -> ::std::option::Option<&mut dyn ::inspector_core::reflect::Reflect> {
                ::std::option::Option::Some(self)
            }
        }

        #serialized_object

        #registration
    })
}

fn parse_type_args(attrs: &[Attribute]) -> syn::Result<TypeArgs> {
    let mut args = TypeArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("always_dirty") {
                args.always_dirty = true;
            } else if meta.path.is_ident("no_default") {
                args.no_default = true;
            } else if meta.path.is_ident("construct_with") {
                args.construct_with = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("method") {
                args.methods.push(parse_method(&meta)?);
            } else if meta.path.is_ident("property") {
                args.properties.push(parse_property(&meta)?);
            } else {
                return Err(meta.error("unsupported reflect attribute"));
            }
            Ok(())
        })?;
    }
    Ok(args)
}

fn parse_field_args(attrs: &[Attribute]) -> syn::Result<FieldArgs> {
    let mut args = FieldArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                args.skip = true;
            } else if meta.path.is_ident("base") {
                args.base = true;
            } else if meta.path.is_ident("state") {
                args.state = true;
            } else if meta.path.is_ident("read_only") {
                args.read_only = true;
            } else if meta.path.is_ident("serialize") {
                args.serialize = true;
            } else if meta.path.is_ident("no_serialize") {
                args.no_serialize = true;
            } else if meta.path.is_ident("native") {
                args.native = true;
            } else if meta.path.is_ident("name") {
                args.name = Some(parse_string(&meta)?);
            } else if meta.path.is_ident("tooltip") {
                args.tooltip = Some(parse_string(&meta)?);
            } else if meta.path.is_ident("order") {
                args.order = Some(parse_order(&meta)?);
            } else {
                return Err(meta.error("unsupported reflect attribute"));
            }
            Ok(())
        })?;
    }
    Ok(args)
}

/// Accepts `method = ident` or `method(call = ident, name = "..", order = n)`.
fn parse_method(meta: &ParseNestedMeta) -> syn::Result<MethodArgs> {
    if meta.input.peek(Token![=]) {
        let call: Ident = meta.value()?.parse()?;
        return Ok(MethodArgs { call, name: None, order: None });
    }

    let mut call = None;
    let mut name = None;
    let mut order = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("call") {
            call = Some(inner.value()?.parse::<Ident>()?);
        } else if inner.path.is_ident("name") {
            name = Some(parse_string(&inner)?);
        } else if inner.path.is_ident("order") {
            order = Some(parse_order(&inner)?);
        } else {
            return Err(inner.error("expected `call`, `name` or `order`"));
        }
        Ok(())
    })?;

    let call = call.ok_or_else(|| meta.error("method needs `call = ident`"))?;
    Ok(MethodArgs { call, name, order })
}

fn parse_property(meta: &ParseNestedMeta) -> syn::Result<PropertyArgs> {
    let mut name = None;
    let mut ty = None;
    let mut get = None;
    let mut set = None;
    let mut order = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("name") {
            name = Some(parse_string(&inner)?);
        } else if inner.path.is_ident("ty") {
            ty = Some(inner.value()?.parse::<Type>()?);
        } else if inner.path.is_ident("get") {
            get = Some(inner.value()?.parse::<Path>()?);
        } else if inner.path.is_ident("set") {
            set = Some(inner.value()?.parse::<Path>()?);
        } else if inner.path.is_ident("order") {
            order = Some(parse_order(&inner)?);
        } else {
            return Err(inner.error("expected `name`, `ty`, `get`, `set` or `order`"));
        }
        Ok(())
    })?;

    Ok(PropertyArgs {
        name: name.ok_or_else(|| meta.error("property needs `name = \"..\"`"))?,
        ty: ty.ok_or_else(|| meta.error("property needs `ty = Type`"))?,
        get: get.ok_or_else(|| meta.error("property needs `get = path`"))?,
        set,
        order,
    })
}

fn parse_string(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// Orders may be written as integers or floats, optionally negative.
fn parse_order(meta: &ParseNestedMeta) -> syn::Result<f64> {
    let input = meta.value()?;
    let negative = input.peek(Token![-]);
    if negative {
        let _minus: Token![-] = input.parse()?;
    }
    let value = match input.parse::<Lit>()? {
        Lit::Int(int) => int.base10_parse::<f64>()?,
        Lit::Float(float) => float.base10_parse::<f64>()?,
        other => return Err(syn::Error::new_spanned(other, "expected a number")),
    };
    Ok(if negative { -value } else { value })
}
