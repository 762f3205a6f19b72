// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Declare the closed set of actions for a domain, and the payload type of each one, in
/// one place.
///
/// This generates:
/// 1. The action `enum`, with a unit variant for every tag without a payload, and a
///    tuple variant for every tag with a payload.
/// 2. An impl of [`crate::Action`] for the enum.
/// 3. A module (named after `in`) that holds one zero-sized tag marker per variant. Each
///    marker implements [`crate::ActionName`] with its payload type (`()` for unit
///    variants).
///
/// The marker impls are emitted next to the enum (not inside the generated module), so
/// payload types resolve exactly as they would in the enum declaration.
///
/// # Example
///
/// ```
/// use r3bl_dispatch::{define_actions, Action, ActionName};
///
/// define_actions! {
///     /// Actions for the todo list.
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum TodoAction in todo_action {
///         AddItem(String),
///         /// Remove every item.
///         Clear,
///     }
/// }
///
/// let action = todo_action::AddItem.into_action("milk".to_string());
/// assert_eq!(action, TodoAction::AddItem("milk".to_string()));
/// assert_eq!(action.name(), "AddItem");
/// assert!(!TodoAction::Clear.has_payload());
/// ```
#[macro_export]
macro_rules! define_actions {
    // Internal rules.
    (@payload_type) => { () };
    (@payload_type $payload:ty) => { $payload };
    (@has_payload) => { false };
    (@has_payload $payload:ty) => { true };
    (@build $enum_name:ident, $variant:ident, $value:ident) => {{
        let () = $value;
        $enum_name::$variant
    }};
    (@build $enum_name:ident, $variant:ident, $value:ident, $payload:ty) => {
        $enum_name::$variant($value)
    };

    // Public entry point.
    (
        $(#[$enum_meta:meta])*
        $vis:vis enum $enum_name:ident in $tags_mod:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( ( $payload:ty ) )?
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        $vis enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant $( ( $payload ) )?
            ),*
        }

        impl $crate::Action for $enum_name {
            fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => stringify!($variant), )*
                }
            }

            fn has_payload(&self) -> bool {
                match self {
                    $(
                        Self::$variant { .. } =>
                            $crate::define_actions!(@has_payload $($payload)?),
                    )*
                }
            }
        }

        #[doc = concat!("Tag markers for the variants of [`", stringify!($enum_name), "`].")]
        $vis mod $tags_mod {
            $(
                #[doc = concat!("Tag marker for `", stringify!($variant), "`.")]
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                pub struct $variant;
            )*
        }

        $(
            impl $crate::ActionName<$enum_name> for $tags_mod::$variant {
                type Payload = $crate::define_actions!(@payload_type $($payload)?);

                const NAME: &'static str = stringify!($variant);

                fn into_action(self, payload: Self::Payload) -> $enum_name {
                    $crate::define_actions!(@build $enum_name, $variant, payload $(, $payload)?)
                }
            }
        )*
    };
}
