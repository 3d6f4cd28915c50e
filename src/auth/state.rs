//! Authentication state trait and macro.

use crate::jwt::TokenService;

/// Trait for state types that provide token service access for authentication.
pub trait HasTokenService {
    fn tokens(&self) -> &TokenService;
}

/// Macro to implement `HasTokenService` for state structs with the standard field.
///
/// The struct must have a `tokens: Arc<TokenService>` field.
///
/// # Example
/// ```ignore
/// use crate::impl_has_token_service;
///
/// #[derive(Clone)]
/// pub struct MyState {
///     pub tokens: Arc<TokenService>,
///     // ... other fields
/// }
///
/// impl_has_token_service!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_token_service {
    ($state_type:ty) => {
        impl $crate::auth::HasTokenService for $state_type {
            fn tokens(&self) -> &$crate::jwt::TokenService {
                &self.tokens
            }
        }
    };
}
