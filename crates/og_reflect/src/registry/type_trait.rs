use alloc::boxed::Box;
use core::any::Any;

// -----------------------------------------------------------------------------
// TypeTrait

/// A capability supported by a type, stored in its [`TypeMeta`](crate::registry::TypeMeta).
///
/// Type traits are keyed by their concrete type, so a meta holds at most one
/// of each.
pub trait TypeTrait: Any + Send + Sync {
    /// Clones the trait object, used by `TypeMeta::clone`.
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl dyn TypeTrait {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl core::fmt::Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TypeTrait")
    }
}

/// Implements [`TypeTrait`] for `Clone` types.
macro_rules! impl_type_trait {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::registry::TypeTrait for $ty {
                #[inline]
                fn clone_type_trait(&self) -> ::alloc::boxed::Box<dyn $crate::registry::TypeTrait> {
                    ::alloc::boxed::Box::new(::core::clone::Clone::clone(self))
                }
            }
        )*
    };
}

pub(crate) use impl_type_trait;
