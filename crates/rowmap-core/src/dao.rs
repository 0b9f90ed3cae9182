//! Data-access handles and the mapped-type contract.
//!
//! A [`TableDescriptor`](crate::table::TableDescriptor) holds a non-owning
//! [`DaoHandle`] to the data-access layer that registered it. The handle is
//! type-erased so this crate stays independent of any concrete DAO type; the
//! DAO layer recovers its own type with [`DaoHandle::downcast`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Cheaply clonable, type-erased handle to the data-access layer owning a
/// table.
///
/// Its only job in this layer is to be handed to freshly constructed
/// instances through [`Record::set_dao`].
#[derive(Clone)]
pub struct DaoHandle(Arc<dyn Any + Send + Sync>);

impl DaoHandle {
    /// Wrap a data-access object.
    pub fn new<D: Any + Send + Sync>(dao: D) -> Self {
        Self(Arc::new(dao))
    }

    /// Wrap an already shared data-access object without reallocating.
    pub fn from_arc<D: Any + Send + Sync>(dao: Arc<D>) -> Self {
        Self(dao)
    }

    /// Recover the concrete data-access type, if this handle wraps a `D`.
    #[must_use]
    pub fn downcast<D: Any + Send + Sync>(&self) -> Option<Arc<D>> {
        Arc::clone(&self.0).downcast::<D>().ok()
    }

    /// True if both handles point at the same data-access object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DaoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DaoHandle(..)")
    }
}

/// Contract implemented by every mapped type.
///
/// The single hook is the opt-in back-reference: construction hands each new
/// instance the handle of the data-access layer that created it. The default
/// implementation discards the handle, so types that do not keep a
/// back-reference implement the trait with an empty body.
pub trait Record: Sized {
    /// Receive the handle of the owning data-access layer.
    fn set_dao(&mut self, _dao: DaoHandle) {}
}
