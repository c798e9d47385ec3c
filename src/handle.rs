//! Ownership and capability tracking for native handles.
//!
//! Every chemfiles object reachable from Rust is a [`ForeignHandle`]: a
//! non-null pointer, the access it grants ([`Capability`]) and whether it
//! owns its memory (a root) or aliases memory owned by another object (a
//! view, like an atom inside a frame).
//!
//! Roots release their memory exactly once, on drop. Views never do: they
//! are only handed out wrapped in [`View`] or [`ViewMut`], which keep the
//! wrapper in `ManuallyDrop` and borrow the origin for their whole life, so
//! the origin can not be released (or mutated through another path) while
//! a view into it exists.
//!
//! # Thread Safety
//!
//! Handles are neither `Send` nor `Sync`. The native library does no
//! locking; all operations on an object and its views must happen on one
//! thread, or be serialized by the caller.

use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::error::{Error, Result};
use crate::ffi;

/// Access granted by a handle.
///
/// The native API uses the same ABI for const and non-const pointers, so
/// nothing on the C side prevents mutating an object through a pointer that
/// was handed out as const. The binding tracks it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ReadOnly,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Root,
    View,
}

/// An opaque type allocated by the native library.
///
/// # Safety
///
/// `release` must accept every pointer produced by the native constructors
/// of this type, and nothing else is ever passed to it.
pub unsafe trait NativeType {
    /// Name used in error and log messages
    const NAME: &'static str;

    /// Free a root pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be a root pointer of this type that was not released yet.
    unsafe fn release(ptr: *mut Self)
    where
        Self: Sized,
    {
        unsafe { ffi::chfl_free(ptr.cast_const().cast()) }
    }
}

/// A native type with a deep-copy factory (`chfl_<type>_copy`).
///
/// # Safety
///
/// `duplicate` must return either NULL or a new pointer owning an
/// independent copy, releasable with [`NativeType::release`].
pub unsafe trait Duplicate: NativeType + Sized {
    /// # Safety
    ///
    /// `ptr` must point to a live object of this type.
    unsafe fn duplicate(ptr: *const Self) -> *mut Self;
}

/// Opaque pointer to a native object, with its access rights.
///
/// Root handles own their memory and release it when dropped. View handles
/// alias memory owned by another object and never release anything.
pub struct ForeignHandle<T: NativeType> {
    ptr: NonNull<T>,
    capability: Capability,
    origin: Origin,
}

impl<T: NativeType> ForeignHandle<T> {
    /// Call a native constructor and take ownership of the result.
    ///
    /// A NULL result is rejected with [`Error::NullHandle`], and nothing is
    /// ever released for it.
    ///
    /// # Safety
    ///
    /// A non-null pointer returned by `constructor` must be a fresh root
    /// object of type `T`, owned by nobody else.
    pub unsafe fn create_root<F>(constructor: F) -> Result<Self>
    where
        F: FnOnce() -> *mut T,
    {
        let ptr = NonNull::new(constructor()).ok_or_else(|| Error::null_handle(T::NAME))?;
        Ok(Self {
            ptr,
            capability: Capability::Mutable,
            origin: Origin::Root,
        })
    }

    /// Wrap a pointer into memory owned by another object, with write access.
    ///
    /// # Safety
    ///
    /// `ptr` must stay valid for as long as the returned handle is used.
    /// [`ViewMut`] is the safe way to express that.
    pub unsafe fn from_mutable_view(ptr: *mut T) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or_else(|| Error::null_handle(T::NAME))?;
        Ok(Self {
            ptr,
            capability: Capability::Mutable,
            origin: Origin::View,
        })
    }

    /// Wrap a pointer into memory owned by another object, read-only.
    ///
    /// # Safety
    ///
    /// `ptr` must stay valid for as long as the returned handle is used.
    /// [`View`] is the safe way to express that.
    pub unsafe fn from_const_view(ptr: *const T) -> Result<Self> {
        let ptr = NonNull::new(ptr.cast_mut()).ok_or_else(|| Error::null_handle(T::NAME))?;
        Ok(Self {
            ptr,
            capability: Capability::ReadOnly,
            origin: Origin::View,
        })
    }

    /// Pointer for native functions that modify the object.
    ///
    /// Fails with [`Error::Capability`] on read-only handles, before any
    /// native code runs.
    pub fn mutable_ptr(&mut self) -> Result<*mut T> {
        match self.capability {
            Capability::Mutable => Ok(self.ptr.as_ptr()),
            Capability::ReadOnly => Err(Error::Capability { kind: T::NAME }),
        }
    }

    /// Pointer for native functions that only read the object.
    pub fn const_ptr(&self) -> *const T {
        self.ptr.as_ptr().cast_const()
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Does this handle alias memory owned by another object?
    pub fn is_view(&self) -> bool {
        self.origin == Origin::View
    }
}

impl<T: Duplicate> ForeignHandle<T> {
    /// Deep-copy the native object into a new root.
    ///
    /// The copy is independent from this handle and from its origin.
    pub fn duplicate(&self) -> Result<Self> {
        let ptr = self.const_ptr();
        unsafe { Self::create_root(|| T::duplicate(ptr)) }
    }
}

impl<T: NativeType> Drop for ForeignHandle<T> {
    fn drop(&mut self) {
        if self.origin == Origin::Root {
            log::trace!("releasing {} handle at {:p}", T::NAME, self.ptr);
            unsafe { T::release(self.ptr.as_ptr()) }
        }
    }
}

impl<T: NativeType> fmt::Debug for ForeignHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignHandle")
            .field("kind", &T::NAME)
            .field("ptr", &self.ptr)
            .field("capability", &self.capability)
            .field("view", &self.is_view())
            .finish()
    }
}

/// A typed wrapper around exactly one [`ForeignHandle`].
pub trait Wrapper: Sized {
    type Native: NativeType;

    fn from_handle(handle: ForeignHandle<Self::Native>) -> Self;

    fn handle(&self) -> &ForeignHandle<Self::Native>;
}

/// Read-only view of a wrapper living inside another object.
///
/// Dereferences to `&W`, so only the read methods of `W` are reachable.
/// Dropping the view releases nothing.
pub struct View<'a, W: Wrapper> {
    inner: ManuallyDrop<W>,
    origin: PhantomData<&'a ()>,
}

impl<'a, W: Wrapper> View<'a, W> {
    /// # Safety
    ///
    /// `ptr` must point into memory owned by `origin` and stay valid while
    /// `origin` is borrowed.
    pub unsafe fn from_const_view<O: ?Sized>(origin: &'a O, ptr: *const W::Native) -> Result<Self> {
        let _ = origin;
        let handle = unsafe { ForeignHandle::from_const_view(ptr)? };
        log::trace!("new read-only {} view at {:p}", W::Native::NAME, ptr);
        Ok(Self {
            inner: ManuallyDrop::new(W::from_handle(handle)),
            origin: PhantomData,
        })
    }
}

impl<W: Wrapper> Deref for View<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.inner
    }
}

impl<W: Wrapper + fmt::Debug> fmt::Debug for View<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("View").field(&*self.inner).finish()
    }
}

/// Mutable view of a wrapper living inside another object.
///
/// Holds an exclusive borrow of the origin, so the origin can neither be
/// released nor accessed through another path while the view exists.
///
/// Only dereferences to `&W`. Handing out `&mut W` would let safe code
/// assign or swap the wrapped value, leaking a root into the view or moving
/// the view pointer into an owned wrapper. The mutators of `W` are instead
/// forwarded to the view one by one.
///
/// ```compile_fail
/// # use chemfiles::{Atom, Frame};
/// # fn main() -> chemfiles::Result<()> {
/// let mut frame = Frame::new()?;
/// frame.resize(1)?;
/// *frame.atom_mut(0)? = Atom::new("X")?;
/// # Ok(())
/// # }
/// ```
///
/// ```compile_fail
/// # use chemfiles::{Atom, Frame};
/// # fn main() -> chemfiles::Result<()> {
/// let mut frame = Frame::new()?;
/// frame.resize(1)?;
/// let mut owned = Atom::new("X")?;
/// std::mem::swap(&mut *frame.atom_mut(0)?, &mut owned);
/// # Ok(())
/// # }
/// ```
pub struct ViewMut<'a, W: Wrapper> {
    inner: ManuallyDrop<W>,
    origin: PhantomData<&'a mut ()>,
}

impl<'a, W: Wrapper> ViewMut<'a, W> {
    /// # Safety
    ///
    /// `ptr` must point into memory owned by `origin` and stay valid while
    /// `origin` is mutably borrowed.
    pub unsafe fn from_mutable_view<O: ?Sized>(
        origin: &'a mut O,
        ptr: *mut W::Native,
    ) -> Result<Self> {
        let _ = origin;
        let handle = unsafe { ForeignHandle::from_mutable_view(ptr)? };
        log::trace!("new mutable {} view at {:p}", W::Native::NAME, ptr);
        Ok(Self {
            inner: ManuallyDrop::new(W::from_handle(handle)),
            origin: PhantomData,
        })
    }
}

impl<W: Wrapper> Deref for ViewMut<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.inner
    }
}

impl<W: Wrapper> ViewMut<'_, W> {
    /// Exclusive access to the wrapped value, for forwarding mutators.
    ///
    /// The value must never be moved out or replaced.
    pub(crate) fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}

/// Forward `&mut self` methods of a wrapper to its [`ViewMut`].
macro_rules! view_mut_methods {
    ($wrapper:ty {
        $(
            $(#[$meta:meta])*
            fn $name:ident(&mut self $(, $arg:ident: $ty:ty)*) -> $ret:ty;
        )*
    }) => {
        impl $crate::handle::ViewMut<'_, $wrapper> {
            $(
                $(#[$meta])*
                pub fn $name(&mut self $(, $arg: $ty)*) -> $ret {
                    self.inner_mut().$name($($arg),*)
                }
            )*
        }
    };
}

pub(crate) use view_mut_methods;

impl<W: Wrapper + fmt::Debug> fmt::Debug for ViewMut<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewMut").field(&*self.inner).finish()
    }
}
