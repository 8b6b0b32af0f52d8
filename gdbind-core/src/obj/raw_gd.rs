/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;

use sys::{interface_fn, GodotFfi, GodotNullableFfi, PtrcallType};

use crate::builtin::{Variant, VariantType};
use crate::classes::RefCounted;
use crate::meta::error::ConvertError;
use crate::meta::GodotFfiVariant;
use crate::obj::bounds::{DeclEngine, DeclUser, DynMemory};
use crate::obj::{Bounds, GdDerefTarget, GdMut, GdRef, GodotClass, InstanceId};
use crate::storage::{nop_instance_callbacks, InstanceStorage};
use crate::sys;

/// Low-level handle to an engine object, which may be null.
///
/// Owns one reference for ref-counted objects, released on drop. The layout is identical to the engine class structs
/// in [`crate::classes`], which lets a `&RawGd<T>` be reinterpreted as `&T`.
#[repr(C)]
pub struct RawGd<T: GodotClass> {
    pub(super) obj: *mut T,

    // Cached on construction, to check liveness without touching the object pointer.
    instance_id: Option<InstanceId>,
}

impl<T: GodotClass> RawGd<T> {
    /// Initialize weakly: does not increment the reference count of the object.
    ///
    /// # Safety
    /// `obj` must be null or point to a live object of class `T` (or derived).
    pub(crate) unsafe fn from_obj_sys_weak(obj: sys::GDExtensionObjectPtr) -> Self {
        let instance_id = if obj.is_null() {
            None
        } else {
            let raw_id = interface_fn!(object_get_instance_id)(obj);
            InstanceId::try_from_u64(raw_id)
        };

        Self {
            obj: obj as *mut T,
            instance_id,
        }
    }

    /// Initializes this `RawGd<T>` from the object pointer as a **strong ref**, meaning it initializes/increments
    /// the reference counter and keeps the object alive.
    ///
    /// # Safety
    /// See [`Self::from_obj_sys_weak`].
    pub(crate) unsafe fn from_obj_sys(obj: sys::GDExtensionObjectPtr) -> Self {
        Self::from_obj_sys_weak(obj).with_inc_refcount()
    }

    /// Returns `self` but with initialized ref-count.
    pub(crate) fn with_inc_refcount(self) -> Self {
        // Note: use init_ref and not inc_ref, since this might be the first reference increment.
        // Godot expects RefCounted::init_ref to be called instead of RefCounted::reference in that case.
        // init_ref also doesn't hurt (except 1 possibly unnecessary check).
        T::DynMemory::maybe_init_ref(&self);
        self
    }

    /// Returns `true` if the object is null.
    ///
    /// This does not check if the object is dead. For that, use [`is_instance_valid()`](Self::is_instance_valid).
    pub(crate) fn is_null(&self) -> bool {
        self.obj.is_null()
    }

    pub(crate) fn instance_id_unchecked(&self) -> Option<InstanceId> {
        self.instance_id
    }

    pub(crate) fn is_instance_valid(&self) -> bool {
        self.instance_id.is_some_and(|id| id.lookup_validity())
    }

    /// Engine-side cast to `U`, keeping the same object pointer.
    ///
    /// The result does not own a reference of its own; callers either forget `self` or drop the result unused.
    pub(super) fn ffi_cast<U>(&self) -> Option<ManuallyDrop<RawGd<U>>>
    where
        U: GodotClass,
    {
        if self.is_null() {
            return Some(ManuallyDrop::new(RawGd::null()));
        }

        // SAFETY: the object is non-null, and the class tag is queried for a class name known to the engine.
        let cast_ptr = unsafe {
            let class_tag = interface_fn!(classdb_get_class_tag)(U::class_name().string_sys());
            interface_fn!(object_cast_to)(self.obj_sys(), class_tag)
        };

        if cast_ptr.is_null() {
            None
        } else {
            // SAFETY: the engine confirmed that the object is a `U`.
            Some(ManuallyDrop::new(unsafe { RawGd::from_obj_sys_weak(cast_ptr) }))
        }
    }

    /// Cast that transfers this handle's reference to the result, or gives back `self` if the class doesn't match.
    pub(super) fn owned_cast<U>(self) -> Result<RawGd<U>, Self>
    where
        U: GodotClass,
    {
        match self.ffi_cast::<U>() {
            Some(cast) => {
                // The reference is moved over to the cast, do not release it here.
                std::mem::forget(self);
                Ok(ManuallyDrop::into_inner(cast))
            }
            None => Err(self),
        }
    }

    /// Runs `apply` on this object viewed as a `RefCounted`, without touching the reference count.
    ///
    /// Callers must know the object inherits `RefCounted`: from the static type or the instance ID bit.
    pub(crate) fn with_ref_counted<R>(&self, apply: impl FnOnce(&mut RefCounted) -> R) -> R {
        assert!(
            !self.is_null(),
            "RawGd<{}>: ref-count operation on null object",
            T::class_name()
        );

        let mut upcast = ManuallyDrop::new(RawGd::<RefCounted> {
            obj: self.obj as *mut RefCounted,
            instance_id: self.instance_id,
        });

        apply(upcast.as_target_mut())
    }

    /// Reinterprets as a handle to a base class, sharing the reference.
    pub(crate) fn as_upcast_ref<Base>(&self) -> &RawGd<Base>
    where
        Base: GodotClass,
    {
        // SAFETY: `RawGd<T>` has the same layout for every `T`; `T` inherits `Base` per the callers' bounds.
        unsafe { &*(self as *const RawGd<T> as *const RawGd<Base>) }
    }

    pub(crate) fn as_upcast_mut<Base>(&mut self) -> &mut RawGd<Base>
    where
        Base: GodotClass,
    {
        // SAFETY: see `as_upcast_ref()`.
        unsafe { &mut *(self as *mut RawGd<T> as *mut RawGd<Base>) }
    }

    /// View as the engine API of the deref target.
    pub(crate) fn as_target(&self) -> &GdDerefTarget<T>
    where
        GdDerefTarget<T>: Bounds<Declarer = DeclEngine>,
    {
        self.check_rtti("deref");

        // SAFETY: engine class structs are `#[repr(C)]` with the same fields as `RawGd`.
        unsafe { &*(self as *const RawGd<T> as *const GdDerefTarget<T>) }
    }

    pub(crate) fn as_target_mut(&mut self) -> &mut GdDerefTarget<T>
    where
        GdDerefTarget<T>: Bounds<Declarer = DeclEngine>,
    {
        self.check_rtti("deref_mut");

        // SAFETY: see `as_target()`.
        unsafe { &mut *(self as *mut RawGd<T> as *mut GdDerefTarget<T>) }
    }

    /// Panics if the object is null or was already freed.
    pub(crate) fn check_rtti(&self, method_name: &'static str) {
        let Some(instance_id) = self.instance_id else {
            panic!(
                "{method_name}: cannot access null Gd<{}>",
                T::class_name()
            );
        };

        assert!(
            instance_id.lookup_validity(),
            "{method_name}: access to instance with ID {instance_id} after it has been freed"
        );
    }

    /// Retrieves and caches pointer to this class instance if `self.obj` is non-null.
    pub(crate) fn obj_sys(&self) -> sys::GDExtensionObjectPtr {
        self.obj as sys::GDExtensionObjectPtr
    }
}

impl<T> RawGd<T>
where
    T: GodotClass + Bounds<Declarer = DeclUser>,
{
    /// Hands out a guard for a shared borrow, through which the user instance can be read.
    ///
    /// See [`crate::obj::Gd::bind()`] for a more in depth explanation.
    pub(crate) fn bind(&self) -> GdRef<'_, T> {
        self.check_rtti("bind");
        self.expect_storage().get()
    }

    /// Hands out a guard for an exclusive borrow, through which the user instance can be read and written.
    ///
    /// See [`crate::obj::Gd::bind_mut()`] for a more in depth explanation.
    pub(crate) fn bind_mut(&mut self) -> GdMut<'_, T> {
        self.check_rtti("bind_mut");
        self.expect_storage().get_mut()
    }

    /// Storage object associated with the extension instance, or `None` if the object has no Rust instance attached.
    pub(crate) fn storage(&self) -> Option<&InstanceStorage<T>> {
        if self.is_null() {
            return None;
        }

        let callbacks = nop_instance_callbacks();

        // SAFETY: the object is non-null; the binding was registered in `create` with the library token.
        let binding = unsafe {
            interface_fn!(object_get_instance_binding)(
                self.obj_sys(),
                sys::get_library(),
                ptr::addr_of!(callbacks),
            )
        };

        if binding.is_null() {
            return None;
        }

        // SAFETY: bindings of user objects are always `InstanceStorage<T>` allocated in `create`.
        Some(unsafe { crate::storage::as_storage::<T>(binding as sys::GDExtensionClassInstancePtr) })
    }

    fn expect_storage(&self) -> &InstanceStorage<T> {
        self.storage().unwrap_or_else(|| {
            panic!(
                "object of class {} has no Rust instance attached",
                T::class_name()
            )
        })
    }
}

// SAFETY:
// - `from_arg_ptr`: the pointer is `T**` for standard calls, or `Ref<T>*` in virtual calls of ref-counted types.
//   Both yield a borrowed object, for which we take our own reference.
// - `move_return_ptr`: the object is handed over to the engine, which takes ownership of our reference.
unsafe impl<T: GodotClass> GodotFfi for RawGd<T> {
    fn variant_type() -> VariantType {
        VariantType::OBJECT
    }

    unsafe fn new_from_sys(ptr: sys::GDExtensionConstTypePtr) -> Self {
        Self::from_obj_sys_weak(ptr as sys::GDExtensionObjectPtr)
    }

    unsafe fn new_with_uninit(init_fn: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self {
        let mut obj: sys::GDExtensionObjectPtr = ptr::null_mut();
        init_fn(ptr::addr_of_mut!(obj) as sys::GDExtensionUninitializedTypePtr);
        Self::from_obj_sys_weak(obj)
    }

    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self {
        // Engine writes into a null `Object*` (or `Ref<T>`) slot and hands us the reference it took.
        let mut obj: sys::GDExtensionObjectPtr = ptr::null_mut();
        init_fn(ptr::addr_of_mut!(obj) as sys::GDExtensionTypePtr);
        Self::from_obj_sys_weak(obj)
    }

    fn sys(&self) -> sys::GDExtensionConstTypePtr {
        self.obj as sys::GDExtensionConstTypePtr
    }

    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr {
        self.obj as sys::GDExtensionTypePtr
    }

    // Arguments are passed as `T**`. If the engine needs an extra reference, the callee takes it.
    fn as_arg_ptr(&self) -> sys::GDExtensionConstTypePtr {
        ptr::addr_of!(self.obj) as sys::GDExtensionConstTypePtr
    }

    unsafe fn from_arg_ptr(ptr: sys::GDExtensionTypePtr, call_type: PtrcallType) -> Self {
        if ptr.is_null() {
            return Self::null();
        }

        let obj_ptr = if T::DynMemory::pass_as_ref(call_type) {
            // ptr is `Ref<T>*`
            interface_fn!(ref_get_object)(ptr as sys::GDExtensionConstRefPtr)
        } else {
            // ptr is `T**`
            *(ptr as *mut sys::GDExtensionObjectPtr)
        };

        Self::from_obj_sys(obj_ptr)
    }

    unsafe fn move_return_ptr(self, dst: sys::GDExtensionTypePtr, call_type: PtrcallType) {
        if T::DynMemory::pass_as_ref(call_type) {
            // The `Ref<T>` in `dst` takes its own reference, ours is released when `self` drops.
            interface_fn!(ref_set_object)(dst as sys::GDExtensionRefPtr, self.obj_sys());
        } else {
            ptr::write(dst as *mut sys::GDExtensionObjectPtr, self.obj_sys());

            // Ownership passed to the caller.
            std::mem::forget(self);
        }
    }
}

impl<T: GodotClass> GodotFfiVariant for RawGd<T> {
    fn ffi_to_variant(&self) -> Variant {
        if self.is_null() {
            return Variant::nil();
        }

        // SAFETY: the converter reads an `Object*` and stores it in the variant, taking a reference if needed.
        unsafe {
            Variant::new_with_var_uninit(|variant_ptr| {
                let converter = sys::builtin_lifecycle_api().variant_from_type(VariantType::OBJECT);
                converter(variant_ptr, sys::force_mut_ptr(self.as_arg_ptr()));
            })
        }
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        let actual = variant.get_type();
        if actual != VariantType::OBJECT {
            return Err(ConvertError::variant_type(VariantType::OBJECT, actual, variant));
        }

        // The variant keeps its own reference; the one for our handle is added with `with_inc_refcount()`.
        // SAFETY: the variant holds an object, which the converter writes as `Object*`.
        let raw = unsafe {
            RawGd::<crate::classes::Object>::new_with_uninit(|self_ptr| {
                let converter = sys::builtin_lifecycle_api().variant_to_type(VariantType::OBJECT);
                converter(self_ptr, sys::force_mut_ptr(variant.var_sys()));
            })
        };

        raw.with_inc_refcount()
            .owned_cast::<T>()
            .map_err(|raw| ConvertError::wrong_class(T::class_name(), raw))
    }
}

impl<T: GodotClass> GodotNullableFfi for RawGd<T> {
    fn null() -> Self {
        Self {
            obj: ptr::null_mut(),
            instance_id: None,
        }
    }

    fn is_null(&self) -> bool {
        Self::is_null(self)
    }
}

/// Destructor with semantics depending on memory strategy.
///
/// * If this `RawGd` smart pointer holds a reference-counted type, this will decrement the reference counter.
///   If this was the last remaining reference, dropping it will invoke `T`'s destructor.
///
/// * If the held object is manually-managed, **nothing happens** -- the memory is not freed.
impl<T: GodotClass> Drop for RawGd<T> {
    fn drop(&mut self) {
        sys::out!("RawGd::drop   <{}>", std::any::type_name::<T>());

        // SAFETY: this handle owns exactly one reference, released here once.
        let is_last = unsafe { T::DynMemory::maybe_dec_ref(self) };
        if is_last {
            // SAFETY: no other reference exists, so the object can be destroyed.
            unsafe {
                interface_fn!(object_destroy)(self.obj_sys());
            }
        }
    }
}

impl<T: GodotClass> Clone for RawGd<T> {
    fn clone(&self) -> Self {
        sys::out!("RawGd::clone");

        if !self.is_null() {
            self.check_rtti("clone");
        }

        let copy = Self {
            obj: self.obj,
            instance_id: self.instance_id,
        };
        T::DynMemory::maybe_inc_ref(&copy);
        copy
    }
}

impl<T: GodotClass> fmt::Debug for RawGd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance_id {
            None => write!(f, "RawGd<{}>(null)", T::class_name()),
            Some(id) => write!(f, "RawGd<{}>(id={id})", T::class_name()),
        }
    }
}
