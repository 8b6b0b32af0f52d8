/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::cell::{Ref, RefMut};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

use crate::obj::{Gd, GodotClass};

/// Immutably/shared bound reference guard for a [`Gd`][crate::obj::Gd] smart pointer.
///
/// See [`Gd::bind`][crate::obj::Gd::bind] for usage.
#[derive(Debug)]
pub struct GdRef<'a, T: GodotClass> {
    guard: Ref<'a, T>,
}

impl<'a, T: GodotClass> GdRef<'a, T> {
    pub(crate) fn from_guard(guard: Ref<'a, T>) -> Self {
        Self { guard }
    }
}

impl<T: GodotClass> Deref for GdRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Mutably/exclusively bound reference guard for a [`Gd`][crate::obj::Gd] smart pointer.
///
/// See [`Gd::bind_mut`][crate::obj::Gd::bind_mut] for usage.
#[derive(Debug)]
pub struct GdMut<'a, T: GodotClass> {
    guard: RefMut<'a, T>,
}

impl<'a, T: GodotClass> GdMut<'a, T> {
    pub(crate) fn from_guard(guard: RefMut<'a, T>) -> Self {
        Self { guard }
    }
}

impl<T: GodotClass> Deref for GdMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T: GodotClass> DerefMut for GdMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Shared reference guard for a [`Base`](crate::obj::Base) pointer.
///
/// This can be used to call methods on the base object of a user class, from within a `&self` method.
/// See [`WithBaseField::base()`](super::WithBaseField::base()) for usage.
pub struct BaseRef<'a, T: GodotClass> {
    gd: ManuallyDrop<Gd<T::Base>>,
    _instance: PhantomData<&'a T>,
}

impl<'a, T: GodotClass> BaseRef<'a, T> {
    pub(crate) fn new(gd: ManuallyDrop<Gd<T::Base>>, _instance: &'a T) -> Self {
        Self {
            gd,
            _instance: PhantomData,
        }
    }
}

impl<T: GodotClass> Deref for BaseRef<'_, T> {
    type Target = Gd<T::Base>;

    fn deref(&self) -> &Gd<T::Base> {
        &self.gd
    }
}

impl<T: GodotClass> Debug for BaseRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BaseRef {{ id: {} }}", self.gd.instance_id_unchecked())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Mutable/exclusive reference guard for a [`Base`](crate::obj::Base) pointer.
///
/// This can be used to call methods on the base object of a user class, from within a `&mut self` method.
/// See [`WithBaseField::base_mut()`](super::WithBaseField::base_mut()) for usage.
pub struct BaseMut<'a, T: GodotClass> {
    gd: ManuallyDrop<Gd<T::Base>>,
    _instance: PhantomData<&'a mut T>,
}

impl<'a, T: GodotClass> BaseMut<'a, T> {
    pub(crate) fn new(gd: ManuallyDrop<Gd<T::Base>>, _instance: &'a mut T) -> Self {
        Self {
            gd,
            _instance: PhantomData,
        }
    }
}

impl<T: GodotClass> Deref for BaseMut<'_, T> {
    type Target = Gd<T::Base>;

    fn deref(&self) -> &Gd<T::Base> {
        &self.gd
    }
}

impl<T: GodotClass> DerefMut for BaseMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Gd<T::Base> {
        &mut self.gd
    }
}

impl<T: GodotClass> Debug for BaseMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BaseMut {{ id: {} }}", self.gd.instance_id_unchecked())
    }
}
