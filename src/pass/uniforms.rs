use std::marker::PhantomData;

use crate::foundation::core::SurfaceId;

/// A single uniform value as seen by a host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// Scalar.
    F32(f32),
    /// Two-component vector.
    Vec2([f32; 2]),
    /// Three-component vector.
    Vec3([f32; 3]),
    /// Four-component vector.
    Vec4([f32; 4]),
    /// Extra sampler binding. The primary input surface is bound by the draw call itself.
    Sampler(Option<SurfaceId>),
}

/// Rust types that can live in a [`UniformStore`] slot.
pub trait UniformType: Copy + Default {
    /// Wrap into the host-facing representation.
    fn into_value(self) -> UniformValue;
    /// Unwrap from the host-facing representation, `None` on a type mismatch.
    fn from_value(value: UniformValue) -> Option<Self>;
}

impl UniformType for f32 {
    fn into_value(self) -> UniformValue {
        UniformValue::F32(self)
    }

    fn from_value(value: UniformValue) -> Option<Self> {
        match value {
            UniformValue::F32(v) => Some(v),
            _ => None,
        }
    }
}

impl UniformType for [f32; 2] {
    fn into_value(self) -> UniformValue {
        UniformValue::Vec2(self)
    }

    fn from_value(value: UniformValue) -> Option<Self> {
        match value {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }
}

impl UniformType for [f32; 3] {
    fn into_value(self) -> UniformValue {
        UniformValue::Vec3(self)
    }

    fn from_value(value: UniformValue) -> Option<Self> {
        match value {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }
}

impl UniformType for [f32; 4] {
    fn into_value(self) -> UniformValue {
        UniformValue::Vec4(self)
    }

    fn from_value(value: UniformValue) -> Option<Self> {
        match value {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }
}

impl UniformType for Option<SurfaceId> {
    fn into_value(self) -> UniformValue {
        UniformValue::Sampler(self)
    }

    fn from_value(value: UniformValue) -> Option<Self> {
        match value {
            UniformValue::Sampler(v) => Some(v),
            _ => None,
        }
    }
}

/// Typed handle to one entry of a [`UniformStore`], handed out by [`UniformLayout::declare`].
#[derive(Debug)]
pub struct UniformSlot<T> {
    index: usize,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Clone for UniformSlot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UniformSlot<T> {}

#[derive(Clone, Debug, PartialEq)]
struct UniformEntry {
    name: &'static str,
    value: UniformValue,
}

/// Builder that fixes the set of uniform names for one program.
///
/// Keys are only declared here; once [`UniformLayout::finish`] runs, a store can change values
/// but never add or remove names.
#[derive(Debug, Default)]
pub struct UniformLayout {
    entries: Vec<UniformEntry>,
}

impl UniformLayout {
    /// Empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a uniform with its initial value.
    ///
    /// Re-declaring a name returns a slot pointing at the existing entry and overwrites its value.
    pub fn declare<T: UniformType>(&mut self, name: &'static str, initial: T) -> UniformSlot<T> {
        let value = initial.into_value();
        let index = match self.entries.iter().position(|e| e.name == name) {
            Some(i) => {
                self.entries[i].value = value;
                i
            }
            None => {
                self.entries.push(UniformEntry { name, value });
                self.entries.len() - 1
            }
        };
        UniformSlot {
            index,
            _ty: PhantomData,
        }
    }

    /// Freeze the layout into a store.
    pub fn finish(self) -> UniformStore {
        UniformStore {
            entries: self.entries,
        }
    }
}

/// Named bag of uniform values bound to one program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformStore {
    entries: Vec<UniformEntry>,
}

impl UniformStore {
    /// Store with no uniforms (for programs that only sample their input).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Write a value through a typed slot.
    pub fn set<T: UniformType>(&mut self, slot: UniformSlot<T>, value: T) {
        if let Some(e) = self.entries.get_mut(slot.index) {
            debug_assert!(
                T::from_value(e.value).is_some(),
                "uniform slot type mismatch for `{}`",
                e.name
            );
            e.value = value.into_value();
        }
    }

    /// Read a value through a typed slot.
    pub fn get<T: UniformType>(&self, slot: UniformSlot<T>) -> T {
        self.entries
            .get(slot.index)
            .and_then(|e| T::from_value(e.value))
            .unwrap_or_default()
    }

    /// Look up a value by name, as hosts do when binding.
    pub fn value(&self, name: &str) -> Option<UniformValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    /// Typed lookup by name, `None` when missing or of a different type.
    pub fn typed<T: UniformType>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(T::from_value)
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.entries.iter().map(|e| (e.name, e.value))
    }

    /// Number of declared uniforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no uniforms are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pass/uniforms.rs"]
mod tests;
