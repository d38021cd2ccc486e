//! Shapes of standard library and chrono types.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    hash::BuildHasher,
    time::Duration,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use super::{Decode, Encode, PointerSlot, ScalarSlot, SequenceSlot, Shape, Slot};
use crate::{
    decoder::coerce,
    duration::format_duration,
    tree::Scalar,
};

// Scalars

impl Encode for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Text(self.to_string()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Text(self.clone()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Decode for String {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for String {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_text(value);
    }
}

impl Encode for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

impl Decode for bool {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for bool {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_bool(value);
    }
}

impl Encode for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Text(self.to_string()))
    }

    fn is_zero(&self) -> bool {
        *self == char::default()
    }
}

impl Decode for char {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for char {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_text(value).chars().next().unwrap_or_default();
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Scalar::Int(i64::from(*self)))
            }
        }

        impl Decode for $ty {
            fn slot(&mut self) -> Slot<'_> {
                Slot::Scalar(self)
            }
        }

        impl ScalarSlot for $ty {
            fn assign(&mut self, value: &Scalar) {
                *self = coerce::narrow_signed(value);
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Scalar::Uint(u64::from(*self)))
            }
        }

        impl Decode for $ty {
            fn slot(&mut self) -> Slot<'_> {
                Slot::Scalar(self)
            }
        }

        impl ScalarSlot for $ty {
            fn assign(&mut self, value: &Scalar) {
                *self = coerce::narrow_unsigned(value);
            }
        }
    )*};
}

signed_scalar!(i8, i16, i32, i64);
unsigned_scalar!(u8, u16, u32, u64);

impl Encode for isize {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Int(*self as i64))
    }
}

impl Decode for isize {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for isize {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::narrow_signed(value);
    }
}

impl Encode for usize {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Uint(*self as u64))
    }
}

impl Decode for usize {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for usize {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::narrow_unsigned(value);
    }
}

impl Encode for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(*self))
    }
}

impl Decode for f64 {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for f64 {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_f64(value);
    }
}

impl Encode for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Decode for f32 {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for f32 {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_f64(value) as f32;
    }
}

// Instants and durations

impl Encode for DateTime<FixedOffset> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Time(*self))
    }
}

impl Decode for DateTime<FixedOffset> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for DateTime<FixedOffset> {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_time(value).unwrap_or_default();
    }
}

impl Encode for DateTime<Utc> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Time(self.fixed_offset()))
    }
}

impl Decode for DateTime<Utc> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for DateTime<Utc> {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_time(value)
            .map(|time| time.with_timezone(&Utc))
            .unwrap_or_default();
    }
}

impl Encode for NaiveDateTime {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Time(self.and_utc().fixed_offset()))
    }
}

impl Decode for NaiveDateTime {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for NaiveDateTime {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_time(value)
            .map(|time| time.naive_local())
            .unwrap_or_default();
    }
}

impl Encode for NaiveDate {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Text(self.format(crate::time::DATE_FORMAT).to_string()))
    }

    fn is_zero(&self) -> bool {
        *self == NaiveDate::default()
    }
}

impl Decode for NaiveDate {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for NaiveDate {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_time(value)
            .map(|time| time.date_naive())
            .unwrap_or_default();
    }
}

impl Encode for Duration {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Text(format_duration(*self)))
    }

    fn is_zero(&self) -> bool {
        Duration::is_zero(self)
    }
}

impl Decode for Duration {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl ScalarSlot for Duration {
    fn assign(&mut self, value: &Scalar) {
        *self = coerce::to_duration(value);
    }
}

// Indirection

impl<T: Encode + ?Sized> Encode for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn as_custom_encoder(&self) -> Option<&dyn super::CustomEncoder> {
        (**self).as_custom_encoder()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn as_custom_encoder(&self) -> Option<&dyn super::CustomEncoder> {
        (**self).as_custom_encoder()
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn slot(&mut self) -> Slot<'_> {
        (**self).slot()
    }

    fn as_custom_decoder(&mut self) -> Option<&mut dyn super::CustomDecoder> {
        (**self).as_custom_decoder()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ref().map(|value| value as &dyn Encode))
    }

    fn as_custom_encoder(&self) -> Option<&dyn super::CustomEncoder> {
        self.as_ref().and_then(|value| value.as_custom_encoder())
    }
}

impl<T: Decode + Default + 'static> Decode for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Pointer(self)
    }
}

impl<T: Decode + Default + 'static> PointerSlot for Option<T> {
    fn pointee(&mut self) -> Option<&mut dyn Decode> {
        self.as_mut().map(|value| value as &mut dyn Decode)
    }

    fn allocate(&mut self) -> &mut dyn Decode {
        self.get_or_insert_with(T::default)
    }

    fn scratch(&self) -> Box<dyn Decode> {
        Box::new(T::default())
    }
}

// Sequences

impl<T: Encode> Encode for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|item| item as &dyn Encode).collect())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }
}

impl<T: Decode + Default> SequenceSlot for Vec<T> {
    fn element_is_scalar(&self) -> bool {
        let mut probe = T::default();
        matches!(probe.slot(), Slot::Scalar(_))
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_default(&mut self) -> &mut dyn Decode {
        self.push(T::default());
        let last = self.len() - 1;
        &mut self[last]
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

// Maps

impl<K: Display, V: Encode> Encode for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value as &dyn Encode))
                .collect(),
        )
    }
}

impl<K, V> Decode for BTreeMap<K, V> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Map("map")
    }
}

impl<K: Display, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value as &dyn Encode))
                .collect(),
        )
    }
}

impl<K, V, S> Decode for HashMap<K, V, S> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Map("map")
    }
}
