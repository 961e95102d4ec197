use core::ops::{Add, Deref, Div, Mul, Sub};

use crate::data::{ByteSized, DataType, TypedData};
use crate::error::{Error, Result};

/// Homogeneous ordered run of [`TypedData`].
///
/// Every element shares one [`DataType`]; mutations that would break this
/// fail with [`Error::MixedDataTypes`] and leave the vector unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<TypedData>,
    ty: DataType,
    size: usize,
}

impl Vector {
    /// Builds a vector from typed elements.
    pub fn new(data: Vec<TypedData>) -> Result<Self> {
        let ty = common_type(&data)?;
        let size = data.iter().map(TypedData::size).sum();
        Ok(Self { data, ty, size })
    }

    /// Builds a vector of `ty` elements from raw values.
    pub fn from_values(values: &[f64], ty: DataType) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyVector);
        }
        Ok(Self::uniform(values.iter().copied(), ty))
    }

    /// Homogeneous by construction; callers guarantee at least one value.
    pub(crate) fn uniform<I: IntoIterator<Item = f64>>(values: I, ty: DataType) -> Self {
        let data: Vec<TypedData> = values.into_iter().map(|v| TypedData::new(v, ty)).collect();
        let size = data.len() * ty.size();
        Self { data, ty, size }
    }

    #[inline]
    pub fn data(&self) -> &[TypedData] {
        &self.data
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element type shared by all components.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.ty
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).map(TypedData::value)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(TypedData::value)
    }

    /// Updates the value of one component, keeping its type.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.data.len();
        let item = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        item.set_value(value);
        Ok(())
    }

    /// Replaces one component. The new element may change the vector type
    /// only when it is the sole component.
    pub fn set_item(&mut self, index: usize, item: TypedData) -> Result<()> {
        let len = self.data.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        if len > 1 && item.data_type() != self.ty {
            return Err(Error::MixedDataTypes {
                expected: self.ty,
                found: item.data_type(),
            });
        }

        self.data[index] = item;
        self.recalculate();
        Ok(())
    }

    /// Appends a component of the vector type.
    pub fn push(&mut self, item: TypedData) -> Result<()> {
        if item.data_type() != self.ty {
            return Err(Error::MixedDataTypes {
                expected: self.ty,
                found: item.data_type(),
            });
        }
        self.data.push(item);
        self.recalculate();
        Ok(())
    }

    /// Replaces all components.
    pub fn set_data(&mut self, data: Vec<TypedData>) -> Result<()> {
        *self = Self::new(data)?;
        Ok(())
    }

    /// Dot product; the result carries `self`'s type.
    pub fn dot(&self, other: &Vector) -> Result<TypedData> {
        self.check_len(other)?;
        let sum = self.values().zip(other.values()).map(|(a, b)| a * b).sum();
        Ok(TypedData::new(sum, self.ty))
    }

    pub fn checked_add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn checked_mul(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn checked_div(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Two vectors share a shape when they have the same type and length.
    #[inline]
    pub fn same_shape(&self, other: &Vector) -> bool {
        self.ty == other.ty && self.len() == other.len()
    }

    fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Result<Vector> {
        self.check_len(other)?;
        Ok(Self::uniform(
            self.values().zip(other.values()).map(|(a, b)| f(a, b)),
            self.ty,
        ))
    }

    fn check_len(&self, other: &Vector) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }

    fn recalculate(&mut self) {
        self.ty = self.data[0].data_type();
        self.size = self.data.iter().map(TypedData::size).sum();
    }
}

impl ByteSized for Vector {
    #[inline]
    fn size(&self) -> usize {
        self.size
    }
}

/// Returns the single type shared by `data`.
pub(crate) fn common_type(data: &[TypedData]) -> Result<DataType> {
    let first = data.first().ok_or(Error::EmptyVector)?.data_type();
    match data.iter().find(|d| d.data_type() != first) {
        Some(d) => Err(Error::MixedDataTypes {
            expected: first,
            found: d.data_type(),
        }),
        None => Ok(first),
    }
}

// ── fixed arity ───────────────────────────────────────────────────────────

/// A [`Vector`] with exactly `N` components and named accessors.
///
/// Dereferences to the underlying [`Vector`] for read access.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorN<const N: usize> {
    inner: Vector,
}

pub type Vector2 = VectorN<2>;
pub type Vector3 = VectorN<3>;
pub type Vector4 = VectorN<4>;

impl<const N: usize> VectorN<N> {
    pub fn new(values: [f64; N], ty: DataType) -> Self {
        debug_assert!(N > 0, "zero-length vectors are not representable");
        Self {
            inner: Vector::uniform(values, ty),
        }
    }

    /// Updates component `index`, which must be below `N`.
    #[inline]
    fn set_component(&mut self, index: usize, value: f64) {
        self.inner.data[index].set_value(value);
    }

    #[inline]
    fn component(&self, index: usize) -> f64 {
        self.inner.data[index].value()
    }

    #[inline]
    pub fn as_vector(&self) -> &Vector {
        &self.inner
    }

    #[inline]
    pub fn into_vector(self) -> Vector {
        self.inner
    }

    /// Dot product of two vectors of the same arity.
    pub fn dot(&self, other: &Self) -> TypedData {
        let sum = self.inner.values().zip(other.inner.values()).map(|(a, b)| a * b).sum();
        TypedData::new(sum, self.inner.ty)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            inner: Vector::uniform(
                self.inner.values().zip(other.inner.values()).map(|(a, b)| f(a, b)),
                self.inner.ty,
            ),
        }
    }
}

impl<const N: usize> Deref for VectorN<N> {
    type Target = Vector;

    #[inline]
    fn deref(&self) -> &Vector {
        &self.inner
    }
}

impl<const N: usize> From<VectorN<N>> for Vector {
    #[inline]
    fn from(v: VectorN<N>) -> Self {
        v.inner
    }
}

impl<const N: usize> TryFrom<Vector> for VectorN<N> {
    type Error = Error;

    fn try_from(inner: Vector) -> Result<Self> {
        if inner.len() != N {
            return Err(Error::LengthMismatch {
                left: N,
                right: inner.len(),
            });
        }
        Ok(Self { inner })
    }
}

macro_rules! impl_vector_ops {
    ($($trait:ident $method:ident $op:tt),* $(,)?) => {$(
        impl<const N: usize> $trait for &VectorN<N> {
            type Output = VectorN<N>;

            #[inline]
            fn $method(self, rhs: Self) -> VectorN<N> {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl<const N: usize> $trait for VectorN<N> {
            type Output = VectorN<N>;

            #[inline]
            fn $method(self, rhs: Self) -> VectorN<N> {
                (&self).$method(&rhs)
            }
        }
    )*};
}

impl_vector_ops!(Add add +, Sub sub -, Mul mul *, Div div /);

macro_rules! impl_accessors {
    ($n:literal => $($get:ident $set:ident $idx:literal),+) => {
        impl VectorN<$n> {
            $(
                #[inline]
                pub fn $get(&self) -> f64 {
                    self.component($idx)
                }

                #[inline]
                pub fn $set(&mut self, value: f64) {
                    self.set_component($idx, value);
                }
            )+
        }
    };
}

impl_accessors!(2 => x set_x 0, y set_y 1);
impl_accessors!(3 => x set_x 0, y set_y 1, z set_z 2);
impl_accessors!(4 => x set_x 0, y set_y 1, z set_z 2, w set_w 3);

// ── shorthand constructors ────────────────────────────────────────────────

macro_rules! shorthand {
    ($ty:expr, $scalar:ty => $($name:ident $n:literal ($($c:ident),+)),+) => {$(
        #[inline]
        pub fn $name($($c: $scalar),+) -> VectorN<$n> {
            VectorN::new([$($c as f64),+], $ty)
        }
    )+};
}

shorthand!(DataType::F32, f32 => float2 2 (x, y), float3 3 (x, y, z), float4 4 (x, y, z, w));
shorthand!(DataType::U8, u8 => ubyte2 2 (x, y), ubyte3 3 (x, y, z), ubyte4 4 (x, y, z, w));
shorthand!(DataType::U16, u16 => ushort2 2 (x, y), ushort3 3 (x, y, z), ushort4 4 (x, y, z, w));
shorthand!(DataType::U32, u32 => uint2 2 (x, y), uint3 3 (x, y, z), uint4 4 (x, y, z, w));
shorthand!(DataType::I8, i8 => byte2 2 (x, y), byte3 3 (x, y, z), byte4 4 (x, y, z, w));
shorthand!(DataType::I16, i16 => short2 2 (x, y), short3 3 (x, y, z), short4 4 (x, y, z, w));
shorthand!(DataType::I32, i32 => int2 2 (x, y), int3 3 (x, y, z), int4 4 (x, y, z, w));

#[cfg(test)]
mod tests {
    use super::*;

    fn td(v: f64, ty: DataType) -> TypedData {
        TypedData::new(v, ty)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn size_is_sum_of_elements() {
        let v = Vector::new(vec![td(1.0, DataType::U16), td(2.0, DataType::U16)]).unwrap();
        assert_eq!(v.size(), 4);
        assert_eq!(v.data_type(), DataType::U16);
        assert_eq!(float4(0.0, 0.0, 0.0, 0.0).size(), 16);
    }

    #[test]
    fn mixed_types_are_rejected() {
        let err = Vector::new(vec![td(1.0, DataType::F32), td(2.0, DataType::U8)]).unwrap_err();
        assert!(matches!(
            err,
            Error::MixedDataTypes { expected: DataType::F32, found: DataType::U8 }
        ));
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(Vector::new(Vec::new()), Err(Error::EmptyVector)));
        assert!(matches!(Vector::from_values(&[], DataType::F32), Err(Error::EmptyVector)));
    }

    // ── mutation ──────────────────────────────────────────────────────────

    #[test]
    fn set_item_with_other_type_leaves_vector_unchanged() {
        let mut v = Vector::from_values(&[1.0, 2.0, 3.0], DataType::U8).unwrap();
        let before = v.clone();

        assert!(v.set_item(1, td(9.0, DataType::F32)).is_err());
        assert_eq!(v, before);
        assert_eq!(v.size(), 3);
    }

    #[test]
    fn set_item_on_single_component_changes_type_and_size() {
        let mut v = Vector::from_values(&[1.0], DataType::U8).unwrap();
        v.set_item(0, td(1.0, DataType::F32)).unwrap();
        assert_eq!(v.data_type(), DataType::F32);
        assert_eq!(v.size(), 4);
    }

    #[test]
    fn push_keeps_size_additive() {
        let mut v = Vector::from_values(&[1.0, 2.0], DataType::I16).unwrap();
        v.push(td(3.0, DataType::I16)).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.size(), 6);
        assert!(v.push(td(4.0, DataType::I32)).is_err());
        assert_eq!(v.size(), 6);
    }

    #[test]
    fn set_reports_out_of_bounds() {
        let mut v = float2(1.0, 2.0).into_vector();
        assert!(matches!(v.set(2, 0.0), Err(Error::IndexOutOfBounds { index: 2, len: 2 })));
    }

    // ── named accessors ───────────────────────────────────────────────────

    #[test]
    fn accessors_map_to_positions() {
        let mut v = float4(1.0, 2.0, 3.0, 4.0);
        assert_eq!((v.x(), v.y(), v.z(), v.w()), (1.0, 2.0, 3.0, 4.0));

        v.set_z(7.5);
        assert_eq!(v.get(2), Some(7.5));
        assert_eq!(v.data()[2].data_type(), DataType::F32);
    }

    #[test]
    fn try_from_checks_arity() {
        let v = Vector::from_values(&[1.0, 2.0, 3.0], DataType::U8).unwrap();
        assert!(Vector2::try_from(v.clone()).is_err());
        let v3 = Vector3::try_from(v).unwrap();
        assert_eq!(v3.z(), 3.0);
    }

    // ── arithmetic ────────────────────────────────────────────────────────

    #[test]
    fn elementwise_ops() {
        let a = float2(6.0, 8.0);
        let b = float2(2.0, 4.0);

        assert_eq!((&a + &b).data(), float2(8.0, 12.0).data());
        assert_eq!((&a - &b).data(), float2(4.0, 4.0).data());
        assert_eq!((&a * &b).data(), float2(12.0, 32.0).data());
        assert_eq!((a / b).data(), float2(3.0, 2.0).data());
    }

    #[test]
    fn dot_product() {
        let a = int3(1, 2, 3);
        let b = int3(4, 5, 6);
        let d = a.dot(&b);
        assert_eq!(d.value(), 32.0);
        assert_eq!(d.data_type(), DataType::I32);
    }

    #[test]
    fn checked_ops_reject_length_mismatch() {
        let a = float2(1.0, 2.0).into_vector();
        let b = float3(1.0, 2.0, 3.0).into_vector();
        assert!(matches!(a.checked_add(&b), Err(Error::LengthMismatch { left: 2, right: 3 })));
        assert!(a.dot(&b).is_err());
    }
}
