use crate::data::{ByteSized, DataType, TypedData};
use crate::error::{Error, Result};

use super::vector::{Vector, Vector2, common_type};

/// Row-major `width x height` grid of [`TypedData`] sharing one type.
///
/// When handed to a shader the flat data is read column-major, so the
/// 3x3 constructors below store their translation terms in the last row.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<TypedData>,
    width: usize,
    height: usize,
    ty: DataType,
}

impl Matrix {
    pub fn new(data: Vec<TypedData>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(Error::MatrixDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        let ty = common_type(&data)?;
        Ok(Self { data, width, height, ty })
    }

    pub fn from_values(values: &[f64], width: usize, height: usize, ty: DataType) -> Result<Self> {
        let data = values.iter().map(|&v| TypedData::new(v, ty)).collect();
        Self::new(data, width, height)
    }

    /// `n x n` identity.
    pub fn identity(n: usize, ty: DataType) -> Self {
        let data = (0..n * n)
            .map(|i| TypedData::new(if i % (n + 1) == 0 { 1.0 } else { 0.0 }, ty))
            .collect();
        Self { data, width: n, height: n, ty }
    }

    /// 2D rotation by `angle` radians.
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::f32_3x3([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    /// 2D translation by `v`, in `v`'s type.
    pub fn translation(v: &Vector2) -> Self {
        Self::square3(
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, v.x(), v.y(), 1.0],
            v.data_type(),
        )
    }

    /// 2D scale by `v`, in `v`'s type.
    pub fn scaling(v: &Vector2) -> Self {
        Self::square3(
            [v.x(), 0.0, 0.0, 0.0, v.y(), 0.0, 0.0, 0.0, 1.0],
            v.data_type(),
        )
    }

    /// Pixel-space to clip-space projection for a `width x height` target.
    pub fn projection(width: f32, height: f32) -> Self {
        Self::f32_3x3([2.0 / width, 0.0, 0.0, 0.0, 2.0 / height, 0.0, 1.0, 1.0, 1.0])
    }

    fn f32_3x3(values: [f32; 9]) -> Self {
        Self::square3(values.map(f64::from), DataType::F32)
    }

    fn square3(values: [f64; 9], ty: DataType) -> Self {
        let data = values.iter().map(|&v| TypedData::new(v, ty)).collect();
        Self { data, width: 3, height: 3, ty }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[TypedData] {
        &self.data
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.ty
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len() * self.ty.size()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(TypedData::value)
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        (row < self.height && column < self.width)
            .then(|| self.data[row * self.width + column].value())
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        let index = self.flat_index(row, column)?;
        self.data[index].set_value(value);
        Ok(())
    }

    /// Replaces the element at flat `index`. The type may only change on a
    /// 1x1 matrix.
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
        self.ty = item.data_type();
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<Vector> {
        self.check_row(row)?;
        let start = row * self.width;
        Ok(Vector::uniform(
            self.data[start..start + self.width].iter().map(TypedData::value),
            self.ty,
        ))
    }

    pub fn column(&self, column: usize) -> Result<Vector> {
        self.check_column(column)?;
        Ok(Vector::uniform(
            (0..self.height).map(|r| self.data[r * self.width + column].value()),
            self.ty,
        ))
    }

    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        self.check_row(row)?;
        self.check_len(values.len(), self.width)?;
        let start = row * self.width;
        for (item, &v) in self.data[start..start + self.width].iter_mut().zip(values) {
            item.set_value(v);
        }
        Ok(())
    }

    pub fn set_column(&mut self, column: usize, values: &[f64]) -> Result<()> {
        self.check_column(column)?;
        self.check_len(values.len(), self.height)?;
        for (r, &v) in values.iter().enumerate() {
            self.data[r * self.width + column].set_value(v);
        }
        Ok(())
    }

    /// Matrix product `self * rhs`, in `self`'s type.
    pub fn checked_mul(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_len(rhs.height, self.width)?;

        let mut data = Vec::with_capacity(self.height * rhs.width);
        for r in 0..self.height {
            for c in 0..rhs.width {
                let sum = (0..self.width)
                    .map(|k| self.data[r * self.width + k].value() * rhs.data[k * rhs.width + c].value())
                    .sum();
                data.push(TypedData::new(sum, self.ty));
            }
        }

        Ok(Matrix {
            data,
            width: rhs.width,
            height: self.height,
            ty: self.ty,
        })
    }

    fn flat_index(&self, row: usize, column: usize) -> Result<usize> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(row * self.width + column)
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.height {
            return Err(Error::IndexOutOfBounds { index: row, len: self.height });
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.width {
            return Err(Error::IndexOutOfBounds { index: column, len: self.width });
        }
        Ok(())
    }

    fn check_len(&self, got: usize, want: usize) -> Result<()> {
        if got != want {
            return Err(Error::LengthMismatch { left: want, right: got });
        }
        Ok(())
    }
}

impl ByteSized for Matrix {
    #[inline]
    fn size(&self) -> usize {
        Matrix::size(self)
    }
}
