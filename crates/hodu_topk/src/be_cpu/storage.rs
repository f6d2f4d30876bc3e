mod ops_sort;

use crate::{
    compat::*,
    error::{TopKError, TopKResult},
    types::DType,
};
use float8::{F8E4M3, F8E5M2};
use half::{bf16, f16};

/// Host buffer tagged with its element type.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    F8E4M3(Vec<F8E4M3>),
    F8E5M2(Vec<F8E5M2>),
    BF16(Vec<bf16>),
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

/// Element types that can live in a [`CpuStorage`].
pub trait StorageElement: Copy + PartialOrd + Send + Sync + 'static {
    const DTYPE: DType;

    fn into_storage(data: Vec<Self>) -> CpuStorage;

    fn from_storage(storage: &CpuStorage) -> Option<&[Self]>;
}

macro_rules! impl_storage_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl StorageElement for $ty {
                const DTYPE: DType = DType::$variant;

                fn into_storage(data: Vec<Self>) -> CpuStorage {
                    CpuStorage::$variant(data)
                }

                fn from_storage(storage: &CpuStorage) -> Option<&[Self]> {
                    match storage {
                        CpuStorage::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*

        impl CpuStorage {
            pub fn dtype(&self) -> DType {
                match self {
                    $(Self::$variant(_) => DType::$variant,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(Self::$variant(data) => data.len(),)*
                }
            }
        }
    };
}

impl_storage_element!(
    F8E4M3 => F8E4M3,
    F8E5M2 => F8E5M2,
    bf16 => BF16,
    f16 => F16,
    f32 => F32,
    f64 => F64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
);

impl CpuStorage {
    pub fn from_vec<T: StorageElement>(data: Vec<T>) -> Self {
        T::into_storage(data)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the buffer as `&[T]`, failing when `T` is not the stored dtype.
    pub fn as_slice<T: StorageElement>(&self) -> TopKResult<&[T]> {
        T::from_storage(self).ok_or(TopKError::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })
    }
}

impl<T: StorageElement> From<Vec<T>> for CpuStorage {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
