// Tue Jan 13 2026 - Alex

//! Typed load and store in three strengths.
//!
//! * aligned: the address is truncated to a multiple of the value width and the
//!   word is accessed with a relaxed atomic, so it never tears but carries no
//!   cross-thread ordering.
//! * unaligned: the exact address, assembled byte by byte in native order.
//! * volatile: the aligned rule, preceded by a sequentially consistent fence and
//!   performed as a `SeqCst` access.

use crate::memory::scalar::{Access, Scalar, ScalarKind, Value, Word};
use crate::memory::{MemoryError, MemoryRegion};
use std::sync::atomic::{fence, AtomicU8, Ordering};

impl<'a> MemoryRegion<'a> {
    pub fn load<T: Scalar>(&self, address: i64) -> Result<T, MemoryError> {
        let offset = self.check_aligned(address, T::Bits::WIDTH)?;
        let bits = unsafe { T::Bits::atomic_load(self.ptr_at(offset), Ordering::Relaxed) };
        Ok(T::from_bits(bits))
    }

    pub fn store<T: Scalar>(&self, address: i64, value: T) -> Result<(), MemoryError> {
        let offset = self.check_aligned(address, T::Bits::WIDTH)?;
        unsafe { T::Bits::atomic_store(self.ptr_at(offset), value.into_bits(), Ordering::Relaxed) };
        Ok(())
    }

    pub fn load_unaligned<T: Scalar>(&self, address: i64) -> Result<T, MemoryError> {
        let width = T::Bits::WIDTH;
        let offset = self.check_range(address, width as i64)?;
        let mut raw = [0u8; 8];
        for (i, byte) in raw[..width].iter_mut().enumerate() {
            *byte = unsafe { self.byte_at(offset + i) }.load(Ordering::Relaxed);
        }
        Ok(T::from_bits(T::Bits::from_ne_slice(&raw[..width])))
    }

    pub fn store_unaligned<T: Scalar>(&self, address: i64, value: T) -> Result<(), MemoryError> {
        let width = T::Bits::WIDTH;
        let offset = self.check_range(address, width as i64)?;
        let mut raw = [0u8; 8];
        value.into_bits().write_ne_slice(&mut raw[..width]);
        for (i, byte) in raw[..width].iter().enumerate() {
            unsafe { self.byte_at(offset + i) }.store(*byte, Ordering::Relaxed);
        }
        Ok(())
    }

    pub fn load_volatile<T: Scalar>(&self, address: i64) -> Result<T, MemoryError> {
        let offset = self.check_aligned(address, T::Bits::WIDTH)?;
        fence(Ordering::SeqCst);
        let bits = unsafe { T::Bits::atomic_load(self.ptr_at(offset), Ordering::SeqCst) };
        Ok(T::from_bits(bits))
    }

    pub fn store_volatile<T: Scalar>(&self, address: i64, value: T) -> Result<(), MemoryError> {
        let offset = self.check_aligned(address, T::Bits::WIDTH)?;
        fence(Ordering::SeqCst);
        unsafe { T::Bits::atomic_store(self.ptr_at(offset), value.into_bits(), Ordering::SeqCst) };
        Ok(())
    }

    /// # Safety
    ///
    /// `offset` must lie in `[0, size)`.
    pub(crate) unsafe fn byte_at(&self, offset: usize) -> &AtomicU8 {
        unsafe { AtomicU8::from_ptr(self.ptr_at(offset)) }
    }

    pub fn load_value(&self, kind: ScalarKind, access: Access, address: i64) -> Result<Value, MemoryError> {
        fn typed<T: Scalar>(region: &MemoryRegion<'_>, access: Access, address: i64) -> Result<T, MemoryError> {
            match access {
                Access::Aligned => region.load(address),
                Access::Unaligned => region.load_unaligned(address),
                Access::Volatile => region.load_volatile(address),
            }
        }

        Ok(match kind {
            ScalarKind::Byte => Value::Byte(typed(self, access, address)?),
            ScalarKind::Short => Value::Short(typed(self, access, address)?),
            ScalarKind::Int => Value::Int(typed(self, access, address)?),
            ScalarKind::Long => Value::Long(typed(self, access, address)?),
            ScalarKind::Float => Value::Float(typed(self, access, address)?),
            ScalarKind::Double => Value::Double(typed(self, access, address)?),
        })
    }

    pub fn store_value(&self, access: Access, address: i64, value: Value) -> Result<(), MemoryError> {
        fn typed<T: Scalar>(region: &MemoryRegion<'_>, access: Access, address: i64, value: T) -> Result<(), MemoryError> {
            match access {
                Access::Aligned => region.store(address, value),
                Access::Unaligned => region.store_unaligned(address, value),
                Access::Volatile => region.store_volatile(address, value),
            }
        }

        match value {
            Value::Byte(v) => typed(self, access, address, v),
            Value::Short(v) => typed(self, access, address, v),
            Value::Int(v) => typed(self, access, address, v),
            Value::Long(v) => typed(self, access, address, v),
            Value::Float(v) => typed(self, access, address, v),
            Value::Double(v) => typed(self, access, address, v),
        }
    }

    pub fn load_byte(&self, address: i64) -> Result<i8, MemoryError> {
        self.load(address)
    }

    pub fn store_byte(&self, address: i64, value: i8) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_short(&self, address: i64) -> Result<i16, MemoryError> {
        self.load(address)
    }

    pub fn store_short(&self, address: i64, value: i16) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_int(&self, address: i64) -> Result<i32, MemoryError> {
        self.load(address)
    }

    pub fn store_int(&self, address: i64, value: i32) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_long(&self, address: i64) -> Result<i64, MemoryError> {
        self.load(address)
    }

    pub fn store_long(&self, address: i64, value: i64) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_float(&self, address: i64) -> Result<f32, MemoryError> {
        self.load(address)
    }

    pub fn store_float(&self, address: i64, value: f32) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_double(&self, address: i64) -> Result<f64, MemoryError> {
        self.load(address)
    }

    pub fn store_double(&self, address: i64, value: f64) -> Result<(), MemoryError> {
        self.store(address, value)
    }

    pub fn load_unaligned_byte(&self, address: i64) -> Result<i8, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_byte(&self, address: i64, value: i8) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_unaligned_short(&self, address: i64) -> Result<i16, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_short(&self, address: i64, value: i16) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_unaligned_int(&self, address: i64) -> Result<i32, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_int(&self, address: i64, value: i32) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_unaligned_long(&self, address: i64) -> Result<i64, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_long(&self, address: i64, value: i64) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_unaligned_float(&self, address: i64) -> Result<f32, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_float(&self, address: i64, value: f32) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_unaligned_double(&self, address: i64) -> Result<f64, MemoryError> {
        self.load_unaligned(address)
    }

    pub fn store_unaligned_double(&self, address: i64, value: f64) -> Result<(), MemoryError> {
        self.store_unaligned(address, value)
    }

    pub fn load_volatile_byte(&self, address: i64) -> Result<i8, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_byte(&self, address: i64, value: i8) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }

    pub fn load_volatile_short(&self, address: i64) -> Result<i16, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_short(&self, address: i64, value: i16) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }

    pub fn load_volatile_int(&self, address: i64) -> Result<i32, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_int(&self, address: i64, value: i32) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }

    pub fn load_volatile_long(&self, address: i64) -> Result<i64, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_long(&self, address: i64, value: i64) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }

    pub fn load_volatile_float(&self, address: i64) -> Result<f32, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_float(&self, address: i64, value: f32) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }

    pub fn load_volatile_double(&self, address: i64) -> Result<f64, MemoryError> {
        self.load_volatile(address)
    }

    pub fn store_volatile_double(&self, address: i64, value: f64) -> Result<(), MemoryError> {
        self.store_volatile(address, value)
    }
}
