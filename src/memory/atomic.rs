// Tue Jan 13 2026 - Alex

use crate::memory::scalar::{Swappable, Value, Word};
use crate::memory::{MemoryError, MemoryRegion};

impl<'a> MemoryRegion<'a> {
    /// Strong compare-and-swap at the truncated address.
    ///
    /// Equality is on the stored bit pattern: for floats `+0.0` and `-0.0`
    /// differ, and a NaN only matches a NaN with identical payload bits.
    pub fn compare_and_swap<T: Swappable>(&self, address: i64, expected: T, new: T) -> Result<bool, MemoryError> {
        let offset = self.check_aligned(address, T::Bits::WIDTH)?;
        let swapped = unsafe {
            T::Bits::atomic_compare_and_swap(self.ptr_at(offset), expected.into_bits(), new.into_bits())
        };
        Ok(swapped)
    }

    pub fn compare_and_swap_int(&self, address: i64, expected: i32, new: i32) -> Result<bool, MemoryError> {
        self.compare_and_swap(address, expected, new)
    }

    pub fn compare_and_swap_long(&self, address: i64, expected: i64, new: i64) -> Result<bool, MemoryError> {
        self.compare_and_swap(address, expected, new)
    }

    pub fn compare_and_swap_float(&self, address: i64, expected: f32, new: f32) -> Result<bool, MemoryError> {
        self.compare_and_swap(address, expected, new)
    }

    pub fn compare_and_swap_double(&self, address: i64, expected: f64, new: f64) -> Result<bool, MemoryError> {
        self.compare_and_swap(address, expected, new)
    }

    /// Returns `None` when the two values differ in kind or the kind has no
    /// compare-and-swap.
    pub fn compare_and_swap_value(&self, address: i64, expected: Value, new: Value) -> Option<Result<bool, MemoryError>> {
        match (expected, new) {
            (Value::Int(e), Value::Int(n)) => Some(self.compare_and_swap(address, e, n)),
            (Value::Long(e), Value::Long(n)) => Some(self.compare_and_swap(address, e, n)),
            (Value::Float(e), Value::Float(n)) => Some(self.compare_and_swap(address, e, n)),
            (Value::Double(e), Value::Double(n)) => Some(self.compare_and_swap(address, e, n)),
            _ => {
                debug_assert!(expected.kind() != new.kind() || !expected.kind().supports_compare_and_swap());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::scalar::ScalarKind;

    #[test]
    fn test_int_compare_and_swap() {
        let mut words = [0u64; 2];
        let region = MemoryRegion::from_words(&mut words);
        region.store_int(4, 10).unwrap();

        assert!(!region.compare_and_swap_int(4, 11, 20).unwrap());
        assert_eq!(region.load_int(4).unwrap(), 10);

        assert!(region.compare_and_swap_int(6, 10, 20).unwrap());
        assert_eq!(region.load_int(4).unwrap(), 20);
        assert_eq!(region.load_int(0).unwrap(), 0);
        assert_eq!(region.load_int(8).unwrap(), 0);
    }

    #[test]
    fn test_long_compare_and_swap() {
        let mut words = [0u64; 2];
        let region = MemoryRegion::from_words(&mut words);
        assert!(region.compare_and_swap_long(13, 0, -1).unwrap());
        assert_eq!(region.load_long(8).unwrap(), -1);
        assert!(!region.compare_and_swap_long(8, 0, 5).unwrap());
        assert_eq!(region.load_long(8).unwrap(), -1);
    }

    #[test]
    fn test_double_compare_and_swap_is_bitwise() {
        let mut words = [0u64; 1];
        let region = MemoryRegion::from_words(&mut words);
        region.store_double(0, 0.0).unwrap();

        assert!(!region.compare_and_swap_double(0, -0.0, 1.0).unwrap());
        assert_eq!(region.load_double(0).unwrap().to_bits(), 0.0f64.to_bits());

        assert!(region.compare_and_swap_double(0, 0.0, 1.0).unwrap());
        assert_eq!(region.load_double(0).unwrap(), 1.0);
    }

    #[test]
    fn test_float_compare_and_swap_nan_payloads() {
        let mut words = [0u64; 1];
        let region = MemoryRegion::from_words(&mut words);
        let quiet = f32::from_bits(0x7fc0_0000);
        let payload = f32::from_bits(0x7fc0_0001);
        region.store_float(0, quiet).unwrap();

        assert!(!region.compare_and_swap_float(0, payload, 2.0).unwrap());
        assert!(region.compare_and_swap_float(0, quiet, payload).unwrap());
        assert_eq!(region.load_float(0).unwrap().to_bits(), 0x7fc0_0001);
    }

    #[test]
    fn test_compare_and_swap_bounds() {
        let mut words = [0u64; 2];
        let region = MemoryRegion::from_words(&mut words);
        assert!(region.compare_and_swap_int(16, 0, 1).unwrap_err().is_bounds());
        assert!(region.compare_and_swap_long(-1, 0, 1).unwrap_err().is_bounds());
    }

    #[test]
    fn test_compare_and_swap_value_dispatch() {
        let mut words = [0u64; 1];
        let region = MemoryRegion::from_words(&mut words);
        let swapped = region.compare_and_swap_value(0, Value::Int(0), Value::Int(3));
        assert!(matches!(swapped, Some(Ok(true))));
        assert!(region.compare_and_swap_value(0, Value::Int(0), Value::Long(3)).is_none());
        assert!(region.compare_and_swap_value(0, Value::Short(0), Value::Short(3)).is_none());
        assert!(ScalarKind::ALL.iter().filter(|k| k.supports_compare_and_swap()).count() == 4);
    }

    #[test]
    fn test_concurrent_increments() {
        const THREADS: usize = 4;
        const ROUNDS: i64 = 1000;

        let mut words = [0u64; 1];
        let region = MemoryRegion::from_words(&mut words);
        std::thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        loop {
                            let current = region.load_volatile_long(0).unwrap();
                            if region.compare_and_swap_long(0, current, current + 1).unwrap() {
                                break;
                            }
                        }
                    }
                });
            }
        });
        assert_eq!(region.load_long(0).unwrap(), THREADS as i64 * ROUNDS);
    }
}
