/// Trait for payloads that can be stored in a [`SkipList`](crate::SkipList).
///
/// The list orders its elements by the floating point key that each payload produces. The key is
/// read once when the payload is inserted and is never re-derived afterwards.
pub trait ListElement {
    /// Returns the key used to order this element.
    fn extract_key(&self) -> f64;

    /// Returns a short human readable description of the element.
    fn describe(&self) -> String {
        format!("{:.3}", self.extract_key())
    }
}

impl<T: ListElement + ?Sized> ListElement for Box<T> {
    fn extract_key(&self) -> f64 {
        (**self).extract_key()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Implement [`ListElement`] for a numeric type whose value is its own key.
#[macro_export]
macro_rules! impl_list_element {
    ($t:ty) => {
        impl $crate::ListElement for $t {
            fn extract_key(&self) -> f64 {
                *self as f64
            }

            fn describe(&self) -> String {
                format!("{:03}", self)
            }
        }
    };
}

impl_list_element!(u8);
impl_list_element!(u16);
impl_list_element!(u32);
impl_list_element!(u64);
impl_list_element!(usize);

impl_list_element!(i8);
impl_list_element!(i16);
impl_list_element!(i32);
impl_list_element!(i64);
impl_list_element!(isize);

impl ListElement for f32 {
    fn extract_key(&self) -> f64 {
        f64::from(*self)
    }
}

impl ListElement for f64 {
    fn extract_key(&self) -> f64 {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Reading {
        sensor: u32,
    }

    impl ListElement for Reading {
        fn extract_key(&self) -> f64 {
            self.sensor as f64
        }
    }

    #[test]
    fn integers_use_their_value_as_the_key() {
        assert_eq!(42_i32.extract_key(), 42.0);
        assert_eq!(7_u64.extract_key(), 7.0);
        assert_eq!((-3_isize).extract_key(), -3.0);
    }

    #[test]
    fn integers_are_described_with_zero_padding() {
        assert_eq!(5_u8.describe(), "005");
        assert_eq!(123_i64.describe(), "123");
    }

    #[test]
    fn floats_are_described_with_three_decimals() {
        assert_eq!(1.5_f64.describe(), "1.500");
        assert_eq!(0.25_f32.describe(), "0.250");
    }

    #[test]
    fn custom_elements_get_the_default_description() {
        let reading = Reading { sensor: 9 };

        assert_eq!(reading.describe(), "9.000");
    }

    #[test]
    fn boxed_elements_delegate_to_the_inner_value() {
        let boxed: Box<i32> = Box::new(17);

        assert_eq!(boxed.extract_key(), 17.0);
        assert_eq!(boxed.describe(), "017");
    }
}
