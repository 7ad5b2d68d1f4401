use alloc::sync::Arc;

use crate::types::{Dispatcher, NonGenericTypeCell, Type, Typed};
use crate::{AnyValue, ClassId};

macro_rules! impl_typed_primitive {
    ($($ty:ty => $class:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_info() -> &'static Type {
                    static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
                    CELL.get_or_init(|| {
                        let class_id = ClassId::$class;
                        Type::new::<$ty>(class_id, class_id.name(), Dispatcher::Primitive)
                    })
                }
            }
        )*
    };
}

impl_typed_primitive!(
    i8 => INT8,
    u8 => UINT8,
    i16 => INT16,
    u16 => UINT16,
    i32 => INT32,
    u32 => UINT32,
    i64 => INT64,
    u64 => UINT64,
    f32 => FLOAT32,
    f64 => FLOAT64,
    bool => BOOLEAN,
);

impl Typed for Arc<str> {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            Type::new::<Self>(ClassId::STRING, "String", Dispatcher::String)
        })
    }
}

impl Typed for AnyValue {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| Type::new::<Self>(ClassId::ANY, "Any", Dispatcher::Any))
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::ClassId;
    use crate::types::Typed;

    #[test]
    fn builtin_descriptors_are_unique() {
        assert!(i32::type_info().is(i32::type_info()));
        assert!(!i32::type_info().is(u32::type_info()));
        assert_eq!(<Arc<str>>::type_info().class_id(), ClassId::STRING);
        assert_eq!(f64::type_info().name(), "Float64");
        assert!(bool::type_info().type_is::<bool>());
    }
}
