//! [`Tree`] to typed values.

use alloc::sync::Arc;

use arbor_tree::{Tree, TreeScalar};

use crate::types::{Dispatcher, EnumInterpreterError, Fields, Type, Typed};
use crate::{
    AnyValue, BoxedAny, ClassId, DispatchTable, ErrorStack, Locator, MappingError,
    TreeToObjectConfig, Value,
};

// -----------------------------------------------------------------------------
// State

/// The source node, config and error stack of one mapping step.
pub struct State<'a> {
    pub tree: &'a Tree,
    pub config: &'a TreeToObjectConfig,
    pub errors: ErrorStack,
}

impl<'a> State<'a> {
    #[inline]
    pub fn new(tree: &'a Tree, config: &'a TreeToObjectConfig) -> Self {
        Self {
            tree,
            config,
            errors: ErrorStack::new(),
        }
    }

    /// Records `error` and returns the absent value of `ty`.
    #[inline]
    fn fail(&mut self, origin: &'static str, ty: &'static Type, error: MappingError) -> Value {
        self.errors.push_error(origin, error);
        Value::null(ty)
    }
}

/// A handler for one class of types.
///
/// It reads `state.tree` as a value of the given type. On failure it
/// records errors in `state.errors`; the returned value is then ignored.
pub type MapperMethod = fn(&TreeToObjectMapper, &mut State<'_>, &'static Type) -> Value;

// -----------------------------------------------------------------------------
// TreeToObjectMapper

/// Builds typed values from [`Tree`]s.
///
/// The mirror of [`ObjectToTreeMapper`](crate::ObjectToTreeMapper): handlers
/// are looked up by the target type's [`ClassId`], with the same
/// interpretation fallback.
///
/// # Examples
///
/// ```
/// use arbor_mapping::{TreeToObjectConfig, TreeToObjectMapper};
/// use arbor_tree::Tree;
///
/// let mapper = TreeToObjectMapper::new();
/// let tree = Tree::from(vec![Tree::from(1_i64), Tree::Null, Tree::from(3_u8)]);
///
/// let numbers: Vec<Option<i32>> = mapper
///     .map_from_tree(&tree, &TreeToObjectConfig::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(numbers, [Some(1), None, Some(3)]);
/// ```
#[derive(Clone)]
pub struct TreeToObjectMapper {
    methods: DispatchTable<MapperMethod>,
}

impl Default for TreeToObjectMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeToObjectMapper {
    /// Creates a mapper with handlers for every built-in class.
    pub fn new() -> Self {
        let mut mapper = Self {
            methods: DispatchTable::new(),
        };

        mapper.set_mapper_method(ClassId::STRING, Self::map_string);
        mapper.set_mapper_method(ClassId::ANY, Self::map_any);

        mapper.set_mapper_method(ClassId::INT8, Self::map_primitive::<i8>);
        mapper.set_mapper_method(ClassId::UINT8, Self::map_primitive::<u8>);
        mapper.set_mapper_method(ClassId::INT16, Self::map_primitive::<i16>);
        mapper.set_mapper_method(ClassId::UINT16, Self::map_primitive::<u16>);
        mapper.set_mapper_method(ClassId::INT32, Self::map_primitive::<i32>);
        mapper.set_mapper_method(ClassId::UINT32, Self::map_primitive::<u32>);
        mapper.set_mapper_method(ClassId::INT64, Self::map_primitive::<i64>);
        mapper.set_mapper_method(ClassId::UINT64, Self::map_primitive::<u64>);
        mapper.set_mapper_method(ClassId::FLOAT32, Self::map_primitive::<f32>);
        mapper.set_mapper_method(ClassId::FLOAT64, Self::map_primitive::<f64>);
        mapper.set_mapper_method(ClassId::BOOLEAN, Self::map_primitive::<bool>);

        mapper.set_mapper_method(ClassId::OBJECT, Self::map_object);
        mapper.set_mapper_method(ClassId::ENUM, Self::map_enum);

        mapper.set_mapper_method(ClassId::VECTOR, Self::map_collection);
        mapper.set_mapper_method(ClassId::LIST, Self::map_collection);
        mapper.set_mapper_method(ClassId::UNORDERED_SET, Self::map_collection);

        mapper.set_mapper_method(ClassId::PAIR_LIST, Self::map_map);
        mapper.set_mapper_method(ClassId::UNORDERED_MAP, Self::map_map);

        mapper
    }

    /// Installs or replaces the handler for `class_id`.
    pub fn set_mapper_method(&mut self, class_id: ClassId, method: MapperMethod) {
        self.methods.register(class_id, method);
    }

    /// Reads `tree` as a `T`; a `Null` root gives `Ok(None)`.
    pub fn map_from_tree<T: Typed>(
        &self,
        tree: &Tree,
        config: &TreeToObjectConfig,
    ) -> Result<Option<T>, ErrorStack> {
        let value = self.map_tree(tree, T::type_info(), config)?;
        value.downcast::<T>().map_err(|value| {
            ErrorStack::from_error(
                "TreeToObjectMapper::map_from_tree",
                MappingError::TypeMismatch {
                    expected: T::type_info().name(),
                    found: value.type_info().name(),
                },
            )
        })
    }

    /// Reads `tree` as a value of `ty`.
    pub fn map_tree(
        &self,
        tree: &Tree,
        ty: &'static Type,
        config: &TreeToObjectConfig,
    ) -> Result<Value, ErrorStack> {
        let mut state = State::new(tree, config);
        let value = self.map(&mut state, ty);

        if state.errors.is_empty() {
            Ok(value)
        } else {
            log::debug!(
                "mapping a tree to `{}` failed:\n{}",
                ty.name(),
                state.errors
            );
            Err(state.errors)
        }
    }

    /// Reads `state.tree` as `ty` through the handler of its class.
    pub fn map(&self, state: &mut State<'_>, ty: &'static Type) -> Value {
        if let Some(method) = self.methods.lookup(ty.class_id()) {
            return method(self, state, ty);
        }

        let Some(interpretation) = ty.find_interpretation(&state.config.enabled_interpretations)
        else {
            let error = MappingError::UnsupportedType {
                type_name: ty.name(),
            };
            return state.fail("TreeToObjectMapper::map", ty, error);
        };

        log::trace!(
            "reading `{}` as `{}`",
            ty.name(),
            interpretation.interpretation_type().name()
        );
        let interpreted = self.map(state, interpretation.interpretation_type());
        if !state.errors.is_empty() {
            return Value::null(ty);
        }
        match interpretation.from_interpretation(interpreted) {
            Some(value) => value,
            None => {
                let error = MappingError::TypeMismatch {
                    expected: interpretation.interpretation_type().name(),
                    found: "a value of another type",
                };
                state.fail("TreeToObjectMapper::map", ty, error)
            }
        }
    }

    fn map_string(_: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        let tree = state.tree;
        match tree {
            Tree::Null => Value::null(ty),
            Tree::String(text) => Value::from_parts(ty, Some(Box::new(text.clone()))),
            other => {
                let error = MappingError::TypeMismatch {
                    expected: "String",
                    found: other.tree_type().name(),
                };
                state.fail("TreeToObjectMapper::map_string", ty, error)
            }
        }
    }

    /// Guesses the value type from the node kind.
    fn map_any(mapper: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        let tree = state.tree;
        let guessed = match tree {
            Tree::Null => return Value::null(ty),
            Tree::Bool(_) => bool::type_info(),
            Tree::I8(_) | Tree::I16(_) | Tree::I32(_) | Tree::I64(_) => i64::type_info(),
            Tree::U8(_) | Tree::U16(_) | Tree::U32(_) | Tree::U64(_) => u64::type_info(),
            Tree::F32(_) | Tree::F64(_) => f64::type_info(),
            Tree::String(_) => <Arc<str>>::type_info(),
            Tree::Vector(_) => <Vec<Option<AnyValue>>>::type_info(),
            Tree::Map(_) | Tree::Pairs(_) => <Fields<AnyValue>>::type_info(),
        };
        let value = mapper.map(state, guessed);
        match AnyValue::from_value(value) {
            Some(any) => Value::from_parts(ty, Some(Box::new(any))),
            None => Value::null(ty),
        }
    }

    fn map_primitive<T: TreeScalar>(_: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        if state.tree.is_null() {
            return Value::null(ty);
        }
        match state.tree.to_scalar::<T>(state.config.allow_lossy_numbers) {
            Ok(v) => Value::from_parts(ty, Some(Box::new(v))),
            Err(error) => state.fail("TreeToObjectMapper::map_primitive", ty, error.into()),
        }
    }

    fn map_enum(mapper: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        const ORIGIN: &str = "TreeToObjectMapper::map_enum";

        let Dispatcher::Enum(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, ty, mismatch(ty));
        };

        let repr = mapper.map(state, dispatcher.interpretation_type());
        if !state.errors.is_empty() {
            return Value::null(ty);
        }
        match dispatcher.from_interpretation(repr) {
            Ok(value) => Value::from_parts(ty, value),
            Err(EnumInterpreterError::ConstraintNotNull) => {
                let error = MappingError::EnumConstraintViolation {
                    type_name: ty.name(),
                    constraint: "NotNull",
                };
                state.fail(ORIGIN, ty, error)
            }
            Err(reason) => {
                let error = MappingError::EnumInterpretationFailure {
                    type_name: ty.name(),
                    reason,
                };
                state.fail(ORIGIN, ty, error)
            }
        }
    }

    fn map_collection(mapper: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        const ORIGIN: &str = "TreeToObjectMapper::map_collection";

        let tree = state.tree;
        let items = match tree {
            Tree::Null => return Value::null(ty),
            Tree::Vector(items) => items,
            other => {
                let error = MappingError::TypeMismatch {
                    expected: "Vector",
                    found: other.tree_type().name(),
                };
                return state.fail(ORIGIN, ty, error);
            }
        };
        let Dispatcher::Collection(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, ty, mismatch(ty));
        };

        let item_type = dispatcher.item_type();
        let config = state.config;
        let mut collection = dispatcher.create();

        for (index, item) in items.iter().enumerate() {
            let mut nested = State::new(item, config);
            let value = mapper.map(&mut nested, item_type);
            if !nested.errors.is_empty() {
                state.errors.append(nested.errors);
                state.errors.push_context(ORIGIN, Locator::Index(index));
                return Value::null(ty);
            }
            if !dispatcher.add_item(&mut *collection, value.into_inner()) {
                return state.fail(ORIGIN, ty, mismatch(item_type));
            }
        }

        Value::from_parts(ty, Some(collection))
    }

    fn map_map(mapper: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        const ORIGIN: &str = "TreeToObjectMapper::map_map";

        let tree = state.tree;
        if tree.is_null() {
            return Value::null(ty);
        }
        let Some(entries) = tree.entries() else {
            let error = MappingError::TypeMismatch {
                expected: "Map",
                found: tree.tree_type().name(),
            };
            return state.fail(ORIGIN, ty, error);
        };
        let Dispatcher::Map(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, ty, mismatch(ty));
        };

        let key_type = dispatcher.key_type();
        if key_type.class_id() != ClassId::STRING {
            let error = MappingError::InvalidMapKeyType {
                key_type: key_type.name(),
            };
            return state.fail(ORIGIN, ty, error);
        }

        let value_type = dispatcher.value_type();
        let config = state.config;
        let mut map = dispatcher.create();

        for (key, item) in entries {
            let mut nested = State::new(item, config);
            let value = mapper.map(&mut nested, value_type);
            if !nested.errors.is_empty() {
                state.errors.append(nested.errors);
                state.errors.push_context(ORIGIN, Locator::Key(key.clone()));
                return Value::null(ty);
            }
            if !dispatcher.insert(&mut *map, Box::new(key.clone()), value.into_inner()) {
                return state.fail(ORIGIN, ty, mismatch(value_type));
            }
        }

        Value::from_parts(ty, Some(map))
    }

    fn map_object(mapper: &Self, state: &mut State<'_>, ty: &'static Type) -> Value {
        const ORIGIN: &str = "TreeToObjectMapper::map_object";

        let tree = state.tree;
        if tree.is_null() {
            return Value::null(ty);
        }
        let Some(entries) = tree.entries() else {
            let error = MappingError::TypeMismatch {
                expected: "Map",
                found: tree.tree_type().name(),
            };
            return state.fail(ORIGIN, ty, error);
        };
        let Some(info) = ty.as_object() else {
            return state.fail(ORIGIN, ty, mismatch(ty));
        };

        if !state.config.allow_unknown_fields {
            for (key, _) in entries {
                if info.field(key).is_none() {
                    let error = MappingError::UnknownField {
                        type_name: ty.name(),
                        field: key.clone(),
                    };
                    return state.fail(ORIGIN, ty, error);
                }
            }
        }

        let config = state.config;
        let mut object = info.create();

        for field in info.fields() {
            // A `Null` node counts as absent.
            let Some(node) = tree.get(field.name()).filter(|node| !node.is_null()) else {
                if field.is_required() {
                    let error = MappingError::MissingRequiredField {
                        type_name: ty.name(),
                        field: field.name(),
                    };
                    return state.fail(ORIGIN, ty, error);
                }
                continue;
            };

            let mut nested = State::new(node, config);
            let value = match field.type_selector() {
                Some(selector) if field.field_type().class_id() == ClassId::ANY => {
                    match selector.select_type(&*object) {
                        Some(selected) => {
                            let value = mapper.map(&mut nested, selected);
                            let any = AnyValue::from_value(value)
                                .map(|any| -> BoxedAny { Box::new(any) });
                            Value::from_parts(field.field_type(), any)
                        }
                        None => nested.fail(ORIGIN, field.field_type(), mismatch(ty)),
                    }
                }
                _ => mapper.map(&mut nested, field.field_type()),
            };

            if !nested.errors.is_empty() {
                state.errors.append(nested.errors);
                let locator = Locator::Field(field.name());
                state.errors.push_context(ORIGIN, locator);
                return Value::null(ty);
            }
            if !field.set(&mut *object, value.into_inner()) {
                return state.fail(ORIGIN, ty, mismatch(field.field_type()));
            }
        }

        Value::from_parts(ty, Some(object))
    }
}

#[inline]
fn mismatch(expected: &'static Type) -> MappingError {
    MappingError::TypeMismatch {
        expected: expected.name(),
        found: "a value of another type",
    }
}
