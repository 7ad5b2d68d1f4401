//! Typed values to [`Tree`].

use alloc::sync::Arc;
use core::any::Any;

use arbor_tree::{Tree, TreeMap, TreeScalar};

use crate::types::{Dispatcher, EnumInterpreterError, FieldInfo, Type, Typed};
use crate::{
    AnyValue, ClassId, DispatchTable, ErrorStack, Locator, MappingError, ObjectToTreeConfig,
    ValueRef,
};

// -----------------------------------------------------------------------------
// State

/// The destination slot, config and error stack of one mapping step.
///
/// Nested steps get their own state over a child slot; the parent merges
/// the child's errors once the child state is gone.
pub struct State<'a> {
    pub tree: &'a mut Tree,
    pub config: &'a ObjectToTreeConfig,
    pub errors: ErrorStack,
}

impl<'a> State<'a> {
    #[inline]
    pub fn new(tree: &'a mut Tree, config: &'a ObjectToTreeConfig) -> Self {
        Self {
            tree,
            config,
            errors: ErrorStack::new(),
        }
    }

    #[inline]
    fn fail(&mut self, origin: &'static str, error: MappingError) {
        self.errors.push_error(origin, error);
    }
}

/// A handler for one class of types.
///
/// It writes `value` into `state.tree`, or records errors in `state.errors`.
pub type MapperMethod = fn(&ObjectToTreeMapper, &mut State<'_>, ValueRef<'_>);

// -----------------------------------------------------------------------------
// ObjectToTreeMapper

/// Converts typed values into [`Tree`]s.
///
/// Handlers are looked up by the value's [`ClassId`]. Types without a
/// handler fall back to their first enabled interpretation.
///
/// The mapper holds no per-run state, so one instance may be shared
/// between threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use arbor_mapping::{ObjectToTreeConfig, ObjectToTreeMapper};
///
/// let mapper = ObjectToTreeMapper::new();
/// let names = vec![Some(Arc::<str>::from("a")), None, Some(Arc::from("b"))];
///
/// let tree = mapper.map_to_tree(&names, &ObjectToTreeConfig::default()).unwrap();
/// assert_eq!(tree.as_vector().unwrap().len(), 2);
/// assert_eq!(tree[1].as_str(), Some("b"));
/// ```
#[derive(Clone)]
pub struct ObjectToTreeMapper {
    methods: DispatchTable<MapperMethod>,
}

impl Default for ObjectToTreeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectToTreeMapper {
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

    /// Maps `value` into a new tree.
    pub fn map_to_tree<T: Typed>(
        &self,
        value: &T,
        config: &ObjectToTreeConfig,
    ) -> Result<Tree, ErrorStack> {
        self.map_value_to_tree(ValueRef::of(value), config)
    }

    /// Maps an erased value into a new tree.
    pub fn map_value_to_tree(
        &self,
        value: ValueRef<'_>,
        config: &ObjectToTreeConfig,
    ) -> Result<Tree, ErrorStack> {
        let mut tree = Tree::Null;
        let mut state = State::new(&mut tree, config);
        self.map(&mut state, value);

        let errors = state.errors;
        if errors.is_empty() {
            Ok(tree)
        } else {
            log::debug!(
                "mapping `{}` to a tree failed:\n{errors}",
                value.type_info().name()
            );
            Err(errors)
        }
    }

    /// Maps `value` into `state.tree` through the handler of its class.
    pub fn map(&self, state: &mut State<'_>, value: ValueRef<'_>) {
        let ty = value.type_info();
        if let Some(method) = self.methods.lookup(ty.class_id()) {
            return method(self, state, value);
        }

        let Some(interpretation) = ty.find_interpretation(&state.config.enabled_interpretations)
        else {
            state.fail(
                "ObjectToTreeMapper::map",
                MappingError::UnsupportedType {
                    type_name: ty.name(),
                },
            );
            return;
        };

        log::trace!(
            "mapping `{}` as `{}`",
            ty.name(),
            interpretation.interpretation_type().name()
        );
        match interpretation.to_interpretation(value.get()) {
            Some(interpreted) => self.map(state, interpreted.as_ref()),
            None => state.fail("ObjectToTreeMapper::map", mismatch(ty)),
        }
    }

    fn map_string(_: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        if value.is_null() {
            return state.tree.set_null();
        }
        match value.downcast_ref::<Arc<str>>() {
            Some(text) => state.tree.set_string(text.clone()),
            None => {
                const ORIGIN: &str = "ObjectToTreeMapper::map_string";
                state.fail(ORIGIN, mismatch(value.type_info()));
            }
        }
    }

    fn map_any(mapper: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        if value.is_null() {
            return state.tree.set_null();
        }
        match value.downcast_ref::<AnyValue>() {
            Some(any) => mapper.map(state, any.as_value_ref()),
            None => {
                const ORIGIN: &str = "ObjectToTreeMapper::map_any";
                state.fail(ORIGIN, mismatch(value.type_info()));
            }
        }
    }

    fn map_primitive<T: TreeScalar>(_: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        if value.is_null() {
            return state.tree.set_null();
        }
        match value.downcast_ref::<T>() {
            Some(v) => state.tree.set_value(*v),
            None => {
                const ORIGIN: &str = "ObjectToTreeMapper::map_primitive";
                state.fail(ORIGIN, mismatch(value.type_info()));
            }
        }
    }

    fn map_enum(mapper: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        const ORIGIN: &str = "ObjectToTreeMapper::map_enum";

        let ty = value.type_info();
        let Dispatcher::Enum(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, mismatch(ty));
        };

        // The interpreter sees absent values too, it owns the NotNull check.
        match dispatcher.to_interpretation(value.get()) {
            Ok(repr) => mapper.map(state, repr.as_ref()),
            Err(EnumInterpreterError::ConstraintNotNull) => state.fail(
                ORIGIN,
                MappingError::EnumConstraintViolation {
                    type_name: ty.name(),
                    constraint: "NotNull",
                },
            ),
            Err(reason) => state.fail(
                ORIGIN,
                MappingError::EnumInterpretationFailure {
                    type_name: ty.name(),
                    reason,
                },
            ),
        }
    }

    fn map_collection(mapper: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        const ORIGIN: &str = "ObjectToTreeMapper::map_collection";

        let Some(collection) = value.get() else {
            return state.tree.set_null();
        };
        let ty = value.type_info();
        let Dispatcher::Collection(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, mismatch(ty));
        };
        let Some(items) = dispatcher.iter(collection) else {
            return state.fail(ORIGIN, mismatch(ty));
        };

        let item_type = dispatcher.item_type();
        let config = state.config;
        let mut vector = Vec::new();
        let mut failure = None;

        for (index, item) in items.enumerate() {
            if item.is_none() && !config.includes_null_items() {
                continue;
            }
            let slot = vector.len();
            vector.push(Tree::Null);

            let mut nested = State::new(&mut vector[slot], config);
            mapper.map(&mut nested, ValueRef::new(item_type, item));
            if !nested.errors.is_empty() {
                failure = Some((nested.errors, Locator::Index(index)));
                break;
            }
        }

        state.tree.set_vector(vector);
        if let Some((errors, locator)) = failure {
            state.errors.append(errors);
            state.errors.push_context(ORIGIN, locator);
        }
    }

    fn map_map(mapper: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        const ORIGIN: &str = "ObjectToTreeMapper::map_map";

        let Some(map) = value.get() else {
            return state.tree.set_null();
        };
        let ty = value.type_info();
        let Dispatcher::Map(dispatcher) = ty.dispatcher() else {
            return state.fail(ORIGIN, mismatch(ty));
        };

        let key_type = dispatcher.key_type();
        if key_type.class_id() != ClassId::STRING {
            return state.fail(
                ORIGIN,
                MappingError::InvalidMapKeyType {
                    key_type: key_type.name(),
                },
            );
        }
        let Some(entries) = dispatcher.iter(map) else {
            return state.fail(ORIGIN, mismatch(ty));
        };

        let value_type = dispatcher.value_type();
        let config = state.config;
        let mut destination = if dispatcher.unique_keys() {
            Tree::Map(TreeMap::new())
        } else {
            Tree::Pairs(Vec::new())
        };
        let mut failure = None;

        for (key, item) in entries {
            if item.is_none() && !config.includes_null_items() {
                continue;
            }
            let Some(key) = key.downcast_ref::<Arc<str>>() else {
                failure = Some((ErrorStack::from_error(ORIGIN, mismatch(key_type)), None));
                break;
            };

            let slot = match &mut destination {
                Tree::Pairs(pairs) => {
                    pairs.push((key.clone(), Tree::Null));
                    pairs.last_mut().map(|(_, slot)| slot)
                }
                other => other.get_or_insert(key.clone()),
            };
            let Some(slot) = slot else {
                failure = Some((ErrorStack::from_error(ORIGIN, mismatch(ty)), None));
                break;
            };

            let mut nested = State::new(slot, config);
            mapper.map(&mut nested, ValueRef::new(value_type, item));
            if !nested.errors.is_empty() {
                failure = Some((nested.errors, Some(Locator::Key(key.clone()))));
                break;
            }
        }

        *state.tree = destination;
        if let Some((errors, locator)) = failure {
            state.errors.append(errors);
            if let Some(locator) = locator {
                state.errors.push_context(ORIGIN, locator);
            }
        }
    }

    fn map_object(mapper: &Self, state: &mut State<'_>, value: ValueRef<'_>) {
        const ORIGIN: &str = "ObjectToTreeMapper::map_object";

        let Some(object) = value.get() else {
            return state.tree.set_null();
        };
        let ty = value.type_info();
        let Some(info) = ty.as_object().filter(|info| info.is_instance(object)) else {
            return state.fail(ORIGIN, mismatch(ty));
        };

        let config = state.config;
        let mut tree_map = TreeMap::new();
        let mut failure = None;

        for field in info.fields() {
            let field_value = match field_value(field, object) {
                Ok(field_value) => field_value,
                Err(error) => {
                    failure = Some((ErrorStack::from_error(ORIGIN, error), Some(field.name())));
                    break;
                }
            };

            if field_value.is_null() {
                if field.is_required() {
                    let error = MappingError::MissingRequiredField {
                        type_name: ty.name(),
                        field: field.name(),
                    };
                    failure = Some((ErrorStack::from_error(ORIGIN, error), None));
                    break;
                }
                if !config.include_null_fields
                    && !(field.is_required() && config.always_include_required)
                {
                    continue;
                }
            }

            let mut nested = State::new(tree_map.get_or_insert_null(field.name()), config);
            mapper.map(&mut nested, field_value);
            if !nested.errors.is_empty() {
                failure = Some((nested.errors, Some(field.name())));
                break;
            }
        }

        state.tree.set_map(tree_map);
        if let Some((errors, field)) = failure {
            state.errors.append(errors);
            if let Some(field) = field {
                state.errors.push_context(ORIGIN, Locator::Field(field));
            }
        }
    }
}

/// Reads a field, resolving a selected `AnyValue` field to its concrete type.
fn field_value<'a>(field: &FieldInfo, object: &'a dyn Any) -> Result<ValueRef<'a>, MappingError> {
    let field_type = field.field_type();
    let raw = field.get(object);

    let Some(selector) = field.type_selector() else {
        return Ok(ValueRef::new(field_type, raw));
    };
    if field_type.class_id() != ClassId::ANY {
        return Ok(ValueRef::new(field_type, raw));
    }

    let selected = selector
        .select_type(object)
        .ok_or_else(|| mismatch(field_type))?;
    let Some(raw) = raw else {
        return Ok(ValueRef::null(selected));
    };
    let any = raw
        .downcast_ref::<AnyValue>()
        .ok_or_else(|| mismatch(field_type))?;
    any.retrieve(selected)
        .ok_or_else(|| MappingError::TypeMismatch {
            expected: selected.name(),
            found: any.type_info().name(),
        })
}

#[inline]
fn mismatch(expected: &'static Type) -> MappingError {
    MappingError::TypeMismatch {
        expected: expected.name(),
        found: "a value of another type",
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::sync::Arc;

    use arbor_tree::{Tree, TreeType};
    use arbor_utils::hash::{HashMap, HashSet};

    use super::ObjectToTreeMapper;
    use crate::fixtures::{
        Article, Color, Level, Message, POINT_AS_STRING, Palette, Point, Reference, Route,
        TestDto,
    };
    use crate::types::{FieldInfo, Fields, Typed};
    use crate::{AnyValue, ClassId, Locator, MappingError, ObjectToTreeConfig, ValueRef};

    fn map<T: Typed>(value: &T, config: &ObjectToTreeConfig) -> Result<Tree, crate::ErrorStack> {
        ObjectToTreeMapper::new().map_to_tree(value, config)
    }

    #[test]
    fn scalars_and_strings() {
        let config = ObjectToTreeConfig::default();
        assert_eq!(map(&-8_i8, &config).unwrap(), Tree::I8(-8));
        assert_eq!(map(&u64::MAX, &config).unwrap(), Tree::U64(u64::MAX));
        assert_eq!(map(&true, &config).unwrap(), Tree::Bool(true));

        let text: Arc<str> = Arc::from("shared");
        let tree = map(&text, &config).unwrap();
        assert!(Arc::ptr_eq(tree.get_string().unwrap(), &text));
    }

    #[test]
    fn record_fields_in_declaration_order() {
        let tree = map(&TestDto::sample(), &ObjectToTreeConfig::default()).unwrap();
        let keys: Vec<&str> = tree.as_map().unwrap().keys().map(|k| &**k).collect();
        let names: Vec<&str> = TestDto::type_info()
            .as_object()
            .unwrap()
            .fields()
            .iter()
            .map(FieldInfo::name)
            .collect();
        assert_eq!(keys, names);
        assert_eq!(keys.first(), Some(&"str"));
        assert_eq!(keys.last(), Some(&"pairs"));

        assert_eq!(tree["ui16"], Tree::U16(16));
        assert_eq!(tree["vector"][2]["str"].as_str(), Some("nested_3"));
        assert_eq!(tree["map"]["key2"]["str"].as_str(), Some("nested_2"));
        // Absent fields of the nested records are skipped.
        assert_eq!(tree["vector"][0].as_map().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_keys_are_preserved() {
        let tree = map(&TestDto::sample(), &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree["pairs"].tree_type(), TreeType::Pairs);
        assert_eq!(tree["map"].tree_type(), TreeType::Map);

        let entries: Vec<(&str, &str)> = tree["pairs"]
            .entries()
            .unwrap()
            .map(|(k, v)| (&**k, v.as_str().unwrap()))
            .collect();
        assert_eq!(
            entries,
            [
                ("same-key", "value1"),
                ("same-key", "value2"),
                ("same-key", "value3"),
            ]
        );
    }

    #[test]
    fn collection_emission_count() {
        let items = vec![Some(1_i32), None, Some(3), None];

        let skipped = map(&items, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(skipped.as_vector().unwrap(), [Tree::I32(1), Tree::I32(3)]);

        let config = ObjectToTreeConfig::default().with_include_null_fields(true);
        assert_eq!(map(&items, &config).unwrap().as_vector().unwrap().len(), 4);

        let config =
            ObjectToTreeConfig::default().with_always_include_null_collection_elements(true);
        let full = map(&items, &config).unwrap();
        assert_eq!(full.as_vector().unwrap().len(), 4);
        assert!(full[1].is_null());
    }

    #[test]
    fn lists_and_sets_become_vectors() {
        let list: VecDeque<Option<i32>> = VecDeque::from([Some(1), None, Some(3)]);

        let tree = map(&list, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree.as_vector().unwrap(), [Tree::I32(1), Tree::I32(3)]);

        let config = ObjectToTreeConfig::default().with_include_null_fields(true);
        let tree = map(&list, &config).unwrap();
        assert_eq!(tree.as_vector().unwrap().len(), 3);
        assert!(tree[1].is_null());

        let set: HashSet<i32> = HashSet::from_iter([4, 5]);
        let tree = map(&set, &ObjectToTreeConfig::default()).unwrap();
        let mut items: Vec<i32> = tree
            .as_vector()
            .unwrap()
            .iter()
            .map(|item| item.get_value::<i32>().unwrap())
            .collect();
        items.sort_unstable();
        assert_eq!(items, [4, 5]);
    }

    #[test]
    fn null_fields_follow_config() {
        let article = Article {
            name: Some("title".into()),
            ..Article::default()
        };

        let tree = map(&article, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree.as_map().unwrap().len(), 1);

        let config = ObjectToTreeConfig::default().with_include_null_fields(true);
        let tree = map(&article, &config).unwrap();
        assert_eq!(tree.as_map().unwrap().len(), 4);
        assert!(tree["pages"].is_null());
    }

    #[test]
    fn always_include_required_does_not_excuse_absence() {
        let article = Article {
            id: Some(1),
            ..Article::default()
        };
        let config = ObjectToTreeConfig::default().with_always_include_required(true);

        let errors = map(&article, &config).unwrap_err();
        assert_eq!(
            errors.root_cause(),
            Some(&MappingError::MissingRequiredField {
                type_name: "Article",
                field: "name",
            })
        );
    }

    #[test]
    fn required_field_abort_keeps_placed_fields() {
        let article = Article {
            id: Some(7),
            name: None,
            pages: Some(96),
            references: None,
        };

        let mapper = ObjectToTreeMapper::new();
        let config = ObjectToTreeConfig::default();
        let mut tree = Tree::Null;
        let mut state = super::State::new(&mut tree, &config);
        mapper.map(&mut state, ValueRef::of(&article));

        let errors = state.errors;
        assert_eq!(
            errors.root_cause(),
            Some(&MappingError::MissingRequiredField {
                type_name: "Article",
                field: "name",
            })
        );
        // `id` was placed before the failure, `pages` never visited.
        let map = tree.as_map().unwrap();
        assert_eq!(map["id"], Tree::U32(7));
        assert!(!map.contains_key("pages"));
    }

    #[test]
    fn required_failure_is_framed_by_parents() {
        let articles = vec![
            Some(Article {
                name: Some("first".into()),
                ..Article::default()
            }),
            Some(Article::default()),
        ];

        let errors = map(&articles, &ObjectToTreeConfig::default()).unwrap_err();
        assert!(matches!(
            errors.root_cause(),
            Some(MappingError::MissingRequiredField { field: "name", .. })
        ));
        let locators: Vec<&Locator> = errors.locators().collect();
        assert_eq!(locators, [&Locator::Index(1)]);
    }

    #[test]
    fn nested_errors_record_the_path() {
        let article = Article {
            name: Some("a".into()),
            references: Some(vec![
                Some(Reference::default()),
                Some(Reference {
                    author: Some("x".into()),
                }),
            ]),
            ..Article::default()
        };
        assert!(map(&article, &ObjectToTreeConfig::default()).is_ok());

        let mut by_key: HashMap<Arc<str>, Option<Article>> = HashMap::default();
        by_key.insert(Arc::from("broken"), Some(Article::default()));

        let errors = map(&by_key, &ObjectToTreeConfig::default()).unwrap_err();
        let locators: Vec<String> = errors.locators().map(ToString::to_string).collect();
        assert_eq!(locators, ["key='broken'"]);
        assert!(errors.stacktrace().contains("Article::name is required"));
    }

    #[test]
    fn key_type_guard() {
        let mut by_number: HashMap<i32, Option<Arc<str>>> = HashMap::default();
        by_number.insert(1, Some(Arc::from("one")));

        let mapper = ObjectToTreeMapper::new();
        let config = ObjectToTreeConfig::default();
        let mut tree = Tree::Null;
        let mut state = super::State::new(&mut tree, &config);
        mapper.map(&mut state, ValueRef::of(&by_number));

        assert_eq!(
            state.errors.root_cause(),
            Some(&MappingError::InvalidMapKeyType { key_type: "Int32" })
        );
        assert_eq!(state.errors.len(), 1);
        assert!(tree.is_null());
    }

    #[test]
    fn ordered_fields_keep_duplicates() {
        let fields: Fields<i32> = vec![
            (Arc::from("k"), Some(1)),
            (Arc::from("k"), Some(2)),
            (Arc::from("other"), None),
        ];

        let tree = map(&fields, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(
            tree.as_pairs().unwrap(),
            [
                (Arc::<str>::from("k"), Tree::I32(1)),
                (Arc::from("k"), Tree::I32(2)),
            ]
        );

        let config = ObjectToTreeConfig::default().with_include_null_fields(true);
        let tree = map(&fields, &config).unwrap();
        assert_eq!(tree.as_pairs().unwrap().len(), 3);
        assert!(tree["other"].is_null());
    }

    #[test]
    fn any_values_unwrap() {
        let values = vec![
            Some(AnyValue::new(5_u8)),
            Some(AnyValue::new(Arc::<str>::from("x"))),
            None,
        ];
        let tree = map(&values, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree.as_vector().unwrap(), [Tree::U8(5), Tree::from("x")]);
    }

    #[test]
    fn type_selector_resolves_any_field() {
        let message = Message {
            kind: Some("number".into()),
            payload: Some(AnyValue::new(42_i64)),
        };
        let tree = map(&message, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree["payload"], Tree::I64(42));

        let wrong = Message {
            kind: Some("number".into()),
            payload: Some(AnyValue::new(Arc::<str>::from("42"))),
        };
        let errors = map(&wrong, &ObjectToTreeConfig::default()).unwrap_err();
        assert_eq!(
            errors.root_cause(),
            Some(&MappingError::TypeMismatch {
                expected: "Int64",
                found: "String",
            })
        );
        assert_eq!(errors.locators().next(), Some(&Locator::Field("payload")));
    }

    #[test]
    fn enums_by_name_and_number() {
        let palette = Palette {
            primary: Some(Color::Green),
            level: Some(Level::High),
        };
        let tree = map(&palette, &ObjectToTreeConfig::default()).unwrap();
        assert_eq!(tree["primary"].as_str(), Some("green"));
        assert_eq!(tree["level"], Tree::I32(9));
    }

    #[test]
    fn enum_not_null_constraint() {
        // Absent enum fields are still handed to the interpreter once nulls
        // are emitted.
        let palette = Palette::default();
        let config = ObjectToTreeConfig::default().with_include_null_fields(true);

        let errors = map(&palette, &config).unwrap_err();
        assert_eq!(
            errors.root_cause(),
            Some(&MappingError::EnumConstraintViolation {
                type_name: "Color",
                constraint: "NotNull",
            })
        );
        assert_eq!(errors.locators().next(), Some(&Locator::Field("primary")));

        // The numeric enum accepts absent values.
        let palette = Palette {
            primary: Some(Color::Red),
            level: None,
        };
        let tree = map(&palette, &config).unwrap();
        assert!(tree["level"].is_null());
        assert_eq!(tree["level"].tree_type(), TreeType::Null);
    }

    #[test]
    fn interpretation_fallback() {
        let route = Route {
            start: Some(Point { x: 1, y: 2 }),
            stops: Some(vec![Some(Point { x: 3, y: 4 })]),
        };

        let errors = map(&route, &ObjectToTreeConfig::default()).unwrap_err();
        assert_eq!(
            errors.root_cause(),
            Some(&MappingError::UnsupportedType { type_name: "Point" })
        );

        let config = ObjectToTreeConfig::default().with_interpretation(POINT_AS_STRING);
        let tree = map(&route, &config).unwrap();
        assert_eq!(tree["start"].as_str(), Some("1,2"));
        assert_eq!(tree["stops"][0].as_str(), Some("3,4"));
    }

    #[test]
    fn custom_mapper_method() {
        fn map_point_as_pair(
            _: &ObjectToTreeMapper,
            state: &mut super::State<'_>,
            value: ValueRef<'_>,
        ) {
            match value.downcast_ref::<Point>() {
                Some(point) => state.tree.set_vector(vec![Tree::I32(point.x), Tree::I32(point.y)]),
                None => state.tree.set_null(),
            }
        }

        let mut mapper = ObjectToTreeMapper::new();
        mapper.set_mapper_method(Point::type_info().class_id(), map_point_as_pair);

        let tree = mapper
            .map_to_tree(&Point { x: 5, y: 6 }, &ObjectToTreeConfig::default())
            .unwrap();
        assert_eq!(tree[1], Tree::I32(6));
        assert_ne!(Point::type_info().class_id(), ClassId::OBJECT);
    }
}
