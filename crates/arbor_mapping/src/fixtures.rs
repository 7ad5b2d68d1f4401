//! Record, enum and custom types shared by the mapper tests.

use alloc::sync::Arc;

use arbor_utils::hash::HashMap;

use crate::AnyValue;
use crate::types::{
    EnumEntries, EnumEntry, EnumInterpreter, FieldInfo, Fields, FnInterpretation,
    NonGenericTypeCell, Type, Typed,
};

// -----------------------------------------------------------------------------
// TestDto

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TestDto {
    pub text: Option<Arc<str>>,
    pub i8: Option<i8>,
    pub ui8: Option<u8>,
    pub i16: Option<i16>,
    pub ui16: Option<u16>,
    pub i32: Option<i32>,
    pub ui32: Option<u32>,
    pub i64: Option<i64>,
    pub ui64: Option<u64>,
    pub vector: Option<Vec<Option<TestDto>>>,
    pub map: Option<HashMap<Arc<str>, Option<TestDto>>>,
    pub pairs: Option<Fields<Arc<str>>>,
}

impl Typed for TestDto {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let fields = [
                FieldInfo::new("str", |d: &Self| &d.text, |d| &mut d.text),
                FieldInfo::new("i8", |d: &Self| &d.i8, |d| &mut d.i8),
                FieldInfo::new("ui8", |d: &Self| &d.ui8, |d| &mut d.ui8),
                FieldInfo::new("i16", |d: &Self| &d.i16, |d| &mut d.i16),
                FieldInfo::new("ui16", |d: &Self| &d.ui16, |d| &mut d.ui16),
                FieldInfo::new("i32", |d: &Self| &d.i32, |d| &mut d.i32),
                FieldInfo::new("ui32", |d: &Self| &d.ui32, |d| &mut d.ui32),
                FieldInfo::new("i64", |d: &Self| &d.i64, |d| &mut d.i64),
                FieldInfo::new("ui64", |d: &Self| &d.ui64, |d| &mut d.ui64),
                FieldInfo::new("vector", |d: &Self| &d.vector, |d| &mut d.vector),
                FieldInfo::new("map", |d: &Self| &d.map, |d| &mut d.map),
                FieldInfo::new("pairs", |d: &Self| &d.pairs, |d| &mut d.pairs),
            ];
            Type::object::<Self>("TestDto", fields)
        })
    }
}

impl TestDto {
    pub fn named(text: &str) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// The populated record from the round trip scenario.
    pub fn sample() -> Self {
        let mut map = HashMap::default();
        map.insert(Arc::from("key1"), Some(Self::named("nested_1")));
        map.insert(Arc::from("key2"), Some(Self::named("nested_2")));
        map.insert(Arc::from("key3"), Some(Self::named("nested_3")));

        Self {
            text: Some("Hello World!".into()),
            i8: Some(-8),
            ui8: Some(8),
            i16: Some(-16),
            ui16: Some(16),
            i32: Some(-32),
            ui32: Some(32),
            i64: Some(-64),
            ui64: Some(64),
            vector: Some(vec![
                Some(Self::named("nested_1")),
                Some(Self::named("nested_2")),
                Some(Self::named("nested_3")),
            ]),
            map: Some(map),
            pairs: Some(vec![
                (Arc::from("same-key"), Some(Arc::from("value1"))),
                (Arc::from("same-key"), Some(Arc::from("value2"))),
                (Arc::from("same-key"), Some(Arc::from("value3"))),
            ]),
        }
    }
}

// -----------------------------------------------------------------------------
// Article

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reference {
    pub author: Option<Arc<str>>,
}

impl Typed for Reference {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let author = FieldInfo::new("author", |r: &Self| &r.author, |r| &mut r.author);
            Type::object::<Self>("Reference", [author])
        })
    }
}

/// `name` is required.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Article {
    pub id: Option<u32>,
    pub name: Option<Arc<str>>,
    pub pages: Option<i32>,
    pub references: Option<Vec<Option<Reference>>>,
}

impl Typed for Article {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let fields = [
                FieldInfo::new("id", |a: &Self| &a.id, |a| &mut a.id),
                FieldInfo::new("name", |a: &Self| &a.name, |a| &mut a.name)
                    .required(),
                FieldInfo::new("pages", |a: &Self| &a.pages, |a| &mut a.pages),
                FieldInfo::new("references", |a: &Self| &a.references, |a| {
                    &mut a.references
                }),
            ];
            Type::object::<Self>("Article", fields)
        })
    }
}

// -----------------------------------------------------------------------------
// Color

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Red,
    Green,
}

impl EnumEntries for Color {
    const NAME: &'static str = "Color";

    fn entries() -> &'static [EnumEntry<Self>] {
        &[
            EnumEntry {
                value: Color::Red,
                name: "red",
                number: 1,
            },
            EnumEntry {
                value: Color::Green,
                name: "green",
                number: 2,
            },
        ]
    }
}

impl Typed for Color {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let interpreter = EnumInterpreter::<Self>::as_string().not_null();
            Type::enumeration(interpreter)
        })
    }
}

/// An enum mapped by number that accepts absent values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    Low,
    High,
}

impl EnumEntries for Level {
    const NAME: &'static str = "Level";

    fn entries() -> &'static [EnumEntry<Self>] {
        &[
            EnumEntry {
                value: Level::Low,
                name: "low",
                number: 0,
            },
            EnumEntry {
                value: Level::High,
                name: "high",
                number: 9,
            },
        ]
    }
}

impl Typed for Level {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| Type::enumeration(EnumInterpreter::<Self>::as_number()))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Palette {
    pub primary: Option<Color>,
    pub level: Option<Level>,
}

impl Typed for Palette {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let fields = [
                FieldInfo::new("primary", |p: &Self| &p.primary, |p| &mut p.primary),
                FieldInfo::new("level", |p: &Self| &p.level, |p| &mut p.level),
            ];
            Type::object::<Self>("Palette", fields)
        })
    }
}

// -----------------------------------------------------------------------------
// Point

pub const POINT_AS_STRING: &str = "point-as-string";

/// A type without a mapper method, only mappable through an interpretation.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

fn point_to_string(point: &Point) -> Arc<str> {
    format!("{},{}", point.x, point.y).into()
}

fn point_from_string(text: &Arc<str>) -> Point {
    let mut parts = text
        .split(',')
        .map(|part| part.trim().parse().unwrap_or_default());
    Point {
        x: parts.next().unwrap_or_default(),
        y: parts.next().unwrap_or_default(),
    }
}

impl Typed for Point {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            Type::opaque::<Self>("Point").with_interpretation(
                POINT_AS_STRING,
                FnInterpretation::<Self, Arc<str>>::new(point_to_string, point_from_string),
            )
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Route {
    pub start: Option<Point>,
    pub stops: Option<Vec<Option<Point>>>,
}

impl Typed for Route {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let fields = [
                FieldInfo::new("start", |r: &Self| &r.start, |r| &mut r.start),
                FieldInfo::new("stops", |r: &Self| &r.stops, |r| &mut r.stops),
            ];
            Type::object::<Self>("Route", fields)
        })
    }
}

// -----------------------------------------------------------------------------
// Message

/// `payload` holds a number when `kind` is `"number"` and text otherwise.
#[derive(Debug, Default)]
pub struct Message {
    pub kind: Option<Arc<str>>,
    pub payload: Option<AnyValue>,
}

fn select_payload(message: &Message) -> &'static Type {
    match message.kind.as_deref() {
        Some("number") => i64::type_info(),
        _ => <Arc<str>>::type_info(),
    }
}

impl Typed for Message {
    fn type_info() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(|| {
            let fields = [
                FieldInfo::new("kind", |m: &Self| &m.kind, |m| &mut m.kind),
                FieldInfo::new("payload", |m: &Self| &m.payload, |m| &mut m.payload)
                    .with_type_selector(select_payload),
            ];
            Type::object::<Self>("Message", fields)
        })
    }
}
