//! Field registry
//!
//! A [`Record`] publishes its queryable fields as a static table of
//! [`Field`] entries. Each entry pairs a name with its declared type and a
//! typed read function, which is all the engine needs to resolve a field
//! name at runtime.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use dynq_core::{DynqResult, QueryError};
use uuid::Uuid;

use crate::value::{FieldType, Value};

/// Read function stored in a field entry
pub type ReadFn<T> = for<'a> fn(&'a T) -> Value<'a>;

/// A queryable field of record type `T`
pub struct Field<T> {
    name: &'static str,
    ty: FieldType,
    nullable: bool,
    read: ReadFn<T>,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, ty: FieldType, read: ReadFn<T>) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            read,
        }
    }

    #[doc(hidden)]
    pub const fn from_parts(
        name: &'static str,
        ty: FieldType,
        nullable: bool,
        read: ReadFn<T>,
    ) -> Self {
        Self {
            name,
            ty,
            nullable,
            read,
        }
    }

    /// Mark the field as accepting null
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Read this field from `record`
    pub fn read<'a>(&self, record: &'a T) -> Value<'a> {
        (self.read)(record)
    }

    /// The bare read function, for capture in predicates and sort keys
    pub fn reader(&self) -> ReadFn<T> {
        self.read
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// A record type whose fields can be addressed by name
pub trait Record: Sized + 'static {
    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;

    /// All queryable fields
    fn fields() -> &'static [Field<Self>];

    /// Look up a field by exact, case-sensitive name
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Names of all queryable fields
    fn field_names() -> Vec<&'static str> {
        Self::fields().iter().map(|f| f.name).collect()
    }
}

/// Resolve `name` against `T`'s field table
pub fn resolve<T: Record>(name: &str) -> DynqResult<&'static Field<T>> {
    if name.trim().is_empty() {
        tracing::warn!(record = T::TYPE_NAME, "empty field name");
        return Err(QueryError::unknown_field(T::TYPE_NAME, name));
    }

    match T::field(name) {
        Some(field) => {
            tracing::debug!(record = T::TYPE_NAME, field = name, ty = %field.ty, "resolved field");
            Ok(field)
        }
        None => {
            tracing::warn!(record = T::TYPE_NAME, field = name, "unknown field");
            Err(QueryError::unknown_field(T::TYPE_NAME, name))
        }
    }
}

/// Rust types that can back a queryable field
pub trait FieldValue {
    const TYPE: FieldType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value<'_>;
}

impl FieldValue for bool {
    const TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! int_field_value {
    ($variant:ident, $as:ty, $type:expr; $($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const TYPE: FieldType = $type;

                fn to_value(&self) -> Value<'_> {
                    Value::$variant(*self as $as)
                }
            }
        )*
    };
}

int_field_value!(Int, i64, FieldType::Int; i8, i16, i32, i64, isize);
int_field_value!(UInt, u64, FieldType::UInt; u8, u16, u32, u64, usize);
int_field_value!(Float, f64, FieldType::Float; f32, f64);

impl FieldValue for String {
    const TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl FieldValue for Uuid {
    const TYPE: FieldType = FieldType::Uuid;

    fn to_value(&self) -> Value<'_> {
        Value::Uuid(*self)
    }
}

impl FieldValue for DateTime<Utc> {
    const TYPE: FieldType = FieldType::DateTime;

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl FieldValue for NaiveDate {
    const TYPE: FieldType = FieldType::Date;

    fn to_value(&self) -> Value<'_> {
        Value::Date(*self)
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const TYPE: FieldType = V::TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }
}

/// Implement [`Record`] from a list of `"Name" => field: Type` entries.
///
/// ```
/// use dynq_queries::{record, Record};
///
/// struct Person {
///     name: String,
///     age: i32,
///     nickname: Option<String>,
/// }
///
/// record!(Person {
///     "Name" => name: String,
///     "Age" => age: i32,
///     "Nickname" => nickname: Option<String>,
/// });
///
/// assert_eq!(Person::field_names(), vec!["Name", "Age", "Nickname"]);
/// assert!(Person::field("Nickname").unwrap().is_nullable());
/// ```
#[macro_export]
macro_rules! record {
    ($record:ident { $($name:literal => $field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::Record for $record {
            const TYPE_NAME: &'static str = stringify!($record);

            fn fields() -> &'static [$crate::Field<Self>] {
                const FIELDS: &[$crate::Field<$record>] = &[$(
                    $crate::Field::from_parts(
                        $name,
                        <$ty as $crate::FieldValue>::TYPE,
                        <$ty as $crate::FieldValue>::NULLABLE,
                        {
                            fn read(record: &$record) -> $crate::Value<'_> {
                                $crate::FieldValue::to_value(&record.$field)
                            }
                            read
                        },
                    ),
                )*];
                FIELDS
            }
        }
    };
}
