use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::Tag;

/// The map type backing [`Compound`]. Defaults to `HashMap`; the
/// `preserve-order` feature swaps in `IndexMap` so iteration follows
/// insertion order.
#[cfg(not(feature = "preserve-order"))]
pub type CompoundMap = std::collections::HashMap<String, Value>;

#[cfg(feature = "preserve-order")]
pub type CompoundMap = indexmap::IndexMap<String, Value>;

/// A complete NBT value. It owns its data: cloning a value deep-copies any
/// backing buffers, and no two values ever alias the same buffer.
///
/// There is no `End` variant. [`Tag::End`] exists only on the wire, as the
/// compound terminator and as the element tag of an empty [`List`]; "no
/// value" in an API is `Option<Value>`.
///
/// ```
/// use strictnbt::{Compound, Value};
///
/// let mut compound = Compound::new();
/// compound.insert("DataVersion", 2230);
/// match compound.get("DataVersion") {
///     Some(Value::Int(ver)) => println!("version: {ver}"),
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// The wire discriminant of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Value::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Value::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The ByteBool convention: a byte read as a boolean, any nonzero byte
    /// being true.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_byte().map(|b| b != 0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Byte(v as i8)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<i8>> for Value {
    fn from(v: Vec<i8>) -> Self {
        Value::ByteArray(v)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::IntArray(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::LongArray(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl From<Compound> for Value {
    fn from(v: Compound) -> Self {
        Value::Compound(v)
    }
}

// Hashing is structural, matching PartialEq: floats hash their bit pattern,
// compounds hash order-independently. NaN values compare unequal to
// themselves but still hash consistently.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        u8::from(self.tag()).hash(state);
        match self {
            Value::Byte(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::ByteArray(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::List(v) => v.hash(state),
            Value::Compound(v) => v.hash(state),
            Value::IntArray(v) => v.hash(state),
            Value::LongArray(v) => v.hash(state),
        }
    }
}

/// An ordered, homogeneously typed sequence of values.
///
/// The element tag is locked by the first inserted value and reset to unset
/// (`Tag::End`) when the list becomes empty again. The strict mutators
/// ([`push`][`List::push`], [`insert`][`List::insert`], [`set`][`List::set`])
/// fail with a `TypeMismatch` error when given a value of another tag;
/// [`push_any`][`List::push_any`] is the coercing alternative that never
/// loses data.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: Tag,
    values: Vec<Value>,
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl List {
    pub fn new() -> Self {
        Self {
            element: Tag::End,
            values: Vec::new(),
        }
    }

    /// Invariant: every value in `values` has tag `element`. Used by the
    /// decoder, which reads elements of a single tag by construction. An
    /// empty list is normalised back to an unset element tag so that empty
    /// lists compare equal no matter what element tag they were encoded with.
    pub(crate) fn from_parts(element: Tag, values: Vec<Value>) -> Self {
        if values.is_empty() {
            Self::new()
        } else {
            Self { element, values }
        }
    }

    /// The locked element tag, `Tag::End` while the list is empty.
    pub fn element_tag(&self) -> Tag {
        self.element
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Append a value, locking the element tag if the list was empty.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        self.values.push(value);
        Ok(())
    }

    /// Insert a value at `index`, shifting later elements.
    ///
    /// # Panics
    /// Panics if `index > len`, like `Vec::insert`.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        self.values.insert(index, value);
        Ok(())
    }

    /// Replace the value at `index`, returning the old value.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        self.check(&value)?;
        Ok(std::mem::replace(&mut self.values[index], value))
    }

    /// Remove and return the value at `index`. Emptying the list resets the
    /// element tag to unset.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Value {
        let value = self.values.remove(index);
        if self.values.is_empty() {
            self.element = Tag::End;
        }
        value
    }

    pub fn pop(&mut self) -> Option<Value> {
        let value = self.values.pop();
        if self.values.is_empty() {
            self.element = Tag::End;
        }
        value
    }

    /// Append a value of any tag without ever failing.
    ///
    /// If the value matches the locked element tag this is a plain push. On a
    /// mismatch the list is rebuilt as a list of single-entry compounds, each
    /// existing element wrapped under the empty key, and the new value (and
    /// any later mismatched values) wrapped the same way. Membership is
    /// preserved; the wrapping is this crate's convention, not a wire format.
    pub fn push_any(&mut self, value: impl Into<Value>) {
        let value = value.into();
        if self.element == Tag::End || self.element == value.tag() {
            self.element = value.tag();
            self.values.push(value);
            return;
        }

        if self.element != Tag::Compound {
            let wrapped = std::mem::take(&mut self.values)
                .into_iter()
                .map(Self::wrap)
                .collect();
            self.values = wrapped;
            self.element = Tag::Compound;
        }

        if value.tag() == Tag::Compound {
            self.values.push(value);
        } else {
            self.values.push(Self::wrap(value));
        }
    }

    fn wrap(value: Value) -> Value {
        let mut compound = Compound::new();
        compound.insert("", value);
        Value::Compound(compound)
    }

    fn check(&mut self, value: &Value) -> Result<()> {
        if self.element == Tag::End {
            self.element = value.tag();
            Ok(())
        } else if self.element == value.tag() {
            Ok(())
        } else {
            Err(Error::list_type_mismatch(self.element, value.tag()))
        }
    }
}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        u8::from(self.element).hash(state);
        self.values.hash(state);
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// A string-keyed mapping of values with unique keys.
///
/// The typed `get_*` accessors are deliberately forgiving: reading persisted
/// data that may predate the current schema should not blow up, so an absent
/// key or a value of another tag yields a documented default instead of an
/// error. The [`compound`][`Compound::compound`] and [`list`][`Compound::list`]
/// accessors are the strict complement for structurally required children,
/// failing with a `TypeMismatch` that names the key and both types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    entries: CompoundMap,
}

impl Compound {
    pub fn new() -> Self {
        Self {
            entries: CompoundMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert a value under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn get_byte(&self, key: &str) -> i8 {
        self.get(key).and_then(Value::as_byte).unwrap_or(0)
    }

    pub fn get_short(&self, key: &str) -> i16 {
        self.get(key).and_then(Value::as_short).unwrap_or(0)
    }

    pub fn get_int(&self, key: &str) -> i32 {
        self.get(key).and_then(Value::as_int).unwrap_or(0)
    }

    pub fn get_long(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_long).unwrap_or(0)
    }

    pub fn get_float(&self, key: &str) -> f32 {
        self.get(key).and_then(Value::as_float).unwrap_or(0.0)
    }

    pub fn get_double(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_double).unwrap_or(0.0)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn get_byte_array(&self, key: &str) -> &[i8] {
        match self.get(key) {
            Some(Value::ByteArray(v)) => v,
            _ => &[],
        }
    }

    pub fn get_int_array(&self, key: &str) -> &[i32] {
        match self.get(key) {
            Some(Value::IntArray(v)) => v,
            _ => &[],
        }
    }

    pub fn get_long_array(&self, key: &str) -> &[i64] {
        match self.get(key) {
            Some(Value::LongArray(v)) => v,
            _ => &[],
        }
    }

    /// Fetch a child compound that is structurally required.
    pub fn compound(&self, key: &str) -> Result<&Compound> {
        match self.get(key) {
            Some(Value::Compound(c)) => Ok(c),
            found => Err(Error::key_type_mismatch(
                key,
                Tag::Compound,
                found.map(Value::tag),
            )),
        }
    }

    /// Fetch a child list that is structurally required.
    pub fn list(&self, key: &str) -> Result<&List> {
        match self.get(key) {
            Some(Value::List(l)) => Ok(l),
            found => Err(Error::key_type_mismatch(
                key,
                Tag::List,
                found.map(Value::tag),
            )),
        }
    }
}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entry order must not affect the hash, so each entry is hashed on
        // its own and the results combined with a commutative sum.
        let mut combined: u64 = 0;
        for (key, value) in self.entries.iter() {
            let mut entry_hasher = DefaultHasher::new();
            key.hash(&mut entry_hasher);
            value.hash(&mut entry_hasher);
            combined = combined.wrapping_add(entry_hasher.finish());
        }
        self.entries.len().hash(state);
        combined.hash(state);
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = <&'a CompoundMap as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = <CompoundMap as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
