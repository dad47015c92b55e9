//! `serde::Serialize` for the value model, so a tag tree can be rendered
//! into JSON or any other serde format. Compounds become maps, lists and the
//! array tags become sequences. This is one-directional: decoding NBT goes
//! through the accounted binary codec, not through serde.

use ::serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::{Compound, List, Value};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::ByteArray(v) => serialize_elements(serializer, v.iter()),
            Value::IntArray(v) => serialize_elements(serializer, v.iter()),
            Value::LongArray(v) => serialize_elements(serializer, v.iter()),
            Value::List(v) => v.serialize(serializer),
            Value::Compound(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_elements(serializer, self.iter())
    }
}

impl Serialize for Compound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn serialize_elements<S, I>(serializer: S, elements: I) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    I: ExactSizeIterator,
    I::Item: Serialize,
{
    let mut seq = serializer.serialize_seq(Some(elements.len()))?;
    for element in elements {
        seq.serialize_element(&element)?;
    }
    seq.end()
}
