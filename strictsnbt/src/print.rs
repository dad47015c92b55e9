//! Rendering of a value tree as SNBT text.
//!
//! Two renderings exist: a compact single-line form with no whitespace, and
//! an indented multi-line form for human inspection. Both parse back to the
//! tree they were printed from. String values are always quoted, because a
//! bare `1b` or `true` would come back as a number; keys stay bare when they
//! fit the unquoted charset.

use strictnbt::{Compound, List, Value};

/// Render a value in the compact canonical form, e.g.
/// `{pos:[1.5d,2.5d],name:"boat"}`.
pub fn to_string(value: &Value) -> String {
    let mut printer = Printer::compact();
    printer.value(value);
    printer.out
}

/// Render a value over multiple indented lines.
pub fn to_string_pretty(value: &Value) -> String {
    let mut printer = Printer::pretty();
    printer.value(value);
    printer.out
}

struct Printer {
    out: String,
    pretty: bool,
    indent: usize,
}

impl Printer {
    fn compact() -> Self {
        Printer {
            out: String::new(),
            pretty: false,
            indent: 0,
        }
    }

    fn pretty() -> Self {
        Printer {
            out: String::new(),
            pretty: true,
            indent: 0,
        }
    }

    fn value(&mut self, value: &Value) {
        let mut ints = itoa::Buffer::new();
        let mut floats = ryu::Buffer::new();
        match value {
            Value::Byte(v) => {
                self.out.push_str(ints.format(*v));
                self.out.push('b');
            }
            Value::Short(v) => {
                self.out.push_str(ints.format(*v));
                self.out.push('s');
            }
            Value::Int(v) => self.out.push_str(ints.format(*v)),
            Value::Long(v) => {
                self.out.push_str(ints.format(*v));
                self.out.push('L');
            }
            Value::Float(v) => {
                self.out.push_str(floats.format(*v));
                self.out.push('f');
            }
            // Doubles always carry their suffix: ryu prints 1e30 without a
            // decimal point, and only the suffixed form parses back.
            Value::Double(v) => {
                self.out.push_str(floats.format(*v));
                self.out.push('d');
            }
            Value::String(v) => self.quoted(v),
            Value::ByteArray(v) => self.array('B', v.iter().map(|b| format_int(*b, "b"))),
            Value::IntArray(v) => self.array('I', v.iter().map(|i| format_int(*i, ""))),
            Value::LongArray(v) => self.array('L', v.iter().map(|l| format_int(*l, "L"))),
            Value::List(v) => self.list(v),
            Value::Compound(v) => self.compound(v),
        }
    }

    fn quoted(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            if c == '"' || c == '\\' {
                self.out.push('\\');
            }
            self.out.push(c);
        }
        self.out.push('"');
    }

    fn key(&mut self, key: &str) {
        let bare = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
        if bare {
            self.out.push_str(key);
        } else {
            self.quoted(key);
        }
        self.out.push(':');
        if self.pretty {
            self.out.push(' ');
        }
    }

    /// Arrays stay on one line in both forms; the pretty form just spaces
    /// out the separators: `[B; 1b, 2b]`.
    fn array(&mut self, prefix: char, elements: impl Iterator<Item = String>) {
        self.out.push('[');
        self.out.push(prefix);
        self.out.push(';');
        let mut first = true;
        for element in elements {
            if !first {
                self.out.push(',');
            }
            if self.pretty {
                self.out.push(' ');
            }
            first = false;
            self.out.push_str(&element);
        }
        self.out.push(']');
    }

    fn list(&mut self, list: &List) {
        if list.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        self.open();
        let mut first = true;
        for element in list {
            if !first {
                self.separate();
            }
            first = false;
            self.value(element);
        }
        self.close();
        self.out.push(']');
    }

    fn compound(&mut self, compound: &Compound) {
        if compound.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.open();
        let mut first = true;
        for (key, value) in compound {
            if !first {
                self.separate();
            }
            first = false;
            self.key(key);
            self.value(value);
        }
        self.close();
        self.out.push('}');
    }

    fn open(&mut self) {
        if self.pretty {
            self.indent += 1;
            self.newline();
        }
    }

    fn separate(&mut self) {
        self.out.push(',');
        if self.pretty {
            self.newline();
        }
    }

    fn close(&mut self) {
        if self.pretty {
            self.indent -= 1;
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }
}

fn format_int<T: itoa::Integer>(value: T, suffix: &str) -> String {
    let mut buffer = itoa::Buffer::new();
    let mut out = buffer.format(value).to_owned();
    out.push_str(suffix);
    out
}
