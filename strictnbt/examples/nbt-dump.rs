//! Dump the structure of a gzip compressed NBT file using the streaming
//! visitor, without ever building a tree.
//!
//! Usage: nbt-dump <file>

use std::fs::File;

use strictnbt::stream::{visit_from_gzip_reader, EntryFlow, ValueFlow, Visitor};
use strictnbt::{Accounter, Tag};

struct Dumper {
    indent: usize,
}

impl Dumper {
    fn line(&self, text: impl AsRef<str>) {
        println!("{:indent$}{}", "", text.as_ref(), indent = self.indent * 2);
    }
}

impl Visitor for Dumper {
    fn visit_entry_named(&mut self, tag: Tag, name: &str) -> EntryFlow {
        self.line(format!("{name}: {tag}"));
        if tag.is_container() {
            self.indent += 1;
        }
        EntryFlow::Enter
    }

    fn visit_element(&mut self, tag: Tag, index: usize) -> EntryFlow {
        if tag.is_container() {
            self.line(format!("[{index}]: {tag}"));
            self.indent += 1;
            EntryFlow::Enter
        } else {
            // Scalar list elements are rarely interesting one by one.
            EntryFlow::Skip
        }
    }

    fn visit_container_end(&mut self) -> ValueFlow {
        self.indent = self.indent.saturating_sub(1);
        ValueFlow::Continue
    }

    fn visit_byte_array(&mut self, value: Vec<i8>) -> ValueFlow {
        self.indent = self.indent.saturating_sub(1);
        self.line(format!("({} bytes)", value.len()));
        ValueFlow::Continue
    }

    fn visit_int_array(&mut self, value: Vec<i32>) -> ValueFlow {
        self.indent = self.indent.saturating_sub(1);
        self.line(format!("({} ints)", value.len()));
        ValueFlow::Continue
    }

    fn visit_long_array(&mut self, value: Vec<i64>) -> ValueFlow {
        self.indent = self.indent.saturating_sub(1);
        self.line(format!("({} longs)", value.len()));
        ValueFlow::Continue
    }
}

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let file = File::open(args[0].clone()).expect("file does not exist");

    // 64 MiB is generous for any legitimate save file.
    let mut acct = Accounter::bounded(64 << 20);
    let mut dumper = Dumper { indent: 0 };

    match visit_from_gzip_reader(file, &mut acct, &mut dumper) {
        Ok(_) => eprintln!("read {} bytes of NBT", acct.usage()),
        Err(e) => eprintln!("failed to read NBT: {e}"),
    }
}
