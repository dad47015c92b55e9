//! Read a gzip compressed binary NBT file and print it as pretty SNBT.
//!
//! Usage: snbt-dump <file>

use std::fs::File;

use strictnbt::{from_gzip_reader, Accounter};

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let file = File::open(args[0].clone()).expect("file does not exist");

    let mut acct = Accounter::bounded(64 << 20);
    match from_gzip_reader(file, &mut acct) {
        Ok(value) => println!("{}", strictsnbt::to_string_pretty(&value)),
        Err(e) => eprintln!("failed to read NBT: {e}"),
    }
}
