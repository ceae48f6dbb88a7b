use std::process;

fn main() {
    match markdown_paginate_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-paginate error: {err:#}");
            process::exit(1);
        }
    }
}
