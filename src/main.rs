use std::{env, fs::read_to_string, process::exit, time::Instant};

use minibasic::{
    display_error,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse_source,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: minibasic <source-file>");
        exit(2);
    }

    let file_path: &str = &args[1];
    let file_name = if file_path.contains('/') {
        file_path.split('/').next_back().unwrap_or(file_path)
    } else {
        file_path
    };

    let source = read_to_string(file_path).expect("Failed to read file!");

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(String::from(file_name))) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, file_name, &source);
            exit(1);
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    for token in &tokens {
        match token.kind {
            TokenKind::NewLine => println!(),
            _ => print!("{} ", token),
        }
    }
    println!();
    println!();

    let parse_start = Instant::now();

    match parse_source(source.clone(), Some(String::from(file_name))) {
        Ok(program) => {
            println!("Parsed in {:?}", parse_start.elapsed());
            println!();
            for stmt in &program {
                println!("{}", stmt);
            }
        }
        Err(error) => {
            display_error(&error, file_name, &source);
            exit(1);
        }
    }
}
