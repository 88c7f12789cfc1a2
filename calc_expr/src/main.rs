//! Interactive button pad for the expression engine.
//!
//! Type button values separated by spaces (`7 ^ 2 =`), or run them together
//! (`12+3=`); `DEL` and `CLEAR` must stand alone.

use calc_expr::{apply, EditAction, Expression};
use std::io::{self, BufRead, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              Pinch Calculator — Button Pad           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Buttons: 0-9 . + - * / ( ) ^ DEL CLEAR =    (q to quit)");
    println!();

    let mut expr = Expression::new();

    loop {
        let Some(line) = read_line("  press> ") else {
            println!();
            break;
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }

        for value in presses(line) {
            if EditAction::from_value(&value).is_none() {
                println!("  ⚠  '{}' is not a button.", value);
                continue;
            }
            expr = apply(&expr, &value);
        }

        print_display(&expr);
    }
}

/// Split a line into button values.  Whole words that are buttons (`DEL`)
/// are kept; anything else is pressed one character at a time.
fn presses(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    for word in line.split_whitespace() {
        if EditAction::from_value(word).is_some() {
            out.push(word.to_string());
        } else {
            out.extend(word.chars().map(String::from));
        }
    }
    out
}

fn print_display(expr: &Expression) {
    let flag = if expr.is_error() { "  (next press starts over)" } else { "" };
    println!("  ┌────────────────────────────────────────┐");
    println!("  │ {:>38} │{}", expr.text(), flag);
    println!("  └────────────────────────────────────────┘");
}

/// Prompt and read one line; `None` once input is exhausted.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    next_line(&mut io::stdin().lock())
}

fn next_line(input: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_ends_at_eof() {
        let mut input = io::Cursor::new("2+3=\n7");
        assert_eq!(next_line(&mut input).as_deref(), Some("2+3=\n"));
        assert_eq!(next_line(&mut input).as_deref(), Some("7"));
        assert_eq!(next_line(&mut input), None);
        assert_eq!(next_line(&mut input), None);
    }

    #[test]
    fn presses_split_words_and_characters() {
        assert_eq!(presses("12+3="), ["1", "2", "+", "3", "="]);
        assert_eq!(presses("7 ^ 2 DEL CLEAR"), ["7", "^", "2", "DEL", "CLEAR"]);
        assert!(presses("   ").is_empty());
    }
}
