//! Interactive keypad on the terminal.
//!
//! Every line is a key string (`3 + 4 =`, `⌫`, `C`); the prompt shows the
//! history trail and the display is printed after each line.

use calc_engine::{parse_keys, Calculator, EngineConfig};
use dialoguer::Input;

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

pub fn run_repl(engine_config: EngineConfig) -> anyhow::Result<()> {
    let mut calc = Calculator::with_config(engine_config);
    println!("{}", calc.display());

    loop {
        let prompt = format!("[{}]", calc.history_text());
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let line = line.trim();
        if QUIT_WORDS.contains(&line) {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        if let Err(e) = press_line(&mut calc, line) {
            eprintln!("error: {}", e);
        }
        println!("{}", calc.display());
    }
}

/// Apply one line of keys. Keys before a rejected one stay pressed.
fn press_line(calc: &mut Calculator, line: &str) -> anyhow::Result<()> {
    calc.press_all(&parse_keys(line)?)?;
    Ok(())
}
