use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tree_scheme::Interpreter;

fn main() {
    println!("tree-scheme");
    println!("Press Ctrl+C or Ctrl+D to exit");

    let mut interpreter = Interpreter::new();
    let mut rl = DefaultEditor::new().expect("failed to start line editor");

    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match interpreter.run(&line) {
                    Ok(output) => {
                        if !output.is_empty() {
                            println!("{output}");
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted (Ctrl+C)");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting (Ctrl+D)");
                break;
            }
            Err(err) => {
                eprintln!("Readline error: {err:?}");
                break;
            }
        }
    }
}
