// ccode: C front-end toolchain — interpret a program or emit host bindings

use std::fs;
use std::path::Path;
use std::process;

use ccode::emit::csharp::CSharpEmitter;
use ccode::interpreter::engine::Interpreter;
use ccode::source::SourceBuffer;

fn usage(program_name: &str) -> ! {
    eprintln!("Usage: {} <run|bind> <file.c> [output.cs]", program_name);
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  run   parse and interpret the program, printing its output");
    eprintln!("  bind  parse and emit a C# P/Invoke binding file");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} run main.c", program_name);
    eprintln!("  {} bind glfw_decls.c Glfw.cs", program_name);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("ccode");

    if args.len() < 3 {
        eprintln!("Error: expected a mode and an input file");
        eprintln!();
        usage(program_name);
    }

    let mode = args[1].as_str();
    let input = &args[2];

    if !Path::new(input).exists() {
        eprintln!("Error: file '{}' not found", input);
        process::exit(1);
    }

    let text = match fs::read_to_string(input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: could not read '{}': {}", input, err);
            process::exit(1);
        }
    };

    let src = SourceBuffer::new(input.as_str(), text);
    log::info!("parsing {}", input);
    let tu = match ccode::parse_source(&src) {
        Ok(tu) => tu,
        Err(err) => {
            eprintln!("{}: {}", input, err);
            process::exit(1);
        }
    };
    log::info!("parsed {} top-level declarations", tu.decls.len());

    match mode {
        "run" => {
            let mut interpreter = Interpreter::new(&tu);
            match interpreter.run() {
                Ok(exit_code) => {
                    print!("{}", interpreter.output());
                    process::exit(exit_code as i32);
                }
                Err(err) => {
                    print!("{}", interpreter.output());
                    eprintln!("{}: runtime error: {}", input, err);
                    process::exit(1);
                }
            }
        }
        "bind" => {
            let emitter = CSharpEmitter::new();
            let bindings = match emitter.emit(&tu) {
                Ok(bindings) => bindings,
                Err(err) => {
                    eprintln!("{}: emit error: {}", input, err);
                    process::exit(1);
                }
            };
            match args.get(3) {
                Some(output) => {
                    if let Err(err) = fs::write(output, &bindings) {
                        eprintln!("Error: could not write '{}': {}", output, err);
                        process::exit(1);
                    }
                    eprintln!("Wrote {} bytes to {}", bindings.len(), output);
                }
                None => print!("{}", bindings),
            }
        }
        other => {
            eprintln!("Error: unknown mode '{}'", other);
            eprintln!();
            usage(program_name);
        }
    }
}
