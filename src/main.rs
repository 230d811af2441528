use std::env;
use std::fs;
use std::process;

use bandish::{Composition, PitchTable, TaalRegistry, Transcriber};

const USAGE: &str = "Usage: bandish [--taals <taals.yaml>] [--pitches <pitches.yaml>] <composition.yaml> [output.krn]";

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut taals_path: Option<&String> = None;
    let mut pitches_path: Option<&String> = None;
    let mut positional: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--taals" | "--pitches" => {
                let Some(value) = iter.next() else {
                    eprintln!("{} needs a file", arg);
                    eprintln!("{}", USAGE);
                    process::exit(1);
                };
                if arg == "--taals" {
                    taals_path = Some(value);
                } else {
                    pitches_path = Some(value);
                }
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ => positional.push(arg),
        }
    }

    let (input_path, output_path) = match positional.as_slice() {
        [input] => (*input, None),
        [input, output] => (*input, Some(*output)),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    let mut registry = TaalRegistry::builtin();
    if let Some(path) = taals_path {
        match TaalRegistry::from_yaml(&read_file(path)) {
            Ok(custom) => registry.merge(custom),
            Err(e) => {
                eprintln!("Error in taal definitions '{}': {}", path, e);
                process::exit(1);
            }
        }
    }

    let mut pitches = PitchTable::standard();
    if let Some(path) = pitches_path {
        match PitchTable::from_yaml(&read_file(path)) {
            Ok(custom) => pitches.merge(custom),
            Err(e) => {
                eprintln!("Error in pitch table '{}': {}", path, e);
                process::exit(1);
            }
        }
    }

    let composition = match Composition::from_yaml(&read_file(input_path)) {
        Ok(composition) => composition,
        Err(e) => {
            eprintln!("Error in composition '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let transcription = match Transcriber::new(registry, pitches).transcribe(&composition) {
        Ok(transcription) => transcription,
        Err(e) => {
            eprintln!("Transcription error: {}", e);
            process::exit(1);
        }
    };

    // Broken sections are reported but the rest of the document is still written
    for failure in &transcription.failures {
        eprintln!("Skipped {}", failure);
    }

    let kern = transcription.to_kern();

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &kern) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote kern to {}", path);
        }
        None => {
            print!("{}", kern);
        }
    }

    if !transcription.is_complete() {
        process::exit(1);
    }
}
