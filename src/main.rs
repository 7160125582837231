use std::io::{self, BufRead as _, Write as _};

use bpaf::{construct, short, Parser};
use lacewing::{frontend::module::Module, report::report_error};

/// Runs every statement of `source` in a fresh module, printing outputs until the first error.
pub fn run(source: &str) -> bool {
	let mut module = Module::new();
	match module.execute(source) {
		Ok(outputs) => {
			for output in outputs {
				println!("{output}");
			}
			true
		}
		Err(error) => {
			report_error(source, &module.interner, &error);
			false
		}
	}
}

/// Reads statements line by line, keeping definitions across lines.
pub fn repl() -> io::Result<()> {
	let mut module = Module::new();
	let stdin = io::stdin();
	let mut stdout = io::stdout();
	write!(stdout, "> ")?;
	stdout.flush()?;
	for line in stdin.lock().lines() {
		let line = line?;
		if !line.trim().is_empty() {
			match module.execute(&line) {
				Ok(outputs) =>
					for output in outputs {
						println!("{output}");
					},
				Err(error) => report_error(&line, &module.interner, &error),
			}
		}
		write!(stdout, "> ")?;
		stdout.flush()?;
	}
	writeln!(stdout)
}

#[derive(Clone)]
enum InputOption {
	Direct(String),
	FilePath(String),
	Repl,
}

struct Options {
	input: InputOption,
}

fn main() {
	env_logger::init();

	let options: Options = construct!(Options {
		input(construct!([
			c(short('c').argument::<String>("\"statements\"").help("Read input from argument").map(InputOption::Direct)),
			f(short('f').argument::<String>("PATH").help("Read input from file").map(InputOption::FilePath)),
			r(short('r').help("Start an interactive session").req_flag(InputOption::Repl)),
		]))
	})
	.to_options()
	.run();

	let input = match options.input {
		InputOption::Direct(command) => command,
		InputOption::FilePath(file_path) => match std::fs::read_to_string(&file_path) {
			Ok(source) => source,
			Err(error) => {
				eprintln!("error: could not read {file_path}: {error}");
				std::process::exit(1);
			}
		},
		InputOption::Repl => {
			if let Err(error) = repl() {
				eprintln!("error: {error}");
				std::process::exit(1);
			}
			return;
		}
	};

	if !run(&input) {
		std::process::exit(1);
	}
}
