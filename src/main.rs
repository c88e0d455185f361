use clap::Parser;
use double_indent::{FixResult, Options, Pipeline};
use serde::Serialize;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "double-indent")]
#[command(about = "Double-indent the parameters of multi-line Python function signatures")]
struct Cli {
    /// Files or directories to rewrite (`-` reads stdin and writes stdout)
    filenames: Vec<String>,

    /// Width of one indentation level
    #[arg(short, long, default_value_t = 4, value_parser = parse_indent)]
    indent: usize,

    /// Print a JSON report per input instead of the rewritten stdin
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    filename: &'a str,
    #[serde(flatten)]
    result: &'a FixResult,
}

/// Outcome of one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unchanged,
    Changed,
    Failed,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = match Options::new(cli.indent) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };
    let pipeline = Pipeline::new(options);

    let mut status = 0;
    for filename in &cli.filenames {
        let outcome = if filename == "-" {
            fix_stdin(&pipeline, cli.json)
        } else {
            fix_path(&pipeline, Path::new(filename), cli.json)
        };
        if outcome != Status::Unchanged {
            status = 1;
        }
    }
    std::process::exit(status);
}

fn parse_indent(value: &str) -> Result<usize, String> {
    let indent: usize = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if indent == 0 {
        return Err("indent must be at least 1".to_string());
    }
    Ok(indent)
}

fn fix_stdin(pipeline: &Pipeline, json: bool) -> Status {
    let mut source = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut source) {
        eprintln!("-: error: {}", err);
        return Status::Failed;
    }

    let result = match pipeline.run(&source) {
        Ok(result) => result,
        Err(err) => {
            print_error(&err, &source, "-");
            return Status::Failed;
        }
    };

    if json {
        print_report("-", &result);
    } else {
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout.write_all(result.code.as_bytes()) {
            eprintln!("-: error: {}", err);
            return Status::Failed;
        }
    }

    if result.changed { Status::Changed } else { Status::Unchanged }
}

fn fix_path(pipeline: &Pipeline, path: &Path, json: bool) -> Status {
    if path.is_dir() {
        return fix_directory(pipeline, path, json);
    }
    fix_file(pipeline, path, json)
}

fn fix_directory(pipeline: &Pipeline, dir: &Path, json: bool) -> Status {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "py"))
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut status = Status::Unchanged;
    for file in &files {
        match fix_file(pipeline, file, json) {
            Status::Failed => status = Status::Failed,
            Status::Changed if status == Status::Unchanged => status = Status::Changed,
            _ => {}
        }
    }
    status
}

fn fix_file(pipeline: &Pipeline, path: &Path, json: bool) -> Status {
    let filename = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: error: {}", filename, err);
            return Status::Failed;
        }
    };

    let result = match pipeline.run(&source) {
        Ok(result) => result,
        Err(err) => {
            print_error(&err, &source, &filename);
            return Status::Failed;
        }
    };

    if json {
        print_report(&filename, &result);
    }
    if !result.changed {
        return Status::Unchanged;
    }

    eprintln!("Rewriting {}", filename);
    if let Err(err) = fs::write(path, &result.code) {
        eprintln!("{}: error: {}", filename, err);
        return Status::Failed;
    }
    Status::Changed
}

fn print_report(filename: &str, result: &FixResult) {
    match serde_json::to_string(&Report { filename, result }) {
        Ok(line) => println!("{}", line),
        Err(err) => eprintln!("{}: error: {}", filename, err),
    }
}

fn print_error(err: &double_indent::FixError, source: &str, filename: &str) {
    if io::stderr().is_terminal() {
        eprint!("{}", err.render_color(source, filename));
    } else {
        eprint!("{}", err.render(source, filename));
    }
}
